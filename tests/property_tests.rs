//! Property-based tests using proptest
//!
//! Invariants of the request rules, pagination and status relaying that
//! should hold for any input.

use axum::http::StatusCode;
use proptest::prelude::*;
use serde::Deserialize;

use paysuper_management_api::api::errors::relay_status;
use paysuper_management_api::api::extract::Paginated;
use paysuper_management_api::application::validation::{
    annual_income_range, is_object_id, object_id, optional_object_id, zip_usa,
};
use paysuper_management_api::config::Pagination;
use paysuper_management_api::domain::constants::ANNUAL_INCOME_RANGES;
use paysuper_management_api::dto::comma_list;

#[derive(Debug, Default)]
struct Page {
    limit: i64,
    offset: i64,
}

impl Paginated for Page {
    fn page_mut(&mut self) -> (&mut i64, &mut i64) {
        (&mut self.limit, &mut self.offset)
    }
}

#[derive(Debug, Deserialize)]
struct Filter {
    #[serde(deserialize_with = "comma_list")]
    statuses: Vec<String>,
}

proptest! {
    #[test]
    fn prop_hex_ids_of_24_chars_are_object_ids(id in "[0-9a-f]{24}") {
        prop_assert!(is_object_id(&id));
        prop_assert!(object_id(&id).is_ok());
        prop_assert!(optional_object_id(&id).is_ok());
    }

    #[test]
    fn prop_other_lengths_are_rejected(id in "[0-9a-f]{1,23}|[0-9a-f]{25,40}") {
        prop_assert!(!is_object_id(&id));
        prop_assert!(object_id(&id).is_err());
    }

    #[test]
    fn prop_non_hex_ids_are_rejected(prefix in "[0-9a-f]{10}", bad in "[g-z]", suffix in "[0-9a-f]{13}") {
        let id = format!("{prefix}{bad}{suffix}");
        prop_assert!(object_id(&id).is_err());
    }

    #[test]
    fn prop_pagination_stays_in_bounds(limit in any::<i64>(), offset in any::<i64>()) {
        let pagination = Pagination::default();
        let mut page = Page { limit, offset };
        page.apply_pagination(&pagination);

        prop_assert!(page.limit >= 1 && page.limit <= pagination.limit_max);
        prop_assert!(page.offset >= 0);
        if limit > 0 && limit <= pagination.limit_max {
            prop_assert_eq!(page.limit, limit);
        }
        if offset >= 0 {
            prop_assert_eq!(page.offset, offset);
        }
    }

    #[test]
    fn prop_http_statuses_are_relayed(status in 100i32..600) {
        prop_assert_eq!(relay_status(status).as_u16() as i32, status);
    }

    #[test]
    fn prop_out_of_range_statuses_become_500(status in prop_oneof![i32::MIN..100, 1000..i32::MAX]) {
        prop_assert_eq!(relay_status(status), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn prop_five_digit_zips_are_valid(zip in "[0-9]{5}", plus in proptest::option::of("[0-9]{4}")) {
        let zip = match plus {
            Some(plus) => format!("{zip}-{plus}"),
            None => zip,
        };
        prop_assert!(zip_usa(&zip).is_ok());
    }

    #[test]
    fn prop_comma_list_matches_array(items in proptest::collection::vec("[a-z_]{1,12}", 0..6)) {
        let joined = items.join(",");
        let from_query: Filter =
            serde_json::from_value(serde_json::json!({"statuses": joined})).unwrap();
        let from_array: Filter =
            serde_json::from_value(serde_json::json!({"statuses": items.clone()})).unwrap();

        prop_assert_eq!(&from_query.statuses, &items);
        prop_assert_eq!(&from_array.statuses, &items);
    }

    #[test]
    fn prop_only_listed_income_ranges_pass(from in 0i64..2_000_000, to in 0i64..2_000_000) {
        let listed = ANNUAL_INCOME_RANGES.contains(&(from, to));
        prop_assert_eq!(annual_income_range(from, to).is_ok(), listed);
    }
}
