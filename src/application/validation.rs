//! Custom validation rules for request DTOs.
//!
//! Each rule reports the tag name clients see in validation error details,
//! e.g. `field validation for 'merchant_id' failed on the 'hexadecimal' tag`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{ValidateEmail, ValidationError};

use crate::domain::constants::{
    ANNUAL_INCOME_RANGES, HOME_REGIONS, NUMBER_OF_EMPLOYEES_RANGES, TARIFF_REGIONS,
    USER_PROFILE_POSITIONS,
};

pub const OBJECT_ID_LENGTH: usize = 24;

/// Language every localized field must carry.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Param key used by struct-level rules to attribute an error to a field.
pub const FIELD_PARAM: &str = "field";

static ZIP_USA: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]{5}(?:-[0-9]{4})?$").ok());
static NAME: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[\p{L}\p{M} \-']+$").ok());
static COMPANY_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"^[\p{L}\p{M} \-.0-9"]+$"#).ok());
static SWIFT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Z]{6}[A-Z0-9]{2}([A-Z0-9]{3})?$").ok());
static CITY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[\p{L}\p{M} \-.]+$").ok());
static LOCALE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[a-z]{2}-[A-Z]{2,10}$").ok());
static PHONE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]{5,20}$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn check(valid: bool, tag: &'static str) -> Result<(), ValidationError> {
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(tag))
    }
}

/// Error attributed to `field` from a struct-level rule.
pub fn field_error(field: &'static str, tag: &'static str) -> ValidationError {
    let mut error = ValidationError::new(tag);
    error.add_param(Cow::Borrowed(FIELD_PARAM), &field);
    error
}

pub fn is_object_id(value: &str) -> bool {
    value.len() == OBJECT_ID_LENGTH && value.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn not_empty(value: &str) -> Result<(), ValidationError> {
    check(!value.trim().is_empty(), "required")
}

/// Required 24-character hexadecimal identifier.
pub fn object_id(value: &str) -> Result<(), ValidationError> {
    not_empty(value)?;
    check(value.chars().all(|c| c.is_ascii_hexdigit()), "hexadecimal")?;
    check(value.len() == OBJECT_ID_LENGTH, "len")
}

/// Identifier that may be left empty.
pub fn optional_object_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    object_id(value)
}

pub fn object_ids(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|value| object_id(value))
}

pub fn uuid(value: &str) -> Result<(), ValidationError> {
    check(uuid::Uuid::parse_str(value).is_ok(), "uuid")
}

pub fn optional_uuid(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    uuid(value)
}

pub fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    check(value.validate_email(), "email")
}

pub fn zip_usa(value: &str) -> Result<(), ValidationError> {
    check(matches(&ZIP_USA, value), "zip_usa")
}

pub fn name(value: &str) -> Result<(), ValidationError> {
    check(matches(&NAME, value), "name")
}

pub fn company_name(value: &str) -> Result<(), ValidationError> {
    check(matches(&COMPANY_NAME, value), "company_name")
}

pub fn swift(value: &str) -> Result<(), ValidationError> {
    check(matches(&SWIFT, value), "swift")
}

pub fn city(value: &str) -> Result<(), ValidationError> {
    check(matches(&CITY, value), "city")
}

pub fn locale(value: &str) -> Result<(), ValidationError> {
    check(matches(&LOCALE, value), "locale")
}

pub fn phone(value: &str) -> Result<(), ValidationError> {
    check(matches(&PHONE, value), "phone")
}

pub fn position(value: &str) -> Result<(), ValidationError> {
    check(USER_PROFILE_POSITIONS.contains(&value), "position")
}

/// Payment cost region (`cis`, `eu`, ...).
pub fn world_region(value: &str) -> Result<(), ValidationError> {
    check(
        TARIFF_REGIONS.iter().any(|(code, _)| *code == value),
        "world_region",
    )
}

/// Merchant home region used for tariffs.
pub fn tariff_region(value: &str) -> Result<(), ValidationError> {
    check(HOME_REGIONS.contains(&value), "tariff_region")
}

/// ISO 13616 IBAN with mod-97 checksum.
pub fn iban(value: &str) -> Result<(), ValidationError> {
    check(is_valid_iban(value), "iban")
}

fn is_valid_iban(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 15 || compact.len() > 34 || !compact.is_ascii() {
        return false;
    }

    let (head, tail) = compact.split_at(4);
    if !head[..2].chars().all(|c| c.is_ascii_uppercase())
        || !head[2..].chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let digits = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return false,
        };
        remainder = if digits >= 10 {
            (remainder * 100 + digits) % 97
        } else {
            (remainder * 10 + digits) % 97
        };
    }
    remainder == 1
}

fn in_ranges(from: i64, to: i64, ranges: &[(i64, i64)]) -> bool {
    ranges.iter().any(|(f, t)| *f == from && *t == to)
}

pub fn annual_income_range(from: i64, to: i64) -> Result<(), ValidationError> {
    check(in_ranges(from, to, ANNUAL_INCOME_RANGES), "annual_income")
}

pub fn number_of_employees_range(from: i64, to: i64) -> Result<(), ValidationError> {
    check(
        in_ranges(from, to, NUMBER_OF_EMPLOYEES_RANGES),
        "number_of_employees",
    )
}

/// Localized text; the English entry is mandatory.
pub fn localized(value: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    check(
        value.get(DEFAULT_LANGUAGE).is_some_and(|text| !text.trim().is_empty()),
        "required",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_tags() {
        assert!(object_id("5be2c3022b9bb6000765d132").is_ok());
        assert_eq!(object_id("").unwrap_err().code, "required");
        assert_eq!(object_id("zzz").unwrap_err().code, "hexadecimal");
        assert_eq!(object_id("5be2c3022b").unwrap_err().code, "len");
        assert!(optional_object_id("").is_ok());
    }

    #[test]
    fn test_localized_requires_english() {
        let mut text = BTreeMap::new();
        text.insert("ru".to_string(), "Игра".to_string());
        assert_eq!(localized(&text).unwrap_err().code, "required");

        text.insert("en".to_string(), "Game".to_string());
        assert!(localized(&text).is_ok());
    }

    #[test]
    fn test_zip_usa() {
        assert!(zip_usa("98001").is_ok());
        assert!(zip_usa("98001-1234").is_ok());
        assert_eq!(zip_usa("980011").unwrap_err().code, "zip_usa");
    }

    #[test]
    fn test_names() {
        assert!(name("Jean-Luc O'Neil").is_ok());
        assert!(name("R2D2").is_err());
        assert!(company_name("Unit Test \"Company\" 2").is_ok());
        assert!(city("St. Petersburg").is_ok());
        assert!(city("City 17").is_err());
    }

    #[test]
    fn test_swift_and_locale() {
        assert!(swift("ALFARUMM").is_ok());
        assert!(swift("ALFARUMMXXX").is_ok());
        assert!(swift("alfarumm").is_err());
        assert!(locale("en-US").is_ok());
        assert!(locale("en").is_err());
    }

    #[test]
    fn test_iban() {
        assert!(iban("GB82 WEST 1234 5698 7654 32").is_ok());
        assert!(iban("DE89370400440532013000").is_ok());
        assert!(iban("DE89370400440532013001").is_err());
    }

    #[test]
    fn test_regions_and_ranges() {
        assert!(world_region("west_asia").is_ok());
        assert!(world_region("europe").is_err());
        assert!(tariff_region("russia_and_cis").is_ok());
        assert!(annual_income_range(1_000_000, 0).is_ok());
        assert!(annual_income_range(5, 10).is_err());
        assert!(number_of_employees_range(11, 50).is_ok());
    }

    #[test]
    fn test_struct_level_error_carries_field() {
        let error = field_error("zip", "zip");
        assert_eq!(error.code, "zip");
        assert!(error.params.contains_key(FIELD_PARAM));
    }
}
