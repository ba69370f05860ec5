//! Key products: game keys sold per platform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::products::ProductPrice;
use super::Extra;
use crate::application::validation as rules;

/// Prices of a key product on one platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlatformPrice {
    #[validate(custom(function = "rules::not_empty"))]
    pub id: String,
    pub name: String,
    #[validate(nested)]
    pub prices: Vec<ProductPrice>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub eula_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activation_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct KeyProductRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub object: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub sku: String,
    #[validate(custom(function = "rules::localized"))]
    pub name: BTreeMap<String, String>,
    #[validate(custom(function = "rules::localized"))]
    pub description: BTreeMap<String, String>,
    pub long_description: BTreeMap<String, String>,
    #[validate(length(equal = 3))]
    pub default_currency: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub pricing: String,
    #[validate(nested)]
    pub platforms: Vec<PlatformPrice>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Key product owned by a merchant
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct KeyProductRef {
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

/// Publish and unpublish
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct KeyProductStateRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub key_product_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct KeyProductListingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub enabled: String,
    #[validate(range(min = 0))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(KeyProductListingRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlatformListingRequest {
    #[validate(range(min = 0))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(PlatformListingRequest);

/// Newline-separated key file for one platform
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PlatformKeysFileRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub key_product_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub platform_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(serialize_with = "super::as_base64")]
    #[validate(length(min = 1))]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PlatformKeyCountRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub key_product_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub platform_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

/// Storefront view of a key product, priced for the buyer
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct KeyProductInfoRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub key_product_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct KeyForOrderRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub key_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_file_is_base64_encoded() {
        let request = PlatformKeysFileRequest {
            key_product_id: "5be2c3022b9bb6000765d132".into(),
            platform_id: "steam".into(),
            merchant_id: "5be2c3022b9bb6000765d132".into(),
            file: b"AAAA-BBBB\nCCCC-DDDD\n".to_vec(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["file"], "QUFBQS1CQkJCCkNDQ0MtRERERAo=");
    }

    #[test]
    fn test_empty_key_file_is_invalid() {
        let request = PlatformKeysFileRequest {
            key_product_id: "5be2c3022b9bb6000765d132".into(),
            platform_id: "steam".into(),
            merchant_id: "5be2c3022b9bb6000765d132".into(),
            file: Vec::new(),
        };

        assert!(request.validate().unwrap_err().field_errors().contains_key("file"));
    }

    #[test]
    fn test_key_product_platform_prices_are_nested() {
        let product: KeyProductRequest = serde_json::from_value(json!({
            "merchant_id": "5be2c3022b9bb6000765d132",
            "project_id": "5bdc39a95d1e1100019fb7df",
            "object": "key_product",
            "sku": "some_sku",
            "name": {"en": "A", "ru": "А"},
            "description": {"en": "A", "ru": "А"},
            "default_currency": "RUB",
            "pricing": "manual",
            "platforms": [{"id": "gog", "name": "Gog", "prices": [{"currency": "RUBLE", "amount": 666}]}]
        }))
        .unwrap();

        assert!(product.validate().is_err());
    }
}
