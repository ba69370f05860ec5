//! Virtual-item products and their prices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

/// Price of a product in one currency or region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProductPrice {
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    pub is_virtual_currency: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProductRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub object: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "rules::not_empty"))]
    pub product_type: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub sku: String,
    #[validate(custom(function = "rules::localized"))]
    pub name: BTreeMap<String, String>,
    #[validate(length(equal = 3))]
    pub default_currency: String,
    pub enabled: bool,
    #[validate(length(min = 1), nested)]
    pub prices: Vec<ProductPrice>,
    #[validate(custom(function = "rules::localized"))]
    pub description: BTreeMap<String, String>,
    pub long_description: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Product listing filters of one merchant
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProductListingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(ProductListingRequest);

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProductRef {
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProductPricesRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub product_id: String,
    #[validate(length(min = 1), nested)]
    pub prices: Vec<ProductPrice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_requires_english_name_and_a_price() {
        let mut product: ProductRequest = serde_json::from_value(json!({
            "object": "product",
            "type": "simple_product",
            "sku": "ru_0_doom_2",
            "name": {"en": "Doom II"},
            "default_currency": "USD",
            "enabled": true,
            "prices": [{"amount": 12.93, "currency": "USD"}],
            "description": {"en": "Doom II description"},
            "project_id": "5bdc39a95d1e1100019fb7df",
            "merchant_id": "5be2c3022b9bb6000765d132"
        }))
        .unwrap();
        assert!(product.validate().is_ok());

        product.name.remove("en");
        assert!(product.validate().unwrap_err().field_errors().contains_key("name"));

        product.name.insert("en".into(), "Doom II".into());
        product.prices.clear();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_product_type_wire_name() {
        let product = ProductRequest {
            product_type: "simple_product".into(),
            ..ProductRequest::default()
        };
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["type"], "simple_product");
        assert!(value.get("id").is_none());
    }
}
