//! Virtual-item products of the signed-in merchant.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::{merchant_of, require_object_id};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::products::{
    ProductListingRequest, ProductRef, ProductRequest, UpdateProductPricesRequest,
};
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, AuthUser, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/products", list_products_handler)
        .post("/products", create_product_handler)
        .get("/products/{product_id}", get_product_handler)
        .put("/products/{product_id}", update_product_handler)
        .delete("/products/{product_id}", delete_product_handler)
        .get("/products/{product_id}/prices", get_product_prices_handler)
        .put("/products/{product_id}/prices", update_product_prices_handler);
}

fn internal(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::INTERNAL)
}

/// GET /products?name=car&sku=ru_0&project_id=...
pub async fn list_products_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<ProductListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.merchant_id = merchant_of(&state, &user).await?;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ListProducts, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

async fn product_ref(
    state: &AppState,
    user: &AuthUser,
    product_id: String,
) -> Result<ProductRef, ApiError> {
    require_object_id(&product_id, &errors::INCORRECT_PRODUCT_ID)?;

    let request = ProductRef {
        id: product_id,
        merchant_id: merchant_of(state, user).await?,
    };
    validate_request(&request)?;
    Ok(request)
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let request = product_ref(&state, &user, product_id).await?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetProduct, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let request = product_ref(&state, &user, product_id).await?;

    state
        .gateway
        .billing_unchecked(BillingMethod::DeleteProduct, &request)
        .await
        .map_err(internal)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn save_product(
    state: &AppState,
    user: &AuthUser,
    mut request: ProductRequest,
) -> Result<Json<Envelope>, ApiError> {
    request.merchant_id = merchant_of(state, user).await?;
    validate_request(&request)?;

    tracing::info!(sku = %request.sku, project_id = %request.project_id, "saving product");

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateOrUpdateProduct, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(mut request): Bound<ProductRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.id.clear();
    save_product(&state, &user, request).await
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
    Bound(mut request): Bound<ProductRequest>,
) -> Result<Json<Envelope>, ApiError> {
    require_object_id(&product_id, &errors::INCORRECT_PRODUCT_ID)?;
    request.id = product_id;
    save_product(&state, &user, request).await
}

pub async fn get_product_prices_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    require_object_id(&product_id, &errors::INCORRECT_PRODUCT_ID)?;
    let request = ProductRef {
        id: product_id,
        merchant_id: String::new(),
    };

    let envelope = state
        .gateway
        .billing(BillingMethod::GetProductPrices, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::GET_PRODUCT_PRICE))?;

    Ok(Json(envelope))
}

/// PUT /products/{product_id}/prices with body `{"prices": [...]}`
pub async fn update_product_prices_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Bound(mut request): Bound<UpdateProductPricesRequest>,
) -> Result<Json<Envelope>, ApiError> {
    require_object_id(&product_id, &errors::INCORRECT_PRODUCT_ID)?;
    request.product_id = product_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::UpdateProductPrices, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UPDATE_PRODUCT_PRICE))?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::Method;
    use serde_json::json;

    fn expect_merchant_lookup(app: &mut TestApp) {
        expect_request(
            &mut app.billing,
            "GetMerchantBy",
            |req| req["user_id"] == USER_ID,
            Envelope::ok().with_field("item", json!({"id": MERCHANT_ID})),
        );
    }

    fn product_body() -> serde_json::Value {
        json!({
            "object": "product",
            "type": "simple_product",
            "sku": "ru_0_doom_2",
            "name": {"en": "Doom II"},
            "default_currency": "USD",
            "enabled": true,
            "prices": [{"amount": 12.93, "currency": "USD"}],
            "description": {"en": "Doom II description"},
            "long_description": {},
            "project_id": "5bdc39a95d1e1100019fb7df"
        })
    }

    #[tokio::test]
    async fn test_list_products_resolves_merchant() {
        let mut app = TestApp::new();
        expect_merchant_lookup(&mut app);
        expect_request(
            &mut app.billing,
            "ListProducts",
            |req| req["merchant_id"] == MERCHANT_ID && req["limit"] == 10 && req["name"] == "car",
            Envelope::ok().with_field("total", json!(1)),
        );

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/products?name=car&limit=10"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_list_products_merchant_lookup_fails() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetMerchantBy");
        expect_no_call(&mut app.billing, "ListProducts");

        let (status, body) =
            send(app.router(), request(Method::GET, "/admin/api/v1/products")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }

    #[tokio::test]
    async fn test_get_product_bad_id() {
        let app = TestApp::new();

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/products/not-an-id"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000009");
    }

    #[tokio::test]
    async fn test_create_product_uses_resolved_merchant() {
        let mut app = TestApp::new();
        expect_merchant_lookup(&mut app);
        expect_request(
            &mut app.billing,
            "CreateOrUpdateProduct",
            |req| req["merchant_id"] == MERCHANT_ID && req["type"] == "simple_product",
            Envelope::ok().with_field("id", json!(OBJECT_ID)),
        );

        let (status, body) = send(
            app.router(),
            json_request(Method::POST, "/admin/api/v1/products", product_body()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_update_product_transport_error() {
        let mut app = TestApp::new();
        expect_merchant_lookup(&mut app);
        expect_transport_error(&mut app.billing, "CreateOrUpdateProduct");

        let uri = format!("/admin/api/v1/products/{OBJECT_ID}");
        let (status, body) =
            send(app.router(), json_request(Method::PUT, &uri, product_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000003");
    }

    #[tokio::test]
    async fn test_delete_product_answers_no_content() {
        let mut app = TestApp::new();
        expect_merchant_lookup(&mut app);
        expect_request(
            &mut app.billing,
            "DeleteProduct",
            |req| req["id"] == OBJECT_ID && req["merchant_id"] == MERCHANT_ID,
            empty_reply(),
        );

        let uri = format!("/admin/api/v1/products/{OBJECT_ID}");
        let (status, _) = send(app.router(), request(Method::DELETE, &uri)).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_product_prices_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetProductPrices");

        let uri = format!("/admin/api/v1/products/{OBJECT_ID}/prices");
        let (status, body) = send(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000072");
    }

    #[tokio::test]
    async fn test_update_product_prices_sends_body() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "UpdateProductPrices",
            |req| req["product_id"] == OBJECT_ID && req["prices"][0]["currency"] == "EUR",
            Envelope::ok(),
        );

        let uri = format!("/admin/api/v1/products/{OBJECT_ID}/prices");
        let (status, _) = send(
            app.router(),
            json_request(
                Method::PUT,
                &uri,
                json!({"prices": [{"amount": 10, "currency": "EUR", "region": "EUR"}]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_product_prices_requires_prices() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "UpdateProductPrices");

        let uri = format!("/admin/api/v1/products/{OBJECT_ID}/prices");
        let (status, body) =
            send(app.router(), json_request(Method::PUT, &uri, json!({"prices": []}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000002");
    }
}
