use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::health::HealthResponse;
use crate::application::dto::settings::CreatedToken;
use crate::domain::ResponseErrorMessage;

/// OpenAPI document for the management API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PaySuper Management API",
        version = "1.0.0",
        description = "Dashboard and checkout gateway in front of the PaySuper billing, tax, geo and reporter services"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::admin_users::list_admin_users_handler,
        crate::api::handlers::tokens::create_token_handler,
        crate::api::handlers::user_profiles::confirm_email_handler,
        crate::api::handlers::cardpay::payment_callback_handler,
        crate::api::handlers::cardpay::refund_callback_handler,
    ),
    components(
        schemas(
            HealthResponse,
            CreatedToken,
            ResponseErrorMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Admin users and user profiles"),
        (name = "checkout", description = "Payment tokens and orders"),
        (name = "webhooks", description = "Payment system callbacks")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI route
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
