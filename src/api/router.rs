use axum::{
    extract::{DefaultBodyLimit, FromRef},
    handler::Handler,
    http::Method,
    middleware as axum_middleware,
    routing::{get, on, MethodFilter},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{self, health_handler};
use crate::api::middleware::{auth, body_dump, cors, raw_body, recovery};
use crate::api::openapi;
use crate::application::gateway::Gateway;
use crate::application::ports::{FileStorage, IdentityProvider};
use crate::config::{Config, Pagination};

/// Largest multipart body accepted (key files, agreement documents)
pub const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub config: Arc<Config>,
    /// Bucket holding signed merchant agreements
    pub agreement_storage: Arc<dyn FileStorage>,
    /// Bucket holding generated reports
    pub report_storage: Arc<dyn FileStorage>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for Pagination {
    fn from_ref(state: &AppState) -> Self {
        state.config.pagination
    }
}

/// Route table entry, used by the `routes` command
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RouteInfo {
    pub path: String,
    pub method: String,
    pub handler: String,
}

/// Routes sharing a prefix and an authentication scheme
pub struct RouteGroup {
    prefix: &'static str,
    router: Router<AppState>,
    routes: Vec<RouteInfo>,
}

fn handler_name<H>() -> String {
    let full = std::any::type_name::<H>();
    full.strip_prefix(concat!(env!("CARGO_CRATE_NAME"), "::api::handlers::"))
        .unwrap_or(full)
        .to_string()
}

impl RouteGroup {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            router: Router::new(),
            routes: Vec::new(),
        }
    }

    fn add<H, T>(&mut self, method: Method, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let filter = match MethodFilter::try_from(method.clone()) {
            Ok(filter) => filter,
            Err(_) => return self,
        };

        self.routes.push(RouteInfo {
            path: format!("{}{}", self.prefix, path),
            method: method.to_string(),
            handler: handler_name::<H>(),
        });

        let router = std::mem::take(&mut self.router);
        self.router = router.route(path, on(filter, handler));
        self
    }

    pub fn get<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::POST, path, handler)
    }

    pub fn put<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PUT, path, handler)
    }

    pub fn patch<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PATCH, path, handler)
    }

    pub fn delete<H, T>(&mut self, path: &str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::DELETE, path, handler)
    }
}

/// The five route groups every handler module registers into
pub struct RouteGroups {
    /// `/auth/api/v1`: bearer user
    pub auth_project: RouteGroup,
    /// `/admin/api/v1`: bearer user bound to a merchant
    pub auth_user: RouteGroup,
    /// `/system/api/v1`: bearer user acting on system resources
    pub system_user: RouteGroup,
    /// `/api/v1`: no authentication
    pub common: RouteGroup,
    /// `/webhook`: payment system callbacks
    pub webhooks: RouteGroup,
}

pub const AUTH_PROJECT_PREFIX: &str = "/auth/api/v1";
pub const AUTH_USER_PREFIX: &str = "/admin/api/v1";
pub const SYSTEM_USER_PREFIX: &str = "/system/api/v1";
pub const COMMON_PREFIX: &str = "/api/v1";
pub const WEBHOOK_PREFIX: &str = "/webhook";

impl RouteGroups {
    fn new() -> Self {
        Self {
            auth_project: RouteGroup::new(AUTH_PROJECT_PREFIX),
            auth_user: RouteGroup::new(AUTH_USER_PREFIX),
            system_user: RouteGroup::new(SYSTEM_USER_PREFIX),
            common: RouteGroup::new(COMMON_PREFIX),
            webhooks: RouteGroup::new(WEBHOOK_PREFIX),
        }
    }

    /// Groups with every handler module registered
    pub fn build() -> Self {
        let mut groups = Self::new();
        handlers::register_all(&mut groups);
        groups
    }

    /// Sorted route table across all groups
    pub fn route_table(&self) -> Vec<RouteInfo> {
        let mut table: Vec<RouteInfo> = [
            &self.auth_project,
            &self.auth_user,
            &self.system_user,
            &self.common,
            &self.webhooks,
        ]
        .iter()
        .flat_map(|group| group.routes.iter().cloned())
        .collect();
        table.sort();
        table
    }
}

/// Render the route table as aligned text columns
pub fn format_route_table(table: &[RouteInfo]) -> String {
    let path_width = table.iter().map(|r| r.path.len()).max().unwrap_or(4).max(4);
    let method_width = table.iter().map(|r| r.method.len()).max().unwrap_or(6).max(6);

    let mut out = format!(
        "{:<path_width$}  {:<method_width$}  Handler\n",
        "Path", "Method"
    );
    for route in table {
        out.push_str(&format!(
            "{:<path_width$}  {:<method_width$}  {}\n",
            route.path, route.method, route.handler
        ));
    }
    out
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let groups = RouteGroups::build();
    let cors = cors::create_cors_layer(&state.config);

    let auth_project = groups.auth_project.router.layer(
        axum_middleware::from_fn_with_state(state.clone(), auth::user_details),
    );
    let auth_user = groups.auth_user.router.layer(axum_middleware::from_fn_with_state(
        state.clone(),
        auth::merchant_user,
    ));
    let system_user = groups.system_user.router.layer(
        axum_middleware::from_fn_with_state(state.clone(), auth::user_details),
    );
    let common = groups.common.router.layer(axum_middleware::from_fn_with_state(
        state.clone(),
        auth::optional_user,
    ));
    let webhooks = groups
        .webhooks
        .router
        .layer(axum_middleware::from_fn(body_dump::dump_bodies));

    Router::new()
        // Health check (no auth required)
        .route("/health", get(health_handler))
        .nest(AUTH_PROJECT_PREFIX, auth_project)
        .nest(AUTH_USER_PREFIX, auth_user)
        .nest(SYSTEM_USER_PREFIX, system_user)
        .nest(COMMON_PREFIX, common)
        .nest(WEBHOOK_PREFIX, webhooks)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
        .merge(openapi::swagger_ui())
        // Outermost last: tracing, panic recovery, CORS, raw body capture
        .layer(axum_middleware::from_fn(raw_body::capture_raw_body))
        .layer(cors)
        .layer(recovery::recovery_layer())
        .layer(TraceLayer::new_for_http())
}
