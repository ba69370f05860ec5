//! Request binding and validation.
//!
//! GET and DELETE requests bind the query string; everything else binds the
//! body according to its content type. An empty body binds to the type's
//! default value. Any binding failure is answered with `ma000023`.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRef, FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap, Method},
    response::{IntoResponse, Response},
    Form,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::api::errors::ApiError;
use crate::api::field_order;
use crate::application::validation::FIELD_PARAM;
use crate::config::Pagination;
use crate::domain::{constants, errors, AuthUser};

/// Body size accepted by the binder.
const MAX_BIND_BODY: usize = 8 * 1024 * 1024;

/// Request could not be decoded into the handler's request type
#[derive(Debug)]
pub struct BindRejection {
    pub reason: String,
}

impl BindRejection {
    fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.reason, "request binding failed");
        ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT).into_response()
    }
}

impl From<BindRejection> for ApiError {
    fn from(rejection: BindRejection) -> Self {
        tracing::debug!(reason = %rejection.reason, "request binding failed");
        ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT)
    }
}

/// Request bound from query or body
#[derive(Debug)]
pub struct Bound<T>(pub T);

impl<S, T> FromRequest<S> for Bound<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if matches!(*req.method(), Method::GET | Method::DELETE) {
            return Query::<T>::try_from_uri(req.uri())
                .map(|Query(value)| Bound(value))
                .map_err(BindRejection::new);
        }

        let content_type = content_type(req.headers());
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_BIND_BODY)
            .await
            .map_err(BindRejection::new)?;

        if bytes.is_empty() {
            return Ok(Bound(T::default()));
        }

        if content_type.starts_with("application/json") {
            return serde_json::from_slice(&bytes)
                .map(Bound)
                .map_err(BindRejection::new);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let req = Request::from_parts(parts, Body::from(bytes));
            return Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| Bound(value))
                .map_err(BindRejection::new);
        }

        Err(BindRejection::new(format!(
            "unsupported content type '{content_type}'"
        )))
    }
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Request types carrying `limit`/`offset`
pub trait Paginated {
    fn page_mut(&mut self) -> (&mut i64, &mut i64);

    fn apply_pagination(&mut self, page: &Pagination) {
        let (limit, offset) = self.page_mut();
        if *limit <= 0 {
            *limit = page.limit_default;
        }
        if *limit > page.limit_max {
            *limit = page.limit_max;
        }
        if *offset < 0 {
            *offset = page.offset_default;
        }
    }
}

/// Implements [`Paginated`] for structs with `limit` and `offset` fields.
#[macro_export]
macro_rules! paginated {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::api::extract::Paginated for $ty {
                fn page_mut(&mut self) -> (&mut i64, &mut i64) {
                    (&mut self.limit, &mut self.offset)
                }
            }
        )+
    };
}

/// Bound listing request with pagination defaults applied
#[derive(Debug)]
pub struct Listing<T>(pub T);

impl<S, T> FromRequest<S> for Listing<T>
where
    S: Send + Sync,
    Pagination: FromRef<S>,
    T: DeserializeOwned + Default + Paginated + Send,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Bound(mut value) = Bound::<T>::from_request(req, state).await?;
        value.apply_pagination(&Pagination::from_ref(state));
        Ok(Listing(value))
    }
}

/// Bound and validated request, for handlers with nothing to enrich
#[derive(Debug)]
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Serialize + Default + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Bound(value) = Bound::<T>::from_request(req, state).await?;
        validate_request(&value)?;
        Ok(Valid(value))
    }
}

/// Authenticated user placed in extensions by the auth middleware.
///
/// Routes outside the authenticated groups see an anonymous user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(
            parts.extensions.get::<AuthUser>().cloned().unwrap_or_default(),
        ))
    }
}

/// One failed rule with its serde field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub tag: String,
}

impl FieldViolation {
    fn leaf(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        last.split('[').next().unwrap_or(last)
    }
}

/// Flatten nested validation errors into `(path, tag)` pairs, ordered by the
/// position of each path in `declared` and then by path.
pub fn violations(errors: &ValidationErrors, declared: &[String]) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by_cached_key(|violation| {
        (
            field_order::rank(declared, &violation.path),
            violation.path.clone(),
        )
    });
    out
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let path = if field == "__all__" {
                        match error.params.get(FIELD_PARAM).and_then(Value::as_str) {
                            Some(name) => join(prefix, name),
                            None => prefix.to_string(),
                        }
                    } else {
                        join(prefix, &field)
                    };
                    out.push(FieldViolation {
                        path,
                        tag: error.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &join(prefix, &field), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{index}]", join(prefix, &field)), out);
                }
            }
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Map the first failed rule of `value`, in declaration order, to a catalog error.
pub fn validation_error<T>(value: &T, errors: &ValidationErrors) -> ApiError
where
    T: Serialize + ?Sized,
{
    let declared = field_order::field_paths(value);
    let Some(first) = violations(errors, &declared).into_iter().next() else {
        return ApiError::bad_request(&errors::VALIDATION_FAILED);
    };

    let leaf = first.leaf();
    let details = constants::validation_details(leaf, &first.tag);
    let namespace = format!("{}.{}", short_type_name::<T>(), first.path);

    let code = errors::field_error(leaf)
        .or_else(|| errors::namespace_error(&namespace))
        .or_else(|| (first.tag == "zip_usa").then_some(errors::INCORRECT_ZIP))
        .unwrap_or(errors::VALIDATION_FAILED);

    ApiError::bad_request(code.with_details(details))
}

/// Run the declarative rules of `value`.
pub fn validate_request<T: Validate + Serialize>(value: &T) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|errors| validation_error(value, &errors))
}
