pub mod errors;
pub mod extract;
pub mod field_order;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::{create_router, AppState};
