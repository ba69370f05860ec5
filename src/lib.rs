//! # PaySuper Management API
//!
//! HTTP gateway behind the PaySuper merchant dashboard, admin console and
//! checkout integrations. Requests are bound and validated here, then passed
//! to the billing, tax, geo and reporter services over the micro RPC gateway.
//!
//! ## Architecture Layers
//!
//! - **Domain**: response envelope, error catalog, lookup tables
//! - **Application**: request messages, validation rules, the remote gateway and ports
//! - **Infrastructure**: micro RPC client, S3 buckets, Auth1 user info
//! - **API**: route groups, extractors, middleware and handlers

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use api::errors as api_errors;
pub use application::{dto, ports};
pub use config::Config;
pub use domain::errors as domain_errors;
