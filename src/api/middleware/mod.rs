pub mod auth;
pub mod body_dump;
pub mod cors;
pub mod raw_body;
pub mod recovery;

pub use raw_body::RawBody;
