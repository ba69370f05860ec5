pub mod auth1;
pub mod micro_client;
pub mod s3_storage;

pub use auth1::Auth1Client;
pub use micro_client::MicroClient;
pub use s3_storage::S3Storage;
