pub mod authorization;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod zip_formats;

pub use authorization::AuthUser;
pub use envelope::Envelope;
pub use errors::{ErrorCode, ResponseErrorMessage};
