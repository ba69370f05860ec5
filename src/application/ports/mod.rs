mod file_storage;
mod identity_provider;
mod remote_service;

pub use file_storage::{FileStorage, StorageError};
pub use identity_provider::{IdentityError, IdentityProvider, UserInfo};
pub use remote_service::{CallOptions, RemoteService, TransportError};

#[cfg(test)]
pub use file_storage::MockFileStorage;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
#[cfg(test)]
pub use remote_service::MockRemoteService;
