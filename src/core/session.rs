pub mod claims;
pub mod permissions;
pub mod store;

pub use claims::TokenClaims;
pub use permissions::{Action, Permissions};
pub use store::{FileSystemStore, RememberedCredentials, SessionData, SessionStore};
