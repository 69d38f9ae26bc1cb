//! `stockroom-auth` — roles, capabilities, and claims.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod role;
pub mod user;

pub use authorize::{AuthzError, authorize, grants};
pub use capability::Capability;
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use role::{Role, UnknownRole};
pub use user::{User, UserDraft};
