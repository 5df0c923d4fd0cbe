//! Actor identity for the order lifecycle.
//!
//! Token issuance and credential handling live outside this core; what remains
//! is the [`User`] identity, its [`Role`], and the lookup port the order
//! access check resolves actors through.

pub mod roles;
pub mod store;
pub mod user;

pub use roles::Role;
pub use store::UserStore;
pub use user::User;

/// Stable error codes for actor resolution.
pub mod codes {
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const USER_EMAIL_BLANK: &str = "USER_EMAIL_BLANK";
    pub const USER_NAME_BLANK: &str = "USER_NAME_BLANK";
}
