//! Company and client entities.
//!
//! Read-mostly collaborators of the order lifecycle: the orchestrator resolves
//! identities through them and snapshots client name/address onto new orders.
//! The one write path is client auto-provisioning on user-created orders.

pub mod client;
pub mod company;
pub mod store;

pub use client::Client;
pub use company::Company;
pub use store::{ClientStore, CompanyStore};

/// Stable error codes for party lookups and validation.
pub mod codes {
    pub const COMPANY_NOT_FOUND: &str = "COMPANY_NOT_FOUND";
    pub const COMPANY_NAME_BLANK: &str = "COMPANY_NAME_BLANK";
    pub const COMPANY_TAX_ID_BLANK: &str = "COMPANY_TAX_ID_BLANK";
    pub const CLIENT_NOT_FOUND: &str = "CLIENT_NOT_FOUND";
    pub const CLIENT_NAME_BLANK: &str = "CLIENT_NAME_BLANK";
    pub const CLIENT_EMAIL_BLANK: &str = "CLIENT_EMAIL_BLANK";
}
