//! Product catalog domain module.
//!
//! The [`Product`] aggregate owns its [`Inventory`] (1:1, created with the
//! product) and a per-currency [`ProductPrice`] map. All business rules are
//! deterministic domain logic; storage lives behind [`ProductStore`].

pub mod product;
pub mod store;

pub use product::{codes, Inventory, Product, ProductPrice};
pub use store::ProductStore;
