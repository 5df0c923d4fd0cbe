//! `orderdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model, the Money/Currency value objects,
//! and paging primitives shared by the store ports.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod page;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{
    CategoryId, ClientId, CompanyId, InventoryId, OrderId, OrderItemId, PriceId, ProductId,
    UserId,
};
pub use money::{Currency, Money};
pub use page::{Page, PageRequest};
pub use value_object::ValueObject;
