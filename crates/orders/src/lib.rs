//! Order lifecycle domain module.
//!
//! The [`Order`] aggregate owns its line items and enforces the invariants no
//! single item can: one fixed currency per order, no duplicate product lines,
//! and a total that is always the derived sum of its items. The status
//! transition table lives on the aggregate ([`Order::transition_to`]) so no
//! second call site can bypass it.

pub mod order;
pub mod store;

pub use order::{codes, Order, OrderItem, OrderStatus};
pub use store::OrderStore;
