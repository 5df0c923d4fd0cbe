//! Use-case layer: orchestration across aggregates and stores.
//!
//! [`OrderService`] coordinates the order lifecycle with the product, client,
//! company and user stores; [`NotificationService`] drives the inventory
//! report workflow over the report/storage/queue ports. Every operation is
//! synchronous and expected to run inside one atomic transaction supplied by
//! the store implementations.

pub mod error;
pub mod notifications;
pub mod orders;
pub mod ports;

pub use error::{ServiceError, ServiceResult};
pub use notifications::NotificationService;
pub use orders::{AddItemRequest, CreateOrderByAdmin, CreateOrderByUser, OrderService};
pub use ports::{FileStorage, NotificationQueue, ReportGenerator};
