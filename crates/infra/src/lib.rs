//! Infrastructure adapters: in-memory store implementations and port doubles.
//!
//! The in-memory stores back integration tests and local wiring. They keep the
//! contract the ports demand from a real database: each store serializes its
//! writers, and the product store rejects stale writers via the product's
//! persisted revision, so one of two racing confirms fails instead of both
//! passing the oversell boundary. They are not transactional **across**
//! stores; a relational implementation is expected to wrap each use-case
//! operation in one transaction.

pub mod memory;
pub mod report;

pub use memory::{
    InMemoryClientStore, InMemoryCompanyStore, InMemoryOrderStore, InMemoryProductStore,
    InMemoryUserStore,
};
pub use report::{
    InMemoryFileStorage, RecordingNotificationQueue, SentNotification, TextReportGenerator,
};
