//! Outbound ports consumed by the notification/report workflow.
//!
//! These are thin collaborator contracts; concrete adapters (PDF rendering,
//! object storage, message queues) live outside this core. Failures are
//! transport errors, surfaced as [`crate::ServiceError::Transport`].

use orderdesk_products::Product;

/// Renders a byte-exact inventory report for a set of products.
pub trait ReportGenerator: Send + Sync {
    fn generate_product_report(&self, products: &[Product]) -> anyhow::Result<Vec<u8>>;

    /// File extension of the produced artifact (no leading dot).
    fn extension(&self) -> &'static str;
}

/// Stores a report artifact and returns the reference callers hand to the
/// notification queue.
pub trait FileStorage: Send + Sync {
    fn store_file(&self, bytes: &[u8], file_name: &str) -> anyhow::Result<String>;
}

/// Fire-and-forget delivery of a report notification.
pub trait NotificationQueue: Send + Sync {
    fn send_product_report(
        &self,
        recipient: &str,
        artifact: &str,
        label: &str,
    ) -> anyhow::Result<()>;
}
