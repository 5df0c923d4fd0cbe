//! Report/storage/queue adapters.
//!
//! A plain-text renderer plus in-memory storage and queue doubles. Real
//! deployments substitute a PDF renderer, object storage, and a message
//! queue behind the same ports.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use orderdesk_app::{FileStorage, NotificationQueue, ReportGenerator};
use orderdesk_products::Product;

/// Line-per-product plain-text inventory rendering.
#[derive(Default)]
pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for TextReportGenerator {
    fn generate_product_report(&self, products: &[Product]) -> anyhow::Result<Vec<u8>> {
        let mut out = String::from("sku\tname\tstock\n");
        for product in products {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                product.sku(),
                product.name(),
                product.stock_on_hand()
            ));
        }
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// Keeps stored artifacts in a map; the returned reference is the file name.
#[derive(Default)]
pub struct InMemoryFileStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self, file_name: &str) -> Option<Vec<u8>> {
        let files = self.files.read().expect("file storage poisoned");
        files.get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().expect("file storage poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileStorage for InMemoryFileStorage {
    fn store_file(&self, bytes: &[u8], file_name: &str) -> anyhow::Result<String> {
        let mut files = self.files.write().expect("file storage poisoned");
        files.insert(file_name.to_owned(), bytes.to_vec());
        Ok(file_name.to_owned())
    }
}

/// A notification captured by [`RecordingNotificationQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub recipient: String,
    pub artifact: String,
    pub label: String,
}

/// Records sent notifications for assertions.
#[derive(Default)]
pub struct RecordingNotificationQueue {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("queue poisoned").clone()
    }
}

impl NotificationQueue for RecordingNotificationQueue {
    fn send_product_report(
        &self,
        recipient: &str,
        artifact: &str,
        label: &str,
    ) -> anyhow::Result<()> {
        let mut sent = self.sent.lock().expect("queue poisoned");
        sent.push(SentNotification {
            recipient: recipient.to_owned(),
            artifact: artifact.to_owned(),
            label: label.to_owned(),
        });
        Ok(())
    }
}
