//! Inventory report notification workflow.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use orderdesk_core::DomainError;
use orderdesk_parties::{codes as party_codes, CompanyStore};
use orderdesk_products::ProductStore;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{FileStorage, NotificationQueue, ReportGenerator};

/// Renders a company's inventory, stores the artifact, and notifies the
/// recipient with a reference to it. Separate from the order lifecycle; the
/// ports it drives are fire-and-forget collaborators.
pub struct NotificationService {
    products: Arc<dyn ProductStore>,
    companies: Arc<dyn CompanyStore>,
    reports: Arc<dyn ReportGenerator>,
    storage: Arc<dyn FileStorage>,
    queue: Arc<dyn NotificationQueue>,
}

impl NotificationService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        companies: Arc<dyn CompanyStore>,
        reports: Arc<dyn ReportGenerator>,
        storage: Arc<dyn FileStorage>,
        queue: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            products,
            companies,
            reports,
            storage,
            queue,
        }
    }

    pub fn send_inventory_report(&self, tax_id: &str, email: &str) -> ServiceResult<()> {
        let company = self.companies.find_by_tax_id(tax_id)?.ok_or_else(|| {
            DomainError::not_found(
                party_codes::COMPANY_NOT_FOUND,
                format!("company not found: {tax_id}"),
            )
        })?;
        let products = self.products.find_all_by_company(company.company_id())?;

        let report = self
            .reports
            .generate_product_report(&products)
            .map_err(ServiceError::Transport)?;

        let file_name = format!(
            "{}_inv_{}.{}",
            company.sanitized_name(),
            Uuid::now_v7(),
            self.reports.extension()
        );
        let stored = self
            .storage
            .store_file(&report, &file_name)
            .map_err(ServiceError::Transport)?;

        self.queue
            .send_product_report(email, &stored, company.name())
            .map_err(ServiceError::Transport)?;

        info!(company = company.name(), recipient = email, artifact = %stored, "inventory report sent");
        Ok(())
    }
}
