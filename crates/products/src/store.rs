//! Product store port.

use std::collections::HashMap;

use orderdesk_core::{CompanyId, DomainResult, Page, PageRequest, ProductId};

use crate::product::Product;

/// Persistence contract for products.
///
/// Each use-case operation runs inside one atomic transaction supplied by the
/// implementation. The non-negative-stock invariant under concurrent confirms
/// additionally requires at least read-committed isolation with either
/// pessimistic row locks on read-for-update or optimistic version checks that
/// fail one of two racing writers; implementations that cannot provide this
/// cannot guarantee that stock never goes negative.
pub trait ProductStore: Send + Sync {
    fn save(&self, product: Product) -> DomainResult<Product>;

    fn find_by_id(&self, id: ProductId) -> DomainResult<Option<Product>>;

    /// Batch fetch used by confirm/cancel so a single request observes one
    /// consistent stock snapshot for every affected product. Callers pass ids
    /// sorted ascending to keep lock-acquisition order consistent across
    /// concurrent multi-product confirms.
    fn find_by_ids(&self, ids: &[ProductId]) -> DomainResult<HashMap<ProductId, Product>>;

    fn find_by_company(
        &self,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Product>>;

    /// Unpaged company listing, used by the inventory-report workflow.
    fn find_all_by_company(&self, company_id: CompanyId) -> DomainResult<Vec<Product>>;
}
