//! Order store port.

use orderdesk_core::{ClientId, CompanyId, DomainResult, OrderId, Page, PageRequest};

use crate::order::Order;

/// Persistence contract for orders.
///
/// An order and its items are persisted as one unit; partial writes are not
/// allowed. Each use-case operation runs inside one atomic transaction
/// supplied by the implementation.
pub trait OrderStore: Send + Sync {
    fn save(&self, order: Order) -> DomainResult<Order>;

    fn find_by_id(&self, id: OrderId) -> DomainResult<Option<Order>>;

    fn find_by_company(
        &self,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Order>>;

    fn find_by_client_and_company(
        &self,
        client_id: ClientId,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Order>>;
}
