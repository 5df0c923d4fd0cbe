//! In-memory store implementations.

use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_auth::{User, UserStore};
use orderdesk_core::{
    ClientId, CompanyId, DomainError, DomainResult, OrderId, Page, PageRequest, ProductId, UserId,
};
use orderdesk_orders::{Order, OrderStore};
use orderdesk_parties::{Client, ClientStore, Company, CompanyStore};
use orderdesk_products::{codes as product_codes, Product, ProductStore};

fn paginate<T: Clone>(mut rows: Vec<T>, request: PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let start = request.offset().min(rows.len());
    let end = (start + request.size() as usize).min(rows.len());
    let items = rows.drain(start..end).collect();
    Page::new(items, request, total)
}

/// Orders, persisted whole (items included) under one write lock.
#[derive(Default)]
pub struct InMemoryOrderStore {
    rows: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: Order) -> DomainResult<Order> {
        let mut rows = self.rows.write().expect("order store poisoned");
        rows.insert(order.order_id(), order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: OrderId) -> DomainResult<Option<Order>> {
        let rows = self.rows.read().expect("order store poisoned");
        Ok(rows.get(&id).cloned())
    }

    fn find_by_company(
        &self,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Order>> {
        let rows = self.rows.read().expect("order store poisoned");
        let mut matches: Vec<Order> = rows
            .values()
            .filter(|o| o.company_id() == company_id)
            .cloned()
            .collect();
        matches.sort_by_key(|o| (o.order_date(), o.order_id()));
        Ok(paginate(matches, request))
    }

    fn find_by_client_and_company(
        &self,
        client_id: ClientId,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Order>> {
        let rows = self.rows.read().expect("order store poisoned");
        let mut matches: Vec<Order> = rows
            .values()
            .filter(|o| o.company_id() == company_id && o.client_id() == client_id)
            .cloned()
            .collect();
        matches.sort_by_key(|o| (o.order_date(), o.order_id()));
        Ok(paginate(matches, request))
    }
}

/// Products, with optimistic concurrency on save: a writer holding a stale
/// revision is rejected with a conflict, mirroring a version-checked UPDATE
/// on the stock row.
#[derive(Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn save(&self, product: Product) -> DomainResult<Product> {
        let mut rows = self.rows.write().expect("product store poisoned");
        if let Some(existing) = rows.get(&product.product_id()) {
            if existing.version() != product.version() {
                return Err(DomainError::conflict(
                    product_codes::PRODUCT_VERSION_STALE,
                    format!(
                        "stale write for product '{}': expected revision {}, found {}",
                        product.name(),
                        existing.version(),
                        product.version()
                    ),
                ));
            }
        }
        let saved = product.with_next_version();
        rows.insert(saved.product_id(), saved.clone());
        Ok(saved)
    }

    fn find_by_id(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let rows = self.rows.read().expect("product store poisoned");
        Ok(rows.get(&id).cloned())
    }

    fn find_by_ids(&self, ids: &[ProductId]) -> DomainResult<HashMap<ProductId, Product>> {
        let rows = self.rows.read().expect("product store poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| rows.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    fn find_by_company(
        &self,
        company_id: CompanyId,
        request: PageRequest,
    ) -> DomainResult<Page<Product>> {
        let mut matches = self.find_all_by_company(company_id)?;
        matches.sort_by_key(|p| (p.created_at(), p.product_id()));
        Ok(paginate(matches, request))
    }

    fn find_all_by_company(&self, company_id: CompanyId) -> DomainResult<Vec<Product>> {
        let rows = self.rows.read().expect("product store poisoned");
        let mut matches: Vec<Product> = rows
            .values()
            .filter(|p| p.company_id() == company_id)
            .cloned()
            .collect();
        matches.sort_by_key(|p| (p.created_at(), p.product_id()));
        Ok(matches)
    }
}

#[derive(Default)]
pub struct InMemoryCompanyStore {
    rows: RwLock<HashMap<CompanyId, Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompanyStore for InMemoryCompanyStore {
    fn save(&self, company: Company) -> DomainResult<Company> {
        let mut rows = self.rows.write().expect("company store poisoned");
        rows.insert(company.company_id(), company.clone());
        Ok(company)
    }

    fn find_by_id(&self, id: CompanyId) -> DomainResult<Option<Company>> {
        let rows = self.rows.read().expect("company store poisoned");
        Ok(rows.get(&id).cloned())
    }

    fn find_by_tax_id(&self, tax_id: &str) -> DomainResult<Option<Company>> {
        let rows = self.rows.read().expect("company store poisoned");
        Ok(rows.values().find(|c| c.tax_id() == tax_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryClientStore {
    rows: RwLock<HashMap<ClientId, Client>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for InMemoryClientStore {
    fn save(&self, client: Client) -> DomainResult<Client> {
        let mut rows = self.rows.write().expect("client store poisoned");
        rows.insert(client.client_id(), client.clone());
        Ok(client)
    }

    fn find_by_id(&self, id: ClientId) -> DomainResult<Option<Client>> {
        let rows = self.rows.read().expect("client store poisoned");
        Ok(rows.get(&id).cloned())
    }

    fn find_by_user(&self, user_id: UserId) -> DomainResult<Option<Client>> {
        let rows = self.rows.read().expect("client store poisoned");
        Ok(rows
            .values()
            .find(|c| c.user_id() == Some(user_id))
            .cloned())
    }

    fn find_by_company_and_user(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> DomainResult<Option<Client>> {
        let rows = self.rows.read().expect("client store poisoned");
        Ok(rows
            .values()
            .find(|c| c.company_id() == company_id && c.user_id() == Some(user_id))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    rows: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper; user CRUD is outside the core's use cases.
    pub fn insert(&self, user: User) -> User {
        let mut rows = self.rows.write().expect("user store poisoned");
        rows.insert(user.user_id(), user.clone());
        user
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let rows = self.rows.read().expect("user store poisoned");
        Ok(rows.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let rows = self.rows.read().expect("user store poisoned");
        Ok(rows.values().find(|u| u.email() == email).cloned())
    }
}
