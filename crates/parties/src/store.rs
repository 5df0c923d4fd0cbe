//! Company and client store ports (lookup-oriented).

use orderdesk_core::{ClientId, CompanyId, DomainResult, UserId};

use crate::{Client, Company};

pub trait CompanyStore: Send + Sync {
    fn save(&self, company: Company) -> DomainResult<Company>;

    fn find_by_id(&self, id: CompanyId) -> DomainResult<Option<Company>>;

    fn find_by_tax_id(&self, tax_id: &str) -> DomainResult<Option<Company>>;
}

pub trait ClientStore: Send + Sync {
    fn save(&self, client: Client) -> DomainResult<Client>;

    fn find_by_id(&self, id: ClientId) -> DomainResult<Option<Client>>;

    fn find_by_user(&self, user_id: UserId) -> DomainResult<Option<Client>>;

    fn find_by_company_and_user(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> DomainResult<Option<Client>>;
}
