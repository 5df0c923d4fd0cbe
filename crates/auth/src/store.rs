//! User store port (lookup-only from this core's perspective).

use orderdesk_core::{DomainResult, UserId};

use crate::User;

pub trait UserStore: Send + Sync {
    fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;

    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}
