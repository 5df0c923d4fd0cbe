use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{ClientId, CompanyId, DomainError, DomainResult, Entity, UserId};

use crate::codes;

/// A client record of a company, optionally linked to a user account.
///
/// Orders reference the client; the access check for restricted users compares
/// the order's client id with the client linked to the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    company_id: CompanyId,
    user_id: Option<UserId>,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Client {
    pub fn create(
        company_id: CompanyId,
        user_id: Option<UserId>,
        name: &str,
        email: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::CLIENT_NAME_BLANK,
                "client name cannot be blank",
            ));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation(
                codes::CLIENT_EMAIL_BLANK,
                "client email cannot be blank",
            ));
        }
        Ok(Self {
            id: ClientId::new(),
            company_id,
            user_id,
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            phone: phone.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned),
            address: address.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned),
            created_at: Utc::now(),
        })
    }

    pub fn client_id(&self) -> ClientId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_snapshot_fields() {
        let c = Client::create(
            CompanyId::new(),
            Some(UserId::new()),
            "  Jane Doe ",
            " jane@example.com ",
            Some(" "),
            Some(" 1 Main St "),
        )
        .unwrap();
        assert_eq!(c.name(), "Jane Doe");
        assert_eq!(c.email(), "jane@example.com");
        assert_eq!(c.phone(), None);
        assert_eq!(c.address(), Some("1 Main St"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Client::create(CompanyId::new(), None, "", "a@b.c", None, None).unwrap_err();
        assert_eq!(err.code(), codes::CLIENT_NAME_BLANK);
    }
}
