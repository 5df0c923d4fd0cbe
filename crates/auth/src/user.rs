use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Entity, UserId};

use crate::{codes, Role};

/// A user account, resolved by email when a request carries an actor.
///
/// Name/phone/address double as the snapshot source when a client record is
/// auto-provisioned for a user-created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    full_name: String,
    phone: Option<String>,
    address: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl User {
    pub fn create(
        email: &str,
        full_name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        role: Role,
    ) -> DomainResult<Self> {
        if email.trim().is_empty() {
            return Err(DomainError::validation(
                codes::USER_EMAIL_BLANK,
                "user email cannot be blank",
            ));
        }
        if full_name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::USER_NAME_BLANK,
                "user name cannot be blank",
            ));
        }
        Ok(Self {
            id: UserId::new(),
            email: email.trim().to_owned(),
            full_name: full_name.trim().to_owned(),
            phone: phone.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned),
            address: address.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned),
            role,
            created_at: Utc::now(),
        })
    }

    pub fn user_id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
