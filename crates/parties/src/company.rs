use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{CompanyId, DomainError, DomainResult, Entity};

use crate::codes;

/// A company (tenant). Products, clients and orders are scoped to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    id: CompanyId,
    name: String,
    tax_id: String,
    address: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Company {
    pub fn create(
        name: &str,
        tax_id: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> DomainResult<Self> {
        let mut company = Self {
            id: CompanyId::new(),
            name: String::new(),
            tax_id: String::new(),
            address: None,
            phone: None,
            created_at: Utc::now(),
        };
        company.change_name(name)?;
        company.change_tax_id(tax_id)?;
        company.address = normalize(address);
        company.phone = normalize(phone);
        Ok(company)
    }

    pub fn company_id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn change_name(&mut self, name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::COMPANY_NAME_BLANK,
                "company name cannot be blank",
            ));
        }
        self.name = name.trim().to_owned();
        Ok(())
    }

    pub fn change_tax_id(&mut self, tax_id: &str) -> DomainResult<()> {
        if tax_id.trim().is_empty() {
            return Err(DomainError::validation(
                codes::COMPANY_TAX_ID_BLANK,
                "company tax id cannot be blank",
            ));
        }
        self.tax_id = tax_id.trim().to_owned();
        Ok(())
    }

    /// Company name reduced to a file-name-safe token (report storage keys).
    pub fn sanitized_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}
