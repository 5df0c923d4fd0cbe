use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{
    CategoryId, CompanyId, Currency, DomainError, DomainResult, Entity, InventoryId, Money,
    PriceId, ProductId,
};

/// Stable error codes for product/inventory rule violations.
pub mod codes {
    pub const PRODUCT_NOT_FOUND: &str = "PRODUCT_NOT_FOUND";
    pub const PRODUCT_NAME_BLANK: &str = "PRODUCT_NAME_BLANK";
    pub const PRODUCT_SKU_BLANK: &str = "PRODUCT_SKU_BLANK";
    pub const PRODUCT_PRICE_NOT_FOUND: &str = "PRODUCT_PRICE_NOT_FOUND";
    pub const INVENTORY_AMOUNT_NOT_POSITIVE: &str = "INVENTORY_AMOUNT_NOT_POSITIVE";
    pub const INVENTORY_NOT_ENOUGH: &str = "INVENTORY_NOT_ENOUGH";
    pub const INVENTORY_OVERFLOW: &str = "INVENTORY_OVERFLOW";
    pub const PRODUCT_VERSION_STALE: &str = "PRODUCT_VERSION_STALE";
}

/// Stock record owned 1:1 by its product; no independent lifecycle.
///
/// No concurrency control lives here: callers serialize concurrent
/// adjustments to the same product (see [`super::store::ProductStore`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    id: InventoryId,
    product_id: ProductId,
    quantity: u32,
    last_updated: DateTime<Utc>,
}

impl Entity for Inventory {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Inventory {
    pub fn create(product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: InventoryId::new(),
            product_id,
            quantity,
            last_updated: Utc::now(),
        }
    }

    pub fn from_persistence(
        id: InventoryId,
        product_id: ProductId,
        quantity: u32,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            last_updated,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn increase_stock(&mut self, amount: u32) -> DomainResult<()> {
        Self::ensure_positive(amount)?;
        self.quantity = self.quantity.checked_add(amount).ok_or_else(|| {
            DomainError::validation(codes::INVENTORY_OVERFLOW, "stock quantity overflow")
        })?;
        self.touch();
        Ok(())
    }

    pub fn decrease_stock(&mut self, amount: u32) -> DomainResult<()> {
        Self::ensure_positive(amount)?;
        if amount > self.quantity {
            return Err(DomainError::conflict(
                codes::INVENTORY_NOT_ENOUGH,
                format!(
                    "insufficient stock: requested {amount}, on hand {}",
                    self.quantity
                ),
            ));
        }
        self.quantity -= amount;
        self.touch();
        Ok(())
    }

    fn ensure_positive(amount: u32) -> DomainResult<()> {
        if amount == 0 {
            return Err(DomainError::validation(
                codes::INVENTORY_AMOUNT_NOT_POSITIVE,
                "stock adjustment amount must be positive",
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Per-currency price entry. One per currency per product; updating the price
/// for an existing currency keeps the same entry id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    id: PriceId,
    product_id: ProductId,
    price: Money,
}

impl Entity for ProductPrice {
    type Id = PriceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ProductPrice {
    pub fn create(product_id: ProductId, price: Money) -> Self {
        Self {
            id: PriceId::new(),
            product_id,
            price,
        }
    }

    pub fn from_persistence(id: PriceId, product_id: ProductId, price: Money) -> Self {
        Self {
            id,
            product_id,
            price,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Replace the amount in place, keeping currency and entry id.
    pub fn change_amount(&mut self, amount: Decimal) -> DomainResult<()> {
        self.price = Money::new(self.price.currency(), amount)?;
        Ok(())
    }
}

/// Aggregate root: Product with owned inventory and per-currency prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    company_id: CompanyId,
    category_id: Option<CategoryId>,
    name: String,
    sku: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    inventory: Inventory,
    prices: HashMap<Currency, ProductPrice>,
    /// Persisted revision, for optimistic concurrency on the stock row.
    /// Stores compare it on save and reject stale writers; one of two racing
    /// confirms then fails instead of both passing the oversell boundary.
    version: u64,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    pub fn create(
        company_id: CompanyId,
        category_id: Option<CategoryId>,
        name: &str,
        sku: &str,
        description: Option<&str>,
    ) -> DomainResult<Self> {
        let id = ProductId::new();
        let mut product = Self {
            id,
            company_id,
            category_id,
            name: String::new(),
            sku: String::new(),
            description: None,
            created_at: Utc::now(),
            inventory: Inventory::create(id, 0),
            prices: HashMap::new(),
            version: 0,
        };
        product.change_name(name)?;
        product.change_sku(sku)?;
        product.change_description(description);
        Ok(product)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: ProductId,
        company_id: CompanyId,
        category_id: Option<CategoryId>,
        name: &str,
        sku: &str,
        description: Option<&str>,
        created_at: DateTime<Utc>,
        inventory: Inventory,
        prices: Vec<ProductPrice>,
        version: u64,
    ) -> DomainResult<Self> {
        let mut product = Self {
            id,
            company_id,
            category_id,
            name: String::new(),
            sku: String::new(),
            description: None,
            created_at,
            inventory,
            prices: HashMap::new(),
            version,
        };
        product.change_name(name)?;
        product.change_sku(sku)?;
        product.change_description(description);
        for price in prices {
            product.prices.insert(price.price().currency(), price);
        }
        Ok(product)
    }

    pub fn product_id(&self) -> ProductId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Current on-hand quantity (reservation checks read this without mutating).
    pub fn stock_on_hand(&self) -> u32 {
        self.inventory.quantity()
    }

    pub fn prices(&self) -> impl Iterator<Item = &ProductPrice> {
        self.prices.values()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Next persisted revision; called by stores on successful save.
    pub fn with_next_version(mut self) -> Self {
        self.version += 1;
        self
    }

    pub fn change_name(&mut self, name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::PRODUCT_NAME_BLANK,
                "product name cannot be blank",
            ));
        }
        self.name = name.trim().to_owned();
        Ok(())
    }

    pub fn change_sku(&mut self, sku: &str) -> DomainResult<()> {
        if sku.trim().is_empty() {
            return Err(DomainError::validation(
                codes::PRODUCT_SKU_BLANK,
                "product sku cannot be blank",
            ));
        }
        self.sku = sku.trim().to_owned();
        Ok(())
    }

    pub fn change_description(&mut self, description: Option<&str>) {
        self.description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);
    }

    pub fn change_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
    }

    pub fn increase_stock(&mut self, amount: u32) -> DomainResult<()> {
        self.inventory.increase_stock(amount)
    }

    pub fn decrease_stock(&mut self, amount: u32) -> DomainResult<()> {
        self.inventory.decrease_stock(amount)
    }

    /// Upsert the price for `price.currency()`.
    ///
    /// A new currency gets a fresh entry; an existing one is mutated in place
    /// so the entry id stays stable.
    pub fn change_price(&mut self, price: Money) -> DomainResult<()> {
        match self.prices.get_mut(&price.currency()) {
            Some(existing) => existing.change_amount(price.amount())?,
            None => {
                self.prices
                    .insert(price.currency(), ProductPrice::create(self.id, price));
            }
        }
        Ok(())
    }

    /// Price entry for the given currency; an order cannot add an item in a
    /// currency the product has no price for.
    pub fn product_price(&self, currency: Currency) -> DomainResult<&ProductPrice> {
        self.prices.get(&currency).ok_or_else(|| {
            DomainError::conflict(
                codes::PRODUCT_PRICE_NOT_FOUND,
                format!("product '{}' has no price in {currency}", self.name),
            )
        })
    }
}
