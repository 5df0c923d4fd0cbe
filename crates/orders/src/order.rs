use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{
    ClientId, CompanyId, Currency, DomainError, DomainResult, Entity, Money, OrderId, OrderItemId,
    ProductId,
};
use orderdesk_products::Product;

/// Stable error codes for order rule violations.
pub mod codes {
    pub const ORDER_NOT_FOUND: &str = "ORDER_NOT_FOUND";
    pub const ORDER_CLIENT_NAME_BLANK: &str = "ORDER_CLIENT_NAME_BLANK";
    pub const ORDER_ADDRESS_BLANK: &str = "ORDER_ADDRESS_BLANK";
    pub const ORDER_INVALID_TRANSITION: &str = "ORDER_INVALID_TRANSITION";
    pub const ORDER_STATUS_NOT_PENDING: &str = "ORDER_STATUS_NOT_PENDING";
    pub const ORDER_ALREADY_SHIPPED: &str = "ORDER_ALREADY_SHIPPED";
    pub const ORDER_ALREADY_DELIVERED: &str = "ORDER_ALREADY_DELIVERED";
    pub const ORDER_NO_ITEMS: &str = "ORDER_NO_ITEMS";
    pub const ORDER_ITEM_NOT_FOUND: &str = "ORDER_ITEM_NOT_FOUND";
    pub const ORDER_ITEM_ALREADY_ADDED: &str = "ORDER_ITEM_ALREADY_ADDED";
    pub const ORDER_ITEM_CURRENCY_MISMATCH: &str = "ORDER_ITEM_CURRENCY_MISMATCH";
    pub const ORDER_ITEM_WRONG_ORDER: &str = "ORDER_ITEM_WRONG_ORDER";
    pub const ORDER_ITEM_QUANTITY_NOT_POSITIVE: &str = "ORDER_ITEM_QUANTITY_NOT_POSITIVE";
    pub const ORDER_NOT_ALLOWED: &str = "ORDER_NOT_ALLOWED";
}

/// Order status lifecycle.
///
/// ```text
/// PENDING ──► CONFIRMED ──► SHIPPED ──► DELIVERED
///    │            │
///    └──────► CANCELLED ◄───┘
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Full transition table. Everything not listed is illegal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Shipped)
                | (Shipped, Delivered)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
        };
        f.write_str(s)
    }
}

/// Line item, owned exclusively by one order.
///
/// Identity is the item's own id, not the product id, so a line keeps a stable
/// reference when its quantity is revised while remove-then-re-add stays
/// possible. `product_name` and `unit_price` are snapshots taken at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrderItem {
    /// Snapshot a product into a fresh line for `order_id`.
    pub fn for_product(
        order_id: OrderId,
        product: &Product,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<Self> {
        Self::ensure_positive_quantity(quantity)?;
        Ok(Self {
            id: OrderItemId::new(),
            order_id,
            product_id: product.product_id(),
            product_name: product.name().to_owned(),
            quantity,
            unit_price,
        })
    }

    pub fn from_persistence(
        id: OrderItemId,
        order_id: OrderId,
        product_id: ProductId,
        product_name: &str,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<Self> {
        Self::ensure_positive_quantity(quantity)?;
        Ok(Self {
            id,
            order_id,
            product_id,
            product_name: product_name.to_owned(),
            quantity,
            unit_price,
        })
    }

    pub fn item_id(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn change_quantity(&mut self, quantity: u32) -> DomainResult<()> {
        Self::ensure_positive_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Currency agreement with the order is enforced by [`Order`], which owns
    /// the only mutable path to its items.
    fn change_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
    }

    /// Line total: unit price × quantity, at the order's scale.
    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price.multiply(Decimal::from(self.quantity))
    }

    fn ensure_positive_quantity(quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(
                codes::ORDER_ITEM_QUANTITY_NOT_POSITIVE,
                "item quantity must be positive",
            ));
        }
        Ok(())
    }
}

/// Aggregate root: Order.
///
/// `total_amount` is always the derived sum of `unit_price × quantity` over
/// all items; its currency fixes the order's currency for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    company_id: CompanyId,
    client_id: ClientId,
    client_name: String,
    address: String,
    order_date: DateTime<Utc>,
    status: OrderStatus,
    total_amount: Money,
    items: Vec<OrderItem>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Order {
    /// New PENDING order with zero total and no items.
    pub fn create(
        company_id: CompanyId,
        client_id: ClientId,
        client_name: &str,
        address: &str,
        currency: Currency,
    ) -> DomainResult<Self> {
        if client_name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::ORDER_CLIENT_NAME_BLANK,
                "client name cannot be blank",
            ));
        }
        let mut order = Self {
            id: OrderId::new(),
            company_id,
            client_id,
            client_name: client_name.trim().to_owned(),
            address: String::new(),
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            total_amount: Money::zero(currency),
            items: Vec::new(),
        };
        order.change_address(address)?;
        Ok(order)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: OrderId,
        company_id: CompanyId,
        client_id: ClientId,
        client_name: &str,
        address: &str,
        order_date: DateTime<Utc>,
        status: OrderStatus,
        currency: Currency,
        items: Vec<OrderItem>,
    ) -> DomainResult<Self> {
        if client_name.trim().is_empty() {
            return Err(DomainError::validation(
                codes::ORDER_CLIENT_NAME_BLANK,
                "client name cannot be blank",
            ));
        }
        let mut order = Self {
            id,
            company_id,
            client_id,
            client_name: client_name.trim().to_owned(),
            address: String::new(),
            order_date,
            status,
            total_amount: Money::zero(currency),
            items,
        };
        order.change_address(address)?;
        order.recalculate_total()?;
        Ok(order)
    }

    pub fn order_id(&self) -> OrderId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// The order's fixed currency.
    pub fn currency(&self) -> Currency {
        self.total_amount.currency()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn find_item(&self, item_id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.item_id() == item_id)
    }

    pub fn find_item_by_product(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    pub fn change_address(&mut self, address: &str) -> DomainResult<()> {
        if address.trim().is_empty() {
            return Err(DomainError::validation(
                codes::ORDER_ADDRESS_BLANK,
                "order address cannot be blank",
            ));
        }
        self.address = address.trim().to_owned();
        Ok(())
    }

    pub fn change_order_date(&mut self, order_date: DateTime<Utc>) {
        self.order_date = order_date;
    }

    /// Move to `next` if the transition table allows it.
    ///
    /// All status legality lives here; callers never set the status directly.
    pub fn transition_to(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::illegal_state(
                codes::ORDER_INVALID_TRANSITION,
                format!("cannot transition order from {} to {next}", self.status),
            ));
        }
        self.status = next;
        Ok(())
    }

    /// Append a line. Fails on currency mismatch with the order's fixed
    /// currency and on a duplicate product (remove-then-re-add to change the
    /// quantity of an existing line).
    pub fn add_item(&mut self, item: OrderItem) -> DomainResult<()> {
        if item.order_id() != self.id {
            return Err(DomainError::validation(
                codes::ORDER_ITEM_WRONG_ORDER,
                "item belongs to a different order",
            ));
        }
        if item.unit_price().currency() != self.currency() {
            return Err(DomainError::conflict(
                codes::ORDER_ITEM_CURRENCY_MISMATCH,
                format!(
                    "item currency {} does not match order currency {}",
                    item.unit_price().currency(),
                    self.currency()
                ),
            ));
        }
        if self.find_item_by_product(item.product_id()).is_some() {
            return Err(DomainError::conflict(
                codes::ORDER_ITEM_ALREADY_ADDED,
                format!("order already has an item for product {}", item.product_id()),
            ));
        }
        self.items.push(item);
        self.recalculate_total()
    }

    /// Remove a line by id. Unknown ids are a no-op, not an error.
    pub fn remove_item(&mut self, item_id: OrderItemId) -> DomainResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.item_id() != item_id);
        if self.items.len() == before {
            return Ok(());
        }
        self.recalculate_total()
    }

    /// Replace the unit price of an existing line.
    pub fn change_item_price(&mut self, item_id: OrderItemId, price: Money) -> DomainResult<()> {
        if price.currency() != self.currency() {
            return Err(DomainError::conflict(
                codes::ORDER_ITEM_CURRENCY_MISMATCH,
                format!(
                    "price currency {} does not match order currency {}",
                    price.currency(),
                    self.currency()
                ),
            ));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.item_id() == item_id)
            .ok_or_else(|| {
                DomainError::not_found(codes::ORDER_ITEM_NOT_FOUND, "order item not found")
            })?;
        item.change_unit_price(price);
        self.recalculate_total()
    }

    /// total = Σ(unit_price × quantity), in the order's currency, half-up at
    /// scale 2. Zero items means zero total.
    fn recalculate_total(&mut self) -> DomainResult<()> {
        let mut total = Money::zero(self.currency());
        for item in &self.items {
            total = total.add(&item.line_total()?)?;
        }
        self.total_amount = total;
        Ok(())
    }
}
