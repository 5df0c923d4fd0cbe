//! Order lifecycle orchestration.
//!
//! Coordinates the Order and Product aggregates across their stores: item
//! mutation while PENDING, confirm (decrement stock), cancel (restore stock),
//! and the actor access check. Cross-aggregate consistency that no single
//! aggregate can enforce alone lives here.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use orderdesk_auth::{Role, User, UserStore};
use orderdesk_core::{
    ClientId, CompanyId, Currency, DomainError, OrderId, OrderItemId, Page, PageRequest,
    ProductId, UserId,
};
use orderdesk_orders::{codes as order_codes, Order, OrderItem, OrderStatus, OrderStore};
use orderdesk_parties::{codes as party_codes, Client, ClientStore, CompanyStore};
use orderdesk_products::{codes as product_codes, Product, ProductStore};

use crate::error::{ServiceError, ServiceResult};

/// Create an order on behalf of the acting user; a missing client record for
/// the user is auto-provisioned from the user's profile snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderByUser {
    pub company_id: CompanyId,
    pub user_id: UserId,
    pub currency_code: String,
}

/// Create an order for an existing client (elevated actors).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderByAdmin {
    pub company_id: CompanyId,
    pub client_id: ClientId,
    pub currency_code: String,
}

/// Add (or replace) an order line. A missing quantity defaults to 1.
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum StockOperation {
    Increase,
    Decrease,
}

/// The order lifecycle orchestrator.
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
    clients: Arc<dyn ClientStore>,
    companies: Arc<dyn CompanyStore>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
        clients: Arc<dyn ClientStore>,
        companies: Arc<dyn CompanyStore>,
    ) -> Self {
        Self {
            orders,
            products,
            users,
            clients,
            companies,
        }
    }

    /// Paged listing for the acting user: admins see every order of the
    /// company; external users see their linked client's orders, or an empty
    /// page when no client record is linked yet.
    pub fn user_orders(
        &self,
        request: PageRequest,
        email: &str,
        tax_id: &str,
    ) -> ServiceResult<Page<Order>> {
        let user = self.user_by_email(email)?;
        let company = self
            .companies
            .find_by_tax_id(tax_id)?
            .ok_or_else(|| company_not_found(tax_id))?;

        if user.role().is_admin() {
            return Ok(self.orders.find_by_company(company.company_id(), request)?);
        }

        match self.clients.find_by_user(user.user_id())? {
            Some(client) => Ok(self.orders.find_by_client_and_company(
                client.client_id(),
                company.company_id(),
                request,
            )?),
            None => Ok(Page::empty(request)),
        }
    }

    pub fn create_order_by_user(&self, request: CreateOrderByUser) -> ServiceResult<Order> {
        let currency = Currency::from_code(&request.currency_code)?;
        let company = self
            .companies
            .find_by_id(request.company_id)?
            .ok_or_else(|| company_not_found(&request.company_id.to_string()))?;
        let user = self.users.find_by_id(request.user_id)?.ok_or_else(|| {
            DomainError::not_found(orderdesk_auth::codes::USER_NOT_FOUND, "user not found")
        })?;

        let client = match self
            .clients
            .find_by_company_and_user(company.company_id(), user.user_id())?
        {
            Some(client) => client,
            None => self.provision_client(company.company_id(), &user)?,
        };

        self.open_order(company.company_id(), &client, currency)
    }

    pub fn create_order_by_admin(&self, request: CreateOrderByAdmin) -> ServiceResult<Order> {
        let currency = Currency::from_code(&request.currency_code)?;
        let company = self
            .companies
            .find_by_id(request.company_id)?
            .ok_or_else(|| company_not_found(&request.company_id.to_string()))?;
        let client = self
            .clients
            .find_by_id(request.client_id)?
            .ok_or_else(client_not_found)?;

        self.open_order(company.company_id(), &client, currency)
    }

    pub fn get_order(&self, order_id: OrderId, email: &str) -> ServiceResult<Order> {
        let order = self.load_order(order_id)?;
        self.check_order_access(email, &order)?;
        Ok(order)
    }

    /// Add an item to a PENDING order.
    ///
    /// The stock check here is a reservation check against current on-hand
    /// quantity; nothing is decremented until confirm. If a line for the
    /// product already exists it is replaced by a fresh line with the new
    /// quantity, re-snapshotting the product's *current* price and discarding
    /// the previously captured one.
    pub fn add_item(
        &self,
        order_id: OrderId,
        request: AddItemRequest,
        email: &str,
    ) -> ServiceResult<Order> {
        let mut order = self.load_order(order_id)?;
        self.check_order_access(email, &order)?;
        ensure_pending(&order)?;

        let product = self
            .products
            .find_by_id(request.product_id)?
            .ok_or_else(product_not_found)?;

        let quantity = request.quantity.unwrap_or(1);
        if product.stock_on_hand() < quantity {
            return Err(DomainError::conflict(
                product_codes::INVENTORY_NOT_ENOUGH,
                format!(
                    "insufficient stock to reserve {quantity} of product '{}'",
                    product.name()
                ),
            )
            .into());
        }

        let unit_price = product.product_price(order.currency())?.price();

        if let Some(existing) = order.find_item_by_product(product.product_id()) {
            let replaced = existing.item_id();
            order.remove_item(replaced)?;
            debug!(order_id = %order_id, item_id = %replaced, "replacing existing order line");
        }

        let item = OrderItem::for_product(order.order_id(), &product, quantity, unit_price)?;
        order.add_item(item)?;

        let saved = self.orders.save(order)?;
        info!(order_id = %order_id, product_id = %request.product_id, quantity, "item added");
        Ok(saved)
    }

    /// Remove an item by id; unknown ids are a no-op.
    pub fn remove_item(
        &self,
        order_id: OrderId,
        item_id: OrderItemId,
        email: &str,
    ) -> ServiceResult<Order> {
        let mut order = self.load_order(order_id)?;
        self.check_order_access(email, &order)?;

        order.remove_item(item_id)?;

        let saved = self.orders.save(order)?;
        info!(order_id = %order_id, item_id = %item_id, "item removed");
        Ok(saved)
    }

    /// Confirm a PENDING order with at least one item: decrement every
    /// referenced product's stock, all-or-nothing, then transition.
    pub fn confirm_order(&self, order_id: OrderId, email: &str) -> ServiceResult<Order> {
        let mut order = self.load_order(order_id)?;
        self.check_order_access(email, &order)?;
        ensure_pending(&order)?;
        if order.items().is_empty() {
            return Err(DomainError::illegal_state(
                order_codes::ORDER_NO_ITEMS,
                "cannot confirm an order without items",
            )
            .into());
        }

        self.update_stock_for_order(&order, StockOperation::Decrease)?;

        order.transition_to(OrderStatus::Confirmed)?;
        let saved = self.orders.save(order)?;
        info!(order_id = %order_id, total = %saved.total_amount(), "order confirmed");
        Ok(saved)
    }

    /// Cancel an order.
    ///
    /// Idempotent on CANCELLED; fails on SHIPPED/DELIVERED; a PENDING order is
    /// cancelled directly (no stock was ever reserved); a CONFIRMED order
    /// first gets every item's stock restored.
    pub fn cancel_order(&self, order_id: OrderId, email: &str) -> ServiceResult<Order> {
        let mut order = self.load_order(order_id)?;
        self.check_order_access(email, &order)?;

        match order.status() {
            OrderStatus::Cancelled => return Ok(order),
            OrderStatus::Shipped => {
                return Err(DomainError::illegal_state(
                    order_codes::ORDER_ALREADY_SHIPPED,
                    "cannot cancel a shipped order",
                )
                .into());
            }
            OrderStatus::Delivered => {
                return Err(DomainError::illegal_state(
                    order_codes::ORDER_ALREADY_DELIVERED,
                    "cannot cancel a delivered order",
                )
                .into());
            }
            OrderStatus::Pending => {}
            OrderStatus::Confirmed => {
                self.update_stock_for_order(&order, StockOperation::Increase)?;
            }
        }

        order.transition_to(OrderStatus::Cancelled)?;
        let saved = self.orders.save(order)?;
        info!(order_id = %order_id, "order cancelled");
        Ok(saved)
    }

    fn open_order(
        &self,
        company_id: CompanyId,
        client: &Client,
        currency: Currency,
    ) -> ServiceResult<Order> {
        let order = Order::create(
            company_id,
            client.client_id(),
            client.name(),
            client.address().unwrap_or_default(),
            currency,
        )?;
        let saved = self.orders.save(order)?;
        info!(order_id = %saved.order_id(), client_id = %client.client_id(), %currency, "order created");
        Ok(saved)
    }

    fn provision_client(&self, company_id: CompanyId, user: &User) -> ServiceResult<Client> {
        let client = Client::create(
            company_id,
            Some(user.user_id()),
            user.full_name(),
            user.email(),
            user.phone(),
            user.address(),
        )?;
        let saved = self.clients.save(client)?;
        info!(client_id = %saved.client_id(), user_id = %user.user_id(), "client auto-provisioned");
        Ok(saved)
    }

    /// Restricted actors may only touch orders of their own linked client;
    /// elevated actors bypass the check.
    fn check_order_access(&self, email: &str, order: &Order) -> ServiceResult<()> {
        let user = self.user_by_email(email)?;
        if user.role() == Role::External {
            let client = self
                .clients
                .find_by_user(user.user_id())?
                .ok_or_else(client_not_found)?;
            if order.client_id() != client.client_id() {
                return Err(DomainError::forbidden(
                    order_codes::ORDER_NOT_ALLOWED,
                    "actor does not have access to this order",
                )
                .into());
            }
        }
        Ok(())
    }

    /// Adjust stock for every item of the order, all-or-nothing.
    ///
    /// Loads all referenced products in one batch (ids sorted, so concurrent
    /// multi-product confirms acquire locks in one consistent order), verifies
    /// every decrement fits before any write begins, then applies and persists
    /// each product.
    fn update_stock_for_order(
        &self,
        order: &Order,
        operation: StockOperation,
    ) -> ServiceResult<()> {
        let items: HashMap<ProductId, &OrderItem> = order
            .items()
            .iter()
            .map(|item| (item.product_id(), item))
            .collect();
        let mut product_ids: Vec<ProductId> = items.keys().copied().collect();
        product_ids.sort_unstable();

        let mut products = self.products.find_by_ids(&product_ids)?;

        // Phase 1: every product must exist and, for a decrement, hold enough
        // stock. No write happens until the whole batch passes.
        for product_id in &product_ids {
            let product = products.get(product_id).ok_or_else(product_not_found)?;
            let item = &items[product_id];
            if operation == StockOperation::Decrease && product.stock_on_hand() < item.quantity() {
                return Err(DomainError::conflict(
                    product_codes::INVENTORY_NOT_ENOUGH,
                    format!("insufficient stock for product '{}'", product.name()),
                )
                .into());
            }
        }

        // Phase 2: apply and persist.
        for product_id in &product_ids {
            let mut product = products.remove(product_id).ok_or_else(product_not_found)?;
            let quantity = items[product_id].quantity();
            match operation {
                StockOperation::Decrease => product.decrease_stock(quantity)?,
                StockOperation::Increase => product.increase_stock(quantity)?,
            }
            self.products.save(product)?;
        }
        Ok(())
    }

    fn load_order(&self, order_id: OrderId) -> ServiceResult<Order> {
        Ok(self.orders.find_by_id(order_id)?.ok_or_else(|| {
            DomainError::not_found(order_codes::ORDER_NOT_FOUND, "order not found")
        })?)
    }

    fn user_by_email(&self, email: &str) -> ServiceResult<User> {
        Ok(self.users.find_by_email(email)?.ok_or_else(|| {
            DomainError::not_found(orderdesk_auth::codes::USER_NOT_FOUND, "user not found")
        })?)
    }
}

fn ensure_pending(order: &Order) -> Result<(), ServiceError> {
    if !order.is_pending() {
        return Err(DomainError::illegal_state(
            order_codes::ORDER_STATUS_NOT_PENDING,
            format!("cannot modify an order in status {}", order.status()),
        )
        .into());
    }
    Ok(())
}

fn product_not_found() -> DomainError {
    DomainError::not_found(product_codes::PRODUCT_NOT_FOUND, "product not found")
}

fn client_not_found() -> DomainError {
    DomainError::not_found(party_codes::CLIENT_NOT_FOUND, "client not found")
}

fn company_not_found(key: &str) -> DomainError {
    DomainError::not_found(
        party_codes::COMPANY_NOT_FOUND,
        format!("company not found: {key}"),
    )
}
