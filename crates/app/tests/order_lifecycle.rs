//! End-to-end order lifecycle scenarios against the in-memory stores.

use std::sync::Arc;
use std::thread;

use orderdesk_app::{
    AddItemRequest, CreateOrderByAdmin, CreateOrderByUser, OrderService, ServiceError,
};
use orderdesk_auth::{Role, User};
use orderdesk_core::{Currency, ErrorKind, Money, PageRequest, ProductId};
use orderdesk_infra::{
    InMemoryClientStore, InMemoryCompanyStore, InMemoryOrderStore, InMemoryProductStore,
    InMemoryUserStore,
};
use orderdesk_orders::{Order, OrderStatus, OrderStore};
use orderdesk_parties::{Client, ClientStore, Company, CompanyStore};
use orderdesk_products::{Product, ProductStore};

fn usd(text: &str) -> Money {
    Money::from_decimal_str(Currency::USD, text).unwrap()
}

struct Fixture {
    service: Arc<OrderService>,
    orders: Arc<InMemoryOrderStore>,
    products: Arc<InMemoryProductStore>,
    clients: Arc<InMemoryClientStore>,
    users: Arc<InMemoryUserStore>,
    company: Company,
    admin: User,
}

impl Fixture {
    fn new() -> Self {
        orderdesk_observability::init();

        let orders = Arc::new(InMemoryOrderStore::new());
        let products = Arc::new(InMemoryProductStore::new());
        let clients = Arc::new(InMemoryClientStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let companies = Arc::new(InMemoryCompanyStore::new());

        let company = companies
            .save(Company::create("Acme", "900-001", Some("HQ"), None).unwrap())
            .unwrap();
        let admin = users.insert(
            User::create("admin@acme.io", "Admin", None, None, Role::Admin).unwrap(),
        );

        let service = Arc::new(OrderService::new(
            orders.clone(),
            products.clone(),
            users.clone(),
            clients.clone(),
            companies.clone(),
        ));

        Self {
            service,
            orders,
            products,
            clients,
            users,
            company,
            admin,
        }
    }

    fn seed_product(&self, name: &str, stock: u32, price: Money) -> Product {
        let mut product = Product::create(
            self.company.company_id(),
            None,
            name,
            &format!("SKU-{name}"),
            None,
        )
        .unwrap();
        product.change_price(price).unwrap();
        if stock > 0 {
            product.increase_stock(stock).unwrap();
        }
        self.products.save(product).unwrap()
    }

    fn seed_client(&self, name: &str) -> Client {
        self.clients
            .save(
                Client::create(
                    self.company.company_id(),
                    None,
                    name,
                    &format!("{name}@example.com"),
                    None,
                    Some("1 Main St"),
                )
                .unwrap(),
            )
            .unwrap()
    }

    fn new_order(&self, client: &Client) -> Order {
        self.service
            .create_order_by_admin(CreateOrderByAdmin {
                company_id: self.company.company_id(),
                client_id: client.client_id(),
                currency_code: "USD".into(),
            })
            .unwrap()
    }

    fn add(&self, order: &Order, product_id: ProductId, quantity: Option<u32>) -> Order {
        self.service
            .add_item(
                order.order_id(),
                AddItemRequest {
                    product_id,
                    quantity,
                },
                self.admin.email(),
            )
            .unwrap()
    }

    fn stock_of(&self, product_id: ProductId) -> u32 {
        self.products
            .find_by_id(product_id)
            .unwrap()
            .unwrap()
            .stock_on_hand()
    }
}

fn domain_kind(err: &ServiceError) -> ErrorKind {
    err.as_domain().expect("expected a domain error").kind()
}

#[test]
fn confirm_and_cancel_round_trip_restores_stock() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 100, usd("10.00"));
    let client = fx.seed_client("Jane");

    let order = fx.new_order(&client);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.total_amount(), Money::zero(Currency::USD));

    let order = fx.add(&order, product.product_id(), Some(5));
    assert_eq!(order.total_amount(), usd("50.00"));

    let order = fx
        .service
        .confirm_order(order.order_id(), fx.admin.email())
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Confirmed);
    assert_eq!(fx.stock_of(product.product_id()), 95);

    let order = fx
        .service
        .cancel_order(order.order_id(), fx.admin.email())
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Cancelled);
    assert_eq!(fx.stock_of(product.product_id()), 100);
}

#[test]
fn re_adding_a_product_replaces_the_line_and_reprices() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 50, usd("10.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let order = fx.add(&order, product.product_id(), Some(2));
    assert_eq!(order.total_amount(), usd("20.00"));
    let first_item_id = order.items()[0].item_id();

    // Price changes between the two adds; the replacement line snapshots the
    // current price, discarding the previously captured one.
    let mut updated = fx.products.find_by_id(product.product_id()).unwrap().unwrap();
    updated.change_price(usd("12.00")).unwrap();
    fx.products.save(updated).unwrap();

    let order = fx.add(&order, product.product_id(), Some(5));
    assert_eq!(order.items().len(), 1);
    let line = &order.items()[0];
    assert_ne!(line.item_id(), first_item_id);
    assert_eq!(line.quantity(), 5);
    assert_eq!(line.unit_price(), usd("12.00"));
    assert_eq!(order.total_amount(), usd("60.00"));
}

#[test]
fn remove_item_drops_the_line_and_ignores_unknown_ids() {
    let fx = Fixture::new();
    let widget = fx.seed_product("Widget", 10, usd("10.00"));
    let gadget = fx.seed_product("Gadget", 10, usd("3.25"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let order = fx.add(&order, widget.product_id(), Some(2));
    let order = fx.add(&order, gadget.product_id(), Some(1));
    assert_eq!(order.total_amount(), usd("23.25"));

    let widget_line = order
        .find_item_by_product(widget.product_id())
        .unwrap()
        .item_id();
    let order = fx
        .service
        .remove_item(order.order_id(), widget_line, fx.admin.email())
        .unwrap();
    assert_eq!(order.items().len(), 1);
    assert_eq!(order.total_amount(), usd("3.25"));

    // Removing the same line again is a no-op.
    let order = fx
        .service
        .remove_item(order.order_id(), widget_line, fx.admin.email())
        .unwrap();
    assert_eq!(order.items().len(), 1);
}

#[test]
fn add_item_defaults_quantity_to_one() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 10, usd("3.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let order = fx.add(&order, product.product_id(), None);
    assert_eq!(order.items()[0].quantity(), 1);
    assert_eq!(order.total_amount(), usd("3.00"));
}

#[test]
fn add_item_rejects_insufficient_stock_without_decrementing() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 3, usd("10.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let err = fx
        .service
        .add_item(
            order.order_id(),
            AddItemRequest {
                product_id: product.product_id(),
                quantity: Some(5),
            },
            fx.admin.email(),
        )
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::Conflict);
    // Reservation checks never mutate stock.
    assert_eq!(fx.stock_of(product.product_id()), 3);
}

#[test]
fn add_item_requires_a_price_in_the_order_currency() {
    let fx = Fixture::new();
    let eur_price = Money::from_decimal_str(Currency::EUR, "8.00").unwrap();
    let product = fx.seed_product("Widget", 10, eur_price);
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let err = fx
        .service
        .add_item(
            order.order_id(),
            AddItemRequest {
                product_id: product.product_id(),
                quantity: Some(1),
            },
            fx.admin.email(),
        )
        .unwrap_err();
    let domain = err.as_domain().unwrap();
    assert_eq!(domain.code(), orderdesk_products::codes::PRODUCT_PRICE_NOT_FOUND);
}

#[test]
fn items_can_only_change_while_pending() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 10, usd("1.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);
    let order = fx.add(&order, product.product_id(), Some(1));

    fx.service
        .confirm_order(order.order_id(), fx.admin.email())
        .unwrap();

    let err = fx
        .service
        .add_item(
            order.order_id(),
            AddItemRequest {
                product_id: product.product_id(),
                quantity: Some(2),
            },
            fx.admin.email(),
        )
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::IllegalState);
}

#[test]
fn confirming_an_empty_order_is_illegal() {
    let fx = Fixture::new();
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let err = fx
        .service
        .confirm_order(order.order_id(), fx.admin.email())
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::IllegalState);
}

#[test]
fn confirm_is_all_or_nothing_across_items() {
    let fx = Fixture::new();
    let plenty = fx.seed_product("Plenty", 100, usd("1.00"));
    let scarce = fx.seed_product("Scarce", 1, usd("1.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);

    let order = fx.add(&order, plenty.product_id(), Some(10));
    let order = fx.add(&order, scarce.product_id(), Some(1));

    // Stock of the scarce product vanishes before confirm.
    let mut drained = fx.products.find_by_id(scarce.product_id()).unwrap().unwrap();
    drained.decrease_stock(1).unwrap();
    fx.products.save(drained).unwrap();

    let err = fx
        .service
        .confirm_order(order.order_id(), fx.admin.email())
        .unwrap_err();
    let domain = err.as_domain().unwrap();
    assert_eq!(domain.kind(), ErrorKind::Conflict);
    assert!(domain.message().contains("Scarce"));

    // Nothing was decremented and the order is still pending.
    assert_eq!(fx.stock_of(plenty.product_id()), 100);
    assert_eq!(fx.stock_of(scarce.product_id()), 0);
    let order = fx.orders.find_by_id(order.order_id()).unwrap().unwrap();
    assert_eq!(order.status(), OrderStatus::Pending);
}

#[test]
fn cancel_from_pending_has_no_stock_effect_and_is_idempotent() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 10, usd("1.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);
    let order = fx.add(&order, product.product_id(), Some(2));

    let order = fx
        .service
        .cancel_order(order.order_id(), fx.admin.email())
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Cancelled);
    assert_eq!(fx.stock_of(product.product_id()), 10);

    // Second cancel is a no-op returning the cancelled order.
    let again = fx
        .service
        .cancel_order(order.order_id(), fx.admin.email())
        .unwrap();
    assert_eq!(again.status(), OrderStatus::Cancelled);
}

#[test]
fn cancelling_a_shipped_order_fails() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 10, usd("1.00"));
    let client = fx.seed_client("Jane");
    let order = fx.new_order(&client);
    let order = fx.add(&order, product.product_id(), Some(1));
    fx.service
        .confirm_order(order.order_id(), fx.admin.email())
        .unwrap();

    // Shipping is an operator action outside the orchestrator.
    let mut shipped = fx.orders.find_by_id(order.order_id()).unwrap().unwrap();
    shipped.transition_to(OrderStatus::Shipped).unwrap();
    fx.orders.save(shipped).unwrap();

    let err = fx
        .service
        .cancel_order(order.order_id(), fx.admin.email())
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::IllegalState);
}

#[test]
fn racing_confirms_on_a_shared_product_never_oversell() {
    let fx = Fixture::new();
    let product = fx.seed_product("Widget", 5, usd("10.00"));
    let client_a = fx.seed_client("Jane");
    let client_b = fx.seed_client("John");

    let order_a = fx.new_order(&client_a);
    let order_a = fx.add(&order_a, product.product_id(), Some(3));
    let order_b = fx.new_order(&client_b);
    let order_b = fx.add(&order_b, product.product_id(), Some(3));

    let mut handles = Vec::new();
    for order_id in [order_a.order_id(), order_b.order_id()] {
        let service = fx.service.clone();
        let email = fx.admin.email().to_owned();
        handles.push(thread::spawn(move || service.confirm_order(order_id, &email)));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racing confirm must succeed");
    let failure = results.iter().find(|r| r.is_err()).unwrap();
    assert_eq!(
        domain_kind(failure.as_ref().unwrap_err()),
        ErrorKind::Conflict
    );
    assert_eq!(fx.stock_of(product.product_id()), 2);

    let confirmed = [order_a.order_id(), order_b.order_id()]
        .into_iter()
        .filter(|id| {
            fx.orders.find_by_id(*id).unwrap().unwrap().status() == OrderStatus::Confirmed
        })
        .count();
    assert_eq!(confirmed, 1);
}

#[test]
fn external_users_only_reach_their_own_orders() {
    let fx = Fixture::new();
    let jane_user = fx.users.insert(
        User::create("jane@example.com", "Jane", None, Some("1 Main St"), Role::External)
            .unwrap(),
    );
    let jane = fx
        .clients
        .save(
            Client::create(
                fx.company.company_id(),
                Some(jane_user.user_id()),
                "Jane",
                "jane@example.com",
                None,
                Some("1 Main St"),
            )
            .unwrap(),
        )
        .unwrap();
    let other = fx.seed_client("John");

    let own_order = fx.new_order(&jane);
    let foreign_order = fx.new_order(&other);

    assert!(fx
        .service
        .get_order(own_order.order_id(), jane_user.email())
        .is_ok());

    let err = fx
        .service
        .get_order(foreign_order.order_id(), jane_user.email())
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::Forbidden);

    // Elevated actors bypass the check.
    assert!(fx
        .service
        .get_order(foreign_order.order_id(), fx.admin.email())
        .is_ok());
}

#[test]
fn create_order_by_user_auto_provisions_the_client() {
    let fx = Fixture::new();
    let user = fx.users.insert(
        User::create(
            "buyer@example.com",
            "Buyer One",
            Some("555-1234"),
            Some("2 Side St"),
            Role::External,
        )
        .unwrap(),
    );
    assert!(fx.clients.find_by_user(user.user_id()).unwrap().is_none());

    let order = fx
        .service
        .create_order_by_user(CreateOrderByUser {
            company_id: fx.company.company_id(),
            user_id: user.user_id(),
            currency_code: "USD".into(),
        })
        .unwrap();

    let client = fx
        .clients
        .find_by_user(user.user_id())
        .unwrap()
        .expect("client should have been provisioned");
    assert_eq!(order.client_id(), client.client_id());
    assert_eq!(order.client_name(), "Buyer One");
    assert_eq!(order.address(), "2 Side St");

    // A second order reuses the provisioned client.
    let second = fx
        .service
        .create_order_by_user(CreateOrderByUser {
            company_id: fx.company.company_id(),
            user_id: user.user_id(),
            currency_code: "USD".into(),
        })
        .unwrap();
    assert_eq!(second.client_id(), client.client_id());
}

#[test]
fn unknown_currency_code_is_rejected() {
    let fx = Fixture::new();
    let client = fx.seed_client("Jane");
    let err = fx
        .service
        .create_order_by_admin(CreateOrderByAdmin {
            company_id: fx.company.company_id(),
            client_id: client.client_id(),
            currency_code: "XXX".into(),
        })
        .unwrap_err();
    assert_eq!(domain_kind(&err), ErrorKind::Validation);
}

#[test]
fn user_orders_listing_depends_on_role() {
    let fx = Fixture::new();
    let jane_user = fx.users.insert(
        User::create("jane@example.com", "Jane", None, Some("1 Main St"), Role::External)
            .unwrap(),
    );
    let jane = fx
        .clients
        .save(
            Client::create(
                fx.company.company_id(),
                Some(jane_user.user_id()),
                "Jane",
                "jane@example.com",
                None,
                Some("1 Main St"),
            )
            .unwrap(),
        )
        .unwrap();
    let john = fx.seed_client("John");

    fx.new_order(&jane);
    fx.new_order(&john);
    fx.new_order(&john);

    let page = PageRequest::new(0, 10).unwrap();
    let all = fx
        .service
        .user_orders(page, fx.admin.email(), fx.company.tax_id())
        .unwrap();
    assert_eq!(all.total(), 3);

    let own = fx
        .service
        .user_orders(page, jane_user.email(), fx.company.tax_id())
        .unwrap();
    assert_eq!(own.total(), 1);
    assert_eq!(own.items()[0].client_id(), jane.client_id());

    // External user with no linked client sees an empty page.
    let orphan = fx.users.insert(
        User::create("orphan@example.com", "Orphan", None, None, Role::External).unwrap(),
    );
    let none = fx
        .service
        .user_orders(page, orphan.email(), fx.company.tax_id())
        .unwrap();
    assert!(none.is_empty());
}
