//! Cart and checkout tests against the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use orderly_app::{AppError, Cart, CartError, Checkout, CustomerContact};
use orderly_client::store::OrderStore;
use orderly_client::MemoryStore;
use shared::models::{MenuItem, OrderStatus, OrderType, PaymentStatus, StoreType, Tenant};

/// Route checkout logs through the test harness capture.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn tenant() -> Tenant {
    Tenant {
        id: Uuid::new_v4(),
        name: "Brew Bar".to_string(),
        slug: "brew-bar-aaaa".to_string(),
        store_type: StoreType::CoffeeShop,
        logo_url: String::new(),
        primary_color: String::new(),
        contact_email: "owner@example.com".to_string(),
        contact_phone: String::new(),
        address: String::new(),
    }
}

fn item(name: &str, price: Decimal) -> MenuItem {
    MenuItem {
        id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        category_id: None,
        name: name.to_string(),
        description: String::new(),
        image_url: String::new(),
        price,
        discount_price: None,
        is_available: true,
    }
}

fn contact() -> CustomerContact {
    CustomerContact {
        name: "Ana Cruz".to_string(),
        phone: "555-0134".to_string(),
    }
}

#[test]
fn cart_merges_repeated_items() {
    let latte = item("Latte", Decimal::new(450, 2));
    let mut cart = Cart::new();

    cart.add(&latte).expect("add");
    cart.add(&latte).expect("add");

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_items(), 2);
    assert_eq!(cart.lines()[0].quantity, 2);
}

#[test]
fn unavailable_item_is_rejected() {
    let mut sold_out = item("Latte", Decimal::new(450, 2));
    sold_out.is_available = false;
    let mut cart = Cart::new();

    assert_eq!(cart.add(&sold_out), Err(CartError::ItemUnavailable));
    assert!(cart.is_empty());
}

#[test]
fn remove_drops_the_whole_line() {
    let latte = item("Latte", Decimal::new(450, 2));
    let mut cart = Cart::new();
    cart.add(&latte).expect("add");
    cart.add(&latte).expect("add");

    cart.remove(latte.id);
    assert!(cart.is_empty());
}

#[test]
fn subtotal_is_exact() {
    let mug = item("Branded Mug", Decimal::new(12000, 2));
    let beans = item("House Beans", Decimal::new(7550, 2));
    let mut cart = Cart::new();
    cart.add(&mug).expect("add");
    cart.add(&mug).expect("add");
    cart.add(&beans).expect("add");

    // 120.00 * 2 + 75.50, no float drift.
    assert_eq!(cart.subtotal(), Decimal::new(31550, 2));
}

#[tokio::test]
async fn missing_contact_issues_no_store_calls() {
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let mut cart = Cart::new();
    cart.add(&item("Latte", Decimal::new(450, 2))).expect("add");

    let err = checkout
        .place_order(
            &tenant(),
            &mut cart,
            &CustomerContact {
                name: "Ana Cruz".to_string(),
                phone: "   ".to_string(),
            },
        )
        .await
        .expect_err("blank phone");

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.ops(), 0);
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_store_call() {
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let mut cart = Cart::new();

    let err = checkout
        .place_order(&tenant(), &mut cart, &contact())
        .await
        .expect_err("empty cart");

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.ops(), 0);
}

#[tokio::test]
async fn place_order_persists_customer_order_and_items() {
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let tenant = tenant();

    let latte = item("Latte", Decimal::new(450, 2));
    let beans = item("House Beans", Decimal::new(7550, 2));
    let mut cart = Cart::new();
    cart.add(&latte).expect("add");
    cart.add(&latte).expect("add");
    cart.add(&beans).expect("add");

    let placed = checkout
        .place_order(&tenant, &mut cart, &contact())
        .await
        .expect("place order");

    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(placed.order.order_type, OrderType::Pickup);
    assert_eq!(placed.order.total, Decimal::new(8450, 2));
    assert_eq!(placed.order.customer_id, placed.customer.id);
    assert_eq!(placed.customer.phone, "555-0134");

    assert_eq!(placed.items.len(), 2);
    let latte_line = placed
        .items
        .iter()
        .find(|i| i.menu_item_id == latte.id)
        .expect("latte line");
    assert_eq!(latte_line.quantity, 2);
    assert_eq!(latte_line.line_total, Decimal::new(900, 2));

    assert!(cart.is_empty());

    let orders = store.list_orders(tenant.id).await.expect("list");
    assert_eq!(orders.len(), 1);
    let items = store
        .list_order_items(placed.order.id)
        .await
        .expect("items");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn order_number_carries_the_store_prefix() {
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let mut cart = Cart::new();
    cart.add(&item("Latte", Decimal::new(450, 2))).expect("add");

    let placed = checkout
        .place_order(&tenant(), &mut cart, &contact())
        .await
        .expect("place order");

    // "Brew Bar" -> "BR-" plus a four digit suffix.
    assert!(placed.order.order_number.starts_with("BR-"));
    assert_eq!(placed.order.order_number.len(), 7);
    assert!(
        placed.order.order_number[3..]
            .chars()
            .all(|c| c.is_ascii_digit())
    );
}

#[tokio::test]
async fn repeat_checkout_reuses_the_customer_row() {
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let tenant = tenant();
    let latte = item("Latte", Decimal::new(450, 2));

    let mut cart = Cart::new();
    cart.add(&latte).expect("add");
    let first = checkout
        .place_order(&tenant, &mut cart, &contact())
        .await
        .expect("first order");

    // Same phone, corrected name: the row is reused and renamed.
    cart.add(&latte).expect("add");
    let second = checkout
        .place_order(
            &tenant,
            &mut cart,
            &CustomerContact {
                name: "Ana C. Cruz".to_string(),
                phone: "555-0134".to_string(),
            },
        )
        .await
        .expect("second order");

    assert_eq!(first.customer.id, second.customer.id);
    assert_eq!(second.customer.name, "Ana C. Cruz");
    assert_eq!(store.list_orders(tenant.id).await.expect("list").len(), 2);
}

#[tokio::test]
async fn storefront_loads_tenant_catalog_by_slug() {
    use orderly_app::StorefrontView;
    use orderly_client::store::{CatalogStore, IdentityStore};
    use orderly_client::StoreError;
    use shared::models::{CategoryCreate, MenuItemCreate, TenantCreate};

    let store = MemoryStore::new();
    let tenant = store
        .create_tenant(&TenantCreate {
            name: "Brew Bar".to_string(),
            slug: "brew-bar-aaaa".to_string(),
            store_type: StoreType::CoffeeShop,
            contact_email: "owner@example.com".to_string(),
        })
        .await
        .expect("seed tenant");

    let drinks = store
        .create_category(
            tenant.id,
            &CategoryCreate {
                name: "Drinks".to_string(),
                sort_order: None,
            },
        )
        .await
        .expect("category");
    store
        .create_menu_item(
            tenant.id,
            &MenuItemCreate {
                category_id: Some(drinks.id),
                name: "Latte".to_string(),
                description: None,
                image_url: None,
                price: Decimal::new(450, 2),
                is_available: None,
            },
        )
        .await
        .expect("item");
    store
        .create_menu_item(
            tenant.id,
            &MenuItemCreate {
                category_id: None,
                name: "Tote Bag".to_string(),
                description: None,
                image_url: None,
                price: Decimal::new(1500, 2),
                is_available: None,
            },
        )
        .await
        .expect("item");

    let view = StorefrontView::load(&store, "brew-bar-aaaa")
        .await
        .expect("load");
    assert_eq!(view.tenant.id, tenant.id);
    assert_eq!(view.categories.len(), 1);
    assert_eq!(view.menu_items.len(), 2);
    assert_eq!(view.visible_items(Some(drinks.id)).len(), 1);
    assert_eq!(view.visible_items(None).len(), 2);

    let err = StorefrontView::load(&store, "no-such-store")
        .await
        .expect_err("unknown slug");
    assert!(matches!(err, AppError::Store(StoreError::RowNotFound)));
}

#[tokio::test]
async fn failed_item_insert_removes_the_order() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let checkout = Checkout::new(store.clone());
    let tenant = tenant();
    let mut cart = Cart::new();
    cart.add(&item("Latte", Decimal::new(450, 2))).expect("add");

    store.fail_on("insert_order_items");
    let err = checkout
        .place_order(&tenant, &mut cart, &contact())
        .await
        .expect_err("item insert failure");

    assert!(matches!(err, AppError::Checkout { .. }));
    // The order row was compensated away; the cart survives for retry.
    assert!(store.list_orders(tenant.id).await.expect("list").is_empty());
    assert!(!cart.is_empty());
}
