use cucumber::{gherkin::Step, given, then, when};
use order_intake_engine::{
    db_types::{DeliveryMethod, Money, OrderSource},
    sqlite::db::{menu, orders},
    IntakeError,
    IntakeLine,
    IntakeOrder,
    OrderIntakeDatabase,
};

use crate::cucumber::IntakeWorld;

#[given("a menu with the following items")]
async fn menu_items(world: &mut IntakeWorld, step: &Step) {
    let table = step.table.as_ref().expect("The menu step needs a table");
    let db = world.system().await.db.clone();
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    for row in table.rows.iter().skip(1) {
        let name = row[0].as_str();
        let price: f64 = row[1].parse().expect("Not a valid price");
        let price = Money::try_from(price).expect("Not a valid price");
        menu::insert_menu_item(name, price, true, &mut conn).await.expect("Error inserting menu item");
    }
}

async fn submit(world: &mut IntakeWorld, order: IntakeOrder) {
    world.system().await;
    let result = world.api().process_order(order).await;
    world.last_result = Some(result);
}

#[when(expr = "customer {string} orders {int} x {string}")]
async fn order_one(world: &mut IntakeWorld, phone: String, quantity: i64, name: String) {
    let order = IntakeOrder::new(OrderSource::N8n, phone).with_line(IntakeLine::new(name, quantity));
    submit(world, order).await;
}

#[when(expr = "customer {string} orders {int} x {string} with modifier {string}")]
async fn order_with_modifier(world: &mut IntakeWorld, phone: String, quantity: i64, name: String, modifier: String) {
    let line = IntakeLine::new(name, quantity).with_modifier(modifier);
    let order = IntakeOrder::new(OrderSource::N8n, phone).with_line(line);
    submit(world, order).await;
}

#[when(expr = "customer {string} orders {int} x {string} and {int} x {string}")]
async fn order_two(world: &mut IntakeWorld, phone: String, qty1: i64, name1: String, qty2: i64, name2: String) {
    let order = IntakeOrder::new(OrderSource::N8n, phone)
        .with_line(IntakeLine::new(name1, qty1))
        .with_line(IntakeLine::new(name2, qty2));
    submit(world, order).await;
}

#[when(expr = "customer {string} orders {int} x {string} for delivery to {string}")]
async fn order_delivery(world: &mut IntakeWorld, phone: String, quantity: i64, name: String, address: String) {
    let order = IntakeOrder::new(OrderSource::Vapi, phone)
        .with_line(IntakeLine::new(name, quantity))
        .with_delivery(address);
    assert_eq!(order.delivery_method, DeliveryMethod::Delivery);
    submit(world, order).await;
}

#[then(expr = "the order is accepted with a total of {int} kr")]
async fn accepted(world: &mut IntakeWorld, total: i64) {
    assert_eq!(world.receipt().total_amount, Money::from_major(total));
}

#[then(regex = r"^the order has (\d+) items?$")]
async fn item_count(world: &mut IntakeWorld, count: usize) {
    assert_eq!(world.receipt().items_count, count);
}

#[then(expr = "item {string} has quantity {int} and unit price {int} kr")]
async fn item_details(world: &mut IntakeWorld, name: String, quantity: i64, unit_price: i64) {
    let order_id = world.receipt().order_id;
    let mut conn = world.db().pool().acquire().await.expect("Error acquiring connection");
    let items = orders::fetch_order_items(order_id, &mut conn).await.expect("Error fetching order items");
    let item = items.iter().find(|i| i.item_name == name).unwrap_or_else(|| panic!("No item named {name}: {items:?}"));
    assert_eq!(item.quantity, quantity);
    assert_eq!(item.unit_price, Money::from_major(unit_price));
    assert_eq!(item.subtotal, Money::from_major(unit_price * quantity));
}

#[then(expr = "the order is rejected because of {string}")]
async fn rejected(world: &mut IntakeWorld, description: String) {
    match world.error() {
        IntakeError::RejectedItems(failed) => assert!(failed.contains(&description), "{failed:?}"),
        e => panic!("Expected rejected items, got {e:?}"),
    }
}

#[then(expr = "the order fails validation with {string}")]
async fn invalid(world: &mut IntakeWorld, message: String) {
    match world.error() {
        IntakeError::Validation(e) => assert_eq!(e.to_string(), message),
        e => panic!("Expected a validation error, got {e:?}"),
    }
}

#[then(regex = r"^there (?:is|are) (\d+) orders? in the database$")]
async fn order_count(world: &mut IntakeWorld, count: i64) {
    let mut conn = world.db().pool().acquire().await.expect("Error acquiring connection");
    let n = orders::count_orders(&mut conn).await.expect("Error counting orders");
    assert_eq!(n, count);
}

#[then(expr = "customer {string} has the address {string}")]
async fn customer_address(world: &mut IntakeWorld, phone: String, address: String) {
    let customer = world.db().fetch_customer_by_phone(&phone).await.expect("Error fetching customer");
    let customer = customer.unwrap_or_else(|| panic!("No customer with phone {phone}"));
    assert_eq!(customer.address.as_deref(), Some(address.as_str()));
}
