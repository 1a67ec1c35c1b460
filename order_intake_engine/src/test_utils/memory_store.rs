//! An in-memory [`OrderIntakeDatabase`] with fault injection.
//!
//! `MemoryStore` keeps everything in vectors behind a shared mutex, so clones see the same data. Any operation can be
//! made to fail with [`MemoryStore::fail`], which is how the compensation path of the default
//! [`OrderIntakeDatabase::insert_order_with_items`] is exercised. The store does not override that method.
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;
use intake_common::Money;
use log::*;

use crate::{
    db_types::{Customer, CustomerUpdate, MenuItem, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem},
    traits::{IntakeStoreError, OrderIntakeDatabase},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFault {
    MenuFetch,
    CustomerLookup,
    CustomerInsert,
    CustomerUpdate,
    OrderInsert,
    OrderItemsInsert,
    OrderDelete,
}

#[derive(Debug, Default)]
struct StoreState {
    menu: Vec<MenuItem>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    faults: HashSet<StoreFault>,
    next_id: i64,
    calls: usize,
    forced_collisions: usize,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Records the call and fails it if a fault has been injected for it.
    fn check(&mut self, op: StoreFault) -> Result<(), IntakeStoreError> {
        self.calls += 1;
        if self.faults.contains(&op) {
            debug!("🧪️ Injected fault: {op:?}");
            return Err(IntakeStoreError::DatabaseError(format!("Injected fault: {op:?}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("MemoryStore mutex was poisoned")
    }

    /// Adds an available item to the menu. Menu set-up does not count towards [`Self::call_count`].
    pub fn add_menu_item(&self, name: &str, price: Money) -> MenuItem {
        let mut state = self.lock();
        let item = MenuItem { id: state.next_id(), name: name.to_string(), price, available: true };
        state.menu.push(item.clone());
        item
    }

    pub fn set_available(&self, menu_item_id: i64, available: bool) {
        let mut state = self.lock();
        state.menu.iter_mut().filter(|m| m.id == menu_item_id).for_each(|m| m.available = available);
    }

    /// Makes every subsequent call of the given kind fail.
    pub fn fail(&self, fault: StoreFault) {
        self.lock().faults.insert(fault);
    }

    /// Treats the order numbers of the next `count` order inserts as already taken.
    pub fn collide_order_numbers(&self, count: usize) {
        self.lock().forced_collisions = count;
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// The number of trait operations issued against the store so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.lock().customers.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lock().order_items.clone()
    }
}

impl OrderIntakeDatabase for MemoryStore {
    fn url(&self) -> &str {
        "memory://"
    }

    async fn fetch_available_menu_items(&self) -> Result<Vec<MenuItem>, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::MenuFetch)?;
        Ok(state.menu.iter().filter(|m| m.available).cloned().collect())
    }

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::CustomerLookup)?;
        Ok(state.customers.iter().find(|c| c.phone == phone).cloned())
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::CustomerInsert)?;
        let now = Utc::now();
        let customer = Customer {
            id: state.next_id(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, customer_id: i64, update: CustomerUpdate) -> Result<Customer, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::CustomerUpdate)?;
        if update.is_empty() {
            return Err(IntakeStoreError::CustomerUpdateNoOp(customer_id));
        }
        let customer = state
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or(IntakeStoreError::CustomerNotFound(customer_id))?;
        if let Some(name) = update.name {
            customer.name = name;
        }
        if let Some(address) = update.address {
            customer.address = Some(address);
        }
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::OrderInsert)?;
        if state.forced_collisions > 0 {
            state.forced_collisions -= 1;
            debug!("🧪️ Forcing a collision on order number {}", order.order_number);
            return Err(IntakeStoreError::DuplicateOrderNumber(order.order_number));
        }
        if state.orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(IntakeStoreError::DuplicateOrderNumber(order.order_number));
        }
        let now = Utc::now();
        let order = Order {
            id: state.next_id(),
            order_number: order.order_number,
            customer_id: order.customer_id,
            delivery_method: order.delivery_method,
            delivery_address: order.delivery_address,
            payment_method: order.payment_method,
            total_amount: order.total_amount,
            notes: order.notes,
            allergy_info: order.allergy_info,
            external_source: order.external_source,
            call_id: order.call_id,
            order_status: order.order_status,
            payment_status: order.payment_status,
            created_at: now,
            updated_at: now,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn delete_order(&self, order_id: i64) -> Result<bool, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::OrderDelete)?;
        let before = state.orders.len();
        state.orders.retain(|o| o.id != order_id);
        state.order_items.retain(|i| i.order_id != order_id);
        Ok(state.orders.len() < before)
    }

    async fn insert_order_items(
        &self,
        order_id: i64,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, IntakeStoreError> {
        let mut state = self.lock();
        state.check(StoreFault::OrderItemsInsert)?;
        if !state.orders.iter().any(|o| o.id == order_id) {
            return Err(IntakeStoreError::DatabaseError(format!("Order {order_id} does not exist")));
        }
        let mut written = Vec::with_capacity(items.len());
        for item in items {
            let row = OrderItem {
                id: state.next_id(),
                order_id,
                menu_item_id: item.menu_item_id,
                item_name: item.item_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
                special_instructions: item.special_instructions.clone(),
            };
            written.push(row);
        }
        state.order_items.extend(written.iter().cloned());
        Ok(written)
    }
}
