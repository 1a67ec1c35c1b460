use mockall::mock;
use order_intake_engine::{
    db_types::{Customer, CustomerUpdate, MenuItem, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem},
    IntakeStoreError,
    OrderIntakeDatabase,
};

// `insert_order_with_items` is left out so that the trait's compensating write runs against the mocked calls.
mock! {
    pub IntakeStore {}
    impl OrderIntakeDatabase for IntakeStore {
        fn url(&self) -> &str;
        async fn fetch_available_menu_items(&self) -> Result<Vec<MenuItem>, IntakeStoreError>;
        async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, IntakeStoreError>;
        async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, IntakeStoreError>;
        async fn update_customer(&self, customer_id: i64, update: CustomerUpdate) -> Result<Customer, IntakeStoreError>;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, IntakeStoreError>;
        async fn delete_order(&self, order_id: i64) -> Result<bool, IntakeStoreError>;
        async fn insert_order_items(&self, order_id: i64, items: &[NewOrderItem]) -> Result<Vec<OrderItem>, IntakeStoreError>;
    }
}
