//! Order Intake Engine
//!
//! The order intake engine turns loosely structured orders, received from external automation sources, into validated,
//! priced and persisted pizzeria orders.
//!
//! The library is divided into three main sections:
//! 1. The data types stored by the engine ([`mod@db_types`]) and the backend contract ([`mod@traits`]) that a data
//!    store must implement to act as the engine's database. A SQLite backend ([`SqliteDatabase`]) is provided.
//! 2. The intake pipeline ([`mod@intake_api`]). Its stages (validation, menu matching, pricing and persistence) can be
//!    used individually, but normally every order goes through [`OrderIntakeApi::process_order`].
//! 3. Test utilities, including an in-memory backend with fault injection, behind the `test_utils` feature.
pub mod db_types;
pub mod intake_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use intake_api::{
    IntakeError,
    IntakeLine,
    IntakeOrder,
    OrderIntakeApi,
    OrderReceipt,
    PersistenceStage,
    PricingPolicy,
    ValidationError,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{IntakeStoreError, OrderIntakeDatabase, OrderWriteError};
