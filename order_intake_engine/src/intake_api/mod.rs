//! # The order intake pipeline
//!
//! Orders arrive from the intake adapters as [`IntakeOrder`]s and are handed to [`OrderIntakeApi::process_order`],
//! which validates, matches, prices and persists them in that order.
//!
//! The matcher, pricing and validation stages are plain functions over a menu snapshot, and can be used on their own.
pub mod errors;
pub mod intake_objects;
pub mod menu_matcher;
pub mod persister;
pub mod pricing;
pub mod validator;

mod order_intake_api;

pub use errors::{IntakeError, PersistenceStage, ValidationError};
pub use intake_objects::{IntakeLine, IntakeOrder, OrderReceipt};
pub use order_intake_api::OrderIntakeApi;
pub use pricing::PricingPolicy;
