//! # Intake database backends
//!
//! This module defines the interface contract that a data store must satisfy in order to back the order intake
//! pipeline. The pipeline treats the store as an external relational service offering exact-match reads, inserts,
//! partial updates and deletes that return the written row.
//!
//! * [`OrderIntakeDatabase`] declares the menu, customer and order operations the pipeline issues, in the order it
//!   issues them.
//! * [`OrderWriteError`] reports which stage of an order write failed, and whether the partial write was undone.
mod order_intake_database;

pub use order_intake_database::{IntakeStoreError, OrderIntakeDatabase, OrderWriteError};
