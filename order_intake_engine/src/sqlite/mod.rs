//! SQLite backend for the order intake pipeline.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
