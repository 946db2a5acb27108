//! Contains the store implementation that uses a local SQLite database.

mod transaction;

pub use transaction::SQLiteTransactionStore;
