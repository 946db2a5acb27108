//! Contains the store trait and implementations for persisting [transactions](crate::transaction).

mod push_id;
mod realtime;
mod sqlite;
mod transaction;

pub use push_id::{PUSH_ID_LENGTH, PushIdGenerator};
pub use realtime::RealtimeDatabase;
pub use sqlite::SQLiteTransactionStore;
pub use transaction::{StoreError, StoreRef, TRANSACTIONS_COLLECTION, TransactionStore};
