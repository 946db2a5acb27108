//! Defines the core data models for transactions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income that has been acknowledged by the store.
///
/// A `Transaction` only exists once its [TransactionRecord] has been written,
/// since the `id` is the key the store generated for that write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The store-generated key of the transaction.
    pub id: String,
    /// A label for what the transaction was for.
    pub name: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened, as entered by the user.
    pub date: String,
}

/// The data persisted for a transaction.
///
/// Serializes to `{ "name": string, "amount": number, "date": string }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// A label for what the transaction was for.
    pub name: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened, as entered by the user.
    pub date: String,
}

impl TransactionRecord {
    /// Attach the store-generated `id` to this record.
    pub fn into_transaction(self, id: &str) -> Transaction {
        Transaction {
            id: id.to_owned(),
            name: self.name,
            amount: self.amount,
            date: self.date,
        }
    }
}

/// A callback that is given each transaction after the store has acknowledged it.
pub type OnAddTransaction = Arc<dyn Fn(&Transaction) + Send + Sync>;
