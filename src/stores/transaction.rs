//! Defines the transaction store trait.

use async_trait::async_trait;

use crate::transaction::TransactionRecord;

/// The collection that new transactions are written to.
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// A reference to a child location under a collection in a [TransactionStore].
///
/// The key is generated by the store when the reference is created, before
/// anything has been written to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRef {
    collection: String,
    key: String,
}

impl StoreRef {
    /// Create a reference to the child `key` of `collection`.
    pub fn new(collection: &str, key: &str) -> Self {
        Self {
            collection: collection.to_owned(),
            key: key.to_owned(),
        }
    }

    /// The name of the collection this reference points into.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The store-generated key of the child location.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full path of the child location, e.g. "transactions/-OAbc...".
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.key)
    }
}

/// The errors that may occur while writing to a [TransactionStore].
///
/// These errors are only intended for the server logs, users are shown a
/// generic message instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request could not be sent or the response could not be read.
    #[error("request to the database failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The database responded with a non-success status code.
    #[error("the database rejected the write with status {status}: {body}")]
    Rejected {
        /// The HTTP status code of the response.
        status: u16,
        /// The response body, usually a JSON object with an "error" field.
        body: String,
    },

    /// The location of a reference could not be turned into a valid URL.
    #[error("could not build the URL for the reference: {0}")]
    InvalidUrl(String),

    /// An unhandled SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The lock guarding the store was poisoned by a panicking thread.
    #[error("could not acquire the database lock")]
    LockPoisoned,
}

/// Handles the creation of transactions in an external store.
///
/// Implementations are shared between request handlers, so they must be safe
/// to use from multiple tasks at once.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Get a reference to a new child location under `collection`.
    ///
    /// The returned reference already has a unique key assigned to it.
    fn create_ref(&self, collection: &str) -> StoreRef;

    /// Persist `value` at `reference`, overwriting anything already there.
    ///
    /// Resolves once the store has acknowledged the write.
    ///
    /// # Errors
    /// Returns a [StoreError] if the write fails for any reason.
    async fn write(&self, reference: &StoreRef, value: &TransactionRecord)
    -> Result<(), StoreError>;
}
