//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    stores::{PushIdGenerator, StoreError, StoreRef, TransactionStore},
    transaction::TransactionRecord,
};

/// Stores transactions in a SQLite database.
///
/// Records are keyed by collection name and store-generated key, mirroring
/// the layout of the remote database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    push_ids: Arc<PushIdGenerator>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This will create the record table if it does not already exist.
    ///
    /// # Errors
    /// Returns a [StoreError::Sql] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, StoreError> {
        create_record_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            push_ids: Arc::new(PushIdGenerator::new()),
        })
    }

    /// Retrieve the record stored at `reference`, if any.
    ///
    /// # Errors
    /// Returns a [StoreError] if the lock is poisoned or the query fails.
    pub fn get(&self, reference: &StoreRef) -> Result<Option<TransactionRecord>, StoreError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let record = connection
            .prepare(
                "SELECT name, amount, date FROM record
                 WHERE collection = ?1 AND key = ?2",
            )?
            .query_row((reference.collection(), reference.key()), map_record_row)
            .optional()?;

        Ok(record)
    }

    /// Count the records stored under `collection`.
    ///
    /// # Errors
    /// Returns a [StoreError] if the lock is poisoned or the query fails.
    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM record WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}

#[async_trait]
impl TransactionStore for SQLiteTransactionStore {
    fn create_ref(&self, collection: &str) -> StoreRef {
        StoreRef::new(collection, &self.push_ids.generate())
    }

    async fn write(
        &self,
        reference: &StoreRef,
        value: &TransactionRecord,
    ) -> Result<(), StoreError> {
        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreError::LockPoisoned
        })?;

        connection.execute(
            "INSERT OR REPLACE INTO record (collection, key, name, amount, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                reference.collection(),
                reference.key(),
                &value.name,
                value.amount,
                &value.date,
            ),
        )?;

        Ok(())
    }
}

/// Create the table that holds records for every collection.
///
/// # Errors
/// Returns an error if the SQL query fails.
fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                collection TEXT NOT NULL,
                key TEXT NOT NULL,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                PRIMARY KEY (collection, key)
                )",
        (),
    )?;

    Ok(())
}

fn map_record_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        name: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
    })
}
