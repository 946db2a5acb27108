//! Test doubles for [TransactionStore].

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::{
    stores::{StoreError, StoreRef, TransactionStore},
    transaction::{OnAddTransaction, Transaction, TransactionRecord},
};

/// Records every write in memory and hands out predictable keys.
#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    keys: Mutex<VecDeque<String>>,
    failing: bool,
    refs_created: AtomicUsize,
    writes: Mutex<Vec<(StoreRef, TransactionRecord)>>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hand out `keys` in order, then fall back to "key-{n}".
    pub(crate) fn with_keys(keys: &[&str]) -> Self {
        Self {
            keys: Mutex::new(keys.iter().map(|key| key.to_string()).collect()),
            ..Self::default()
        }
    }

    /// A store that rejects every write.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn refs_created(&self) -> usize {
        self.refs_created.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> Vec<(StoreRef, TransactionRecord)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionStore for FakeStore {
    fn create_ref(&self, collection: &str) -> StoreRef {
        let count = self.refs_created.fetch_add(1, Ordering::SeqCst) + 1;
        let key = self
            .keys
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("key-{count}"));

        StoreRef::new(collection, &key)
    }

    async fn write(&self, reference: &StoreRef, record: &TransactionRecord) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Rejected {
                status: 401,
                body: "{\"error\": \"Permission denied\"}".to_owned(),
            });
        }

        self.writes
            .lock()
            .unwrap()
            .push((reference.clone(), record.clone()));

        Ok(())
    }
}

/// A [FakeStore] whose writes wait until the test opens the gate.
#[derive(Debug)]
pub(crate) struct GatedStore {
    inner: FakeStore,
    gate: Semaphore,
    started: Notify,
}

impl GatedStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: FakeStore::new(),
            gate: Semaphore::new(0),
            started: Notify::new(),
        }
    }

    /// Wait until a write has reached the store.
    pub(crate) async fn wait_for_write(&self) {
        self.started.notified().await;
    }

    /// Let one waiting write finish.
    pub(crate) fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub(crate) fn writes(&self) -> Vec<(StoreRef, TransactionRecord)> {
        self.inner.writes()
    }
}

#[async_trait]
impl TransactionStore for GatedStore {
    fn create_ref(&self, collection: &str) -> StoreRef {
        self.inner.create_ref(collection)
    }

    async fn write(&self, reference: &StoreRef, record: &TransactionRecord) -> Result<(), StoreError> {
        self.started.notify_one();
        self.gate
            .acquire()
            .await
            .expect("gate is never closed")
            .forget();

        self.inner.write(reference, record).await
    }
}

/// A callback that records every transaction it is given.
pub(crate) fn recording_callback() -> (OnAddTransaction, Arc<Mutex<Vec<Transaction>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let callback: OnAddTransaction = Arc::new(move |transaction: &Transaction| {
        recorded.lock().unwrap().push(transaction.clone());
    });

    (callback, calls)
}
