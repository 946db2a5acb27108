//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::{
    stores::TransactionStore,
    transaction::{OnAddTransaction, RecentTransactions, SubmissionTracker, Transaction},
};

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// Where new transactions are written.
    pub store: Arc<dyn TransactionStore>,

    /// Called once for each transaction the store has acknowledged.
    pub on_add_transaction: OnAddTransaction,

    /// Issues and tracks the tokens that identify rendered forms.
    pub submissions: Arc<SubmissionTracker>,

    /// The transactions added since the server started.
    pub recent_transactions: RecentTransactions,

    /// The tasks running submissions, waited on before the server exits.
    pub submission_tasks: TaskTracker,
}

impl AppState {
    /// Create a new [AppState] that writes transactions to `store`.
    ///
    /// Added transactions are pushed onto [AppState::recent_transactions].
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        let recent_transactions = RecentTransactions::new();

        Self {
            store,
            on_add_transaction: recent_transactions.callback(),
            submissions: Arc::new(SubmissionTracker::new()),
            recent_transactions,
            submission_tasks: TaskTracker::new(),
        }
    }

    /// Create a new [AppState] that also calls `on_add_transaction` after
    /// each added transaction has been pushed onto the recent transactions.
    pub fn with_callback(
        store: Arc<dyn TransactionStore>,
        on_add_transaction: OnAddTransaction,
    ) -> Self {
        let state = Self::new(store);
        let push_recent = Arc::clone(&state.on_add_transaction);

        Self {
            on_add_transaction: Arc::new(move |transaction: &Transaction| {
                push_recent(transaction);
                on_add_transaction(transaction);
            }),
            ..state
        }
    }
}
