//! Adding transactions.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] model and the [TransactionRecord] that is persisted
//! - The [TransactionDraft] behind the form and its submit workflow
//! - The [SubmissionTracker] that stops a form from being submitted twice
//! - The page and endpoints for the transaction form

mod core;
mod create_endpoint;
mod create_page;
mod draft;
mod form;
mod recent;
mod submission;

pub use core::{OnAddTransaction, Transaction, TransactionRecord};
pub use create_endpoint::{CreateTransactionState, TransactionForm, create_transaction_endpoint};
pub use create_page::{CreateTransactionPageState, get_create_transaction_page};
pub use draft::{FormError, TransactionDraft, parse_amount, sanitize_amount};
pub use recent::{RECENT_TRANSACTIONS_CAPACITY, RecentTransactions};
pub use submission::{SubmissionGuard, SubmissionToken, SubmissionTracker};
