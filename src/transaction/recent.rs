//! The list of transactions added since the server started.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::{OnAddTransaction, Transaction},
};

/// How many transactions are shown under the form.
pub const RECENT_TRANSACTIONS_CAPACITY: usize = 10;

/// The most recently added transactions, newest first.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecentTransactions {
    transactions: Arc<Mutex<VecDeque<Transaction>>>,
}

impl RecentTransactions {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `transaction` to the front of the list, dropping the oldest
    /// transaction once the list is full.
    pub fn push(&self, transaction: Transaction) {
        let mut transactions = self
            .transactions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        transactions.push_front(transaction);
        transactions.truncate(RECENT_TRANSACTIONS_CAPACITY);
    }

    /// A copy of the list, newest first.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// A callback that pushes each added transaction onto this list.
    pub fn callback(&self) -> OnAddTransaction {
        let recent = self.clone();

        Arc::new(move |transaction: &Transaction| recent.push(transaction.clone()))
    }
}

/// Render the recent transactions table.
///
/// Set `oob` when the table is sent alongside another fragment so htmx swaps
/// it into the existing table.
pub fn recent_transactions_view(transactions: &[Transaction], oob: bool) -> Markup {
    html! {
        section
            id="recent-transactions"
            hx-swap-oob=[oob.then_some("true")]
            class="w-full max-w-md mx-auto px-6 pb-8 text-gray-900 dark:text-white"
        {
            h3 class="text-lg font-bold mb-2" { "Recent Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.name) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            }
                        }
                    }
                }
            }
        }
    }
}
