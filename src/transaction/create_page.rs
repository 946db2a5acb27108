//! Defines the route handler for the page for adding a new transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    html::{FORM_CONTAINER_STYLE, base},
    transaction::{
        RecentTransactions, SubmissionToken, SubmissionTracker, Transaction, TransactionDraft,
        form::transaction_form_view, recent::recent_transactions_view,
    },
};

fn create_transaction_view(
    submission_token: SubmissionToken,
    recent_transactions: &[Transaction],
) -> Markup {
    let content = html! {
        main class="py-8 space-y-8"
        {
            div class=(FORM_CONTAINER_STYLE)
            {
                (transaction_form_view(&TransactionDraft::default(), submission_token))
            }

            (recent_transactions_view(recent_transactions, false))
        }
    };

    base("Add Transaction", &content)
}

/// The state needed for the add transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// Issues the token for the rendered form.
    pub submissions: Arc<SubmissionTracker>,
    /// The transactions listed under the form.
    pub recent_transactions: RecentTransactions,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            submissions: Arc::clone(&state.submissions),
            recent_transactions: state.recent_transactions.clone(),
        }
    }
}

/// Renders the page with an empty transaction form and the recent transactions.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Response {
    let submission_token = state.submissions.issue();

    create_transaction_view(submission_token, &state.recent_transactions.snapshot())
        .into_response()
}
