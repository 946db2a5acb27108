//! Defines the endpoint for submitting the transaction form.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;
use serde::{Deserialize, Serialize};
use tokio_util::task::TaskTracker;

use crate::{
    AppState, Error,
    stores::TransactionStore,
    transaction::{
        OnAddTransaction, RecentTransactions, SubmissionToken, SubmissionTracker,
        TransactionDraft, form::transaction_form_view, recent::recent_transactions_view,
    },
};

/// The state needed to submit a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// Where new transactions are written.
    pub store: Arc<dyn TransactionStore>,
    /// Called once for each transaction the store has acknowledged.
    pub on_add_transaction: OnAddTransaction,
    /// Guards against submitting the same form twice.
    pub submissions: Arc<SubmissionTracker>,
    /// Re-rendered after a transaction is added.
    pub recent_transactions: RecentTransactions,
    /// Runs each submission so it can finish without the request.
    pub submission_tasks: TaskTracker,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            on_add_transaction: Arc::clone(&state.on_add_transaction),
            submissions: Arc::clone(&state.submissions),
            recent_transactions: state.recent_transactions.clone(),
            submission_tasks: state.submission_tasks.clone(),
        }
    }
}

/// The form data for submitting a transaction.
///
/// Missing fields are treated as empty so they are reported to the user
/// rather than rejected by the extractor.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The transaction name as typed.
    #[serde(default)]
    pub name: String,
    /// The amount text, sanitized before it is parsed.
    #[serde(default)]
    pub amount: String,
    /// The date as typed.
    #[serde(default)]
    pub date: String,
    /// The token the form was rendered with.
    #[serde(default)]
    pub submission_token: SubmissionToken,
}

/// A route handler for submitting the transaction form.
///
/// Responds with the re-rendered form. When the transaction was added the form
/// is empty, carries a fresh submission token and is sent with the updated
/// recent transactions. Otherwise the form keeps the user's input and shows
/// the error.
///
/// The submission runs in its own task, tracked by
/// [CreateTransactionState::submission_tasks], so the store write and the
/// callback finish even if the client goes away before the response is sent.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let mut draft = TransactionDraft::from_input(&form.name, &form.amount, &form.date);

    let guard = match state.submissions.claim(form.submission_token) {
        Ok(guard) => guard,
        Err(error) => return error.into_alert_response(),
    };

    let store = Arc::clone(&state.store);
    let on_add_transaction = Arc::clone(&state.on_add_transaction);
    let submission = state.submission_tasks.spawn(async move {
        let result = draft
            .submit(store.as_ref(), on_add_transaction.as_ref())
            .await;

        match result {
            Ok(transaction) => {
                tracing::debug!(
                    "Submission {} added transaction {}",
                    guard.token(),
                    transaction.id
                );
                guard.complete();
                (draft, true)
            }
            Err(_) => (draft, false),
        }
    });

    let (draft, added) = match submission.await {
        Ok(outcome) => outcome,
        Err(error) => return Error::SubmissionTaskFailed(error.to_string()).into_alert_response(),
    };

    let submission_token = if added {
        state.submissions.issue()
    } else {
        form.submission_token
    };

    html! {
        (transaction_form_view(&draft, submission_token))

        @if added {
            (recent_transactions_view(&state.recent_transactions.snapshot(), true))
        }
    }
    .into_response()
}
