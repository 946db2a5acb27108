//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, error_page::ErrorPage, transaction::SubmissionToken};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The submission token in a form was never issued by the server.
    ///
    /// This happens when the form was rendered by a previous run of the
    /// server, since tokens are not persisted.
    #[error("the submission token {0} was never issued")]
    UnknownSubmission(SubmissionToken),

    /// Another request is already submitting the same form.
    ///
    /// Rejecting the request keeps a double click from creating the
    /// transaction twice.
    #[error("the form is already being submitted")]
    SubmissionInProgress,

    /// The form has already been submitted successfully.
    #[error("the form has already been submitted")]
    SubmissionAlreadyCompleted,

    /// The submission token is older than the completed tokens the server
    /// still remembers, so it may already have been used.
    #[error("the submission token {0} has expired")]
    SubmissionExpired(SubmissionToken),

    /// The task running a submission panicked or was cancelled.
    #[error("the submission task failed: {0}")]
    SubmissionTaskFailed(String),

    /// The URL given for the remote database is not valid.
    #[error("invalid database URL {0}")]
    InvalidDatabaseUrl(String),

    /// The HTTP client for the remote database could not be created.
    #[error("could not create the HTTP client: {0}")]
    HttpClientError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::NotFound.into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::InternalServerError.into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::UnknownSubmission(_) | Error::SubmissionExpired(_) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "This form has expired",
                    "Reload the page and enter the transaction again.",
                ),
            ),
            Error::SubmissionInProgress => (
                StatusCode::CONFLICT,
                Alert::error(
                    "Already submitting",
                    "This transaction is still being saved. Wait for it to finish.",
                ),
            ),
            Error::SubmissionAlreadyCompleted => (
                StatusCode::CONFLICT,
                Alert::error(
                    "Transaction already added",
                    "This form has already been submitted. \
                    Reload the page to add another transaction.",
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
