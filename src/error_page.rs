//! Full page responses for missing routes and internal server errors.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full HTML page describing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    /// The route or resource does not exist.
    NotFound,
    /// Something went wrong on the server. Details are only in the server logs.
    InternalServerError,
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        let (status_code, markup) = match self {
            ErrorPage::NotFound => (
                StatusCode::NOT_FOUND,
                error_view(
                    "Not Found",
                    "404",
                    "Something's missing.",
                    "Sorry, we can't find that page. Head back to add a transaction.",
                ),
            ),
            ErrorPage::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view(
                    "Internal Server Error",
                    "500",
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                ),
            ),
        };

        (status_code, Html(markup.into_string())).into_response()
    }
}

pub async fn get_404_not_found() -> Response {
    ErrorPage::NotFound.into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    ErrorPage::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_content_type, assert_valid_html, parse_html_document};

    use super::{get_404_not_found, get_internal_server_error_page};

    #[tokio::test]
    async fn renders_404_page() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn renders_500_page() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }
}
