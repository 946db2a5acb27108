//! The API endpoints URIs.

/// The root route which redirects to the transaction form.
pub const ROOT: &str = "/";
/// The page for adding a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
