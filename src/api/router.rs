use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_loan, get_loan_by_id, list_books, list_loans, list_members, return_loan,
};

/// Creates the API router with all circulation endpoints
///
/// Command endpoints (Write operations):
/// - POST /loans - Create a new loan
/// - PUT /loans/:id/return - Return a loan
///
/// Query endpoints (Read operations):
/// - GET /loans - List loan summaries (no items)
/// - GET /loans/:id - Get loan details with items
/// - GET /books - List available book snapshots
/// - GET /members - List members
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Loan endpoints (commands + queries)
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/:id/return", put(return_loan))
        .route("/loans/:id", get(get_loan_by_id))
        .route("/books", get(list_books))
        .route("/members", get(list_members))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
