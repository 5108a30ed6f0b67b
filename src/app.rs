use crate::handlers;
use axum::{Router, routing::get};

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/:domain", get(handlers::domain_status))
}
