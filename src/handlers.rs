use crate::domain::Domain;
use crate::errors::AppError;
use crate::models::{HealthResponse, StatusMessage};
use axum::{Json, extract::Path};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Placeholder for a tracker's data endpoint; tracker data never leaves
/// the client.
pub async fn domain_status(Path(name): Path<String>) -> Result<Json<StatusMessage>, AppError> {
    let domain = Domain::from_api_name(&name)
        .ok_or_else(|| AppError::not_found(format!("unknown tracker: {name}")))?;

    Ok(Json(StatusMessage {
        message: format!("{domain} tracker data is stored locally on the client"),
    }))
}
