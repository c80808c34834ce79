pub mod auth;
pub mod cart;
pub mod delivery;
pub mod menu;
pub mod orders;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Runs a blocking service call on actix's thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

/// GET /
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "QuickBite API is running!" }))
}
