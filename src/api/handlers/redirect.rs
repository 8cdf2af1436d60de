//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::domain::visitor::Visitor;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its destination.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Look up the slug
/// 2. Queue a click event (never awaited, dropped when the queue is full)
/// 3. Return 302 Found with `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<impl IntoResponse, AppError> {
    let destination = state.redirect_service.resolve(&slug, visitor).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, destination)]))
}
