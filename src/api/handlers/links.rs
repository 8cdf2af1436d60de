//! Handlers for link management endpoints.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::analytics::LinkAnalyticsResponse;
use crate::api::dto::links::{
    CreateLinkRequest, LinkListItem, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::dto::pagination::{ListLinksParams, PaginationMeta};
use crate::domain::entities::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "destination": "https://example.org/page", "customSlug": "promo25" }
/// ```
///
/// `customSlug` is optional (alias: `candidateIdentifier`).
///
/// # Errors
///
/// - 400 - invalid destination or slug
/// - 409 - slug already taken
/// - 500 - no free slug found
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&caller, &payload.destination, payload.custom_slug.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.slug);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists links newest first with click aggregates.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=5&search=promo`
pub async fn list_links_handler(
    State(state): State<AppState>,
    params: Result<Query<ListLinksParams>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(params) = params?;

    let (page, limit) = params
        .resolve()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let result = state
        .link_service
        .list_links(params.to_filter(page, limit))
        .await?;

    let links = result
        .items
        .into_iter()
        .map(|summary| {
            let short_url = state.link_service.short_url(&summary.link.slug);
            LinkListItem::new(summary, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        links,
        pagination: PaginationMeta::new(page, limit, result.total),
    }))
}

/// Returns click analytics of one link.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn link_analytics_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<LinkAnalyticsResponse>, AppError> {
    let Path(id) = id?;
    let analytics = state.analytics_service.link_analytics(id).await?;
    let short_url = state.link_service.short_url(&analytics.link.slug);

    Ok(Json(LinkAnalyticsResponse::new(analytics, short_url)))
}

/// Replaces the destination of a link.
///
/// # Endpoint
///
/// `PUT /api/links/{id}`
///
/// # Errors
///
/// - 403 - caller is neither the owner nor an admin
/// - 404 - unknown id
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .update_destination(&caller, id, &payload.destination)
        .await?;

    let short_url = state.link_service.short_url(&link.slug);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Deletes a link and its clicks.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.link_service.delete_link(&caller, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
