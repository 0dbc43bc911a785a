//! Handlers for link management endpoints (create, list, get, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{ApiResponse, CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, generating a code when none is supplied.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/page",
///   "code": "my-link"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the stored link:
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "code": "my-link",
///     "targetUrl": "https://example.com/page",
///     "clicks": 0,
///     "createdAt": "2025-01-01T12:00:00Z",
///     "updatedAt": "2025-01-01T12:00:00Z"
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` for a missing/invalid URL or an invalid custom code
/// - `409 Conflict` if the custom code is already taken
/// - `500 Internal Server Error` on store failure or code exhaustion
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LinkResponse>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&payload.target_url, payload.code)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link.into()))))
}

/// Lists every link, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LinkResponse>>>, AppError> {
    let links = state.link_service.list_links().await?;

    Ok(Json(ApiResponse::ok(
        links.into_iter().map(LinkResponse::from).collect(),
    )))
}

/// Returns a single link without counting a click.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<LinkResponse>>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    Ok(Json(ApiResponse::ok(link.into())))
}

/// Permanently deletes a link and returns the removed record.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<LinkResponse>>, AppError> {
    let link = state.link_service.delete_link(&code).await?;
    Ok(Json(ApiResponse::ok(link.into())))
}
