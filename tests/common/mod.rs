#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use std::sync::Arc;
use tinylink::api::handlers::{health_handler, redirect_handler};
use tinylink::api::routes::api_routes;
use tinylink::application::services::LinkService;
use tinylink::domain::entities::{Link, NewLink};
use tinylink::domain::repositories::LinkRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::MemoryLinkRepository;
use tinylink::state::AppState;
use tinylink::utils::code_generator::RandomCodeGenerator;

pub fn create_test_state() -> AppState {
    state_with_repository(Arc::new(MemoryLinkRepository::new()))
}

pub fn state_with_repository(repository: Arc<dyn LinkRepository>) -> AppState {
    let link_service = LinkService::new(repository, Arc::new(RandomCodeGenerator::default()));
    AppState::new(Arc::new(link_service))
}

/// Full route table without rate limiting, which needs a real peer address.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

/// Store whose every operation fails as if the database were down.
pub struct UnavailableRepository;

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn insert(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(AppError::store_unavailable("Database error"))
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::store_unavailable("Database error"))
    }

    async fn list_recent(&self) -> Result<Vec<Link>, AppError> {
        Err(AppError::store_unavailable("Database error"))
    }

    async fn increment_clicks(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::store_unavailable("Database error"))
    }

    async fn delete(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(AppError::store_unavailable("Database error"))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::store_unavailable("Database error"))
    }
}
