//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;

/// Handle passed to axum handlers via `State`.
///
/// Cloning is cheap; the service and its store are shared behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }
}
