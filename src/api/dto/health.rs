//! DTOs for health check endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok",
            message: "Service is healthy",
            timestamp: Utc::now(),
            database: "connected",
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "error",
            message: "Service is unhealthy",
            timestamp: Utc::now(),
            database: "disconnected",
        }
    }
}
