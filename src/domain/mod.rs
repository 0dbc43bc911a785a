//! Domain layer containing the link entity and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Business rules (validation, code allocation, redirect resolution) live in
//! [`crate::application::services`].

pub mod entities;
pub mod repositories;
