//! Application layer services implementing business logic.
//!
//! Services coordinate validation, code allocation and repository calls, and
//! give HTTP handlers and the admin CLI one API to call.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link allocation, redirect resolution, listing

pub mod services;
