//! Core domain entities.
//!
//! - [`Link`] - A persisted short code to target URL mapping
//! - [`NewLink`] - Input for inserting a link

pub mod link;

pub use link::{Link, NewLink};
