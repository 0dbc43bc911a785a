//! Helpers for short code generation and input validation.
//!
//! - [`code_generator`] - Random code generation and custom code validation
//! - [`url_normalizer`] - Target URL validation and normalization

pub mod code_generator;
pub mod url_normalizer;
