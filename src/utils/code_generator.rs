//! Short code generation and validation utilities.
//!
//! Random codes are drawn from the 62-symbol alphanumeric alphabet using the
//! thread-local generator, which is seeded from the OS and periodically
//! reseeded, so sequences never repeat across restarts.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes when none is configured.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Bounds for the configurable generated code length.
pub const MIN_GENERATED_LENGTH: usize = 4;
pub const MAX_GENERATED_LENGTH: usize = 10;

/// Longest custom code accepted. Matches the `links.code` column width.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 32;

/// Codes that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["api", "healthz"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid"));

/// Source of candidate short codes.
///
/// Each call is independent; implementations must not replay a fixed sequence.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random alphanumeric codes of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_code("my_link-2024").is_ok());
/// assert!(validate_custom_code("code with spaces").is_err());
/// assert!(validate_custom_code("healthz").is_err());
/// ```
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() {
        return Err(AppError::invalid_input(
            "Custom code must not be empty",
            json!({ "code": code }),
        ));
    }

    if code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::invalid_input(
            format!("Custom code must be at most {MAX_CUSTOM_CODE_LENGTH} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::invalid_input(
            "Code must contain only alphanumeric characters, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::invalid_input(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
