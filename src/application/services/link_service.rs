//! Link allocation, redirect resolution and listing.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_url};
use serde_json::json;

/// Insert attempts for generated codes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Service for creating, resolving and listing shortened links.
///
/// Uniqueness is never checked up front: every candidate code goes straight
/// to [`LinkRepository::insert`] and a [`AppError::CodeConflict`] from the
/// store decides whether it was taken. Two concurrent requests for the same
/// code therefore cannot both succeed.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(repository: Arc<dyn LinkRepository>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            repository,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of generated-code insert attempts.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `target_url` - The URL to redirect to (http or https)
    /// - `custom_code` - Optional custom short code (validated if provided)
    ///
    /// # Code Allocation
    ///
    /// - With `custom_code`: a single insert; a taken code is a conflict
    /// - Otherwise: random candidates are inserted until one sticks, up to
    ///   the configured attempt bound
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the URL or custom code is invalid.
    /// Returns [`AppError::CodeConflict`] if the custom code already exists.
    /// Returns [`AppError::CodeGenerationExhausted`] if every generated code collided.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create_link(
        &self,
        target_url: &str,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let target_url = normalize_url(target_url).map_err(|e| match e {
            UrlNormalizationError::Empty => {
                AppError::invalid_input("URL is required", json!({ "field": "targetUrl" }))
            }
            other => AppError::invalid_input(
                "Invalid URL format",
                json!({ "reason": other.to_string() }),
            ),
        })?;

        let link = match custom_code {
            Some(code) => self.insert_custom(code, target_url).await?,
            None => self.insert_generated(target_url).await?,
        };

        metrics::counter!("links_created_total").increment(1);
        tracing::info!(code = %link.code, target_url = %link.target_url, "Link created");

        Ok(link)
    }

    async fn insert_custom(&self, code: String, target_url: String) -> Result<Link, AppError> {
        validate_custom_code(&code)?;

        let new_link = NewLink {
            code: code.clone(),
            target_url,
        };

        match self.repository.insert(new_link).await {
            Err(AppError::CodeConflict { .. }) => {
                tracing::debug!(%code, "Custom code already taken");
                Err(AppError::code_conflict(
                    "Short code already exists",
                    json!({ "code": code }),
                ))
            }
            other => other,
        }
    }

    async fn insert_generated(&self, target_url: String) -> Result<Link, AppError> {
        for attempt in 1..=self.max_attempts {
            let new_link = NewLink {
                code: self.generator.generate(),
                target_url: target_url.clone(),
            };

            match self.repository.insert(new_link).await {
                Err(AppError::CodeConflict { .. }) => {
                    metrics::counter!("link_code_collisions_total").increment(1);
                    tracing::warn!(attempt, "Generated code collided, retrying");
                }
                other => return other,
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Failed to generate unique code"
        );
        Err(AppError::generation_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Resolves a short code for a redirect, counting the click.
    ///
    /// The lookup and the increment are one atomic store operation, and it
    /// completes before this returns, so the caller can redirect knowing the
    /// click is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code; the store is left unchanged.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        match self.repository.increment_clicks(code).await {
            Ok(Some(link)) => {
                metrics::counter!("redirects_total", "outcome" => "hit").increment(1);
                Ok(link)
            }
            Ok(None) => {
                metrics::counter!("redirects_total", "outcome" => "miss").increment(1);
                Err(AppError::not_found("Link not found", json!({ "code": code })))
            }
            Err(e) => {
                metrics::counter!("redirects_total", "outcome" => "error").increment(1);
                Err(e)
            }
        }
    }

    /// Lists every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.repository.list_recent().await
    }

    /// Retrieves a link without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))
    }

    /// Deletes a link and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn delete_link(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .delete(code)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))?;

        tracing::info!(code = %link.code, "Link deleted");
        Ok(link)
    }

    /// Checks that the store answers queries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store is unreachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::persistence::MemoryLinkRepository;
    use crate::utils::code_generator::{MockCodeGenerator, RandomCodeGenerator};
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_link(code: &str, url: &str) -> Link {
        let now = Utc::now();
        Link::new(code.to_string(), url.to_string(), 0, now, now)
    }

    fn conflict() -> AppError {
        AppError::code_conflict("Short code already exists", Value::Null)
    }

    fn memory_service() -> LinkService {
        LinkService::new(
            Arc::new(MemoryLinkRepository::new()),
            Arc::new(RandomCodeGenerator::default()),
        )
    }

    fn fixed_generator(code: &'static str) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().returning(move || code.to_string());
        generator
    }

    #[tokio::test]
    async fn test_create_link_with_generated_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .withf(|new_link| new_link.code == "gen123" && new_link.target_url == "https://example.com/")
            .times(1)
            .returning(|new_link| Ok(create_test_link(&new_link.code, &new_link.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(fixed_generator("gen123")));

        let link = service
            .create_link("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.code, "gen123");
        assert_eq!(link.clicks, 0);
    }

    #[tokio::test]
    async fn test_create_link_normalizes_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .withf(|new_link| new_link.target_url == "https://example.com/path")
            .times(1)
            .returning(|new_link| Ok(create_test_link(&new_link.code, &new_link.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(fixed_generator("abc123")));

        let result = service
            .create_link("https://EXAMPLE.COM:443/path", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_retries_on_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let calls = AtomicUsize::new(0);
        mock_repo.expect_insert().times(3).returning(move |new_link| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(create_test_link(&new_link.code, &new_link.target_url))
            }
        });

        let mut generator = MockCodeGenerator::new();
        let seq = AtomicUsize::new(0);
        generator
            .expect_generate()
            .times(3)
            .returning(move || format!("cand{}", seq.fetch_add(1, Ordering::SeqCst)));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(generator));

        let link = service
            .create_link("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.code, "cand2");
    }

    #[tokio::test]
    async fn test_create_link_generation_exhausted() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .times(DEFAULT_MAX_ATTEMPTS)
            .returning(|_| Err(conflict()));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(fixed_generator("same")));

        let err = service
            .create_link("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeGenerationExhausted { .. }));
        assert_eq!(err.to_string(), "Failed to generate unique code");
    }

    #[tokio::test]
    async fn test_create_link_respects_custom_attempt_bound() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .times(3)
            .returning(|_| Err(conflict()));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(fixed_generator("same")))
            .with_max_attempts(3);

        let result = service.create_link("https://example.com", None).await;
        assert!(matches!(
            result,
            Err(AppError::CodeGenerationExhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_link_store_failure_is_not_retried() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("Database error")));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(fixed_generator("abc123")));

        let result = service.create_link("https://example.com", None).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .withf(|new_link| new_link.code == "my_link-1")
            .times(1)
            .returning(|new_link| Ok(create_test_link(&new_link.code, &new_link.target_url)));

        // Generator must not be consulted when a code is supplied.
        let service = LinkService::new(Arc::new(mock_repo), Arc::new(MockCodeGenerator::new()));

        let link = service
            .create_link("https://example.com", Some("my_link-1".to_string()))
            .await
            .unwrap();

        assert_eq!(link.code, "my_link-1");
    }

    #[tokio::test]
    async fn test_create_link_custom_code_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(conflict()));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(MockCodeGenerator::new()));

        let err = service
            .create_link("https://example.com", Some("taken".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeConflict { .. }));
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_create_link_invalid_custom_code_skips_store() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(MockCodeGenerator::new()),
        );

        for code in ["code with spaces", "code@special", "code/slash", ""] {
            let result = service
                .create_link("https://example.com", Some(code.to_string()))
                .await;
            assert!(
                matches!(result, Err(AppError::InvalidInput { .. })),
                "{code:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_link_invalid_urls() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(MockCodeGenerator::new()),
        );

        let err = service.create_link("", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
        assert_eq!(err.to_string(), "URL is required");

        for input in ["not-a-url", "ftp://example.com"] {
            let err = service.create_link(input, None).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput { .. }));
            assert_eq!(err.to_string(), "Invalid URL format");
        }
    }

    #[tokio::test]
    async fn test_generated_codes_are_distinct() {
        let service = memory_service();
        let mut codes = HashSet::new();

        for i in 0..50 {
            let link = service
                .create_link(&format!("https://example{i}.com"), None)
                .await
                .unwrap();
            codes.insert(link.code);
        }

        assert_eq!(codes.len(), 50);
    }

    #[tokio::test]
    async fn test_duplicate_custom_code_never_overwrites() {
        let service = memory_service();

        service
            .create_link("https://first.com", Some("mine".to_string()))
            .await
            .unwrap();
        let err = service
            .create_link("https://second.com", Some("mine".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeConflict { .. }));
        let kept = service.get_link("mine").await.unwrap();
        assert_eq!(kept.target_url, "https://first.com/");
    }

    #[tokio::test]
    async fn test_concurrent_identical_custom_codes() {
        let service = Arc::new(memory_service());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_link(&format!("https://site{i}.com"), Some("race".to_string()))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::CodeConflict { .. }) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_resolve_counts_each_click() {
        let service = memory_service();
        service
            .create_link("https://example.com/target", Some("hits".to_string()))
            .await
            .unwrap();

        for expected in 1..=5 {
            let link = service.resolve("hits").await.unwrap();
            assert_eq!(link.target_url, "https://example.com/target");
            assert_eq!(link.clicks, expected);
        }

        assert_eq!(service.get_link("hits").await.unwrap().clicks, 5);
    }

    #[tokio::test]
    async fn test_resolve_not_found_leaves_store_unchanged() {
        let service = memory_service();
        let existing = service
            .create_link("https://example.com", Some("present".to_string()))
            .await
            .unwrap();

        let err = service.resolve("absent").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let links = service.list_links().await.unwrap();
        assert_eq!(links, vec![existing]);
    }

    #[tokio::test]
    async fn test_resolve_store_failure() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("Database error")));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(MockCodeGenerator::new()));

        let result = service.resolve("abc").await;
        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_list_links_preserves_store_order() {
        let now = Utc::now();
        let links = vec![
            Link::new("newest".into(), "https://a.com/".into(), 0, now, now),
            Link::new(
                "middle".into(),
                "https://b.com/".into(),
                0,
                now - Duration::days(1),
                now - Duration::days(1),
            ),
            Link::new(
                "oldest".into(),
                "https://c.com/".into(),
                0,
                now - Duration::days(2),
                now - Duration::days(2),
            ),
        ];

        let mut mock_repo = MockLinkRepository::new();
        let returned = links.clone();
        mock_repo
            .expect_list_recent()
            .times(1)
            .returning(move || Ok(returned.clone()));

        let service = LinkService::new(Arc::new(mock_repo), Arc::new(MockCodeGenerator::new()));

        assert_eq!(service.list_links().await.unwrap(), links);
    }

    #[tokio::test]
    async fn test_delete_link() {
        let service = memory_service();
        service
            .create_link("https://example.com", Some("bye".to_string()))
            .await
            .unwrap();

        let deleted = service.delete_link("bye").await.unwrap();
        assert_eq!(deleted.code, "bye");

        let err = service.delete_link("bye").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
