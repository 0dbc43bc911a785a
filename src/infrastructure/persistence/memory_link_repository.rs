//! In-process implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;

#[derive(Default)]
struct Inner {
    links: HashMap<String, StoredLink>,
    next_seq: u64,
}

struct StoredLink {
    seq: u64,
    link: Link,
}

/// Link store backed by a mutex-guarded map.
///
/// Every operation runs under one lock, so insert-if-absent and click
/// increments are atomic just like their SQL counterparts. Data lives only as
/// long as the process.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner.lock().map_err(|_| {
            tracing::error!("In-memory link store lock poisoned");
            AppError::store_unavailable("Database error")
        })
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        match inner.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::code_conflict(
                "Short code already exists",
                json!({ "code": new_link.code }),
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let link = Link::new(new_link.code, new_link.target_url, 0, now, now);
                slot.insert(StoredLink {
                    seq: inner.next_seq,
                    link: link.clone(),
                });
                inner.next_seq += 1;
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let inner = self.lock()?;
        Ok(inner.links.get(code).map(|stored| stored.link.clone()))
    }

    async fn list_recent(&self) -> Result<Vec<Link>, AppError> {
        let inner = self.lock()?;
        let mut stored: Vec<&StoredLink> = inner.links.values().collect();
        stored.sort_by(|a, b| {
            b.link
                .created_at
                .cmp(&a.link.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.link.clone()).collect())
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError> {
        let mut inner = self.lock()?;
        Ok(inner.links.get_mut(code).map(|stored| {
            stored.link.clicks += 1;
            stored.link.updated_at = Utc::now();
            stored.link.clone()
        }))
    }

    async fn delete(&self, code: &str) -> Result<Option<Link>, AppError> {
        let mut inner = self.lock()?;
        Ok(inner.links.remove(code).map(|stored| stored.link))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link(code: &str, url: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            target_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryLinkRepository::new();

        let link = repo
            .insert(new_link("abc123", "https://example.com/"))
            .await
            .unwrap();
        assert_eq!(link.clicks, 0);
        assert_eq!(link.created_at, link.updated_at);

        let found = repo.find_by_code("abc123").await.unwrap();
        assert_eq!(found, Some(link));
        assert!(repo.find_by_code("ABC123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_conflict() {
        let repo = MemoryLinkRepository::new();
        repo.insert(new_link("dup", "https://a.com/")).await.unwrap();

        let err = repo
            .insert(new_link("dup", "https://b.com/"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CodeConflict { .. }));

        let kept = repo.find_by_code("dup").await.unwrap().unwrap();
        assert_eq!(kept.target_url, "https://a.com/");
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let repo = MemoryLinkRepository::new();
        for code in ["first", "second", "third"] {
            repo.insert(new_link(code, "https://example.com/"))
                .await
                .unwrap();
        }

        let codes: Vec<String> = repo
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_increment_clicks() {
        let repo = MemoryLinkRepository::new();
        let created = repo
            .insert(new_link("click", "https://example.com/"))
            .await
            .unwrap();

        for expected in 1..=3 {
            let link = repo.increment_clicks("click").await.unwrap().unwrap();
            assert_eq!(link.clicks, expected);
            assert!(link.updated_at >= created.updated_at);
            assert_eq!(link.created_at, created.created_at);
        }
    }

    #[tokio::test]
    async fn test_increment_missing_code() {
        let repo = MemoryLinkRepository::new();
        assert!(repo.increment_clicks("missing").await.unwrap().is_none());
        assert!(repo.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryLinkRepository::new();
        repo.insert(new_link("gone", "https://example.com/"))
            .await
            .unwrap();

        let deleted = repo.delete("gone").await.unwrap();
        assert_eq!(deleted.map(|l| l.code), Some("gone".to_string()));
        assert!(repo.find_by_code("gone").await.unwrap().is_none());
        assert!(repo.delete("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(MemoryLinkRepository::new().ping().await.is_ok());
    }
}
