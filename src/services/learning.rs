//! Learning library.
//!
//! Entries are shared by all users: anyone can browse, signed-in users can
//! add and edit.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::core::{generate_id, validate_list, validate_optional_text, validate_text};
use crate::error::ServiceError;
use crate::storage::{ContentCategory, LearningContent, LearningFilter, SpiritualLevel};
use crate::traits::StorageTrait;

/// Longest title.
pub const MAX_TITLE_LENGTH: usize = 200;
/// Longest body.
pub const MAX_BODY_LENGTH: usize = 20_000;
/// Longest source citation.
pub const MAX_SOURCE_LENGTH: usize = 300;
/// Most tags per entry.
pub const MAX_TAGS: usize = 10;
/// Longest search query.
pub const MAX_QUERY_LENGTH: usize = 100;
/// Default page size.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size.
pub const MAX_LIMIT: u32 = 100;

/// Library entry fields (POST / PUT).
#[derive(Debug, Clone, Deserialize)]
pub struct LearningInput {
    /// Title.
    pub title: String,
    /// Kind of material.
    pub category: ContentCategory,
    /// Main text.
    pub body: String,
    /// Citation or author.
    #[serde(default)]
    pub source: Option<String>,
    /// Intended level.
    #[serde(default)]
    pub difficulty: SpiritualLevel,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LearningQuery {
    /// Only this category.
    pub category: Option<ContentCategory>,
    /// Only this difficulty.
    pub difficulty: Option<SpiritualLevel>,
    /// Search text.
    pub q: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
}

fn validate_input(input: &LearningInput) -> Result<(), ServiceError> {
    validate_text("title", &input.title, MAX_TITLE_LENGTH)?;
    validate_text("body", &input.body, MAX_BODY_LENGTH)?;
    validate_optional_text("source", input.source.as_deref(), MAX_SOURCE_LENGTH)?;
    validate_list("tags", &input.tags, MAX_TAGS, 50)
}

/// Learning library service.
pub struct LearningService<S>
where
    S: StorageTrait,
{
    storage: Arc<S>,
}

impl<S> LearningService<S>
where
    S: StorageTrait,
{
    /// Create a learning service.
    #[must_use]
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Browse the library.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidValue`] for a bad limit or query.
    pub async fn list(&self, query: LearningQuery) -> Result<Vec<LearningContent>, ServiceError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ServiceError::invalid(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}"),
            ));
        }
        validate_optional_text("q", query.q.as_deref(), MAX_QUERY_LENGTH)?;

        let filter = LearningFilter {
            category: query.category,
            difficulty: query.difficulty,
            search: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            limit,
        };
        Ok(self.storage.list_learning_content(&filter).await?)
    }

    /// One entry.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<LearningContent, ServiceError> {
        self.storage
            .get_learning_content(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                resource: "learning content".to_string(),
                id: id.to_string(),
            })
    }

    /// Add an entry.
    ///
    /// # Errors
    ///
    /// Returns validation or storage errors.
    pub async fn create(
        &self,
        user_id: &str,
        input: LearningInput,
    ) -> Result<LearningContent, ServiceError> {
        validate_input(&input)?;
        let now = Utc::now();
        let content = LearningContent {
            id: generate_id(),
            title: input.title.trim().to_string(),
            category: input.category,
            body: input.body,
            source: input.source,
            difficulty: input.difficulty,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };
        self.storage.insert_learning_content(&content).await?;
        tracing::info!(user_id = %user_id, content_id = %content.id, "Added learning content");
        Ok(content)
    }

    /// Replace an entry's fields.
    ///
    /// # Errors
    ///
    /// Returns validation errors or [`ServiceError::NotFound`].
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        input: LearningInput,
    ) -> Result<LearningContent, ServiceError> {
        validate_input(&input)?;
        let mut content = self.get(id).await?;
        content.title = input.title.trim().to_string();
        content.category = input.category;
        content.body = input.body;
        content.source = input.source;
        content.difficulty = input.difficulty;
        content.tags = input.tags;
        content.updated_at = Utc::now();

        self.storage.update_learning_content(&content).await?;
        tracing::info!(user_id = %user_id, content_id = %id, "Updated learning content");
        Ok(content)
    }

    /// Remove an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when nothing was deleted.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_learning_content(id).await? {
            return Err(ServiceError::NotFound {
                resource: "learning content".to_string(),
                id: id.to_string(),
            });
        }
        tracing::info!(user_id = %user_id, content_id = %id, "Deleted learning content");
        Ok(())
    }
}

impl<S> std::fmt::Debug for LearningService<S>
where
    S: StorageTrait,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningService")
            .field("storage", &"<StorageTrait>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::traits::MockStorageTrait;
    use pretty_assertions::assert_eq;

    fn input(title: &str, body: &str) -> LearningInput {
        LearningInput {
            title: title.into(),
            category: ContentCategory::Dua,
            body: body.into(),
            source: Some("Hisn al-Muslim".into()),
            difficulty: SpiritualLevel::Beginner,
            tags: vec!["morning".into()],
        }
    }

    #[tokio::test]
    async fn test_list_builds_filter() {
        let mut storage = MockStorageTrait::new();
        storage
            .expect_list_learning_content()
            .withf(|f| {
                f.category == Some(ContentCategory::Hadith)
                    && f.search.as_deref() == Some("mercy")
                    && f.limit == DEFAULT_LIMIT
            })
            .returning(|_| Ok(Vec::new()));

        let result = LearningService::new(Arc::new(storage))
            .list(LearningQuery {
                category: Some(ContentCategory::Hadith),
                q: Some("  mercy ".into()),
                ..LearningQuery::default()
            })
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_list_blank_query_ignored() {
        let mut storage = MockStorageTrait::new();
        storage
            .expect_list_learning_content()
            .withf(|f| f.search.is_none())
            .returning(|_| Ok(Vec::new()));

        LearningService::new(Arc::new(storage))
            .list(LearningQuery {
                q: Some("   ".into()),
                ..LearningQuery::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_rejects_limit() {
        let service = LearningService::new(Arc::new(MockStorageTrait::new()));
        let err = service
            .list(LearningQuery {
                limit: Some(0),
                ..LearningQuery::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidValue { field, .. } if field == "limit"));
    }

    #[tokio::test]
    async fn test_create_validates_body() {
        let service = LearningService::new(Arc::new(MockStorageTrait::new()));
        let err = service.create("u-1", input("Title", " ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField { field } if field == "body"));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let mut storage = MockStorageTrait::new();
        let created = Utc::now() - chrono::Duration::days(3);
        storage.expect_get_learning_content().returning(move |id| {
            Ok(Some(LearningContent {
                id: id.to_string(),
                title: "Old".into(),
                category: ContentCategory::Fiqh,
                body: "Old body".into(),
                source: None,
                difficulty: SpiritualLevel::Advanced,
                tags: Vec::new(),
                created_at: created,
                updated_at: created,
            }))
        });
        storage
            .expect_update_learning_content()
            .times(1)
            .returning(|_| Ok(()));

        let updated = LearningService::new(Arc::new(storage))
            .update("u-1", "c-1", input("New", "New body"))
            .await
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.category, ContentCategory::Dua);
        assert_eq!(updated.created_at, created);
        assert!(updated.updated_at > created);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut storage = MockStorageTrait::new();
        storage
            .expect_delete_learning_content()
            .returning(|_| Ok(false));
        let err = LearningService::new(Arc::new(storage))
            .delete("u-1", "c-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
