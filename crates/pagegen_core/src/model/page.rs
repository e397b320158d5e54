//! Persisted page record.
//!
//! # Invariants
//! - `id`, `owner_id`, `slug`, `content` and `created_at` are set once.
//! - `title` and `description` are denormalized copies of the content fields.

use crate::model::content::ContentDocument;
use uuid::Uuid;

/// Opaque page identifier assigned at creation.
pub type PageId = Uuid;

/// Authenticated requester, supplied by the surrounding auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub id: String,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One published landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub owner_id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: ContentDocument,
    pub published: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Page {
    /// Builds a published page for `content` under `slug` with a fresh id.
    pub fn publish(
        owner_id: impl Into<String>,
        slug: impl Into<String>,
        content: ContentDocument,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            slug: slug.into(),
            title: content.title.clone(),
            description: content.description.clone(),
            content,
            published: true,
            created_at,
        }
    }
}
