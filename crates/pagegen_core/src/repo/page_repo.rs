//! Page repository contract and SQLite implementation.
//!
//! # Invariants
//! - A page row is either fully written by one INSERT or absent.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Unpublished rows are invisible to slug lookups.

use crate::db::DbError;
use crate::model::content::{ContentDocument, ContentValidationError};
use crate::model::page::{Page, PageId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PAGE_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    slug,
    title,
    description,
    content,
    published,
    created_at
FROM pages";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for page persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContentValidationError),
    Db(DbError),
    /// Another page already owns this slug.
    SlugTaken(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::SlugTaken(slug) => write!(f, "slug already taken: {slug}"),
            Self::InvalidData(message) => write!(f, "invalid persisted page data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::SlugTaken(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ContentValidationError> for RepoError {
    fn from(value: ContentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Page store operations used by the generation pipeline.
pub trait PageRepository {
    /// Inserts a new page. Fails with `SlugTaken` when the slug is in use.
    fn insert_page(&self, page: &Page) -> RepoResult<()>;
    /// Point lookup by id, regardless of publish state.
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>>;
    /// Point lookup by slug; only published pages are returned.
    fn get_published_by_slug(&self, slug: &str) -> RepoResult<Option<Page>>;
}

impl<R: PageRepository + ?Sized> PageRepository for &R {
    fn insert_page(&self, page: &Page) -> RepoResult<()> {
        (**self).insert_page(page)
    }

    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        (**self).get_page(id)
    }

    fn get_published_by_slug(&self, slug: &str) -> RepoResult<Option<Page>> {
        (**self).get_published_by_slug(slug)
    }
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn insert_page(&self, page: &Page) -> RepoResult<()> {
        page.content.validate()?;
        let content = serde_json::to_string(&page.content)
            .map_err(|err| RepoError::InvalidData(format!("content not serializable: {err}")))?;

        let inserted = self.conn.execute(
            "INSERT INTO pages (
                id,
                owner_id,
                slug,
                title,
                description,
                content,
                published,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                page.id.to_string(),
                page.owner_id.as_str(),
                page.slug.as_str(),
                page.title.as_str(),
                page.description.as_str(),
                content,
                bool_to_int(page.published),
                page.created_at,
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if is_slug_unique_violation(&err) => {
                Err(RepoError::SlugTaken(page.slug.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        self.query_one(
            &format!("{PAGE_SELECT_SQL} WHERE id = ?1;"),
            id.to_string().as_str(),
        )
    }

    fn get_published_by_slug(&self, slug: &str) -> RepoResult<Option<Page>> {
        self.query_one(
            &format!("{PAGE_SELECT_SQL} WHERE slug = ?1 AND published = 1;"),
            slug,
        )
    }
}

impl SqlitePageRepository<'_> {
    fn query_one(&self, sql: &str, key: &str) -> RepoResult<Option<Page>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt
            .query_row([key], |row| RawPageRow::from_row(row))
            .optional()?;
        raw.map(RawPageRow::into_page).transpose()
    }
}

/// Column values read inside the rusqlite row callback, decoded afterwards so
/// decode failures surface as `InvalidData` rather than SQLite errors.
struct RawPageRow {
    id: String,
    owner_id: String,
    slug: String,
    title: String,
    description: String,
    content: String,
    published: i64,
    created_at: i64,
}

impl RawPageRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            slug: row.get("slug")?,
            title: row.get("title")?,
            description: row.get("description")?,
            content: row.get("content")?,
            published: row.get("published")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_page(self) -> RepoResult<Page> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{}` in pages.id", self.id))
        })?;

        let published = match self.published {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid published value `{other}` in pages.published"
                )));
            }
        };

        let tree: serde_json::Value = serde_json::from_str(&self.content).map_err(|err| {
            RepoError::InvalidData(format!("pages.content for `{}` is not JSON: {err}", self.slug))
        })?;
        let content = ContentDocument::from_value(&tree).map_err(|err| {
            RepoError::InvalidData(format!("pages.content for `{}`: {err}", self.slug))
        })?;

        Ok(Page {
            id,
            owner_id: self.owner_id,
            slug: self.slug,
            title: self.title,
            description: self.description,
            content,
            published,
            created_at: self.created_at,
        })
    }
}

fn is_slug_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message
                    .as_deref()
                    .is_some_and(|text| text.contains("pages.slug"))
        }
        _ => false,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
