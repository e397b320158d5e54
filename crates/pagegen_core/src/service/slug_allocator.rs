//! Slug derivation and collision-safe page insertion.
//!
//! # Responsibility
//! - Derive a URL-safe base slug from generated content.
//! - Insert the page, reacting to the store's uniqueness rejection with
//!   exactly one suffixed retry.
//!
//! # Invariants
//! - Slugs match `^[a-z0-9]+(-[a-z0-9]+)*$`.
//! - Uniqueness is decided by the store constraint; no allocator-side locks.
//! - At most two inserts per allocation; a second collision is surfaced.
//! - A slug is never rewritten after a successful insert.
//! - The stored content's slug always equals the page slug.

use crate::model::content::{ContentDocument, ContentValidationError};
use crate::model::page::Page;
use crate::repo::page_repo::{PageRepository, RepoError};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Retries allowed after the first insert collides.
pub const MAX_SLUG_RETRIES: u32 = 1;
/// Upper bound for a base slug, before any retry suffix.
pub const MAX_BASE_SLUG_CHARS: usize = 60;
const SUFFIX_CHARS: usize = 8;

static NON_SLUG_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

#[derive(Debug)]
pub enum AllocationError {
    /// Neither the slug hint nor the title contains any slug characters.
    SlugDerivationFailed,
    /// Both the base slug and the suffixed retry collided.
    Exhausted { base: String, attempts: u32 },
    /// The store rejected the document itself.
    InvalidContent(ContentValidationError),
    Store(RepoError),
}

impl Display for AllocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlugDerivationFailed => write!(
                f,
                "cannot derive a slug: title and slug hint contain no letters or digits"
            ),
            Self::Exhausted { base, attempts } => write!(
                f,
                "slug `{base}` still collides after {attempts} attempts; retry the request"
            ),
            Self::InvalidContent(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "page store unavailable: {err}"),
        }
    }
}

impl Error for AllocationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContent(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::SlugDerivationFailed | Self::Exhausted { .. } => None,
        }
    }
}

impl From<RepoError> for AllocationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidContent(err),
            other => Self::Store(other),
        }
    }
}

/// Produces the suffix appended to a colliding base slug.
pub trait SuffixSource {
    fn next_suffix(&self) -> String;
}

/// Eight lowercase hex characters from a fresh v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&self) -> String {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(SUFFIX_CHARS);
        suffix
    }
}

impl<F: Fn() -> String> SuffixSource for F {
    fn next_suffix(&self) -> String {
        self()
    }
}

/// Lowercases and collapses every run of non `[a-z0-9]` characters to `-`.
///
/// Result is trimmed of hyphens and capped at [`MAX_BASE_SLUG_CHARS`],
/// cutting at a hyphen when one is available.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let collapsed = NON_SLUG_RUN_RE.replace_all(&lowered, "-");
    let slug = collapsed.trim_matches('-');
    if slug.len() <= MAX_BASE_SLUG_CHARS {
        return slug.to_string();
    }

    // ASCII only at this point, so byte slicing is char-safe.
    let head = &slug[..MAX_BASE_SLUG_CHARS];
    match head.rfind('-') {
        Some(cut) if cut > 0 => head[..cut].to_string(),
        _ => head.trim_end_matches('-').to_string(),
    }
}

/// Base slug from the hint, falling back to the title.
pub fn derive_base_slug(content: &ContentDocument) -> Result<String, AllocationError> {
    [content.slug_hint.as_str(), content.title.as_str()]
        .into_iter()
        .map(slugify)
        .find(|slug| !slug.is_empty())
        .ok_or(AllocationError::SlugDerivationFailed)
}

/// Assigns a unique slug and persists the page in one step.
pub struct SlugAllocator<R: PageRepository, S: SuffixSource = RandomSuffix> {
    repo: R,
    suffix: S,
}

impl<R: PageRepository> SlugAllocator<R> {
    pub fn new(repo: R) -> Self {
        Self::with_suffix_source(repo, RandomSuffix)
    }
}

impl<R: PageRepository, S: SuffixSource> SlugAllocator<R, S> {
    pub fn with_suffix_source(repo: R, suffix: S) -> Self {
        Self { repo, suffix }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Persists `content` as a published page owned by `owner_id`.
    ///
    /// # Errors
    /// - `SlugDerivationFailed` before any insert when no slug can be derived.
    /// - `Exhausted` when the base slug and the single retry both collide.
    /// - `Store` for any other store failure; no retry is attempted.
    pub fn allocate_and_persist(
        &self,
        content: ContentDocument,
        owner_id: &str,
    ) -> Result<Page, AllocationError> {
        let base = derive_base_slug(&content)?;
        let mut page = Page::publish(
            owner_id,
            base.clone(),
            content,
            chrono::Utc::now().timestamp_millis(),
        );

        for attempt in 0..=MAX_SLUG_RETRIES {
            if attempt > 0 {
                page.slug = format!("{base}-{}", self.suffix.next_suffix());
            }
            page.content.slug_hint = page.slug.clone();

            match self.repo.insert_page(&page) {
                Ok(()) => {
                    info!(
                        "event=slug_allocate module=service status=ok page_id={} slug={} attempts={}",
                        page.id,
                        page.slug,
                        attempt + 1
                    );
                    return Ok(page);
                }
                Err(RepoError::SlugTaken(slug)) => {
                    warn!(
                        "event=slug_allocate module=service status=collision slug={} attempt={}",
                        slug,
                        attempt + 1
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AllocationError::Exhausted {
            base,
            attempts: MAX_SLUG_RETRIES + 1,
        })
    }
}
