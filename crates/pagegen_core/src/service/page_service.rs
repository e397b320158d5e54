//! Landing page pipeline: prompt to published page, and slug to rendered page.
//!
//! # Responsibility
//! - Sequence generation strictly before allocation; nothing is persisted
//!   when generation fails.
//! - Map every failure to one stable [`ErrorKind`].
//! - Serve published pages by slug without revealing unpublished ones.

use crate::generator::client::CompletionClient;
use crate::generator::{GenerateError, Generator};
use crate::model::page::{Page, Principal};
use crate::render::{render, RenderContext, RenderedPage};
use crate::repo::page_repo::{PageRepository, RepoError};
use crate::service::slug_allocator::{AllocationError, RandomSuffix, SlugAllocator, SuffixSource};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Stable failure taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    GenerationTimeout,
    GenerationMalformed,
    GenerationIncomplete,
    GenerationUpstream,
    SlugDerivationFailed,
    SlugAllocationExhausted,
    StoreUnavailable,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::GenerationTimeout => "generation_timeout",
            Self::GenerationMalformed => "generation_malformed",
            Self::GenerationIncomplete => "generation_incomplete",
            Self::GenerationUpstream => "generation_upstream",
            Self::SlugDerivationFailed => "slug_derivation_failed",
            Self::SlugAllocationExhausted => "slug_allocation_exhausted",
            Self::StoreUnavailable => "store_unavailable",
        }
    }

    /// Whether resubmitting the whole request may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::GenerationTimeout
                | Self::GenerationMalformed
                | Self::GenerationIncomplete
                | Self::GenerationUpstream
                | Self::SlugAllocationExhausted
                | Self::StoreUnavailable
        )
    }

    /// Caused by the request itself rather than by the service.
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

#[derive(Debug)]
pub enum PageServiceError {
    Generate(GenerateError),
    Allocate(AllocationError),
    Store(RepoError),
}

impl PageServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Generate(err) => match err {
                GenerateError::InvalidInput(_) => ErrorKind::InvalidInput,
                GenerateError::Timeout(_) => ErrorKind::GenerationTimeout,
                GenerateError::Malformed(_) => ErrorKind::GenerationMalformed,
                GenerateError::Incomplete(_) => ErrorKind::GenerationIncomplete,
                GenerateError::Upstream(_) => ErrorKind::GenerationUpstream,
            },
            Self::Allocate(err) => match err {
                AllocationError::SlugDerivationFailed => ErrorKind::SlugDerivationFailed,
                AllocationError::Exhausted { .. } => ErrorKind::SlugAllocationExhausted,
                AllocationError::InvalidContent(_) => ErrorKind::GenerationIncomplete,
                AllocationError::Store(_) => ErrorKind::StoreUnavailable,
            },
            Self::Store(_) => ErrorKind::StoreUnavailable,
        }
    }
}

impl Display for PageServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generate(err) => write!(f, "{err}"),
            Self::Allocate(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "page store unavailable: {err}"),
        }
    }
}

impl Error for PageServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generate(err) => Some(err),
            Self::Allocate(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<GenerateError> for PageServiceError {
    fn from(value: GenerateError) -> Self {
        Self::Generate(value)
    }
}

impl From<AllocationError> for PageServiceError {
    fn from(value: AllocationError) -> Self {
        Self::Allocate(value)
    }
}

impl From<RepoError> for PageServiceError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Generation pipeline: generator followed by slug allocation.
pub struct PageService<C: CompletionClient, R: PageRepository, S: SuffixSource = RandomSuffix> {
    generator: Generator<C>,
    allocator: SlugAllocator<R, S>,
}

impl<C: CompletionClient, R: PageRepository, S: SuffixSource> PageService<C, R, S> {
    pub fn new(generator: Generator<C>, allocator: SlugAllocator<R, S>) -> Self {
        Self {
            generator,
            allocator,
        }
    }

    /// Turns `prompt` into a published page owned by `principal`.
    ///
    /// Either the full page with a unique slug is stored, or nothing is.
    pub fn create_page(
        &self,
        prompt: &str,
        principal: &Principal,
    ) -> Result<Page, PageServiceError> {
        let started_at = Instant::now();
        let result = self
            .generator
            .generate(prompt, principal)
            .map_err(PageServiceError::from)
            .and_then(|content| {
                self.allocator
                    .allocate_and_persist(content, &principal.id)
                    .map_err(PageServiceError::from)
            });

        match &result {
            Ok(page) => info!(
                "event=page_create module=service status=ok owner={} page_id={} slug={} duration_ms={}",
                principal.id,
                page.id,
                page.slug,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=page_create module=service status=error owner={} duration_ms={} error_code={}",
                principal.id,
                started_at.elapsed().as_millis(),
                err.kind().code()
            ),
        }
        result
    }

    /// Read side sharing this pipeline's repository.
    pub fn reader(&self) -> PageReader<&R> {
        PageReader::new(self.allocator.repo())
    }
}

/// Read side: published page lookup and rendering.
pub struct PageReader<R: PageRepository> {
    repo: R,
}

impl<R: PageRepository> PageReader<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Published page for `slug`; `None` covers both missing and unpublished.
    ///
    /// Slugs match exactly; a blank slug short-circuits to `None`.
    pub fn find_published(&self, slug: &str) -> Result<Option<Page>, PageServiceError> {
        if slug.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.repo.get_published_by_slug(slug)?)
    }

    /// Renders the published page for `slug`, if any.
    pub fn render_published(
        &self,
        slug: &str,
        ctx: &RenderContext,
    ) -> Result<Option<RenderedPage>, PageServiceError> {
        Ok(self
            .find_published(slug)?
            .map(|page| render(&page, ctx)))
    }
}
