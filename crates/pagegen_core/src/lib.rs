//! Core of the landing page generator.
//! This crate is the single source of truth for content, slug and rendering
//! invariants.

pub mod config;
pub mod db;
pub mod generator;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, GeneratorConfig};
pub use generator::client::{ClientError, CompletionClient, CompletionRequest, OpenAiChatClient};
pub use generator::{GenerateError, GenerateResult, Generator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::content::{
    Benefits, CallToAction, ContentDocument, ContentValidationError, Feature, Hero, Style, Theme,
};
pub use model::icon::{Glyph, IconRef, IconSymbol};
pub use model::page::{Page, PageId, Principal};
pub use render::{render, RenderContext, RenderedPage, Section, SectionKind};
pub use repo::page_repo::{PageRepository, RepoError, RepoResult, SqlitePageRepository};
pub use service::page_service::{ErrorKind, PageReader, PageService, PageServiceError};
pub use service::slug_allocator::{
    derive_base_slug, slugify, AllocationError, RandomSuffix, SlugAllocator, SuffixSource,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
