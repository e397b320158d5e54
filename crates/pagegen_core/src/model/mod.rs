//! Domain model for generated landing pages.
//!
//! # Responsibility
//! - Define the typed content document every page is rendered from.
//! - Define the closed icon vocabulary and its total glyph lookup.
//! - Define the persisted page record.
//!
//! # Invariants
//! - A `ContentDocument` only exists after the explicit validation pass in
//!   `content::ContentDocument::from_value` (or `validate` for documents built
//!   in code); untyped generator output is never trusted directly.
//! - Page `id`, `owner_id`, `slug` and `content` never change after creation.

pub mod content;
pub mod icon;
pub mod page;
