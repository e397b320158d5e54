//! Page store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist page records as single-row, create-only inserts.
//! - Report slug uniqueness violations as a typed error the allocator can
//!   react to.
//!
//! # Invariants
//! - Inserts call `ContentDocument::validate()` before touching SQL.
//! - The `pages.slug` UNIQUE constraint is the only arbiter of slug ownership.

pub mod page_repo;
