//! Request-level API over the page pipeline.
//!
//! # Responsibility
//! - Expose generation and published-page lookup as status + body responses.
//! - Keep HTTP-style semantics independent from any server framework.

mod api;

pub use api::{ApiResponse, PageApi, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON};
