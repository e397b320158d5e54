//! Use-case services for the landing page pipeline.
//!
//! # Responsibility
//! - Orchestrate generator, allocator and repository into request-level APIs.
//! - Keep API/CLI layers decoupled from storage and completion details.

pub mod page_service;
pub mod slug_allocator;
