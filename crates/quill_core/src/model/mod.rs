//! Article domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the repository and service.
//! - Keep the article an open record: only `id` has a fixed meaning.

pub mod article;
