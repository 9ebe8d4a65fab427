//! Core domain logic for Quill.
//! This crate owns the article model, its storage file and the service seam.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{new_article_id, Article, ArticleFields, ArticleId};
pub use repo::article_repo::{ArticleRepository, JsonFileArticleRepository, RepoError, RepoResult};
pub use service::article_service::ArticleService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
