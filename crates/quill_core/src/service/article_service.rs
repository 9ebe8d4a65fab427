//! Article use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for HTTP and other callers.
//! - Assign identifiers to new articles that arrive without one.
//!
//! # Invariants
//! - Service APIs never bypass the repository contract.
//! - Repository results and errors are returned unchanged.
//! - Service layer remains storage-agnostic.

use crate::model::article::{new_article_id, take_draft_id, Article, ArticleFields};
use crate::repo::article_repo::{ArticleRepository, RepoResult};

/// Use-case service wrapper for article CRUD operations.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
}

impl<R: ArticleRepository> ArticleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists every stored article in storage order.
    pub fn list_articles(&self) -> RepoResult<Vec<Article>> {
        self.repo.list_articles()
    }

    /// Gets one article by ID; `None` when absent.
    pub fn get_article(&self, id: &str) -> RepoResult<Option<Article>> {
        self.repo.get_article(id)
    }

    /// Creates an article from an open draft.
    ///
    /// # Contract
    /// - A non-empty string `id` in the draft is kept as-is, duplicates
    ///   included.
    /// - Otherwise a fresh UUID v4 string is assigned.
    /// - Returns the stored record.
    pub fn create_article(&self, mut draft: ArticleFields) -> RepoResult<Article> {
        let id = take_draft_id(&mut draft).unwrap_or_else(new_article_id);
        self.repo.create_article(Article::with_id(id, draft))
    }

    /// Shallow-merges `changes` into an existing article.
    pub fn update_article(&self, id: &str, changes: ArticleFields) -> RepoResult<Option<Article>> {
        self.repo.update_article(id, changes)
    }

    /// Deletes an article, returning the removed record when it existed.
    pub fn delete_article(&self, id: &str) -> RepoResult<Option<Article>> {
        self.repo.delete_article(id)
    }
}
