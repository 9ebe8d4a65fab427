//! Article repository contract and JSON-file implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the single article storage file.
//! - Keep file layout and serialization details inside the persistence
//!   boundary.
//!
//! # Invariants
//! - Every mutation is read whole file -> mutate in memory -> write whole file.
//! - Reads and read-modify-write cycles are serialized by a per-repository
//!   write gate; nothing coordinates across processes.
//! - Read paths reject invalid persisted records instead of masking them.
//! - Writes are pretty-printed with 2-space indentation.

use crate::model::article::{Article, ArticleFields};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage fault raised by article persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Storage file missing, unreadable or unwritable.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Storage file is not valid JSON, or a record could not be encoded.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Storage file parsed but does not hold an array of article records.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "article storage `{}` i/o failed: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "article storage `{}` is not valid JSON: {source}", path.display())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted article data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

/// Repository interface for article CRUD operations.
///
/// Absent targets are reported as `None`, never as errors.
pub trait ArticleRepository {
    fn list_articles(&self) -> RepoResult<Vec<Article>>;
    fn get_article(&self, id: &str) -> RepoResult<Option<Article>>;
    fn create_article(&self, article: Article) -> RepoResult<Article>;
    fn update_article(&self, id: &str, changes: ArticleFields) -> RepoResult<Option<Article>>;
    fn delete_article(&self, id: &str) -> RepoResult<Option<Article>>;
}

/// Article repository backed by one JSON array file.
#[derive(Debug)]
pub struct JsonFileArticleRepository {
    path: PathBuf,
    write_gate: Mutex<()>,
}

impl JsonFileArticleRepository {
    /// Binds a repository to `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    /// Binds a repository to `path`, creating an empty store when missing.
    ///
    /// # Side effects
    /// - Creates parent directories and writes `[]` if the file is absent.
    /// - Emits `storage_open` logging events with duration and status.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let started_at = Instant::now();
        let repo = Self::new(path);
        info!(
            "event=storage_open module=repo status=start path={}",
            repo.path.display()
        );

        match repo.bootstrap() {
            Ok(created) => {
                info!(
                    "event=storage_open module=repo status=ok created={} duration_ms={}",
                    created,
                    started_at.elapsed().as_millis()
                );
                Ok(repo)
            }
            Err(err) => {
                error!(
                    "event=storage_open module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Storage file this repository reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bootstrap(&self) -> RepoResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RepoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.write_all(&[])?;
        Ok(true)
    }

    /// Runs `op` while holding the write gate.
    ///
    /// The gate guards no data, so a poisoned lock is still usable.
    fn gated<T>(&self, op: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
        let _guard = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        op()
    }

    fn read_all(&self) -> RepoResult<Vec<Article>> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| RepoError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| RepoError::Parse {
                path: self.path.clone(),
                source,
            })?;
        parse_articles(value)
    }

    fn write_all(&self, articles: &[Article]) -> RepoResult<()> {
        let text = serde_json::to_string_pretty(articles).map_err(|source| RepoError::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text).map_err(|source| RepoError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ArticleRepository for JsonFileArticleRepository {
    fn list_articles(&self) -> RepoResult<Vec<Article>> {
        self.gated(|| self.read_all())
    }

    fn get_article(&self, id: &str) -> RepoResult<Option<Article>> {
        self.gated(|| {
            Ok(self
                .read_all()?
                .into_iter()
                .find(|article| article.id == id))
        })
    }

    fn create_article(&self, article: Article) -> RepoResult<Article> {
        let result = self.gated(|| {
            let mut articles = self.read_all()?;
            articles.push(article.clone());
            self.write_all(&articles)?;
            Ok(())
        });
        log_mutation("article_create", &article.id, result.as_ref().map(|_| true));
        result.map(|_| article)
    }

    fn update_article(&self, id: &str, changes: ArticleFields) -> RepoResult<Option<Article>> {
        let result = self.gated(|| {
            let mut articles = self.read_all()?;
            let Some(target) = articles.iter_mut().find(|article| article.id == id) else {
                return Ok(None);
            };
            target.merge(changes);
            let merged = target.clone();
            self.write_all(&articles)?;
            Ok(Some(merged))
        });
        log_mutation("article_update", id, result.as_ref().map(Option::is_some));
        result
    }

    fn delete_article(&self, id: &str) -> RepoResult<Option<Article>> {
        let result = self.gated(|| {
            let mut articles = self.read_all()?;
            let Some(index) = articles.iter().position(|article| article.id == id) else {
                return Ok(None);
            };
            let removed = articles.remove(index);
            self.write_all(&articles)?;
            Ok(Some(removed))
        });
        log_mutation("article_delete", id, result.as_ref().map(Option::is_some));
        result
    }
}

fn parse_articles(value: serde_json::Value) -> RepoResult<Vec<Article>> {
    let serde_json::Value::Array(items) = value else {
        return Err(RepoError::InvalidData(
            "storage root must be a JSON array".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Article>(item).map_err(|err| {
                RepoError::InvalidData(format!("record at index {index}: {err}"))
            })
        })
        .collect()
}

fn log_mutation(event: &str, id: &str, outcome: Result<bool, &RepoError>) {
    match outcome {
        Ok(true) => info!("event={event} module=repo status=ok id={id}"),
        Ok(false) => debug!("event={event} module=repo status=not_found id={id}"),
        Err(err) => error!("event={event} module=repo status=error id={id} error={err}"),
    }
}
