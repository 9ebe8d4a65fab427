//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical article record persisted in the storage file.
//! - Provide shallow-merge semantics for partial updates.
//!
//! # Invariants
//! - `id` is a non-empty string once an article is stored.
//! - `fields` never holds an `id` key; identity lives only in `id`.
//! - Field order supplied by callers is preserved verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

const ID_KEY: &str = "id";

/// Stable identifier of an article.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ArticleId = String;

/// Open set of article fields (everything except `id`).
///
/// Used for inbound drafts and partial updates as well as the stored body.
pub type ArticleFields = Map<String, Value>;

/// Canonical article record.
///
/// Serialized flat, e.g. `{"id":"1","title":"Test Article 1"}`. Any field
/// beyond `id` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(flatten)]
    pub fields: ArticleFields,
}

impl Article {
    /// Creates an article with a caller-provided ID.
    ///
    /// Any `id` key present in `fields` is dropped in favour of `id`.
    pub fn with_id(id: impl Into<ArticleId>, mut fields: ArticleFields) -> Self {
        fields.remove(ID_KEY);
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the `title` field when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Returns a field by name. `"id"` resolves to the identifier.
    pub fn field(&self, key: &str) -> Option<Value> {
        if key == ID_KEY {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(key).cloned()
    }

    /// Shallow-merges `changes` over this article.
    ///
    /// Supplied keys overwrite existing ones (appended when new); keys not
    /// named in `changes` are retained. An `id` key in `changes` is ignored.
    pub fn merge(&mut self, changes: ArticleFields) {
        for (key, value) in changes {
            if key == ID_KEY {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Generates a fresh article ID (random UUID v4, hyphenated).
pub fn new_article_id() -> ArticleId {
    Uuid::new_v4().to_string()
}

/// Removes and returns the usable `id` from a draft.
///
/// Only a non-empty string counts as an ID. Missing, `null`, empty or
/// non-string values are removed and reported as absent.
pub fn take_draft_id(draft: &mut ArticleFields) -> Option<ArticleId> {
    match draft.remove(ID_KEY) {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}
