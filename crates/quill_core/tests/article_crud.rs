use quill_core::{Article, ArticleFields, ArticleRepository, JsonFileArticleRepository, RepoError};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn fields(value: Value) -> ArticleFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

fn seeded_store(contents: Value) -> (TempDir, JsonFileArticleRepository) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(&path, serde_json::to_string_pretty(&contents).unwrap()).unwrap();
    (dir, JsonFileArticleRepository::new(path))
}

fn read_file(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn list_returns_persisted_articles_unmodified() {
    let (_dir, repo) = seeded_store(json!([
        {"id": "1", "title": "Article 1"},
        {"id": "2", "title": "Article 2"}
    ]));

    let articles = repo.list_articles().unwrap();
    assert_eq!(
        serde_json::to_value(&articles).unwrap(),
        json!([{"id": "1", "title": "Article 1"}, {"id": "2", "title": "Article 2"}])
    );
}

#[test]
fn repeated_lists_between_writes_are_identical() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "a", "extra": {"n": 1}}]));
    assert_eq!(repo.list_articles().unwrap(), repo.list_articles().unwrap());
}

#[test]
fn get_existing_and_missing() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));

    let found = repo.get_article("1").unwrap().unwrap();
    assert_eq!(found.title(), Some("Article 1"));
    assert!(repo.get_article("999").unwrap().is_none());
}

#[test]
fn get_returns_first_match_for_duplicate_ids() {
    let (_dir, repo) = seeded_store(json!([
        {"id": "dup", "title": "first"},
        {"id": "dup", "title": "second"}
    ]));
    assert_eq!(repo.get_article("dup").unwrap().unwrap().title(), Some("first"));
}

#[test]
fn create_appends_and_rewrites_pretty_printed_file() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));

    let created = repo
        .create_article(Article::with_id("2", fields(json!({"title": "New Article"}))))
        .unwrap();
    assert_eq!(created.id, "2");

    let text = std::fs::read_to_string(repo.path()).unwrap();
    assert!(text.starts_with("[\n  {\n    \"id\": \"1\""));
    assert_eq!(
        read_file(repo.path()),
        json!([{"id": "1", "title": "Article 1"}, {"id": "2", "title": "New Article"}])
    );
}

#[test]
fn create_accepts_duplicate_ids_without_conflict() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));
    repo.create_article(Article::with_id("1", fields(json!({"title": "again"}))))
        .unwrap();
    assert_eq!(repo.list_articles().unwrap().len(), 2);
}

#[test]
fn update_merges_named_fields_and_preserves_the_rest() {
    let (_dir, repo) = seeded_store(json!([
        {"id": "1", "title": "Article 1", "body": "text", "tags": ["x"]},
        {"id": "2", "title": "Article 2"}
    ]));

    let updated = repo
        .update_article("1", fields(json!({"title": "Updated", "views": 10})))
        .unwrap()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&updated).unwrap(),
        json!({"id": "1", "title": "Updated", "body": "text", "tags": ["x"], "views": 10})
    );
    assert_eq!(
        read_file(repo.path()),
        json!([
            {"id": "1", "title": "Updated", "body": "text", "tags": ["x"], "views": 10},
            {"id": "2", "title": "Article 2"}
        ])
    );
}

#[test]
fn update_missing_returns_none_and_does_not_write() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));
    let before = std::fs::read_to_string(repo.path()).unwrap();

    let result = repo
        .update_article("999", fields(json!({"title": "nope"})))
        .unwrap();
    assert!(result.is_none());
    assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), before);
}

#[test]
fn update_ignores_id_in_payload() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));
    let updated = repo
        .update_article("1", fields(json!({"id": "2", "title": "Updated Article"})))
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, "1");
    assert!(repo.get_article("2").unwrap().is_none());
}

#[test]
fn delete_removes_exactly_one_record_and_keeps_order() {
    let (_dir, repo) = seeded_store(json!([
        {"id": "1", "title": "a"},
        {"id": "2", "title": "b"},
        {"id": "3", "title": "c"}
    ]));

    let removed = repo.delete_article("2").unwrap().unwrap();
    assert_eq!(removed.title(), Some("b"));

    let ids: Vec<_> = repo
        .list_articles()
        .unwrap()
        .into_iter()
        .map(|article| article.id)
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn delete_missing_returns_none_and_does_not_write() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));
    let before = std::fs::read_to_string(repo.path()).unwrap();

    assert!(repo.delete_article("999").unwrap().is_none());
    assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), before);
}

#[test]
fn delete_last_record_leaves_empty_array() {
    let (_dir, repo) = seeded_store(json!([{"id": "1", "title": "Test Article 1"}]));
    repo.delete_article("1").unwrap().unwrap();
    assert!(repo.list_articles().unwrap().is_empty());
    assert_eq!(read_file(repo.path()), json!([]));
}

#[test]
fn missing_file_is_a_storage_fault() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileArticleRepository::new(dir.path().join("absent.json"));

    let err = repo.list_articles().unwrap_err();
    assert!(matches!(err, RepoError::Io { .. }));
    assert!(matches!(repo.get_article("1"), Err(RepoError::Io { .. })));
}

#[test]
fn malformed_json_is_a_storage_fault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(&path, "[{\"id\": \"1\",").unwrap();
    let repo = JsonFileArticleRepository::new(path);

    assert!(matches!(repo.list_articles(), Err(RepoError::Parse { .. })));
    assert!(matches!(
        repo.create_article(Article::with_id("2", ArticleFields::new())),
        Err(RepoError::Parse { .. })
    ));
}

#[test]
fn record_without_string_id_is_invalid_data() {
    let (_dir, repo) = seeded_store(json!([{"id": 1, "title": "numeric id"}]));
    assert!(matches!(repo.list_articles(), Err(RepoError::InvalidData(_))));
}

#[test]
fn open_bootstraps_missing_store_with_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("articles.json");

    let repo = JsonFileArticleRepository::open(&path).unwrap();
    assert!(repo.list_articles().unwrap().is_empty());
    assert_eq!(read_file(&path), json!([]));
}

#[test]
fn open_keeps_existing_store_untouched() {
    let (dir, _repo) = seeded_store(json!([{"id": "1", "title": "Article 1"}]));
    let path = dir.path().join("articles.json");

    let repo = JsonFileArticleRepository::open(&path).unwrap();
    assert_eq!(repo.list_articles().unwrap().len(), 1);
}

#[test]
fn concurrent_creates_do_not_lose_updates() {
    let (_dir, repo) = seeded_store(json!([]));
    let repo = Arc::new(repo);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                for i in 0..5 {
                    let id = format!("{n}-{i}");
                    repo.create_article(Article::with_id(id, ArticleFields::new()))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.list_articles().unwrap().len(), 40);
}
