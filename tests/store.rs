//! Store-level tests: schema creation and the context/tag repository.

use husk::error::HuskError;
use husk::marker::{read_marker, MARKER_FILENAME};
use husk::models::{Scope, DEFAULT_CONTEXT};
use husk::repo;
use husk::schema::{self, InitMode};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

async fn fresh_store() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("husk.db");
    schema::initialize(&db, DEFAULT_CONTEXT, InitMode::Fresh)
        .await
        .unwrap();
    (tmp, db)
}

async fn tag_names(db: &Path, context: &str) -> Vec<String> {
    let mut names: Vec<String> = repo::list_tags(db, &Scope::Named(context.to_string()))
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.tag_name)
        .collect();
    names.sort();
    names
}

// ─── Schema ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fresh_store_has_seed_context() {
    let (_tmp, db) = fresh_store().await;

    let rows = repo::list_contexts(&db, &Scope::Named("HUSK".to_string()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "HUSK");
    assert_eq!(rows[0].path, None);
    assert!(!rows[0].created_at.is_empty());
}

#[tokio::test]
async fn test_custom_seed_context() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("husk.db");
    schema::initialize(&db, "inbox", InitMode::Fresh).await.unwrap();

    let all = repo::list_contexts(&db, &Scope::All).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "inbox");
}

#[tokio::test]
async fn test_fresh_init_refuses_existing_store() {
    let (_tmp, db) = fresh_store().await;

    let err = schema::initialize(&db, DEFAULT_CONTEXT, InitMode::Fresh)
        .await
        .unwrap_err();
    assert!(matches!(err, HuskError::AlreadyInitialized(_)));
}

#[tokio::test]
async fn test_forced_init_into_populated_store_fails_on_tables() {
    let (_tmp, db) = fresh_store().await;

    // Force skips the existence check but never wipes anything.
    let err = schema::initialize(&db, DEFAULT_CONTEXT, InitMode::Force)
        .await
        .unwrap_err();
    assert!(matches!(err, HuskError::Database(_)));

    let rows = repo::list_contexts(&db, &Scope::All).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_forced_init_after_removing_store() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "scratch", None).await.unwrap();

    std::fs::remove_file(&db).unwrap();
    schema::initialize(&db, DEFAULT_CONTEXT, InitMode::Force)
        .await
        .unwrap();

    let rows = repo::list_contexts(&db, &Scope::All).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "HUSK");
}

#[tokio::test]
async fn test_empty_seed_name_rejected() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("husk.db");
    let err = schema::initialize(&db, "", InitMode::Fresh).await.unwrap_err();
    assert!(matches!(err, HuskError::Validation { .. }));
}

#[tokio::test]
async fn test_operations_on_missing_store_are_unavailable() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("missing.db");

    let err = repo::list_contexts(&db, &Scope::All).await.unwrap_err();
    assert!(matches!(err, HuskError::StoreUnavailable { .. }));
    assert!(!db.exists(), "a read must not create the store");
}

// ─── Contexts ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_virtual_context() {
    let (_tmp, db) = fresh_store().await;

    let context = repo::create_context(&db, "reading", None).await.unwrap();
    assert_eq!(context.name, "reading");
    assert!(context.is_virtual());

    let found = repo::find_virtual_context(&db, "reading").await.unwrap();
    assert_eq!(found, Some(context));
}

#[tokio::test]
async fn test_create_bound_context_writes_marker() {
    let (tmp, db) = fresh_store().await;
    let dir = tmp.path().join("proj");
    std::fs::create_dir_all(&dir).unwrap();

    let context = repo::create_context(&db, "proj", Some(&dir)).await.unwrap();
    assert_eq!(context.path.as_deref(), Some(dir.display().to_string().as_str()));

    assert!(dir.join(MARKER_FILENAME).is_file());
    let marker = read_marker(&dir).unwrap();
    assert_eq!(marker.context_name, "proj");
    assert_eq!(marker.context_path, dir.display().to_string());

    // Bound contexts cannot be pinned.
    assert_eq!(repo::find_virtual_context(&db, "proj").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_context_name() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "dup", None).await.unwrap();

    for _ in 0..2 {
        let err = repo::create_context(&db, "dup", None).await.unwrap_err();
        assert!(matches!(err, HuskError::DuplicateKey(_)), "got {err:?}");
    }
}

#[tokio::test]
async fn test_duplicate_context_path() {
    let (tmp, db) = fresh_store().await;
    let dir = tmp.path().join("shared");
    std::fs::create_dir_all(&dir).unwrap();

    repo::create_context(&db, "first", Some(&dir)).await.unwrap();
    let err = repo::create_context(&db, "second", Some(&dir))
        .await
        .unwrap_err();
    match err {
        HuskError::DuplicateKey(what) => assert!(what.contains("path"), "got {what}"),
        other => panic!("expected DuplicateKey, got {other:?}"),
    }

    // The marker still names the first context.
    assert_eq!(read_marker(&dir).unwrap().context_name, "first");
    assert_eq!(repo::find_context(&db, "second").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_name_on_new_path_reports_name() {
    let (tmp, db) = fresh_store().await;
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");
    std::fs::create_dir_all(&first).unwrap();
    std::fs::create_dir_all(&second).unwrap();

    repo::create_context(&db, "proj", Some(&first)).await.unwrap();
    let err = repo::create_context(&db, "proj", Some(&second))
        .await
        .unwrap_err();
    match err {
        HuskError::DuplicateKey(what) => assert_eq!(what, "context 'proj'"),
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
    assert!(!second.join(MARKER_FILENAME).exists());
}

#[tokio::test]
async fn test_seed_name_is_taken() {
    let (_tmp, db) = fresh_store().await;
    let err = repo::create_context(&db, "HUSK", None).await.unwrap_err();
    assert!(matches!(err, HuskError::DuplicateKey(_)));
}

#[tokio::test]
async fn test_empty_context_name_rejected() {
    let (_tmp, db) = fresh_store().await;
    let err = repo::create_context(&db, "", None).await.unwrap_err();
    assert!(matches!(err, HuskError::Validation { .. }));
    assert_eq!(repo::list_contexts(&db, &Scope::All).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_marker_failure_leaves_row_behind() {
    let (tmp, db) = fresh_store().await;
    let missing = tmp.path().join("not-created");

    let err = repo::create_context(&db, "orphan", Some(&missing))
        .await
        .unwrap_err();
    assert!(matches!(err, HuskError::Io { .. }));

    // The row was committed before the marker write failed.
    let orphan = repo::find_context(&db, "orphan").await.unwrap().unwrap();
    assert_eq!(orphan.path, Some(missing.display().to_string()));
}

#[tokio::test]
async fn test_list_contexts_all() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "a", None).await.unwrap();
    repo::create_context(&db, "b", None).await.unwrap();

    let mut names: Vec<String> = repo::list_contexts(&db, &Scope::All)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["HUSK", "a", "b"]);
}

#[tokio::test]
async fn test_list_unknown_context_is_empty() {
    let (_tmp, db) = fresh_store().await;
    let rows = repo::list_contexts(&db, &Scope::Named("nope".to_string()))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

// ─── Tags ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_tags_is_idempotent() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "ctx", None).await.unwrap();

    let first = repo::add_tags(&db, "ctx", &["a", "b", "a"]).await.unwrap();
    assert_eq!(first, 2);
    let second = repo::add_tags(&db, "ctx", &["a", "c"]).await.unwrap();
    assert_eq!(second, 1);

    assert_eq!(tag_names(&db, "ctx").await, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_existing_tag_links_to_another_context() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "one", None).await.unwrap();
    repo::create_context(&db, "two", None).await.unwrap();

    repo::add_tags(&db, "one", &["shared"]).await.unwrap();
    let linked = repo::add_tags(&db, "two", &["shared"]).await.unwrap();
    assert_eq!(linked, 1);

    assert_eq!(tag_names(&db, "one").await, vec!["shared"]);
    assert_eq!(tag_names(&db, "two").await, vec!["shared"]);
}

#[tokio::test]
async fn test_add_tags_to_unknown_context_is_a_no_op() {
    let (_tmp, db) = fresh_store().await;

    let linked = repo::add_tags(&db, "nonexistent-context", &["x"])
        .await
        .unwrap();
    assert_eq!(linked, 0);

    assert!(repo::list_tags(&db, &Scope::All).await.unwrap().is_empty());
    // The tag itself was not created either: attaching it now is a new link
    // on a brand new tag, not a reuse.
    repo::create_context(&db, "later", None).await.unwrap();
    assert_eq!(repo::add_tags(&db, "later", &["x"]).await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_tag_rejected_before_writes() {
    let (_tmp, db) = fresh_store().await;

    let err = repo::add_tags(&db, "HUSK", &["ok", ""]).await.unwrap_err();
    assert!(matches!(err, HuskError::Validation { .. }));
    assert!(tag_names(&db, "HUSK").await.is_empty());
}

#[tokio::test]
async fn test_list_tags_all_covers_every_context() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "one", None).await.unwrap();
    repo::create_context(&db, "two", None).await.unwrap();
    repo::add_tags(&db, "one", &["red", "blue"]).await.unwrap();
    repo::add_tags(&db, "two", &["blue"]).await.unwrap();

    let rows = repo::list_tags(&db, &Scope::All).await.unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert!(!row.tag_name.is_empty());
        assert!(!row.context_name.is_empty());
        assert!(!row.created_at.is_empty());
    }

    let mut pairs: Vec<(String, String)> = rows
        .into_iter()
        .map(|row| (row.context_name, row.tag_name))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("one".to_string(), "blue".to_string()),
            ("one".to_string(), "red".to_string()),
            ("two".to_string(), "blue".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_list_tags_scoped_to_context() {
    let (_tmp, db) = fresh_store().await;
    repo::create_context(&db, "one", None).await.unwrap();
    repo::add_tags(&db, "one", &["red"]).await.unwrap();
    repo::add_tags(&db, "HUSK", &["global"]).await.unwrap();

    let rows = repo::list_tags(&db, &Scope::Named("one".to_string()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tag_name, "red");
    assert_eq!(rows[0].context_name, "one");
}
