//! Context and tag operations against an initialized store.
//!
//! Each public function opens the store, does its work and closes the
//! connection again (see [`db::with_store`]). Nothing here prints or
//! prompts; results come back as rows from [`crate::models`].

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

use crate::db;
use crate::error::{ensure_valid_name, is_unique_violation, HuskError, HuskResult};
use crate::marker;
use crate::models::{Context, ContextRow, Scope, TagRow};

// `created_at` is declared DATETIME; cast so it decodes as plain text.
const SELECT_CONTEXT: &str = "SELECT context_id, context_name, \
     CAST(created_at AS TEXT) AS created_at, context_path FROM contexts";

fn context_from_row(row: &SqliteRow) -> Context {
    Context {
        id: row.get("context_id"),
        name: row.get("context_name"),
        created_at: row.get("created_at"),
        path: row.get("context_path"),
    }
}

/// Create a context, bound to `path` or virtual when `path` is `None`.
///
/// A bound context also gets a marker file in `path`. The row is committed
/// before the marker is written and the two are not atomic: if writing the
/// marker fails, the error is returned and the row stays behind without a
/// marker.
pub async fn create_context(
    db_path: &Path,
    name: &str,
    path: Option<&Path>,
) -> HuskResult<Context> {
    ensure_valid_name("context", name)?;
    let path_text = path.map(|p| p.display().to_string());

    let context = db::with_store(db_path, |pool| async move {
        let inserted = sqlx::query("INSERT INTO contexts (context_name, context_path) VALUES (?, ?)")
            .bind(name)
            .bind(&path_text)
            .execute(&pool)
            .await;
        let inserted = match inserted {
            Ok(inserted) => inserted,
            Err(e) if is_unique_violation(&e) => {
                return Err(duplicate_context(&pool, name, path_text.as_deref()).await);
            }
            Err(e) => return Err(e.into()),
        };

        let row = sqlx::query(&format!("{} WHERE context_id = ?", SELECT_CONTEXT))
            .bind(inserted.last_insert_rowid())
            .fetch_one(&pool)
            .await?;
        Ok(context_from_row(&row))
    })
    .await?;

    if let Some(dir) = path {
        marker::write_marker(dir, name)?;
    }

    info!(context = %context.name, path = ?context.path, "created context");
    Ok(context)
}

/// Report which unique column a rejected insert collided with, by looking
/// the name up again rather than parsing SQLite's error text.
async fn duplicate_context(pool: &SqlitePool, name: &str, path: Option<&str>) -> HuskError {
    match (lookup_context(pool, name).await, path) {
        (Err(e), _) => e,
        (Ok(None), Some(path)) => HuskError::DuplicateKey(format!("context path '{}'", path)),
        (Ok(_), _) => HuskError::DuplicateKey(format!("context '{}'", name)),
    }
}

pub async fn find_context(db_path: &Path, name: &str) -> HuskResult<Option<Context>> {
    db::with_store(db_path, |pool| async move { lookup_context(&pool, name).await }).await
}

/// The context named `name`, only if it is virtual.
pub async fn find_virtual_context(db_path: &Path, name: &str) -> HuskResult<Option<Context>> {
    Ok(find_context(db_path, name)
        .await?
        .filter(|context| context.is_virtual()))
}

async fn lookup_context(pool: &SqlitePool, name: &str) -> HuskResult<Option<Context>> {
    let row = sqlx::query(&format!("{} WHERE context_name = ?", SELECT_CONTEXT))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(context_from_row))
}

/// Attach `tags` to the context named `context_name`.
///
/// Tags are created on first use and shared between contexts. Adding a tag
/// that already exists, or that is already attached, is not an error:
/// both inserts ignore uniqueness conflicts, which is what makes repeated
/// calls idempotent. Each tag is written on its own, so a failure part way
/// through keeps the tags before it.
///
/// An unknown context is a silent no-op. Returns how many new
/// context/tag links were made.
pub async fn add_tags<S: AsRef<str>>(
    db_path: &Path,
    context_name: &str,
    tags: &[S],
) -> HuskResult<usize> {
    for tag in tags {
        ensure_valid_name("tag", tag.as_ref())?;
    }

    db::with_store(db_path, |pool| async move {
        let Some(context) = lookup_context(&pool, context_name).await? else {
            debug!(context = context_name, "no such context, skipping tags");
            return Ok(0);
        };

        let mut linked = 0;
        for tag in tags {
            let tag = tag.as_ref();
            let tag_id = ensure_tag(&pool, tag).await?;
            let result = sqlx::query(
                "INSERT INTO context_tags (context_id, tag_id) VALUES (?, ?) \
                 ON CONFLICT(context_id, tag_id) DO NOTHING",
            )
            .bind(context.id)
            .bind(tag_id)
            .execute(&pool)
            .await?;

            if result.rows_affected() > 0 {
                linked += 1;
            } else {
                debug!(context = context_name, tag, "tag already attached");
            }
        }
        Ok(linked)
    })
    .await
}

/// Insert-or-get: the id of tag `name`, creating it if needed.
async fn ensure_tag(pool: &SqlitePool, name: &str) -> HuskResult<i64> {
    sqlx::query("INSERT INTO tags (tag_name) VALUES (?) ON CONFLICT(tag_name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    let tag_id: i64 = sqlx::query_scalar("SELECT tag_id FROM tags WHERE tag_name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(tag_id)
}

/// Contexts in `scope`, in storage order.
pub async fn list_contexts(db_path: &Path, scope: &Scope) -> HuskResult<Vec<ContextRow>> {
    db::with_store(db_path, |pool| async move {
        let rows = match scope {
            Scope::All => sqlx::query(SELECT_CONTEXT).fetch_all(&pool).await?,
            Scope::Named(name) => {
                sqlx::query(&format!("{} WHERE context_name = ?", SELECT_CONTEXT))
                    .bind(name)
                    .fetch_all(&pool)
                    .await?
            }
        };

        Ok(rows
            .iter()
            .map(|row| ContextRow {
                name: row.get("context_name"),
                created_at: row.get("created_at"),
                path: row.get("context_path"),
            })
            .collect())
    })
    .await
}

/// Tag attachments in `scope`, in storage order.
pub async fn list_tags(db_path: &Path, scope: &Scope) -> HuskResult<Vec<TagRow>> {
    const SELECT_TAGS: &str = r#"
        SELECT tags.tag_name, contexts.context_name,
               CAST(context_tags.created_at AS TEXT) AS created_at
        FROM context_tags
        INNER JOIN tags ON context_tags.tag_id = tags.tag_id
        INNER JOIN contexts ON context_tags.context_id = contexts.context_id
    "#;

    db::with_store(db_path, |pool| async move {
        let rows = match scope {
            Scope::All => sqlx::query(SELECT_TAGS).fetch_all(&pool).await?,
            Scope::Named(name) => {
                sqlx::query(&format!("{} WHERE contexts.context_name = ?", SELECT_TAGS))
                    .bind(name)
                    .fetch_all(&pool)
                    .await?
            }
        };

        Ok(rows
            .iter()
            .map(|row| TagRow {
                tag_name: row.get("tag_name"),
                context_name: row.get("context_name"),
                created_at: row.get("created_at"),
            })
            .collect())
    })
    .await
}
