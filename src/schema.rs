//! Store schema creation.
//!
//! A husk store holds three tables:
//!
//! | Table | Purpose |
//! |-------|---------|
//! | `contexts` | Named workspaces, optionally bound to a directory |
//! | `tags` | Global, uniquely named labels |
//! | `context_tags` | Which tags are attached to which contexts |
//!
//! The column names and constraints below are the on-disk format. There
//! are no migrations: a store is created once and its schema never changes.

use std::path::Path;
use tracing::info;

use crate::db;
use crate::error::{HuskError, HuskResult};

const CREATE_CONTEXTS: &str = r#"
    CREATE TABLE contexts (
        context_id INTEGER PRIMARY KEY AUTOINCREMENT,
        context_name TEXT NOT NULL UNIQUE,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        context_path TEXT UNIQUE
    )
"#;

const CREATE_TAGS: &str = r#"
    CREATE TABLE tags (
        tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
        tag_name TEXT NOT NULL UNIQUE,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_CONTEXT_TAGS: &str = r#"
    CREATE TABLE context_tags (
        context_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (context_id) REFERENCES contexts (context_id),
        FOREIGN KEY (tag_id) REFERENCES tags (tag_id),
        UNIQUE(context_id, tag_id)
    )
"#;

/// How [`initialize`] treats an existing store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// Refuse if a file already exists at the store location.
    Fresh,
    /// Proceed into the location regardless. Nothing is deleted here;
    /// callers wanting a clean store remove the old file first.
    Force,
}

/// Create the schema at `db_path` and seed `default_context` as a virtual
/// context. Runs in one transaction: either the whole schema and seed row
/// land, or nothing does.
pub async fn initialize(db_path: &Path, default_context: &str, mode: InitMode) -> HuskResult<()> {
    if mode == InitMode::Fresh && db_path.exists() {
        return Err(HuskError::AlreadyInitialized(db_path.to_path_buf()));
    }
    crate::error::ensure_valid_name("context", default_context)?;

    let pool = db::connect(db_path, true).await?;
    let result = create_schema(&pool, default_context).await;
    pool.close().await;
    result?;

    info!(db = %db_path.display(), default_context, "initialized store");
    Ok(())
}

async fn create_schema(pool: &sqlx::SqlitePool, default_context: &str) -> HuskResult<()> {
    let mut tx = pool.begin().await?;

    for statement in [CREATE_CONTEXTS, CREATE_TAGS, CREATE_CONTEXT_TAGS] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    sqlx::query("INSERT INTO contexts (context_name, context_path) VALUES (?, NULL)")
        .bind(default_context)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

