//! SQLite store connections.
//!
//! Every repository operation opens its own single-connection pool and
//! closes it before returning, on success and on error alike. Only one
//! husk process is expected to touch a store at a time, so there is no
//! pooling across operations.
//!
//! Foreign keys are enforced on every connection (sqlx's default for
//! SQLite).

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::path::Path;

use crate::error::{HuskError, HuskResult};

/// Open the store at `db_path`.
///
/// With `create` the file is created if missing; otherwise a missing file
/// is [`HuskError::StoreUnavailable`].
pub async fn connect(db_path: &Path, create: bool) -> HuskResult<SqlitePool> {
    let unavailable = |reason: String| HuskError::StoreUnavailable {
        path: db_path.to_path_buf(),
        reason,
    };

    if !create && !db_path.is_file() {
        return Err(unavailable(
            "no store found (run `husk init` first)".to_string(),
        ));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Delete);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| unavailable(e.to_string()))
}

/// Run `op` against a fresh connection to the store, closing it afterwards
/// whatever `op` returned.
pub async fn with_store<T, F, Fut>(db_path: &Path, op: F) -> HuskResult<T>
where
    F: FnOnce(SqlitePool) -> Fut,
    Fut: Future<Output = HuskResult<T>>,
{
    let pool = connect(db_path, false).await?;
    let result = op(pool.clone()).await;
    pool.close().await;
    result
}
