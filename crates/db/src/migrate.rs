use bookshelf_kernel::Migration;
use sqlx::{Connection, Executor, PgConnection, PgPool};

use crate::error::DbError;

const LEDGER_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bookshelf_migrations (
    module     TEXT        NOT NULL,
    id         TEXT        NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (module, id)
);
"#;

/// Key of the session-level advisory lock that serializes migration runs
/// across processes.
const MIGRATION_LOCK_KEY: i64 = 0x626f_6f6b_7368_656c;

/// Apply every migration not yet recorded in `bookshelf_migrations`.
///
/// The whole run happens on one connection holding `pg_advisory_lock`, so
/// concurrent callers wait for each other instead of racing on the ledger.
/// Each migration runs in its own transaction together with its ledger
/// insert, so a failed migration leaves no partial record. Returns the number
/// of migrations applied by this call.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    let mut conn = pool.acquire().await.map_err(DbError::Lock)?;
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .map_err(DbError::Lock)?;

    let outcome = apply_pending(&mut *conn, migrations).await;

    let unlocked = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await;
    if let Err(err) = unlocked {
        tracing::warn!(target: "bookshelf-db", error = %err, "failed to release migration lock");
        // The lock lives as long as the session; keep it out of the pool.
        conn.close_on_drop();
    }

    outcome
}

async fn apply_pending(
    conn: &mut PgConnection,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    (&mut *conn)
        .execute(sqlx::raw_sql(LEDGER_DDL))
        .await
        .map_err(DbError::Ledger)?;

    let applied: Vec<(String, String)> =
        sqlx::query_as("SELECT module, id FROM bookshelf_migrations")
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::Ledger)?;

    let mut count = 0;
    for (module, migration) in pending(migrations, &applied) {
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| migration_failed(module, migration.id, e))?;
        (&mut *tx)
            .execute(sqlx::raw_sql(migration.up))
            .await
            .map_err(|e| migration_failed(module, migration.id, e))?;
        sqlx::query("INSERT INTO bookshelf_migrations (module, id) VALUES ($1, $2)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| migration_failed(module, migration.id, e))?;
        tx.commit()
            .await
            .map_err(|e| migration_failed(module, migration.id, e))?;

        tracing::info!(target: "bookshelf-db", %module, id = migration.id, "applied migration");
        count += 1;
    }

    Ok(count)
}

fn migration_failed(module: &str, id: &'static str, source: sqlx::Error) -> DbError {
    DbError::Migration {
        module: module.to_string(),
        id,
        source,
    }
}

fn pending<'a>(
    migrations: &'a [(String, Migration)],
    applied: &[(String, String)],
) -> Vec<&'a (String, Migration)> {
    migrations
        .iter()
        .filter(|(module, m)| {
            !applied
                .iter()
                .any(|(done_module, done_id)| done_module == module && done_id == m.id)
        })
        .collect()
}
