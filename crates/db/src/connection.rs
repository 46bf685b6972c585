use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::DbError;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The returned pool is owned by the caller. Stores hold clones of it and
/// never close it themselves.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    tracing::info!(
        target: "bookshelf-db",
        max_connections = settings.max_connections,
        "connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect(&settings.url)
        .await
        .map_err(DbError::Connection)
}

/// Connect to an explicit URL with the default pool limits. Used by test
/// fixtures that read `TEST_DATABASE_URL` themselves.
pub async fn connect_url(url: &str) -> Result<PgPool, DbError> {
    let settings = DatabaseSettings {
        url: url.to_string(),
        ..DatabaseSettings::default()
    };
    connect(&settings).await
}
