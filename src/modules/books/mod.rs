pub mod models;
pub mod postgres;
pub mod service;
pub mod store;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use bookshelf_kernel::{InitCtx, Migration, Module};

pub use models::Book;
pub use postgres::PgBookStore;
pub use service::{LibraryService, ServiceError};
pub use store::{BookStore, StoreError};

/// Owns the `books` table and wires the Postgres store into the service.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            pool_size = ctx.db.size(),
            "books module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id         BIGSERIAL   PRIMARY KEY,
                    title      TEXT        NOT NULL CHECK (length(title) > 0),
                    author     TEXT        NOT NULL CHECK (length(author) > 0),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Build the service over a Postgres store sharing `pool`.
pub fn postgres_service(pool: sqlx::PgPool) -> LibraryService<PgBookStore> {
    LibraryService::new(PgBookStore::new(pool))
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
