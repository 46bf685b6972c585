//! Postgres-backed `BookStore`.

use async_trait::async_trait;
use bookshelf_kernel::Ctx;
use sqlx::{FromRow, PgPool};

use super::models::Book;
use super::store::{BookStore, StoreError};

/// Row shape of the columns the domain reads. `created_at` stays in the
/// database.
#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
        }
    }
}

/// Translates books to and from rows of the `books` table.
///
/// Holds a clone of the shared pool; whoever created the pool closes it.
#[derive(Debug, Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Run a query under `ctx`, folding both deadline and driver failures into
/// `StoreError::Persistence` tagged with `op`.
async fn guarded<T, F>(ctx: &Ctx, op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    ctx.run(fut)
        .await
        .map_err(|e| StoreError::persistence(op, e))?
        .map_err(|e| StoreError::persistence(op, e))
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create_book(&self, ctx: &Ctx, book: &mut Book) -> Result<(), StoreError> {
        const Q: &str = "INSERT INTO books (title, author) VALUES ($1, $2) RETURNING id";

        let id: i64 = guarded(
            ctx,
            "create book",
            sqlx::query_scalar::<_, i64>(Q)
                .bind(&book.title)
                .bind(&book.author)
                .fetch_one(&self.pool),
        )
        .await?;

        book.id = id;
        tracing::debug!(book_id = id, "inserted book row");
        Ok(())
    }

    async fn delete_book(&self, ctx: &Ctx, id: i64) -> Result<(), StoreError> {
        const Q: &str = "DELETE FROM books WHERE id = $1";

        let result = guarded(
            ctx,
            "delete book",
            sqlx::query(Q).bind(id).execute(&self.pool),
        )
        .await?;

        tracing::debug!(
            book_id = id,
            rows = result.rows_affected(),
            "deleted book row"
        );
        Ok(())
    }

    async fn get_book_by_id(&self, ctx: &Ctx, id: i64) -> Result<Book, StoreError> {
        const Q: &str = "SELECT id, title, author FROM books WHERE id = $1";

        let row: Option<BookRow> = guarded(
            ctx,
            "get book by id",
            sqlx::query_as::<_, BookRow>(Q).bind(id).fetch_optional(&self.pool),
        )
        .await?;

        row.map(Book::from).ok_or(StoreError::NotFound { id })
    }

    async fn get_books(&self, ctx: &Ctx) -> Result<Vec<Book>, StoreError> {
        const Q: &str = "SELECT id, title, author FROM books ORDER BY id ASC";

        // fetch_all drains and drops the cursor before returning, on every path.
        let rows: Vec<BookRow> = guarded(
            ctx,
            "get books",
            sqlx::query_as::<_, BookRow>(Q).fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }
}
