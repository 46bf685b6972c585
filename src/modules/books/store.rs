//! The storage capability the service depends on.

use async_trait::async_trait;
use bookshelf_kernel::Ctx;

use super::models::Book;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("book {id} not found")]
    NotFound { id: i64 },

    /// The backend call failed. `source` is the driver error, a
    /// `DeadlineExceeded`, or whatever the implementation surfaced.
    #[error("{op}: {source}")]
    Persistence {
        op: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn persistence(op: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Persistence {
            op,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Borrow the underlying cause as a concrete type, if it is one.
    pub fn cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Persistence { source, .. } => source.downcast_ref::<E>(),
            Self::NotFound { .. } => None,
        }
    }
}

/// Persistence operations over the `books` table.
///
/// Every call honors `ctx`: once its deadline passes the call fails with a
/// `Persistence` error wrapping `DeadlineExceeded`.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert `book` and write the generated id back into it.
    async fn create_book(&self, ctx: &Ctx, book: &mut Book) -> Result<(), StoreError>;

    /// Remove the row with `id`. Deleting a missing row succeeds.
    async fn delete_book(&self, ctx: &Ctx, id: i64) -> Result<(), StoreError>;

    async fn get_book_by_id(&self, ctx: &Ctx, id: i64) -> Result<Book, StoreError>;

    /// All books in ascending id order. Empty table yields an empty vec.
    async fn get_books(&self, ctx: &Ctx) -> Result<Vec<Book>, StoreError>;
}
