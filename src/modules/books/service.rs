use bookshelf_kernel::Ctx;

use super::models::{
    AddBookRequest, AddBookResponse, Book, DeleteBookRequest, DeleteBookResponse,
    GetBookRequest, GetBookResponse, GetBooksRequest, GetBooksResponse,
};
use super::store::{BookStore, StoreError};

const EVENT_TARGET: &str = "bookshelf::events";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation error: {field} is required")]
    Validation { field: &'static str },

    #[error("{op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    fn store(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { op, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store { source, .. } if source.is_not_found())
    }

    /// The store error this wraps, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store { source, .. } => Some(source),
            Self::Validation { .. } => None,
        }
    }
}

/// Request/response operations over a `BookStore`.
///
/// Reads never log events; each successful mutation emits exactly one on the
/// `bookshelf::events` target.
pub struct LibraryService<S: BookStore> {
    store: S,
}

impl<S: BookStore> LibraryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn add_book(
        &self,
        ctx: &Ctx,
        req: AddBookRequest,
    ) -> Result<AddBookResponse, ServiceError> {
        if req.title.is_empty() {
            return Err(ServiceError::Validation { field: "title" });
        }
        if req.author.is_empty() {
            return Err(ServiceError::Validation { field: "author" });
        }

        let mut book = Book::new(req.title, req.author);
        self.store
            .create_book(ctx, &mut book)
            .await
            .map_err(ServiceError::store("add book"))?;

        tracing::info!(
            target: EVENT_TARGET,
            event = "book.created",
            book_id = book.id,
            title = %book.title,
            author = %book.author,
            "book created"
        );
        Ok(AddBookResponse { book })
    }

    pub async fn get_book(
        &self,
        ctx: &Ctx,
        req: GetBookRequest,
    ) -> Result<GetBookResponse, ServiceError> {
        let book = self
            .store
            .get_book_by_id(ctx, req.id)
            .await
            .map_err(ServiceError::store("get book"))?;
        Ok(GetBookResponse { book })
    }

    pub async fn get_books(
        &self,
        ctx: &Ctx,
        _req: GetBooksRequest,
    ) -> Result<GetBooksResponse, ServiceError> {
        let books = self
            .store
            .get_books(ctx)
            .await
            .map_err(ServiceError::store("get books"))?;
        Ok(GetBooksResponse { books })
    }

    pub async fn delete_book(
        &self,
        ctx: &Ctx,
        req: DeleteBookRequest,
    ) -> Result<DeleteBookResponse, ServiceError> {
        self.store
            .delete_book(ctx, req.id)
            .await
            .map_err(ServiceError::store("delete book"))?;

        tracing::info!(
            target: EVENT_TARGET,
            event = "book.deleted",
            book_id = req.id,
            "book deleted"
        );
        Ok(DeleteBookResponse {})
    }
}
