//! Configurable in-memory `BookStore` for exercising the service without a
//! database.
//!
//! Each operation has an optional behavior closure. An operation invoked
//! without one fails with [`MockError::NotImplemented`]. Every invocation
//! that reaches a behavior is appended to a shared call log.

use std::sync::Mutex;

use async_trait::async_trait;
use bookshelf_kernel::Ctx;

use super::models::Book;
use super::store::{BookStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("mock not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Arguments of one recorded store invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CreateBook { title: String, author: String },
    DeleteBook { id: i64 },
    GetBookById { id: i64 },
    GetBooks,
}

type CreateFn = Box<dyn Fn(&mut Book) -> Result<(), StoreError> + Send + Sync>;
type DeleteFn = Box<dyn Fn(i64) -> Result<(), StoreError> + Send + Sync>;
type GetFn = Box<dyn Fn(i64) -> Result<Book, StoreError> + Send + Sync>;
type ListFn = Box<dyn Fn() -> Result<Vec<Book>, StoreError> + Send + Sync>;

#[derive(Default)]
pub struct MockBookStore {
    create_book_fn: Option<CreateFn>,
    delete_book_fn: Option<DeleteFn>,
    get_book_by_id_fn: Option<GetFn>,
    get_books_fn: Option<ListFn>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create_book(
        mut self,
        f: impl Fn(&mut Book) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.create_book_fn = Some(Box::new(f));
        self
    }

    pub fn on_delete_book(
        mut self,
        f: impl Fn(i64) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.delete_book_fn = Some(Box::new(f));
        self
    }

    pub fn on_get_book_by_id(
        mut self,
        f: impl Fn(i64) -> Result<Book, StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.get_book_by_id_fn = Some(Box::new(f));
        self
    }

    pub fn on_get_books(
        mut self,
        f: impl Fn() -> Result<Vec<Book>, StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.get_books_fn = Some(Box::new(f));
        self
    }

    /// Snapshot of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.log().clone()
    }

    /// `(title, author)` of each `create_book` call.
    pub fn create_book_calls(&self) -> Vec<(String, String)> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                StoreCall::CreateBook { title, author } => Some((title.clone(), author.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn delete_book_calls(&self) -> Vec<i64> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                StoreCall::DeleteBook { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn get_book_by_id_calls(&self) -> Vec<i64> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                StoreCall::GetBookById { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<StoreCall>> {
        // A panicking behavior closure must not hide the calls made so far.
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: StoreCall) {
        self.log().push(call);
    }
}

fn not_implemented(op: &'static str) -> StoreError {
    StoreError::persistence(op, MockError::NotImplemented(op))
}

#[async_trait]
impl BookStore for MockBookStore {
    async fn create_book(&self, _ctx: &Ctx, book: &mut Book) -> Result<(), StoreError> {
        let Some(f) = &self.create_book_fn else {
            return Err(not_implemented("create_book"));
        };
        self.record(StoreCall::CreateBook {
            title: book.title.clone(),
            author: book.author.clone(),
        });
        f(book)
    }

    async fn delete_book(&self, _ctx: &Ctx, id: i64) -> Result<(), StoreError> {
        let Some(f) = &self.delete_book_fn else {
            return Err(not_implemented("delete_book"));
        };
        self.record(StoreCall::DeleteBook { id });
        f(id)
    }

    async fn get_book_by_id(&self, _ctx: &Ctx, id: i64) -> Result<Book, StoreError> {
        let Some(f) = &self.get_book_by_id_fn else {
            return Err(not_implemented("get_book_by_id"));
        };
        self.record(StoreCall::GetBookById { id });
        f(id)
    }

    async fn get_books(&self, _ctx: &Ctx) -> Result<Vec<Book>, StoreError> {
        let Some(f) = &self.get_books_fn else {
            return Err(not_implemented("get_books"));
        };
        self.record(StoreCall::GetBooks);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_operations_are_not_recorded() {
        let store = MockBookStore::new();
        let ctx = Ctx::background();

        let err = store.get_books(&ctx).await.unwrap_err();
        assert_eq!(err.cause::<MockError>(), Some(&MockError::NotImplemented("get_books")));

        let err = store.delete_book(&ctx, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "delete_book: mock not implemented: delete_book");

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn per_operation_views_filter_the_log() {
        let store = MockBookStore::new()
            .on_get_book_by_id(|id| Err(StoreError::NotFound { id }))
            .on_delete_book(|_| Ok(()));
        let ctx = Ctx::background();

        let _ = store.get_book_by_id(&ctx, 3).await;
        store.delete_book(&ctx, 4).await.unwrap();
        let _ = store.get_book_by_id(&ctx, 5).await;

        assert_eq!(store.get_book_by_id_calls(), vec![3, 5]);
        assert_eq!(store.delete_book_calls(), vec![4]);
        assert!(store.create_book_calls().is_empty());
    }
}
