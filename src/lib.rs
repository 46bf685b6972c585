//! Bookshelf application library.
//!
//! The `books` module layers a request/response service over a storage
//! capability trait, with a Postgres implementation of that trait.

pub mod modules;

pub use modules::*;
