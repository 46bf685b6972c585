//! Shared plumbing for bookshelf: layered settings, the per-call execution
//! context, and the module lifecycle.

pub mod context;
pub mod module;
pub mod registry;
pub mod settings;

pub use context::{Ctx, DeadlineExceeded};
pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
