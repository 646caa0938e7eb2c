//! Retrieval side of the chat pipeline.
//!
//! This module provides:
//! - `Source` / `PageRef`: the chunk shape returned to clients
//! - `VectorStore`: similarity search abstraction, with `SupabaseStore` as
//!   the hosted implementation
//! - `build_context`: formats retrieved chunks into a citation-indexed block

mod context_builder;
mod source;
mod store;
mod supabase;

pub use context_builder::build_context;
pub use source::{PageRef, Source};
pub use store::VectorStore;
pub use supabase::SupabaseStore;
