//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over document formats by providing
//! the tree-sitter language and a query capturing the blocks an article is made of. Capture
//! names map onto [`crate::document::BlockKind`]: `heading`, `paragraph`, `quote` and `specs`.

pub mod markdown;

pub trait Format {
    fn language(&self) -> tree_sitter::Language;
    fn block_query(&self) -> &str;
}
