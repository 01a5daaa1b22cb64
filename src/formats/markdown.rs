//! Markdown format implementation using tree-sitter-md.
//!
//! Blocks come from the block grammar: ATX headings (# syntax), paragraphs, block quotes and
//! pipe tables. Tables are how spec sheets are written in the articles.

use crate::formats::Format;

/// Tree-sitter queries for markdown article blocks.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn block_query(&self) -> &'static str {
        "(atx_heading) @heading
         (paragraph) @paragraph
         (block_quote) @quote
         (pipe_table) @specs"
    }
}
