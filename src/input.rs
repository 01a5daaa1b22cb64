//! Finding article files and turning them into blocks with tree-sitter.

use crate::document::{
    parse_image, plain_text, slug, split_heading_id, Article, Block, BlockKind,
};
use crate::formats::Format;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Expands the given paths into the files to read.
///
/// Files are taken as given; directories are walked recursively for files whose extension is in
/// `extensions`, in sorted order.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(&path, extensions, &mut documents)?;
        } else if path.is_file() {
            documents.push(path);
        } else {
            log::warn!("{} does not exist", path.display());
        }
    }
    Ok(documents)
}

fn collect_dir(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_dir(&path, extensions, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Reads and parses one article file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_article(path: &Path, format: &dyn Format) -> io::Result<Article> {
    let source = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map_or_else(|| "article".to_string(), |s| s.to_string_lossy().to_string());
    let blocks = extract_blocks(&source, format)?;
    Ok(Article::new(format!("article-{}", slug(&stem)), &stem, blocks))
}

/// Loads every readable article in `paths`, skipping the ones that fail.
///
/// Article ids come from file stems, so files sharing a stem in different directories get a
/// numeric suffix; ids are unique across the returned articles.
pub fn load_articles(paths: &[PathBuf], format: &dyn Format) -> Vec<Article> {
    let mut taken = HashSet::new();
    let mut articles = Vec::new();
    for path in paths {
        let mut article = match load_article(path, format) {
            Ok(article) => article,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
        };
        if !taken.insert(article.id.clone()) {
            let mut n = 2;
            let mut id = format!("{}-{n}", article.id);
            while taken.contains(&id) {
                n += 1;
                id = format!("{}-{n}", article.id);
            }
            log::debug!("{} renamed {} -> {id}", path.display(), article.id);
            taken.insert(id.clone());
            article.id = id;
        }
        articles.push(article);
    }
    articles
}

/// Extracts the top-level blocks of a document, in document order.
///
/// Blocks nested in an already captured block (a paragraph inside a quote) are part of it.
///
/// # Errors
///
/// Returns an error if the grammar or the query cannot be loaded, or parsing fails.
pub fn extract_blocks(source: &str, format: &dyn Format) -> io::Result<Vec<Block>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language).map_err(io::Error::other)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| io::Error::other("parser produced no tree"))?;
    let query = Query::new(&language, format.block_query())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let names = query.capture_names();

    let mut blocks = Vec::new();
    let mut covered_until = 0;
    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(&query, tree.root_node(), source.as_bytes());
    while let Some((found, index)) = captures.next() {
        let capture = found.captures[*index];
        let node = capture.node;
        if node.start_byte() < covered_until {
            continue;
        }
        covered_until = node.end_byte();
        let block = match names[capture.index as usize] {
            "heading" => heading_block(node, source),
            "quote" => Some(quote_block(node, source)),
            "specs" => Some(specs_block(node, source)),
            _ => paragraph_block(node, source),
        };
        blocks.extend(block);
    }
    Ok(blocks)
}

fn heading_block(node: Node, source: &str) -> Option<Block> {
    let mut level = 1;
    let mut raw = "";
    let mut walker = node.walk();
    for child in node.children(&mut walker) {
        let kind = child.kind();
        if let Some(digit) = kind
            .strip_prefix("atx_h")
            .and_then(|rest| rest.strip_suffix("_marker"))
        {
            level = digit.parse().unwrap_or(1);
        } else if kind == "inline" {
            raw = &source[child.byte_range()];
        }
    }
    let (title, id) = split_heading_id(raw);
    let title = plain_text(&title);
    if title.is_empty() {
        return None;
    }
    let mut block = Block::new(BlockKind::Heading(level), title);
    block.id = id;
    Some(block)
}

fn paragraph_block(node: Node, source: &str) -> Option<Block> {
    let raw = source[node.byte_range()].trim();
    if let Some((alt, src)) = parse_image(raw) {
        return Some(Block::new(BlockKind::Image { src }, alt));
    }
    let text = plain_text(raw);
    (!text.is_empty()).then(|| Block::new(BlockKind::Paragraph, text))
}

fn quote_block(node: Node, source: &str) -> Block {
    let text = source[node.byte_range()]
        .lines()
        .map(|line| line.trim_start().trim_start_matches('>').trim())
        .collect::<Vec<_>>()
        .join(" ");
    Block::new(BlockKind::Quote, plain_text(&text))
}

fn specs_block(node: Node, source: &str) -> Block {
    let rows = source[node.byte_range()]
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Block::new(BlockKind::Specs, rows)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
