use crate::spec::block::Block;
use crate::spec::document::Document;

/// Consecutive blocks shown together between two page separators.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub index: usize,
    pub blocks: Vec<&'a Block>,
}

impl Page<'_> {
    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.id.as_str())
    }
}

/// Splits a document into pages at `new-page` and `page-break` blocks.
///
/// A separator always closes the current page, even an empty one. The blocks
/// after the last separator form a final page only when there are any, except
/// that a document always has at least one page.
pub fn split_pages(document: &Document) -> Vec<Page<'_>> {
    let mut pages: Vec<Vec<&Block>> = Vec::new();
    let mut current = Vec::new();

    for block in &document.blocks {
        if block.kind.is_page_separator() {
            pages.push(std::mem::take(&mut current));
            continue;
        }
        current.push(block);
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    pages
        .into_iter()
        .enumerate()
        .map(|(index, blocks)| Page { index, blocks })
        .collect()
}
