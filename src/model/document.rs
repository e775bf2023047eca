//! Decoded document text: pages and their line blocks.

use serde::{Deserialize, Serialize};

use super::TextBlock;

/// A decoded page: its plain text and the line blocks it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,

    /// Plain text; lines separated by `\n`, paragraphs by a blank line
    pub text: String,

    /// Line blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl PageText {
    /// Create a page from pre-rendered text and blocks.
    pub fn new(number: u32, text: impl Into<String>, blocks: Vec<TextBlock>) -> Self {
        Self {
            number,
            text: text.into(),
            blocks,
        }
    }

    /// Create a page whose text is the block texts, one per line.
    pub fn from_blocks(number: u32, blocks: Vec<TextBlock>) -> Self {
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(number, text, blocks)
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.blocks.is_empty()
    }
}

/// A decoded document, ready for analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentText {
    /// File name of the source document
    pub name: String,

    /// Pages in order
    pub pages: Vec<PageText>,
}

impl DocumentText {
    /// Create an empty document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageText) {
        self.pages.push(page);
    }

    /// Builder-style variant of [`add_page`](Self::add_page).
    pub fn with_page(mut self, page: PageText) -> Self {
        self.add_page(page);
        self
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// All blocks of the document in page order.
    pub fn blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    /// Check if no page carries any text.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(PageText::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_blocks() {
        let page = PageText::from_blocks(
            2,
            vec![
                TextBlock::uniform("Lentil Soup", 2, 12.0),
                TextBlock::uniform("Simmer for twenty minutes.", 2, 12.0),
            ],
        );
        assert_eq!(page.text, "Lentil Soup\nSimmer for twenty minutes.");
        assert!(!page.is_empty());
    }

    #[test]
    fn test_document_blocks_in_page_order() {
        let doc = DocumentText::new("menu.pdf")
            .with_page(PageText::from_blocks(
                1,
                vec![TextBlock::uniform("First", 1, 12.0)],
            ))
            .with_page(PageText::from_blocks(
                2,
                vec![
                    TextBlock::uniform("Second", 2, 12.0),
                    TextBlock::uniform("Third", 2, 12.0),
                ],
            ));

        let texts: Vec<&str> = doc.blocks().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.block_count(), 3);
    }

    #[test]
    fn test_empty_document() {
        let doc = DocumentText::new("blank.pdf").with_page(PageText::new(1, "  \n", vec![]));
        assert!(doc.is_empty());
    }
}
