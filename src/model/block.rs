//! Line-level text blocks with font metadata.

use serde::{Deserialize, Serialize};

/// Body size assumed when a block carries no font information.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Axis-aligned box in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }
}

/// One logical line of a page, as produced by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Line text, spans joined with spaces
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Font size of every span in the line
    pub font_sizes: Vec<f32>,

    /// Mean of `font_sizes`
    pub avg_size: f32,

    /// Largest of `font_sizes`
    pub max_size: f32,

    /// Line extent on the page
    pub bbox: BoundingBox,
}

impl TextBlock {
    /// Create a block, deriving the average and maximum size from the spans.
    pub fn new(text: impl Into<String>, page: u32, font_sizes: Vec<f32>, bbox: BoundingBox) -> Self {
        let (avg_size, max_size) = if font_sizes.is_empty() {
            (DEFAULT_FONT_SIZE, DEFAULT_FONT_SIZE)
        } else {
            let sum: f32 = font_sizes.iter().sum();
            let max = font_sizes.iter().copied().fold(f32::MIN, f32::max);
            (sum / font_sizes.len() as f32, max)
        };

        Self {
            text: text.into(),
            page,
            font_sizes,
            avg_size,
            max_size,
            bbox,
        }
    }

    /// A single-span block at the given size with an empty bounding box.
    pub fn uniform(text: impl Into<String>, page: u32, size: f32) -> Self {
        Self::new(text, page, vec![size], BoundingBox::default())
    }

    /// Length of the trimmed text in characters.
    pub fn char_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes() {
        let block = TextBlock::new("Mixed", 1, vec![10.0, 14.0], BoundingBox::default());
        assert_eq!(block.avg_size, 12.0);
        assert_eq!(block.max_size, 14.0);
    }

    #[test]
    fn test_block_without_sizes_defaults() {
        let block = TextBlock::new("Bare", 1, vec![], BoundingBox::default());
        assert_eq!(block.avg_size, DEFAULT_FONT_SIZE);
        assert_eq!(block.max_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_char_len_counts_characters() {
        let block = TextBlock::uniform("  Crème brûlée ", 1, 12.0);
        assert_eq!(block.char_len(), 12);
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(10.0, 700.0, 110.0, 712.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 12.0);
    }
}
