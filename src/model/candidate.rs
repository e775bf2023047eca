//! Scored title and content candidates.

use serde::{Deserialize, Serialize};

/// How a title candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Block set in a heading-sized font
    FontSize,
    /// Block shaped like a heading
    Pattern,
    /// Short line standing alone in the page text
    Isolation,
    /// Pattern match when the document has no heading-sized fonts
    PatternFallback,
}

impl DetectionMethod {
    /// Name used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::FontSize => "font_size",
            DetectionMethod::Pattern => "pattern",
            DetectionMethod::Isolation => "isolation",
            DetectionMethod::PatternFallback => "pattern_fallback",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned, scored section title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub title: String,
    pub page: u32,
    pub confidence: f32,
    pub method: DetectionMethod,
    pub original_text: String,
    pub relevance: f32,
    pub combined_score: f32,
}

impl TitleCandidate {
    /// Create a candidate; `combined_score` is `confidence + relevance`.
    pub fn new(
        title: impl Into<String>,
        page: u32,
        confidence: f32,
        method: DetectionMethod,
        original_text: impl Into<String>,
        relevance: f32,
    ) -> Self {
        Self {
            title: title.into(),
            page,
            confidence,
            method,
            original_text: original_text.into(),
            relevance,
            combined_score: confidence + relevance,
        }
    }

    /// Key used for deduplication.
    pub fn dedup_key(&self) -> String {
        normalized_title(&self.title)
    }
}

/// Case-insensitive, trimmed form of a title.
pub fn normalized_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// A cleaned content excerpt from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
    pub page: u32,
    pub relevance: f32,
    pub word_count: usize,
    pub completeness_score: f32,
}

impl ContentBlock {
    /// Create a block; the word count is taken from `text`.
    pub fn new(text: impl Into<String>, page: u32, relevance: f32, completeness_score: f32) -> Self {
        let text = text.into();
        let word_count = text.split_whitespace().count();
        Self {
            text,
            page,
            relevance,
            word_count,
            completeness_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_score() {
        let c = TitleCandidate::new(
            "Lentil Soup",
            3,
            0.9,
            DetectionMethod::Pattern,
            "Lentil Soup:",
            0.75,
        );
        assert!((c.combined_score - 1.65).abs() < 1e-6);
        assert_eq!(c.dedup_key(), "lentil soup");
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&DetectionMethod::PatternFallback).unwrap();
        assert_eq!(json, "\"pattern_fallback\"");
        assert_eq!(DetectionMethod::FontSize.to_string(), "font_size");
    }

    #[test]
    fn test_content_word_count() {
        let block = ContentBlock::new("Rinse the lentils well", 1, 0.5, 0.2);
        assert_eq!(block.word_count, 4);
    }
}
