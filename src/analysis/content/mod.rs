//! Content excerpt extraction.
//!
//! Each page is split into chunks (structured blocks first, then heading
//! sections, paragraphs or sentence runs), scored against the persona,
//! cleaned and ranked.

pub mod chunk;
pub mod filter;

pub use chunk::{split_into_chunks, split_sentences, structured_blocks};
pub use filter::{clean_content_block, DEFAULT_MAX_CONTENT_CHARS};

use crate::analysis::persona::PersonaProfile;
use crate::analysis::relevance::content_relevance;
use crate::model::{ContentBlock, DocumentText, PageText};

/// Default number of excerpts kept per document.
pub const DEFAULT_CONTENT_LIMIT: usize = 5;

/// Chunks at or below this many characters are not scored.
const MIN_CHUNK_CHARS: usize = 100;
/// Chunks scoring at or below this are not cleaned.
const MIN_CHUNK_RELEVANCE: f32 = 0.1;
/// Cleaned excerpts at or below this many characters are dropped.
const MIN_EXCERPT_CHARS: usize = 50;

const MEASUREMENT_WORDS: &[&str] = &["cup", "tablespoon", "teaspoon", "oz", "gram"];
const PROCEDURAL_VERBS: &[&str] = &["cook", "bake", "mix", "blend", "add", "serve"];

/// Extracts ranked content excerpts from a document.
#[derive(Debug, Clone)]
pub struct ContentExtractor<'a> {
    persona: &'a PersonaProfile,
    max_chars: usize,
    limit: usize,
}

impl<'a> ContentExtractor<'a> {
    /// Create an extractor with the default length cap and limit.
    pub fn new(persona: &'a PersonaProfile) -> Self {
        Self {
            persona,
            max_chars: DEFAULT_MAX_CONTENT_CHARS,
            limit: DEFAULT_CONTENT_LIMIT,
        }
    }

    /// Set the maximum excerpt length in characters.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set how many excerpts are kept.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Extract, rank and cap the excerpts of `doc`.
    pub fn extract(&self, doc: &DocumentText) -> Vec<ContentBlock> {
        let mut blocks: Vec<ContentBlock> = doc
            .pages
            .iter()
            .flat_map(|page| self.extract_page(page))
            .collect();

        blocks.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| b.completeness_score.total_cmp(&a.completeness_score))
                .then_with(|| b.word_count.cmp(&a.word_count))
        });
        blocks.truncate(self.limit);

        log::debug!("{}: {} content blocks kept", doc.name, blocks.len());
        blocks
    }

    fn extract_page(&self, page: &PageText) -> Vec<ContentBlock> {
        let mut chunks = structured_blocks(&page.text);
        if chunks.is_empty() {
            chunks = split_into_chunks(&page.text);
        }

        chunks
            .iter()
            .map(|chunk| chunk.trim())
            .filter(|chunk| chunk.chars().count() > MIN_CHUNK_CHARS)
            .filter_map(|chunk| {
                let relevance = content_relevance(chunk, self.persona);
                if relevance <= MIN_CHUNK_RELEVANCE {
                    return None;
                }
                let clean = clean_content_block(chunk, self.persona, self.max_chars);
                if clean.chars().count() <= MIN_EXCERPT_CHARS {
                    return None;
                }
                let completeness = completeness_score(&clean);
                Some(ContentBlock::new(clean, page.number, relevance, completeness))
            })
            .collect()
    }
}

/// How complete an excerpt looks: markers, measurements, lists, length and
/// procedural verbs. Capped at 1.
pub fn completeness_score(text: &str) -> f32 {
    let lower = text.to_lowercase();
    let mut score = 0.0;

    if lower.contains("ingredients") {
        score += 0.3;
    }
    if lower.contains("instructions") {
        score += 0.3;
    }
    if MEASUREMENT_WORDS.iter().any(|w| lower.contains(w)) {
        score += 0.2;
    }
    if text.matches('•').count() >= 3 {
        score += 0.2;
    }
    if text.matches(':').count() >= 2 {
        score += 0.1;
    }

    let words = text.split_whitespace().count();
    if words > 100 {
        score += 0.2;
    } else if words > 50 {
        score += 0.1;
    }

    if PROCEDURAL_VERBS.iter().any(|v| lower.contains(v)) {
        score += 0.2;
    }

    f32::min(score, 1.0)
}
