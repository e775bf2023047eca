//! Section title candidates.
//!
//! Three strategies propose titles for a document:
//!
//! - **font size**: blocks set in a heading-sized font,
//! - **pattern**: short blocks shaped like headings,
//! - **isolation**: short lines standing alone in the page text.
//!
//! Every proposal is cleaned ([`extract_clean_title`]) before it is scored
//! against the persona. Font-size and pattern proposals must also pass
//! [`is_valid_section_title`]; an isolated line only needs to survive
//! cleaning with at least [`MIN_TITLE_CHARS`] characters.
//! Documents without heading-sized fonts fall back to the pattern strategy.

mod clean;
mod validate;

pub use clean::{extract_clean_title, TitleCleaner, MAX_CLEAN_PASSES, MIN_TITLE_CHARS};
pub use validate::{is_valid_section_title, TITLE_CHARS};

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::font_profile::FontProfile;
use super::persona::PersonaProfile;
use super::relevance::title_relevance;
use crate::model::{DetectionMethod, DocumentText, TextBlock, TitleCandidate};

/// Candidates kept when falling back to patterns only.
pub const DEFAULT_FALLBACK_LIMIT: usize = 8;

const FONT_SIZE_CONFIDENCE: f32 = 0.8;
const ISOLATION_CONFIDENCE: f32 = 0.6;
const HEADING_SIZE_BOOST: f32 = 0.1;

/// Block length bounds for the pattern strategy, in characters.
const PATTERN_BLOCK_CHARS: std::ops::RangeInclusive<usize> = 3..=80;
/// Line length bounds for the isolation strategy, in characters.
const ISOLATED_LINE_CHARS: std::ops::RangeInclusive<usize> = 3..=50;

/// Heading shapes, tried in order; the first capture is the title.
static TITLE_PATTERNS: LazyLock<Vec<(Regex, f32)>> = LazyLock::new(|| {
    [
        // Title-case phrase
        (r"(?i)^([A-Z][a-zA-Z\s\&\-]{2,40})(?:\s*:|\s*$)", 0.9),
        // All caps
        (r"(?i)^([A-Z\s\&\-]{3,30})(?:\s*:|\s*$)", 0.8),
        // Short phrase
        (r"(?i)^(\w+(?:\s+\w+){0,4})(?:\s*:|\s*$)", 0.7),
        // Multi-word
        (r"(?i)^([A-Za-z]+(?:\s+[A-Za-z]+){1,5})$", 0.6),
    ]
    .into_iter()
    .map(|(pattern, confidence)| {
        (
            Regex::new(pattern).expect("valid title pattern"),
            confidence,
        )
    })
    .collect()
});

/// Produces ranked, deduplicated title candidates for one document.
#[derive(Debug, Clone, Copy)]
pub struct TitleGenerator<'a> {
    persona: &'a PersonaProfile,
    fallback_limit: usize,
}

impl<'a> TitleGenerator<'a> {
    /// Create a generator scoring against `persona`.
    pub fn new(persona: &'a PersonaProfile) -> Self {
        Self {
            persona,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }

    /// Set how many candidates the pattern fallback keeps.
    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// Generate candidates for `document`.
    ///
    /// `profile` must have been built from `document.blocks()` so that its
    /// block indices line up.
    pub fn generate(&self, document: &DocumentText, profile: &FontProfile) -> Vec<TitleCandidate> {
        let blocks: Vec<&TextBlock> = document.blocks().collect();

        if !profile.has_heading_sizes() {
            return self.pattern_fallback(&blocks);
        }

        let mut candidates = Vec::new();
        self.by_font_size(&blocks, profile, &mut candidates);
        self.by_pattern(&blocks, Some(profile), DetectionMethod::Pattern, &mut candidates);
        self.by_isolation(document, &mut candidates);

        let mut unique = dedup(candidates);
        unique.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));

        log::debug!(
            "{}: {} title candidates ({} heading sizes)",
            document.name,
            unique.len(),
            profile.heading_sizes().count()
        );
        unique
    }

    fn candidate(
        &self,
        title: String,
        page: u32,
        confidence: f32,
        method: DetectionMethod,
        original_text: &str,
    ) -> TitleCandidate {
        let relevance = title_relevance(&title, self.persona);
        TitleCandidate::new(title, page, confidence, method, original_text, relevance)
    }

    fn by_font_size(
        &self,
        blocks: &[&TextBlock],
        profile: &FontProfile,
        out: &mut Vec<TitleCandidate>,
    ) {
        for size in profile.heading_sizes() {
            for block in profile
                .blocks_of_size(size)
                .iter()
                .filter_map(|&index| blocks.get(index))
            {
                if let Some(title) = clean_and_validate(&block.text) {
                    out.push(self.candidate(
                        title,
                        block.page,
                        FONT_SIZE_CONFIDENCE,
                        DetectionMethod::FontSize,
                        &block.text,
                    ));
                }
            }
        }
    }

    /// Pattern strategy. With a profile, heading-sized blocks get a
    /// confidence boost.
    fn by_pattern(
        &self,
        blocks: &[&TextBlock],
        profile: Option<&FontProfile>,
        method: DetectionMethod,
        out: &mut Vec<TitleCandidate>,
    ) {
        for block in blocks {
            let text = block.text.trim();
            if !PATTERN_BLOCK_CHARS.contains(&text.chars().count()) {
                continue;
            }

            for (pattern, base_confidence) in TITLE_PATTERNS.iter() {
                let Some(caps) = pattern.captures(text) else {
                    continue;
                };
                let Some(title) = clean_and_validate(&caps[1]) else {
                    continue;
                };

                let mut confidence = *base_confidence;
                if profile.is_some_and(|p| p.is_heading_size(block.max_size)) {
                    confidence += HEADING_SIZE_BOOST;
                }
                out.push(self.candidate(title, block.page, confidence, method, text));
                break;
            }
        }
    }

    fn by_isolation(&self, document: &DocumentText, out: &mut Vec<TitleCandidate>) {
        for page in &document.pages {
            let lines: Vec<&str> = page.text.split('\n').collect();
            for (index, line) in lines.iter().enumerate() {
                let line = line.trim();
                if !ISOLATED_LINE_CHARS.contains(&line.chars().count())
                    || !is_isolated_line(&lines, index)
                {
                    continue;
                }
                let title = extract_clean_title(line)
                    .filter(|title| title.chars().count() >= MIN_TITLE_CHARS);
                if let Some(title) = title {
                    out.push(self.candidate(
                        title,
                        page.number,
                        ISOLATION_CONFIDENCE,
                        DetectionMethod::Isolation,
                        line,
                    ));
                }
            }
        }
    }

    /// Pattern-only detection for documents without heading-sized fonts.
    fn pattern_fallback(&self, blocks: &[&TextBlock]) -> Vec<TitleCandidate> {
        let mut candidates = Vec::new();
        self.by_pattern(blocks, None, DetectionMethod::PatternFallback, &mut candidates);

        let mut unique = dedup(candidates);
        unique.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });
        unique.truncate(self.fallback_limit);
        unique
    }
}

fn clean_and_validate(text: &str) -> Option<String> {
    extract_clean_title(text).filter(|title| is_valid_section_title(title))
}

/// Keep the first candidate of every normalized title.
fn dedup(candidates: Vec<TitleCandidate>) -> Vec<TitleCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let key = c.dedup_key();
            key.chars().count() > 2 && seen.insert(key)
        })
        .collect()
}

/// A line is isolated when a blank line or the page edge sits next to it,
/// or when both neighbours are more than twice as long.
pub fn is_isolated_line(lines: &[&str], index: usize) -> bool {
    let len = lines[index].trim().chars().count();
    let neighbour = |i: Option<usize>| {
        i.and_then(|i| lines.get(i))
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
    };

    match (
        neighbour(index.checked_sub(1)),
        neighbour(index.checked_add(1)),
    ) {
        (None, _) | (_, None) => true,
        (Some(prev), Some(next)) => {
            prev.chars().count() > len * 2 && next.chars().count() > len * 2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::DomainLexicon;
    use crate::model::PageText;

    fn vegetarian() -> PersonaProfile {
        PersonaProfile::new("Vegetarian", "plan a weekly menu", &DomainLexicon::dietary())
    }

    fn page(number: u32, lines: &[(&str, f32)]) -> PageText {
        let blocks = lines
            .iter()
            .map(|&(text, size)| TextBlock::uniform(text, number, size))
            .collect();
        PageText::from_blocks(number, blocks)
    }

    const BODY: &str = "Rinse the beans and leave them to soak overnight in plenty of cold water.";

    #[test]
    fn test_isolated_lines() {
        let lines = vec!["", "Lentil Soup", "", "a much longer line of body text here", "Short", "another long line of body text"];
        assert!(is_isolated_line(&lines, 1));
        assert!(is_isolated_line(&lines, 4));
        assert!(!is_isolated_line(&["long enough neighbour", "Mid Line", "x"], 1));
        assert!(is_isolated_line(&["Only"], 0));
    }

    #[test]
    fn test_isolated_single_word_heading() {
        let persona = vegetarian();
        let blocks = vec![
            TextBlock::uniform("Lentil Soup", 1, 18.0),
            TextBlock::uniform(BODY, 1, 11.0),
            TextBlock::uniform(BODY, 1, 11.0),
        ];
        let text = format!("Lentil Soup\n\nPancakes\n\n{BODY}\n{BODY}");
        let doc = DocumentText::new("breakfast.pdf").with_page(PageText::new(1, text, blocks));
        let profile = FontProfile::from_blocks(doc.blocks());

        // "Pancakes" has no quality markers but stands alone on the page
        assert!(!is_valid_section_title("Pancakes"));
        let candidates = TitleGenerator::new(&persona).generate(&doc, &profile);
        let pancakes = candidates
            .iter()
            .find(|c| c.title == "Pancakes")
            .expect("isolated candidate");
        assert_eq!(pancakes.method, DetectionMethod::Isolation);
        assert_eq!(pancakes.page, 1);
        assert!(candidates
            .iter()
            .any(|c| c.title == "Lentil Soup" && c.method == DetectionMethod::FontSize));
    }

    #[test]
    fn test_font_size_candidates_are_ranked() {
        let persona = vegetarian();
        let doc = DocumentText::new("menu.pdf")
            .with_page(page(1, &[("Chicken Curry", 18.0), (BODY, 11.0), (BODY, 11.0)]))
            .with_page(page(2, &[("Lentil Soup", 11.0), (BODY, 11.0), (BODY, 11.0)]));
        let profile = FontProfile::from_blocks(doc.blocks());

        let candidates = TitleGenerator::new(&persona).generate(&doc, &profile);
        let chicken = candidates
            .iter()
            .find(|c| c.title == "Chicken Curry")
            .expect("heading-sized candidate");
        assert_eq!(chicken.method, DetectionMethod::FontSize);

        let lentil = candidates
            .iter()
            .find(|c| c.title == "Lentil Soup")
            .expect("pattern candidate");
        assert!(lentil.relevance > chicken.relevance);

        for pair in candidates.windows(2) {
            assert!(pair[0].combined_score >= pair[1].combined_score);
        }
    }

    #[test]
    fn test_candidates_are_unique() {
        let persona = vegetarian();
        let doc = DocumentText::new("dup.pdf")
            .with_page(page(1, &[("Lentil Soup", 16.0), (BODY, 11.0), (BODY, 11.0)]))
            .with_page(page(2, &[("LENTIL SOUP", 16.0), (BODY, 11.0), (BODY, 11.0)]));
        let profile = FontProfile::from_blocks(doc.blocks());

        let candidates = TitleGenerator::new(&persona).generate(&doc, &profile);
        let keys: Vec<String> = candidates.iter().map(|c| c.dedup_key()).collect();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
        // font-size pass runs first, so the first occurrence comes from page 1
        assert_eq!(candidates.iter().find(|c| c.dedup_key() == "lentil soup").map(|c| c.page), Some(1));
    }

    #[test]
    fn test_introduction_is_never_a_candidate() {
        let persona = vegetarian();
        let doc = DocumentText::new("intro.pdf").with_page(page(
            1,
            &[("INTRODUCTION", 20.0), (BODY, 11.0), (BODY, 11.0), ("Lentil Soup", 16.0)],
        ));
        let profile = FontProfile::from_blocks(doc.blocks());
        let candidates = TitleGenerator::new(&persona).generate(&doc, &profile);
        assert!(candidates.iter().all(|c| c.dedup_key() != "introduction"));
        assert!(candidates.iter().any(|c| c.title == "Lentil Soup"));
    }

    #[test]
    fn test_single_font_uses_pattern_fallback() {
        let persona = vegetarian();
        let headings = [
            "Lentil Soup",
            "Bean Salad",
            "Tofu Stir Fry",
            "Quinoa Bowl",
            "Chickpea Curry",
            "Vegetable Lasagna",
            "Mushroom Risotto",
            "Spinach Pie",
            "Pumpkin Soup",
            "Garden Salad",
        ];
        let mut lines: Vec<(&str, f32)> = Vec::new();
        for heading in headings {
            lines.push((heading, 12.0));
            lines.push((BODY, 12.0));
        }
        let doc = DocumentText::new("flat.pdf").with_page(page(1, &lines));
        let profile = FontProfile::from_blocks(doc.blocks());
        assert!(!profile.has_heading_sizes());

        let candidates = TitleGenerator::new(&persona).generate(&doc, &profile);
        assert_eq!(candidates.len(), DEFAULT_FALLBACK_LIMIT);
        assert!(candidates
            .iter()
            .all(|c| c.method == DetectionMethod::PatternFallback));
        for pair in candidates.windows(2) {
            assert!(
                pair[0].relevance > pair[1].relevance
                    || (pair[0].relevance == pair[1].relevance
                        && pair[0].confidence >= pair[1].confidence)
            );
        }
    }

    #[test]
    fn test_fallback_limit_is_configurable() {
        let persona = vegetarian();
        let doc = DocumentText::new("flat.pdf").with_page(page(
            1,
            &[("Lentil Soup", 12.0), (BODY, 12.0), ("Bean Salad", 12.0), (BODY, 12.0)],
        ));
        let profile = FontProfile::from_blocks(doc.blocks());
        let candidates = TitleGenerator::new(&persona)
            .with_fallback_limit(1)
            .generate(&doc, &profile);
        assert_eq!(candidates.len(), 1);
    }
}
