//! Acceptance checks for cleaned section titles.

use std::sync::LazyLock;

use crate::analysis::rules::{is_all_caps, RuleSet};

/// Length bounds of an acceptable title, in characters.
pub const TITLE_CHARS: std::ops::RangeInclusive<usize> = 3..=80;

const EXCLUSIONS: &[(&str, &str)] = &[
    ("bare-measurement", r"(?i)^\d+\s*[a-z]+\s*$"),
    ("bullet", r"^\s*[•\-*]"),
    ("o-bullet", r"^\s*o\s+"),
    ("page-reference", r"(?i)page\s+\d+"),
    ("numbered-item", r"^\d+\.\s*"),
    ("multiple-sentences", r"\.\s+\S.*\.$"),
    (
        "leading-conjunction",
        r"(?i)^\s*(?:and|or|but|then|next|after|before)\s+",
    ),
    (
        "repeated-preposition",
        r"(?i)\b(?:until|for|in|on|with)\b.*\b(?:until|for|in|on|with)\b",
    ),
    ("leading-lowercase", r"^\s*[a-z]"),
    (
        "leading-preposition",
        r"(?i)^\s*(?:to|for|in|on|at|with|by|from)\s+",
    ),
    ("trailing-separator", r"[,;]\s*$"),
    ("structural-header", r"(?i)^(?:chapter|section|part|unit)\s+\d+$"),
    ("number-only", r"^\d+$"),
    ("roman-only", r"(?i)^[ivxlcdm]+$"),
    ("dangling-definition", r"(?i)^(?:a|an|the)\s+\w+\s+(?:is|are|was|were)\s*$"),
];

/// Technical, academic and structural vocabulary that marks a real heading.
const QUALITY_MARKERS: &[&str] = &[
    "algorithm",
    "analysis",
    "architecture",
    "classification",
    "extraction",
    "recognition",
    "processing",
    "learning",
    "intelligence",
    "neural",
    "network",
    "model",
    "system",
    "framework",
    "methodology",
    "semantic",
    "syntactic",
    "lexical",
    "parsing",
    "tokenization",
    "clustering",
    "regression",
    "optimization",
    "search",
    "knowledge",
    "reasoning",
    "inference",
    "representation",
    "introduction",
    "overview",
    "fundamentals",
    "principles",
    "applications",
    "implementation",
    "evaluation",
    "comparison",
    "survey",
    "review",
    "case study",
    "experimental",
    "supervised",
    "unsupervised",
    "reinforcement",
    "deep",
    "machine",
    "artificial",
    "natural",
    "computer",
    "vision",
    "speech",
    "text",
    "language",
    "data",
    "mining",
    "big data",
    "rule-based",
    "knowledge-based",
    "case-based",
    "tree-based",
    "model-based",
    "data-driven",
    "feature-based",
    "content-based",
    "context-aware",
    "real-time",
    "multi-agent",
    "multi-class",
    "multi-layer",
    "cross-validation",
    "decision-making",
];

const GENERIC_REJECTS: &[&str] = &[
    "example",
    "method",
    "approach",
    "technique",
    "solution",
    "problem",
    "issue",
    "concept",
    "idea",
    "theory",
    "practice",
];

static EXCLUSION_RULES: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::rejecting(EXCLUSIONS));

/// Whether a cleaned title is good enough to report.
pub fn is_valid_section_title(title: &str) -> bool {
    if !TITLE_CHARS.contains(&title.chars().count()) {
        return false;
    }

    if let Some(rule) = EXCLUSION_RULES.first_match(title) {
        log::trace!("Title {title:?} excluded by {rule}");
        return false;
    }

    if !has_quality_markers(title) {
        return false;
    }

    let lower = title.trim().to_lowercase();
    if GENERIC_REJECTS.contains(&lower.as_str()) {
        return false;
    }

    // A lone short word carries too little
    !(title.split_whitespace().count() == 1 && title.chars().count() < 6)
}

/// A title needs marker vocabulary, a capitalized multi-word shape, or
/// internal capitals.
fn has_quality_markers(title: &str) -> bool {
    let lower = title.to_lowercase();
    if QUALITY_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }

    let words: Vec<&str> = title.split_whitespace().collect();
    let starts_upper = |w: &str| w.chars().next().is_some_and(char::is_uppercase);
    let proper_phrase =
        words.len() >= 2 && starts_upper(title) && words[1..].iter().any(|&w| starts_upper(w));
    if proper_phrase {
        return true;
    }

    title.chars().count() >= 8
        && title.chars().skip(1).any(char::is_uppercase)
        && !is_all_caps(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_headings() {
        assert!(is_valid_section_title("Lentil Soup"));
        assert!(is_valid_section_title("Chicken Curry"));
        assert!(is_valid_section_title("Creating Fillable Forms"));
        assert!(is_valid_section_title("Machine learning"));
        assert!(is_valid_section_title("Overview"));
    }

    #[test]
    fn test_rejects_fragments() {
        assert!(!is_valid_section_title("ab"));
        assert!(!is_valid_section_title("2 cups"));
        assert!(!is_valid_section_title("• Lentil Soup"));
        assert!(!is_valid_section_title("See page 12"));
        assert!(!is_valid_section_title("3. Lentil Soup"));
        assert!(!is_valid_section_title("Simmer It. Then Serve It."));
        assert!(!is_valid_section_title("lentil soup"));
        assert!(!is_valid_section_title("With Fresh Herbs"));
        assert!(!is_valid_section_title("Stir In Rice Until Soft"));
        assert!(!is_valid_section_title("Lentil Soup,"));
        assert!(!is_valid_section_title("Chapter 3"));
        assert!(!is_valid_section_title("2024"));
        assert!(!is_valid_section_title("XIV"));
        assert!(!is_valid_section_title("The Method Is"));
    }

    #[test]
    fn test_requires_quality_markers() {
        // no marker vocabulary, capitalized second word or internal capital
        assert!(!is_valid_section_title("Pancakes"));
        assert!(!is_valid_section_title("Tasty recipes"));
        assert!(is_valid_section_title("JavaScript"));
    }

    #[test]
    fn test_title_starting_with_capital_o_is_not_a_bullet() {
        assert!(is_valid_section_title("Oven Roasted Vegetables"));
    }

    #[test]
    fn test_rejects_generic_and_short_words() {
        assert!(!is_valid_section_title("Solution"));
        assert!(!is_valid_section_title("Data"));
    }
}
