//! Title cleanup and refinement.
//!
//! Each step of the cascade is a rule table. One pass strips numbering and
//! noise, refines incomplete phrases, rewrites generic headings and rejects
//! fragments. [`TitleCleaner::clean`] repeats the pass until the text stops
//! changing, so cleaning an already clean title is a no-op.

use std::sync::LazyLock;

use crate::analysis::rules::{is_all_caps, title_case, Action, RuleSet};

/// Passes allowed before a title is considered unstable.
pub const MAX_CLEAN_PASSES: usize = 4;

/// Shortest title kept after cleanup.
pub const MIN_TITLE_CHARS: usize = 3;

static CLEANER: LazyLock<TitleCleaner> = LazyLock::new(TitleCleaner::new);

/// Clean a raw heading with the shared cleaner.
pub fn extract_clean_title(text: &str) -> Option<String> {
    CLEANER.clean(text)
}

const STRIP_RULES: &[(&str, &str, Action)] = &[
    ("leading-bullets", r"^(?:[\d.\s\-•*]+|o\s+)+", Action::Replace("")),
    ("roman-numeral", r"^[IVXLCDMivxlcdm]+\.\s*", Action::Replace("")),
    ("letter-prefix", r"^[A-Z]\.\s*", Action::Replace("")),
    (
        "structural-prefix",
        r"(?i)^(?:chapter|section|unit|part)\s+\d+[.\-\s]*",
        Action::Replace(""),
    ),
    ("trailing-punctuation", r"[\s.:]+$", Action::Replace("")),
    (
        "leading-conjunction",
        r"(?i)^(?:and|or|but|then|next|after|before)\s+",
        Action::Replace(""),
    ),
    (
        "leading-preposition",
        r"(?i)^(?:to|for|in|on|at|with|by|from)\s+",
        Action::Replace(""),
    ),
    ("whitespace", r"\s+", Action::Replace(" ")),
    (
        "bullet-glyphs",
        "[\u{2022}\u{2023}\u{25E6}\u{2043}\u{2219}]",
        Action::Replace(""),
    ),
    (
        "quantities",
        r"(?i)\b\d+\s*(?:cup|tablespoon|teaspoon|ml|kg|g|oz|lb)\b",
        Action::Replace(""),
    ),
    ("whitespace-again", r"\s+", Action::Replace(" ")),
    ("trim", r"^\s+|\s+$", Action::Replace("")),
];

const INCOMPLETE_SHAPES: &[(&str, &str)] = &[
    (
        "bare-quantifier",
        r"(?i)^(?:one|two|three|four|five|six|seven|eight|nine|ten)\s+(?:possible|main|key|important)\s*$",
    ),
    (
        "bare-superlative",
        r"(?i)^(?:the|a|an)\s+(?:most|main|key|important)\s*$",
    ),
    ("bare-verb", r"(?i)^(?:is|are|was|were)\s*$"),
    (
        "bare-generic",
        r"(?i)^(?:example|solution|method|approach|technique)\s*$",
    ),
    (
        "demonstrative-verb",
        r"(?i)^(?:this|that|these|those)\s+(?:is|are|was|were)\s*$",
    ),
    ("dangling-verb", r"(?i)^\w+\s+(?:is|are|was|were)\s*$"),
];

const REFINEMENTS: &[(&str, &str, Action)] = &[
    ("example", r"(?i)example", Action::Rewrite("Example Application")),
    (
        "possible-solution",
        r"(?i)one possible solution is",
        Action::Rewrite("Solution Approach"),
    ),
    (
        "most-important",
        r"(?i)the most important",
        Action::Rewrite("Key Concepts"),
    ),
    (
        "main-approach",
        r"(?i)main approach",
        Action::Rewrite("Primary Methodology"),
    ),
    (
        "key-technique",
        r"(?i)key technique",
        Action::Rewrite("Core Technique"),
    ),
    ("this-is", r"(?i)this is", Action::Rewrite("Implementation Method")),
    ("method-is", r"(?i)method is", Action::Rewrite("Methodology")),
    (
        "counted-possibilities",
        r"(?i)^(?:one|two|three|four|five)\s+possible",
        Action::Rewrite("Solution Approaches"),
    ),
    (
        "rule-based",
        r"(?i)rule.*based|based.*rule",
        Action::Rewrite("Rule-based Architecture"),
    ),
    ("unrefinable", r"^", Action::Reject),
];

const BOILERPLATE: &[(&str, &str)] = &[(
    "boilerplate",
    r"(?i)^(?:introduction|conclusions?|table of contents|contents|preface|foreword|references|bibliography|acknowledge?ments|index|appendix(?:\s+\w+)?)$",
)];

/// Stock phrases for headings that say nothing on their own.
const GENERIC_ENHANCEMENTS: &[(&str, &str)] = &[
    ("learning objectives", "Course Learning Objectives"),
    ("objectives", "Learning Objectives"),
    ("overview", "Topic Overview"),
    ("summary", "Chapter Summary"),
    ("benefits", "Key Benefits"),
    ("advantages", "Key Advantages"),
    ("importance", "Strategic Importance"),
    ("applications", "Practical Applications"),
    ("uses", "Primary Uses"),
    ("methods", "Core Methods"),
    ("techniques", "Key Techniques"),
    ("approaches", "Solution Approaches"),
    ("strategies", "Strategic Approaches"),
    ("principles", "Fundamental Principles"),
    ("concepts", "Core Concepts"),
    ("fundamentals", "Basic Fundamentals"),
    ("process", "Process Overview"),
    ("procedure", "Standard Procedure"),
    ("steps", "Process Steps"),
    ("guidelines", "Best Practice Guidelines"),
    ("framework", "Conceptual Framework"),
    ("model", "Theoretical Model"),
    ("theory", "Theoretical Foundation"),
    ("analysis", "Analytical Framework"),
    ("evaluation", "Assessment Methods"),
    ("implementation", "Implementation Strategy"),
    ("planning", "Strategic Planning"),
    ("management", "Management Principles"),
    ("organization", "Organizational Structure"),
    ("structure", "Structural Framework"),
    ("design", "System Design"),
    ("development", "Development Process"),
    ("research", "Research Methodology"),
    ("study", "Case Study Analysis"),
    ("review", "Literature Review"),
    ("comparison", "Comparative Analysis"),
    ("classification", "Classification System"),
    ("types", "Classification Types"),
    ("categories", "Category Framework"),
];

const PROCEDURAL: &[(&str, &str)] = &[
    (
        "imperative",
        r"(?i)^(?:add|put|take|get|make|do|go|come|see|think|look)\s+",
    ),
    (
        "sequence-word",
        r"(?i)^(?:first|second|third|finally|next|then)\s*[,:]",
    ),
    ("step-number", r"(?i)^step\s+\d+"),
    ("numbered-imperative", r"(?i)^\d+\.\s*(?:add|put|take|get|make)"),
    (
        "temporal-clause",
        r"(?i)^(?:until|during|before|after|when|while)\s+",
    ),
];

/// Single words that remain too vague to stand as a heading.
const TOO_GENERIC: &[&str] = &[
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
    "study",
    "research",
    "analysis",
    "review",
    "summary",
    "overview",
    "introduction",
    "conclusion",
];

const UNCLEAR: &[(&str, &str)] = &[
    ("frequently", r"^frequently\s+\w+"),
    (
        "vague-plural",
        r"^\w+\s+(?:multiple|various|different|several)\s+\w+",
    ),
    ("demonstrative", r"^(?:this|that|these|those)\s+"),
    ("chained-list", r"^\w+\s+(?:and|or)\s+\w+\s+(?:and|or)"),
    ("gerund-phrase", r"^\w+ing\s+\w+"),
];

/// Compiled cleanup tables.
#[derive(Debug)]
pub struct TitleCleaner {
    strip: RuleSet,
    incomplete: RuleSet,
    refinements: RuleSet,
    boilerplate: RuleSet,
    procedural: RuleSet,
    unclear: RuleSet,
}

impl Default for TitleCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleCleaner {
    /// Compile the cleanup tables.
    pub fn new() -> Self {
        Self {
            strip: RuleSet::new(STRIP_RULES),
            incomplete: RuleSet::rejecting(INCOMPLETE_SHAPES),
            refinements: RuleSet::new(REFINEMENTS),
            boilerplate: RuleSet::rejecting(BOILERPLATE),
            procedural: RuleSet::rejecting(PROCEDURAL),
            unclear: RuleSet::rejecting(UNCLEAR),
        }
    }

    /// Clean `text` to a fixed point.
    ///
    /// Returns `None` when the text is rejected or does not settle within
    /// [`MAX_CLEAN_PASSES`] passes.
    pub fn clean(&self, text: &str) -> Option<String> {
        let mut current = text.to_string();
        for _ in 0..MAX_CLEAN_PASSES {
            let next = self.single_pass(&current)?;
            if next == current {
                return Some(next);
            }
            current = next;
        }
        log::trace!("Title did not settle: {text:?}");
        None
    }

    /// One pass over the cascade.
    pub fn single_pass(&self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }

        let mut title = self.strip.apply(text).into_text()?;
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }

        if self.incomplete.is_match(&title) {
            title = self.refinements.apply(&title).into_text()?;
        }

        if self.boilerplate.is_match(&title) {
            return None;
        }

        title = enhance_generic(&title);

        if self.procedural.is_match(&title) {
            return None;
        }
        if title.chars().next().is_some_and(char::is_lowercase) {
            return None;
        }

        title = enhance_formatting(&title);

        let lower = title.to_lowercase();
        if TOO_GENERIC.contains(&lower.as_str()) || self.unclear.is_match(&lower) {
            return None;
        }

        Some(title)
    }
}

/// Replace a generic heading with its stock phrase, or keep the qualifier
/// of "X <generic>" and take the stock phrase's head noun.
fn enhance_generic(text: &str) -> String {
    let lower = text.trim().to_lowercase();

    if let Some((_, stock)) = GENERIC_ENHANCEMENTS.iter().find(|(g, _)| *g == lower) {
        return stock.to_string();
    }

    for (generic, stock) in GENERIC_ENHANCEMENTS {
        if let Some(prefix) = lower.strip_suffix(generic) {
            if prefix.ends_with(' ') {
                let head = stock.split_whitespace().last().unwrap_or(*stock);
                return format!("{} {}", title_case(prefix.trim()), head);
            }
        }
    }

    text.to_string()
}

/// Title-case ALL CAPS headings and qualify a bare extraction term.
fn enhance_formatting(text: &str) -> String {
    let mut title = text.to_string();

    if is_all_caps(&title) && title.split_whitespace().count() > 1 {
        title = title
            .split_whitespace()
            .map(|word| {
                // Short all-caps words are likely acronyms
                if word.chars().count() <= 3 && is_all_caps(word) {
                    word.to_string()
                } else {
                    title_case(word)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
    }

    if title.split_whitespace().count() == 1 && title.to_lowercase().contains("extraction") {
        title.push_str(" Methods");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> Option<String> {
        extract_clean_title(text)
    }

    #[test]
    fn test_strips_numbering_and_punctuation() {
        assert_eq!(clean("3. Lentil Soup:"), Some("Lentil Soup".to_string()));
        assert_eq!(clean("• Roasted Vegetables"), Some("Roasted Vegetables".to_string()));
        assert_eq!(clean("Chapter 4 Data Mining"), Some("Data Mining".to_string()));
        assert_eq!(clean("o Fresh Salads"), Some("Fresh Salads".to_string()));
    }

    #[test]
    fn test_leading_o_is_only_stripped_as_a_bullet() {
        assert_eq!(clean("Oven Baked Falafel"), Some("Oven Baked Falafel".to_string()));
    }

    #[test]
    fn test_boilerplate_is_rejected() {
        assert_eq!(clean("INTRODUCTION"), None);
        assert_eq!(clean("Table of Contents"), None);
        assert_eq!(clean("References"), None);
        assert_eq!(clean("Appendix B"), None);
    }

    #[test]
    fn test_all_caps_become_title_case() {
        assert_eq!(
            clean("CHICKEN CURRY WITH RICE"),
            Some("Chicken Curry With Rice".to_string())
        );
        assert_eq!(clean("BBQ SAUCE RECIPES"), Some("BBQ Sauce Recipes".to_string()));
    }

    #[test]
    fn test_incomplete_titles_are_refined_or_rejected() {
        assert_eq!(clean("This is"), Some("Implementation Method".to_string()));
        assert_eq!(clean("Example"), Some("Example Application".to_string()));
        assert_eq!(clean("Two possible"), Some("Solution Approaches".to_string()));
        assert_eq!(clean("Pasta is"), None);
    }

    #[test]
    fn test_generic_titles_are_enhanced() {
        assert_eq!(clean("Overview"), Some("Topic Overview".to_string()));
        assert_eq!(clean("benefits"), Some("Key Benefits".to_string()));
        assert_eq!(clean("Soup Techniques"), Some("Soup Techniques".to_string()));
        assert_eq!(clean("pantry guidelines"), Some("Pantry Guidelines".to_string()));
    }

    #[test]
    fn test_fragments_are_rejected() {
        assert_eq!(clean("Add the onions"), None);
        assert_eq!(clean("Step 3 Combine"), None);
        assert_eq!(clean("First, heat the oil"), None);
        assert_eq!(clean("simmer gently"), None);
        assert_eq!(clean("These recipes"), None);
        assert_eq!(clean("Cooking Tips"), None);
        assert_eq!(clean("ab"), None);
        assert_eq!(clean(""), None);
    }

    #[test]
    fn test_quantities_are_removed() {
        assert_eq!(clean("Herb Rice 500g Pack"), Some("Herb Rice Pack".to_string()));
        assert_eq!(clean("Extraction"), Some("Extraction Methods".to_string()));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            "3. Lentil Soup:",
            "CHICKEN CURRY WITH RICE",
            "Learning Objectives",
            "development",
            "Organization",
            "This is",
            "o  • Fresh   Herb Salad..",
            "Part 2 - Rule based reasoning",
            "to Data Analysis",
            "IV. Neural Networks",
            "Introduction",
            "and then",
        ];
        for sample in samples {
            if let Some(once) = clean(sample) {
                assert_eq!(clean(&once), Some(once.clone()), "not idempotent for {sample:?}");
            }
        }
    }
}
