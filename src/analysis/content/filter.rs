//! Cleanup of raw excerpts and persona-aware filtering.

use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::persona::PersonaProfile;

/// Default maximum excerpt length, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 1000;

/// Share of the limit that must survive when cutting at a logical break.
const MIN_KEPT_RATIO: f64 = 0.7;

/// Preferred cut points, most specific first.
const LOGICAL_BREAKS: &[&str] = &[" • Instructions:", " • Ingredients:", ". ", "• "];

/// Lowercase markers of structured (list-like) content.
const STRUCTURE_MARKERS: &[&str] = &[
    "ingredients:",
    "instructions:",
    "content:",
    "steps:",
    "method:",
    "sections:",
];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid content cleanup regex")
}

static PAGE_HEADER: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)^Page \d+.*$"));
static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)^\d+\s*$"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+"));
static O_BULLET: LazyLock<Regex> = LazyLock::new(|| regex(r"(^|\s)o\s+"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| regex(r"\s*•\s*"));
static LIST_TITLE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s*•"));

/// Punctuation repairs applied after truncation, in order.
static REPAIRS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (regex(r"\s+([.,:;])"), "${1}"),
        (regex(r"([.,:;])\s*([.,:;])"), "${1}${2}"),
        (
            regex(r"([a-z])\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s*:"),
            "${1}. ${2}:",
        ),
        (regex(r"([a-z])\s+(Instructions|Ingredients):"), "${1}. ${2}:"),
        (regex(r"([a-z])\s+([A-Z][a-z]+\s+[A-Z][a-z]+)"), "${1}. ${2}"),
        (regex(r"\s*:\s*"), ": "),
    ]
});

/// Normalize a raw excerpt, drop parts that conflict with the persona and
/// cap its length at `max_chars`.
pub fn clean_content_block(content: &str, persona: &PersonaProfile, max_chars: usize) -> String {
    let content = PAGE_HEADER.replace_all(content, "");
    let content = PAGE_NUMBER.replace_all(&content, "");
    let content = WHITESPACE.replace_all(&content, " ");
    let content = O_BULLET.replace_all(&content, "${1}• ");
    let mut content = BULLET.replace_all(&content, " • ").into_owned();

    if persona.requirements().is_some() {
        content = apply_persona_filter(&content, persona);
    }

    let mut content = truncate_at_break(&content, max_chars);
    for (pattern, replacement) in REPAIRS.iter() {
        content = pattern.replace_all(&content, *replacement).into_owned();
    }
    content.trim().to_string()
}

/// Drop the parts of `content` that mention an exclusion term or, when
/// inclusion terms exist, structured parts that mention none of them.
pub fn apply_persona_filter(content: &str, persona: &PersonaProfile) -> String {
    let lower = content.to_lowercase();
    if STRUCTURE_MARKERS.iter().any(|m| lower.contains(m)) {
        filter_structured(content, persona)
    } else {
        filter_sentences(content, persona)
    }
}

fn filter_structured(content: &str, persona: &PersonaProfile) -> String {
    let requires_inclusion = !persona.inclusion_terms().is_empty();

    split_before_list_titles(content)
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| {
            let lower = part.to_lowercase();
            if persona.mentions_excluded(&lower) {
                return false;
            }
            !requires_inclusion
                || persona.mentions_included(&lower)
                || STRUCTURE_MARKERS.iter().any(|m| lower.contains(m))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn filter_sentences(content: &str, persona: &PersonaProfile) -> String {
    content
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !persona.mentions_excluded(&s.to_lowercase()))
        .collect::<Vec<_>>()
        .join(". ")
}

/// Split `content` in front of every `Title Case •` phrase.
fn split_before_list_titles(content: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for m in LIST_TITLE.find_iter(content) {
        if m.start() > start {
            parts.push(&content[start..m.start()]);
            start = m.start();
        }
    }
    parts.push(&content[start..]);
    parts
}

/// Cut `content` to at most `max_chars` characters, preferring the last
/// logical break past [`MIN_KEPT_RATIO`] of the limit.
pub fn truncate_at_break(content: &str, max_chars: usize) -> String {
    let Some((limit, _)) = content.char_indices().nth(max_chars) else {
        return content.to_string();
    };
    let truncated = &content[..limit];
    let min_kept = (max_chars as f64 * MIN_KEPT_RATIO) as usize;

    for brk in LOGICAL_BREAKS {
        if let Some(at) = truncated.rfind(brk) {
            if truncated[..at].chars().count() > min_kept {
                return truncated[..at + brk.len()].trim().to_string();
            }
        }
    }
    truncated.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::DomainLexicon;

    fn neutral() -> PersonaProfile {
        PersonaProfile::from_text("Travel planner for a group trip", &DomainLexicon::empty())
    }

    fn vegetarian() -> PersonaProfile {
        PersonaProfile::new("Vegetarian", "plan a weekly menu", &DomainLexicon::dietary())
    }

    #[test]
    fn test_page_headers_and_bullets() {
        let raw = "Page 3 of 10\nFalafel Wraps\n o chickpeas\n o parsley\n12\nServe   warm";
        let cleaned = clean_content_block(raw, &neutral(), DEFAULT_MAX_CONTENT_CHARS);
        assert!(!cleaned.contains("Page 3"));
        assert!(!cleaned.contains("12"));
        assert!(cleaned.contains("• chickpeas • parsley"));
        assert!(!cleaned.contains("  "));
    }

    #[test]
    fn test_words_ending_in_o_are_not_bullets() {
        let cleaned = clean_content_block(
            "Add tomato sauce and potato wedges",
            &neutral(),
            DEFAULT_MAX_CONTENT_CHARS,
        );
        assert_eq!(cleaned, "Add tomato sauce and potato wedges");
    }

    #[test]
    fn test_general_filter_drops_excluded_sentences() {
        let raw = "Roast the peppers until soft. Add the chicken stock. Season with salt.";
        let cleaned = clean_content_block(raw, &vegetarian(), DEFAULT_MAX_CONTENT_CHARS);
        assert!(!cleaned.to_lowercase().contains("chicken"));
        assert!(cleaned.contains("Roast the peppers until soft"));
        assert!(cleaned.contains("Season with salt"));
    }

    #[test]
    fn test_structured_filter_drops_excluded_items() {
        let raw = "Lentil Dal • Ingredients: lentils, onion • Instructions: simmer \
                   Chicken Tikka • Ingredients: chicken, yogurt • Instructions: grill";
        let cleaned = clean_content_block(raw, &vegetarian(), DEFAULT_MAX_CONTENT_CHARS);
        assert!(cleaned.contains("Lentil Dal"));
        assert!(!cleaned.contains("Chicken"));
    }

    #[test]
    fn test_structured_filter_requires_inclusion_terms() {
        let persona =
            PersonaProfile::new("Chef", "prepare a non-vegetarian dinner", &DomainLexicon::dietary());
        let kept = apply_persona_filter(
            "Beef Stew • slow cooked beef content: Fruit Salad • apples and pears",
            &persona,
        );
        assert!(kept.contains("Beef Stew"));
        assert!(!kept.contains("Fruit Salad"));
    }

    #[test]
    fn test_no_requirements_leaves_content_alone() {
        let persona = neutral();
        assert!(persona.requirements().is_none());
        assert_eq!(
            clean_content_block("Visit the old town. Eat fish.", &persona, 1000),
            "Visit the old town. Eat fish."
        );
        // the sentence filter drops trailing empty pieces
        assert_eq!(
            apply_persona_filter("Visit the old town. Eat fish.", &vegetarian()),
            "Visit the old town"
        );
    }

    #[test]
    fn test_truncation_prefers_logical_breaks() {
        let sentence = "Slice the aubergine and roast it with oil. ";
        let long = sentence.repeat(40);
        let cut = truncate_at_break(&long, DEFAULT_MAX_CONTENT_CHARS);
        assert!(cut.chars().count() <= DEFAULT_MAX_CONTENT_CHARS);
        assert!(cut.chars().count() > 700);
        assert!(cut.ends_with('.'));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(1200);
        let cut = truncate_at_break(&long, 1000);
        assert_eq!(cut.chars().count(), 1000);
    }

    #[test]
    fn test_punctuation_repairs() {
        let cleaned = clean_content_block(
            "Mix well , then rest Serving Suggestion: enjoy",
            &neutral(),
            DEFAULT_MAX_CONTENT_CHARS,
        );
        assert_eq!(cleaned, "Mix well, then rest. Serving Suggestion: enjoy");
    }
}
