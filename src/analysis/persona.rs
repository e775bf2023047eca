//! Persona profiles built from the role and task text.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::DomainLexicon;
use super::rules::contains_word;
use crate::model::InputMetadata;

/// Words never used as keywords.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "may",
    "said",
];

/// Words never taken as requirement terms from a cue window.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "for", "in", "on", "at", "by", "from", "with",
    "into", "than", "more", "less", "any", "some", "such", "only", "also", "very", "just", "that",
    "this", "these", "those", "them", "they", "their", "there", "what", "when", "which", "while",
    "will", "would", "should", "could", "must", "have", "been", "being", "were", "are", "was",
    "not", "but", "all", "can", "you", "your", "our", "its", "each", "other", "like", "using",
    "include", "including", "without", "avoid", "exclude", "containing", "featuring",
];

const NEGATION_CUES: &[&str] = &["no", "not", "without", "avoid", "exclude", "non-"];
const INCLUSION_CUES: &[&str] = &["with", "include", "containing", "featuring", "using"];
const REQUIREMENT_INDICATORS: &[&str] = &[
    "compliant",
    "certified",
    "approved",
    "standard",
    "regulation",
    "policy",
    "guideline",
];
const EXCLUDING_PREFIXES: &[&str] = &["non-", "anti-", "un-", "de-"];

/// Tokens following a cue that are captured as requirement terms.
const CUE_WINDOW: usize = 3;

static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("valid keyword regex"));

static EXCLUSION_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_shapes(&[
        r"\bwithout\s+(\w+)",
        r"\bno\s+(\w+)",
        r"\bavoid\s+(\w+)",
        r"\bexclude\s+(\w+)",
        r"(\w+)-free\b",
        r"\bnon-(\w+)",
    ])
});

static INCLUSION_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_shapes(&[
        r"\bonly\s+(\w+)",
        r"\bexclusively\s+(\w+)",
        r"(\w+)-only\b",
        r"(\w+)-based\b",
        r"\bmust\s+include\s+(\w+)",
        r"\brequire\s+(\w+)",
    ])
});

fn compile_shapes(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid requirement shape"))
        .collect()
}

/// A set of terms that raise relevance when present.
#[derive(Debug, Clone, PartialEq)]
pub struct TermBoost {
    pub terms: Vec<String>,
    pub title_weight: f32,
    pub content_weight: f32,
}

impl TermBoost {
    /// Whether any term occurs as a whole word in lowercased `text`.
    pub fn applies_to(&self, text_lower: &str) -> bool {
        self.terms.iter().any(|t| contains_word(text_lower, t))
    }
}

/// Keywords and requirement terms derived from persona text.
///
/// Built once per collection and shared read-only by every document.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaProfile {
    text: String,
    keywords: Vec<String>,
    inclusion: BTreeSet<String>,
    exclusion: BTreeSet<String>,
    boosts: Vec<TermBoost>,
}

impl PersonaProfile {
    /// Build a profile from a role and a task.
    pub fn new(role: &str, task: &str, lexicon: &DomainLexicon) -> Self {
        Self::from_text(&format!("{role} {task}"), lexicon)
    }

    /// Build a profile from collection metadata.
    pub fn from_metadata(metadata: &InputMetadata, lexicon: &DomainLexicon) -> Self {
        Self::from_text(&metadata.persona_text(), lexicon)
    }

    /// Build a profile from free text.
    pub fn from_text(text: &str, lexicon: &DomainLexicon) -> Self {
        let keywords = extract_keywords(text);
        let requirements = extract_requirements(text, lexicon);

        log::debug!(
            "Persona profile: {} keywords, {} inclusion terms, {} exclusion terms",
            keywords.len(),
            requirements.inclusion.len(),
            requirements.exclusion.len()
        );

        Self {
            text: text.to_lowercase(),
            keywords,
            inclusion: requirements.inclusion,
            exclusion: requirements.exclusion,
            boosts: requirements.boosts,
        }
    }

    /// The lowercased source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Keywords, longest first.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Terms content should mention.
    pub fn inclusion_terms(&self) -> &BTreeSet<String> {
        &self.inclusion
    }

    /// Terms content must not mention.
    pub fn exclusion_terms(&self) -> &BTreeSet<String> {
        &self.exclusion
    }

    /// Active lexicon boosts.
    pub fn boosts(&self) -> &[TermBoost] {
        &self.boosts
    }

    /// `(inclusion, exclusion)` when at least one of them is non-empty.
    pub fn requirements(&self) -> Option<(&BTreeSet<String>, &BTreeSet<String>)> {
        if self.inclusion.is_empty() && self.exclusion.is_empty() {
            None
        } else {
            Some((&self.inclusion, &self.exclusion))
        }
    }

    /// Whether lowercased `text` mentions an exclusion term as a whole word.
    pub fn mentions_excluded(&self, text_lower: &str) -> bool {
        self.exclusion.iter().any(|t| contains_word(text_lower, t))
    }

    /// Whether lowercased `text` mentions an inclusion term as a whole word.
    pub fn mentions_included(&self, text_lower: &str) -> bool {
        self.inclusion.iter().any(|t| contains_word(text_lower, t))
    }
}

/// Alphabetic words of three or more letters, minus stop words, unique,
/// longest first (ties alphabetical).
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let unique: HashSet<&str> = KEYWORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();

    let mut keywords: Vec<String> = unique.into_iter().map(str::to_string).collect();
    keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    keywords
}

/// Inclusion/exclusion terms and boosts implied by persona text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requirements {
    pub inclusion: BTreeSet<String>,
    pub exclusion: BTreeSet<String>,
    pub boosts: Vec<TermBoost>,
}

/// Split persona text into lowercase tokens, trimming punctuation but
/// keeping inner and trailing hyphens (`non-`, `gluten-free`).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                .trim_start_matches('-')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// For every token of [`tokenize`], whether it closes a clause (`,;:.!?`).
fn clause_ends(text: &str) -> Vec<bool> {
    text.split_whitespace()
        .filter(|w| {
            !w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                .trim_start_matches('-')
                .is_empty()
        })
        .map(|w| w.ends_with([',', ';', ':', '.', '!', '?']))
        .collect()
}

fn is_requirement_term(term: &str) -> bool {
    term.chars().count() >= 3
        && term.chars().any(char::is_alphabetic)
        && !FUNCTION_WORDS.contains(&term)
}

/// Derive requirement terms from persona text.
pub fn extract_requirements(text: &str, lexicon: &DomainLexicon) -> Requirements {
    let lower = text.to_lowercase();
    let tokens = tokenize(&lower);
    let mut inclusion = BTreeSet::new();
    let mut exclusion = BTreeSet::new();

    let add = |set: &mut BTreeSet<String>, term: &str| {
        let term = term.trim_matches('-');
        if is_requirement_term(term) {
            set.insert(term.to_string());
        }
    };

    // Cue windows; a window ends early at clause punctuation or another cue
    let clause_ends = clause_ends(&lower);
    for (i, token) in tokens.iter().enumerate() {
        let target = if NEGATION_CUES.contains(&token.as_str()) {
            &mut exclusion
        } else if INCLUSION_CUES.contains(&token.as_str()) {
            &mut inclusion
        } else {
            continue;
        };
        if clause_ends[i] {
            continue;
        }
        for j in (i + 1)..(i + 1 + CUE_WINDOW).min(tokens.len()) {
            let t = tokens[j].as_str();
            if NEGATION_CUES.contains(&t) || INCLUSION_CUES.contains(&t) {
                break;
            }
            add(&mut *target, t);
            if clause_ends[j] {
                break;
            }
        }
    }

    // Explicit shapes
    for shape in EXCLUSION_SHAPES.iter() {
        for caps in shape.captures_iter(&lower) {
            add(&mut exclusion, &caps[1]);
        }
    }
    for shape in INCLUSION_SHAPES.iter() {
        for caps in shape.captures_iter(&lower) {
            add(&mut inclusion, &caps[1]);
        }
    }

    // Context around requirement-style language
    for (i, token) in tokens.iter().enumerate() {
        if REQUIREMENT_INDICATORS.contains(&token.as_str()) {
            let start = i.saturating_sub(CUE_WINDOW);
            let end = (i + CUE_WINDOW + 1).min(tokens.len());
            tokens[start..end]
                .iter()
                .filter(|t| t.len() > 3 && !REQUIREMENT_INDICATORS.contains(&t.as_str()))
                .for_each(|t| add(&mut inclusion, t));
        }
    }

    // Affixes on single tokens
    for token in &tokens {
        if lexicon.is_trigger(token) {
            continue;
        }
        if let Some(base) = EXCLUDING_PREFIXES
            .iter()
            .find_map(|prefix| token.strip_prefix(prefix))
        {
            add(&mut exclusion, base);
        } else if let Some(base) = token.strip_suffix("-free") {
            add(&mut exclusion, base);
        } else if let Some(base) = token.strip_suffix("-based") {
            add(&mut inclusion, base);
        }
    }

    // Lexicon seeds
    let mut boosts = Vec::new();
    for entry in lexicon.matching(&tokens) {
        entry.include.iter().for_each(|t| add(&mut inclusion, t));
        entry.exclude.iter().for_each(|t| add(&mut exclusion, t));
        if !entry.boost_terms.is_empty() {
            boosts.push(TermBoost {
                terms: entry.boost_terms.clone(),
                title_weight: entry.title_boost,
                content_weight: entry.content_boost,
            });
        }
    }

    // An excluded term is never also required.
    inclusion.retain(|t| !exclusion.contains(t));

    Requirements {
        inclusion,
        exclusion,
        boosts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dietary(text: &str) -> PersonaProfile {
        PersonaProfile::from_text(text, &DomainLexicon::dietary())
    }

    #[test]
    fn test_keywords_sorted_and_filtered() {
        let keywords = extract_keywords("HR professional: Create and manage fillable forms");
        assert_eq!(
            keywords,
            vec![
                "professional",
                "fillable",
                "create",
                "manage",
                "forms"
            ]
        );
    }

    #[test]
    fn test_keywords_split_hyphenated_words() {
        let keywords = extract_keywords("non-vegetarian dinner");
        assert!(keywords.contains(&"vegetarian".to_string()));
        assert!(keywords.contains(&"non".to_string()));
    }

    #[test]
    fn test_vegetarian_seeds_exclusions() {
        let profile = dietary("Food Contractor Vegetarian plan a weekly menu");
        assert!(profile.exclusion_terms().contains("chicken"));
        assert!(profile.exclusion_terms().contains("eggs"));
        assert!(profile.inclusion_terms().is_empty());
        assert_eq!(profile.boosts().len(), 1);
        assert!(profile.mentions_excluded("grilled chicken curry"));
        assert!(!profile.mentions_excluded("eggplant parmesan"));
    }

    #[test]
    fn test_non_vegetarian_does_not_trigger_vegetarian() {
        let profile = dietary("Chef preparing a non-vegetarian dinner");
        assert!(profile.inclusion_terms().contains("chicken"));
        assert!(!profile.exclusion_terms().contains("chicken"));
        // `non-X` still excludes X itself
        assert!(profile.exclusion_terms().contains("vegetarian"));
    }

    #[test]
    fn test_cue_windows_and_shapes() {
        let profile = PersonaProfile::from_text(
            "Planner: gluten-free menu without peanuts, only seasonal produce",
            &DomainLexicon::empty(),
        );
        assert!(profile.exclusion_terms().contains("gluten"));
        assert!(profile.exclusion_terms().contains("peanuts"));
        assert!(profile.inclusion_terms().contains("seasonal"));
        assert!(profile.boosts().is_empty());
    }

    #[test]
    fn test_function_words_are_not_terms() {
        let profile = PersonaProfile::from_text(
            "Travel planner: no more than a day of driving",
            &DomainLexicon::empty(),
        );
        assert!(!profile.exclusion_terms().contains("more"));
        assert!(!profile.exclusion_terms().contains("than"));
    }

    #[test]
    fn test_requirement_indicator_context() {
        let profile = PersonaProfile::from_text(
            "Auditor reviewing privacy policy documents",
            &DomainLexicon::empty(),
        );
        assert!(profile.inclusion_terms().contains("privacy"));
        assert!(profile.inclusion_terms().contains("documents"));
        assert!(!profile.inclusion_terms().contains("policy"));
    }

    #[test]
    fn test_no_requirements() {
        let profile = PersonaProfile::from_text(
            "Travel Planner: Plan a trip of 4 days for a group of 10 college friends",
            &DomainLexicon::dietary(),
        );
        assert!(profile.requirements().is_none());
        assert!(!profile.keywords().is_empty());
    }

    #[test]
    fn test_tokenize_keeps_hyphens() {
        assert_eq!(
            tokenize("Gluten-free, (non-vegetarian) items."),
            vec!["gluten-free", "non-vegetarian", "items"]
        );
    }
}
