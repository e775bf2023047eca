//! Bounded relevance scores for titles and content against a persona.
//!
//! Both scorers are pure functions of the text and the [`PersonaProfile`]
//! and always return a value in `[0, 1]`.

use std::collections::HashSet;

use super::persona::{PersonaProfile, TermBoost};
use super::rules::{char_prefix, char_suffix, is_all_caps, is_title_cased};

/// Title score when the persona yields no keywords.
pub const NEUTRAL_TITLE_SCORE: f32 = 0.5;
/// Content score when the persona yields no keywords.
pub const NEUTRAL_CONTENT_SCORE: f32 = 0.3;

const CONTEXT_CAP: f32 = 1.2;
const CONTENT_CEILING: f32 = 1.2;
const TITLE_EXCLUSION_PENALTY: f32 = 0.5;
const CONTENT_EXCLUSION_PENALTY: f32 = 0.35;

const CONNECTING_WORDS: &[&str] = &[
    "and", "or", "but", "with", "for", "in", "on", "at", "to", "from", "by",
];
const FRAGMENT_STARTS: &[&str] = &["and", "or", "but", "with"];
const BORING_WORDS: &[&str] = &[
    "introduction",
    "overview",
    "conclusion",
    "summary",
    "preface",
    "foreword",
    "general",
];
const GENERIC_TITLES: &[&str] = &["introduction", "overview", "conclusion", "table of contents"];
const GROUP_NOUNS: &[&str] = &["group", "team", "people", "member", "individual", "person"];
const ROLE_PREFIXES: &[&str] = &["manager", "director", "specialist", "coordinator"];
const ACTION_VERBS: &[&str] = &["create", "manage", "provide", "prepare", "develop", "organize"];
const REQUIREMENT_SUFFIXES: &[&str] = &["free", "based", "style", "friendly"];
const REQUIREMENT_PREFIXES: &[&str] = &["non", "anti", "pro", "multi"];

/// Score a section title.
pub fn title_relevance(title: &str, persona: &PersonaProfile) -> f32 {
    let keywords = persona.keywords();
    if keywords.is_empty() {
        return NEUTRAL_TITLE_SCORE;
    }

    let title_lower = title.to_lowercase();
    let title_words: HashSet<&str> = title_lower.split_whitespace().collect();
    let persona_words: HashSet<&str> = keywords.iter().map(String::as_str).collect();

    let mut relevance = 0.0;

    // Exact keyword containment, longer keywords weigh more
    let mut exact_matches = 0;
    for keyword in keywords {
        if title_lower.contains(keyword.as_str()) {
            relevance += (0.5 + keyword.chars().count() as f32 * 0.05).min(1.0);
            exact_matches += 1;
        }
    }
    if exact_matches > 1 {
        relevance += 0.4 * (exact_matches - 1).min(3) as f32;
    }

    let overlap = title_words.intersection(&persona_words).count();
    if overlap > 0 {
        relevance += (overlap as f32 * 0.3).min(0.8);
    }

    // Shared four-letter stems
    for keyword in keywords.iter().filter(|k| k.chars().count() > 3) {
        let stem = char_prefix(keyword, 4);
        if title_words
            .iter()
            .any(|word| keyword.starts_with(char_prefix(word, 4)) || word.starts_with(stem))
        {
            relevance += 0.25;
        }
    }

    relevance += context_score(keywords, &title_lower, persona.boosts());

    let words: Vec<&str> = title.split_whitespace().collect();

    let mut specificity = 0.0;
    if words.len() >= 2 && title.chars().count() >= 8 {
        let compound = words
            .iter()
            .filter(|w| w.contains('-') || w.chars().count() > 7)
            .count();
        specificity = (0.1 + compound as f32 * 0.15).min(0.4);
        if words
            .iter()
            .any(|w| ["ing", "ed", "er", "ion"].iter().any(|end| w.ends_with(end)))
        {
            specificity += 0.1;
        }
    }

    let has_connectives = title_lower
        .split_whitespace()
        .any(|w| CONNECTING_WORDS.contains(&w));
    let quality = if !has_connectives && (2..=4).contains(&words.len()) {
        0.25
    } else {
        0.0
    };

    let mut penalties = 0.0;
    if title.ends_with(',') || FRAGMENT_STARTS.iter().any(|s| title.starts_with(s)) {
        penalties -= 0.4;
    }
    if BORING_WORDS.iter().any(|w| title_lower.contains(w)) {
        penalties -= 0.5;
    }
    if GENERIC_TITLES.contains(&title_lower.as_str()) {
        penalties -= 0.7;
    }
    if persona.mentions_excluded(&title_lower) {
        penalties -= TITLE_EXCLUSION_PENALTY;
    }

    let starts_upper = title.chars().next().is_some_and(char::is_uppercase);
    let structure = if is_title_cased(title) || (starts_upper && !is_all_caps(title)) {
        0.15
    } else {
        0.0
    };

    (relevance + quality + penalties + specificity + structure).clamp(0.0, 1.0)
}

/// How strongly the title speaks to the persona's role, actions and
/// requirements, judged from keyword morphology.
fn context_score(keywords: &[String], title_lower: &str, boosts: &[TermBoost]) -> f32 {
    let title_words: Vec<&str> = title_lower.split_whitespace().collect();
    let title_set: HashSet<&str> = title_words.iter().copied().collect();

    let mut demographic = HashSet::new();
    let mut role = HashSet::new();
    let mut action = HashSet::new();
    let mut requirement = HashSet::new();

    for word in keywords.iter().map(String::as_str) {
        let len = word.chars().count();
        if len <= 3 {
            continue;
        }
        if ["ing", "er", "or", "ist", "ent"].iter().any(|s| word.ends_with(s))
            || len <= 6
            || GROUP_NOUNS.contains(&word)
        {
            demographic.insert(word);
        } else if len > 8
            || ["ional", "ment", "ance", "ence", "ity"]
                .iter()
                .any(|s| word.ends_with(s))
            || ROLE_PREFIXES.iter().any(|p| word.starts_with(p))
        {
            role.insert(word);
        } else if ["ate", "ize", "ify"].iter().any(|s| word.ends_with(s))
            || ACTION_VERBS.contains(&word)
        {
            action.insert(word);
        } else if word.contains('-')
            || REQUIREMENT_SUFFIXES.iter().any(|s| word.ends_with(s))
            || REQUIREMENT_PREFIXES.iter().any(|p| word.starts_with(p))
        {
            requirement.insert(word);
        }
    }

    let overlap = |bucket: &HashSet<&str>| bucket.intersection(&title_set).count() as f32;
    let mut score = 0.0;
    score += (overlap(&demographic) * 0.4).min(0.6);
    score += (overlap(&role) * 0.5).min(0.7);
    score += (overlap(&action) * 0.4).min(0.5);
    score += (overlap(&requirement) * 0.6).min(0.8);

    // Jaccard similarity against the longer keywords
    let long_words: HashSet<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() > 3)
        .collect();
    let union = long_words.union(&title_set).count();
    if union > 0 {
        score += long_words.intersection(&title_set).count() as f32 / union as f32 * 0.5;
    }

    // The last few substantial keywords carry the job
    let substantial: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() > 4)
        .collect();
    for word in &substantial[substantial.len().saturating_sub(3)..] {
        if title_lower.contains(word) {
            score += 0.7;
        } else {
            let stem = char_prefix(word, 4);
            if title_words
                .iter()
                .any(|t| t.chars().count() > 3 && t.contains(stem))
            {
                score += 0.4;
            }
        }
    }

    let mut compound_matches = 0;
    for word in keywords
        .iter()
        .filter(|w| w.contains('-') || w.chars().count() > 8)
    {
        for title_word in title_words.iter().filter(|t| t.chars().count() > 6) {
            if title_word.contains(char_prefix(word, 4)) || word.contains(char_prefix(title_word, 4))
            {
                compound_matches += 1;
            }
        }
    }
    if compound_matches > 0 {
        score += (compound_matches as f32 * 0.3).min(0.6);
    }

    for boost in boosts {
        if boost.applies_to(title_lower) {
            score += boost.title_weight;
        }
    }

    score.min(CONTEXT_CAP)
}

/// Score a content excerpt.
pub fn content_relevance(content: &str, persona: &PersonaProfile) -> f32 {
    let keywords = persona.keywords();
    if keywords.is_empty() {
        return NEUTRAL_CONTENT_SCORE;
    }

    let content_lower = content.to_lowercase();
    let total_words = content.split_whitespace().count();
    let mut relevance = 0.0;

    if total_words > 0 {
        let hits: usize = keywords
            .iter()
            .map(|k| content_lower.matches(k.as_str()).count())
            .sum();
        relevance += (hits as f32 / total_words as f32 * 15.0).min(0.7);
    }

    for keyword in keywords.iter().filter(|k| k.chars().count() > 3) {
        if content_lower.contains(char_prefix(keyword, 4))
            || content_lower.contains(char_suffix(keyword, 4))
        {
            relevance += 0.1;
        }
    }

    let colons = content.matches(':').count();
    if (1..=5).contains(&colons) {
        relevance += 0.2;
    }
    if total_words > 50 {
        relevance += 0.1;
    }

    let mut relevance: f32 = relevance.min(CONTENT_CEILING);
    for boost in persona.boosts() {
        if boost.applies_to(&content_lower) {
            relevance += boost.content_weight;
        }
    }

    // The penalty comes after the upper bound so an exclusion term always
    // lowers the final score.
    let mut relevance = relevance.min(1.0);
    if persona.mentions_excluded(&content_lower) {
        relevance -= CONTENT_EXCLUSION_PENALTY;
    }

    relevance.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::DomainLexicon;

    fn vegetarian() -> PersonaProfile {
        PersonaProfile::new("Vegetarian", "plan a weekly menu", &DomainLexicon::dietary())
    }

    #[test]
    fn test_empty_keywords_are_neutral() {
        let persona = PersonaProfile::from_text("a an of", &DomainLexicon::empty());
        assert!(persona.keywords().is_empty());
        assert_eq!(title_relevance("Anything", &persona), NEUTRAL_TITLE_SCORE);
        assert_eq!(content_relevance("anything", &persona), NEUTRAL_CONTENT_SCORE);
    }

    #[test]
    fn test_scores_are_bounded() {
        let persona = vegetarian();
        let samples = [
            "",
            "Vegetarian Weekly Menu Plan",
            "and, or, but,",
            "INTRODUCTION",
            "Grilled Chicken with Beef and Pork,",
            "vegetarian vegetarian vegetarian menu menu plan weekly: lentil: tofu:",
        ];
        for text in samples {
            let t = title_relevance(text, &persona);
            let c = content_relevance(text, &persona);
            assert!((0.0..=1.0).contains(&t), "title score {t} for {text:?}");
            assert!((0.0..=1.0).contains(&c), "content score {c} for {text:?}");
        }
    }

    #[test]
    fn test_exclusion_term_ranks_title_lower() {
        let persona = vegetarian();
        let lentil = title_relevance("Lentil Soup", &persona);
        let chicken = title_relevance("Chicken Curry", &persona);
        assert!(lentil > chicken, "{lentil} <= {chicken}");
    }

    #[test]
    fn test_exclusion_term_ranks_content_strictly_lower() {
        let persona = vegetarian();
        let body = |ingredient: &str| {
            format!(
                "Weekly menu idea: simmer the {ingredient} with onions, garlic and cumin. \
                 Serve warm with rice and a vegetarian side salad for the plan."
            )
        };
        let lentil = content_relevance(&body("lentil"), &persona);
        let chicken = content_relevance(&body("chicken"), &persona);
        assert!(lentil > chicken, "{lentil} <= {chicken}");
    }

    #[test]
    fn test_keyword_matches_raise_title_score() {
        let persona = PersonaProfile::new(
            "HR professional",
            "Create and manage fillable forms",
            &DomainLexicon::empty(),
        );
        let relevant = title_relevance("Create Fillable Forms", &persona);
        let unrelated = title_relevance("Quarterly Revenue", &persona);
        assert!(relevant > unrelated);
        assert_eq!(relevant, 1.0);
    }

    #[test]
    fn test_generic_titles_are_penalised() {
        let persona = PersonaProfile::new("Student", "learning chemistry", &DomainLexicon::empty());
        let generic = title_relevance("Overview", &persona);
        let specific = title_relevance("Reaction Kinetics", &persona);
        assert!(generic < specific);
        assert_eq!(generic, 0.0);
    }
}
