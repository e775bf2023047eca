//! Ordered `{pattern, action}` tables and their interpreter.
//!
//! Title cleanup, refinement, rejection and validation are all expressed as
//! rule tables. A [`RuleSet`] walks its rules in order: replacements rewrite
//! the text and continue, while rewrites and rejections end the walk.

use regex::Regex;

/// What a rule does when its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace every match with the template (`$1` style references allowed).
    Replace(&'static str),
    /// Replace the whole text with a fixed phrase and stop.
    Rewrite(&'static str),
    /// Drop the text and stop.
    Reject,
}

/// A named, compiled rule.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub action: Action,
}

/// Result of running a [`RuleSet`] over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No terminal rule fired; carries the text after all replacements.
    Kept(String),
    /// A rewrite rule fired.
    Rewritten(String),
    /// A reject rule fired; carries the rule name.
    Rejected(&'static str),
}

impl Outcome {
    /// The resulting text, or `None` if rejected.
    pub fn into_text(self) -> Option<String> {
        match self {
            Outcome::Kept(text) | Outcome::Rewritten(text) => Some(text),
            Outcome::Rejected(_) => None,
        }
    }
}

/// An ordered table of rules.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a table of `(name, pattern, action)` rows.
    ///
    /// Tables are static program data, so an invalid pattern is a
    /// programming error and panics with the offending rule name.
    pub fn new(table: &[(&'static str, &str, Action)]) -> Self {
        let rules = table
            .iter()
            .map(|&(name, pattern, action)| Rule {
                name,
                pattern: Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("rule `{name}` has an invalid pattern: {e}")),
                action,
            })
            .collect();
        Self { rules }
    }

    /// Build a set in which every row rejects on match.
    pub fn rejecting(table: &[(&'static str, &str)]) -> Self {
        let rows: Vec<(&'static str, &str, Action)> = table
            .iter()
            .map(|&(name, pattern)| (name, pattern, Action::Reject))
            .collect();
        Self::new(&rows)
    }

    /// Run the rules in order over `text`.
    pub fn apply(&self, text: &str) -> Outcome {
        let mut current = text.to_string();
        for rule in &self.rules {
            match rule.action {
                Action::Replace(template) => {
                    if rule.pattern.is_match(&current) {
                        current = rule.pattern.replace_all(&current, template).into_owned();
                    }
                }
                Action::Rewrite(phrase) => {
                    if rule.pattern.is_match(&current) {
                        return Outcome::Rewritten(phrase.to_string());
                    }
                }
                Action::Reject => {
                    if rule.pattern.is_match(&current) {
                        return Outcome::Rejected(rule.name);
                    }
                }
            }
        }
        Outcome::Kept(current)
    }

    /// Name of the first rule whose pattern matches, regardless of action.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.name)
    }

    /// Check if any rule matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Whether `word` occurs in `haystack` delimited by non-word characters.
///
/// Both inputs are expected to be lowercased by the caller.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Characters that `\w` treats as part of a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercase the first character and lowercase the rest of every word,
/// where a word is a run of letters (so `rule-based` becomes `Rule-Based`).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Has cased letters and none of them is lowercase.
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// Every run of letters starts uppercase and continues lowercase,
/// with at least one letter present.
pub fn is_title_cased(text: &str) -> bool {
    let mut seen_letter = false;
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter && c.is_uppercase() {
                return false;
            }
            if !prev_is_letter && c.is_lowercase() {
                return false;
            }
            seen_letter = true;
            prev_is_letter = true;
        } else {
            prev_is_letter = false;
        }
    }
    seen_letter
}

/// The first `n` characters of `text`.
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The last `n` characters of `text`.
pub fn char_suffix(text: &str, n: usize) -> &str {
    let count = text.chars().count();
    if count <= n {
        return text;
    }
    match text.char_indices().nth(count - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
