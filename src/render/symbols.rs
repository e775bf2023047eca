//! Symbol cleanup for refined excerpt text.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DEFAULT_CLEANER: LazyLock<SymbolCleaner> = LazyLock::new(SymbolCleaner::new);

/// Clean `text` with the default [`SymbolCleaner`].
pub fn clean_special_symbols(text: &str) -> String {
    DEFAULT_CLEANER.clean(text)
}

/// Normalizes typographic symbols to plain ASCII-friendly text and repairs
/// the punctuation artefacts left behind by extraction.
pub struct SymbolCleaner {
    ligature_map: Vec<(&'static str, &'static str)>,
    symbol_map: Vec<(char, &'static str)>,
    colon_artifacts: Vec<Regex>,
    duplicate_commas: Regex,
    unusual_chars: Regex,
    whitespace: Regex,
    boundary_repairs: Vec<(Regex, &'static str)>,
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid symbol cleanup regex")
}

impl SymbolCleaner {
    /// Create a cleaner with the built-in tables.
    pub fn new() -> Self {
        Self {
            ligature_map: vec![
                ("\u{FB00}", "ff"),
                ("\u{FB01}", "fi"),
                ("\u{FB02}", "fl"),
                ("\u{FB03}", "ffi"),
                ("\u{FB04}", "ffl"),
                ("\u{FB05}", "st"),
                ("\u{FB06}", "st"),
            ],
            symbol_map: vec![
                // Bullets and arrows
                ('●', "•"),
                ('○', "•"),
                ('◦', "•"),
                ('▪', "•"),
                ('▫', "•"),
                ('■', "•"),
                ('□', "•"),
                ('►', "•"),
                ('‣', "•"),
                ('⁃', "•"),
                ('∙', "•"),
                ('◊', "•"),
                ('→', "->"),
                // Marks
                ('™', "TM"),
                ('®', "(R)"),
                ('©', "(C)"),
                ('°', " degrees"),
                // Math
                ('±', "+/-"),
                ('≈', "approximately"),
                ('≤', "<="),
                ('≥', ">="),
                ('≠', "!="),
                ('÷', "/"),
                ('×', "x"),
                // Typography
                ('\u{2013}', "-"),
                ('\u{2014}', "-"),
                ('\u{2018}', "'"),
                ('\u{2019}', "'"),
                ('\u{201C}', "\""),
                ('\u{201D}', "\""),
                ('…', "..."),
                ('\u{00A0}', " "),
                // Fractions and superscripts
                ('½', "1/2"),
                ('⅓', "1/3"),
                ('⅔', "2/3"),
                ('¼', "1/4"),
                ('¾', "3/4"),
                ('¹', "1"),
                ('²', "2"),
                ('³', "3"),
                ('⁴', "4"),
                ('⁵', "5"),
            ],
            colon_artifacts: vec![regex(r":\s*[,;.!?]+\s*")],
            duplicate_commas: regex(r",\s*,+\s*"),
            unusual_chars: regex(r#"[^\w\s.,!?;:()\[\]{}\-+=#$%&*/\\|@^~`'"<>•]"#),
            whitespace: regex(r"\s+"),
            boundary_repairs: vec![
                (regex(r"(\d+)\.\s*([A-Za-z])"), "${1}. ${2}"),
                (regex(r",([A-Za-z])"), ", ${1}"),
                (regex(r"([a-zA-Z])\s*(Instructions|Ingredients):"), "${1}. ${2}:"),
                (
                    regex(r"\b(and|or|of|in|on|at|with|for|to|from|by)\.\s+"),
                    "${1} ",
                ),
                (regex(r"\.\.+"), "."),
                (regex(r"\s+\."), "."),
            ],
        }
    }

    /// Run the cleanup stages over `text`.
    pub fn clean(&self, text: &str) -> String {
        // Stage 1: Unicode normalization and ligatures
        let mut result: String = text.nfc().collect();
        for (ligature, replacement) in &self.ligature_map {
            result = result.replace(ligature, replacement);
        }

        // Stage 2: Symbols
        result = self.replace_symbols(&result);

        // Stage 3: Punctuation artefacts
        for pattern in &self.colon_artifacts {
            result = pattern.replace_all(&result, ": ").into_owned();
        }
        result = self.duplicate_commas.replace_all(&result, ", ").into_owned();

        // Stage 4: Unusual characters and whitespace
        result = self.unusual_chars.replace_all(&result, "").into_owned();
        result = self.whitespace.replace_all(&result, " ").into_owned();

        // Stage 5: Sentence boundaries
        for (pattern, replacement) in &self.boundary_repairs {
            result = pattern.replace_all(&result, *replacement).into_owned();
        }

        result.trim().to_string()
    }

    fn replace_symbols(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match self.symbol_map.iter().find(|(symbol, _)| *symbol == c) {
                Some((_, replacement)) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }
}

impl Default for SymbolCleaner {
    fn default() -> Self {
        Self::new()
    }
}
