//! Splitting page text into candidate excerpts.

use std::sync::LazyLock;

use regex::Regex;

/// Shortest structured block worth keeping, in characters.
const MIN_STRUCTURED_CHARS: usize = 100;
/// Shortest heading section or paragraph, in characters.
const MIN_SECTION_CHARS: usize = 50;
/// Paragraphs shorter than this trigger sentence accumulation.
const MIN_PARAGRAPH_CHARS: usize = 100;
/// Accumulated sentence chunks stay below this many characters.
const SENTENCE_CHUNK_CHARS: usize = 500;

static RECIPE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z\&\-]*(?:[ \t]+[A-Za-z\&\-]+){0,5})\s*•?\s*(?i:ingredients?):?")
        .expect("valid recipe head regex")
});

static INSTRUCTIONS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)instructions?:?").expect("valid instructions regex"));

static BULLET_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-zA-Z\s\&\-]{2,40})\s*•\s*([^•]+(?:•[^•]+)*)")
        .expect("valid bullet list regex")
});

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z\s\&\-]{2,40}:?$").expect("valid heading line regex")
});

static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:o\s+|\d+\.?\s+|[a-z]\)\s+|[A-Z]\.\s+)\S").expect("valid step line regex")
});

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Length of the first character of `text`, or 0.
fn first_char_len(text: &str) -> usize {
    text.chars().next().map_or(0, char::len_utf8)
}

/// Recipe, bulleted-list and step blocks found in a page.
pub fn structured_blocks(text: &str) -> Vec<String> {
    let mut blocks = recipes(text);
    blocks.extend(bullet_lists(text));
    blocks.extend(step_lists(text));
    blocks
}

/// `<Title> Ingredients ... Instructions ...` up to a blank line, the next
/// recipe head or the end of the page. Titles are at most six words and
/// start with a capital.
fn recipes(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(head) = RECIPE_HEAD.captures(&text[pos..]) {
        let (Some(whole), Some(title)) = (head.get(0), head.get(1)) else {
            break;
        };
        let ingredients_start = pos + whole.end();
        let search_from = ingredients_start + first_char_len(&text[ingredients_start..]);
        let Some(marker) = INSTRUCTIONS_MARKER.find(&text[search_from..]) else {
            break;
        };
        let ingredients = &text[ingredients_start..search_from + marker.start()];

        let body_start = search_from + marker.end();
        let scan_from = body_start + first_char_len(&text[body_start..]);
        let blank = text[scan_from..].find("\n\n").map(|i| scan_from + i);
        let next_head = RECIPE_HEAD
            .find(&text[scan_from..])
            .map(|m| scan_from + m.start());
        let body_end = [blank, next_head]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(text.len());
        let instructions = &text[body_start..body_end];

        let recipe = format!(
            "{} • Ingredients: {} • Instructions: {}",
            title.as_str().trim(),
            ingredients.trim(),
            instructions.trim()
        );
        if char_len(&recipe) > MIN_STRUCTURED_CHARS {
            blocks.push(recipe);
        }

        if body_end <= pos {
            break;
        }
        pos = body_end;
    }

    blocks
}

/// `<title> • item • item ...`
fn bullet_lists(text: &str) -> Vec<String> {
    BULLET_LIST
        .captures_iter(text)
        .map(|caps| format!("{} • {}", caps[1].trim(), caps[2].trim()))
        .filter(|block| char_len(block) > MIN_STRUCTURED_CHARS)
        .collect()
}

/// A heading line followed by `o`, numbered or lettered step lines.
fn step_lists(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !HEADING_LINE.is_match(lines[i]) {
            i += 1;
            continue;
        }
        let steps: Vec<&str> = lines[i + 1..]
            .iter()
            .take_while(|line| STEP_LINE.is_match(line))
            .copied()
            .collect();
        if steps.is_empty() {
            i += 1;
            continue;
        }

        let block = format!(
            "{} • {}",
            lines[i].trim_end_matches(':'),
            steps.join("\n")
        );
        if char_len(&block) > MIN_STRUCTURED_CHARS {
            blocks.push(block);
        }
        i += 1 + steps.len();
    }

    blocks
}

/// Heading sections, else paragraphs, else sentence chunks when every
/// paragraph is short.
pub fn split_into_chunks(text: &str) -> Vec<String> {
    let sections = heading_sections(text);
    if !sections.is_empty() {
        return sections;
    }

    let chunks: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| char_len(p) > MIN_SECTION_CHARS)
        .map(str::to_string)
        .collect();

    let longest = chunks.iter().map(|c| char_len(c)).max().unwrap_or(0);
    if longest < MIN_PARAGRAPH_CHARS {
        return sentence_chunks(text);
    }
    chunks
}

/// A heading line and the body lines up to the next heading line.
fn heading_sections(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let headings: Vec<usize> = (0..lines.len())
        .filter(|&i| HEADING_LINE.is_match(lines[i]))
        .collect();

    let mut sections = Vec::new();
    for (n, &start) in headings.iter().enumerate() {
        let end = headings.get(n + 1).copied().unwrap_or(lines.len());
        let body = lines[start + 1..end]
            .iter()
            .filter(|line| !line.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        if body.is_empty() {
            continue;
        }
        let section = format!("{}\n{}", lines[start], body);
        if char_len(&section) > MIN_SECTION_CHARS {
            sections.push(section);
        }
    }
    sections
}

/// Split after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        if !chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            continue;
        }
        sentences.push(&text[start..end]);
        while chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map_or(text.len(), |&(j, _)| j);
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Greedily pack sentences into chunks below [`SENTENCE_CHUNK_CHARS`].
fn sentence_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if char_len(&current) + char_len(sentence) < SENTENCE_CHUNK_CHARS {
            current.push_str(sentence);
            current.push(' ');
        } else {
            if !current.trim().is_empty() {
                chunks.push(current.trim().to_string());
            }
            current = format!("{sentence} ");
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_blocks() {
        let text = "Lentil Soup\nIngredients: 1 cup red lentils, 1 onion, 2 cloves garlic, \
                    1 teaspoon cumin\nInstructions: Rinse the lentils. Cook everything for \
                    25 minutes and blend until smooth.\n\nServing notes follow here.";
        let blocks = recipes(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Lentil Soup • Ingredients: 1 cup red lentils"));
        assert!(blocks[0].contains("• Instructions: Rinse the lentils."));
        assert!(!blocks[0].contains("Serving notes"));
    }

    #[test]
    fn test_consecutive_recipes_are_split() {
        let text = "Bean Salad Ingredients: beans, parsley, lemon juice and olive oil \
                    Instructions: toss everything together and chill well before serving \
                    Tofu Bowl Ingredients: tofu, rice, greens and sesame dressing \
                    Instructions: bake the tofu, then assemble the bowls with the rice";
        let blocks = recipes(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Bean Salad"));
        assert!(!blocks[0].contains("Tofu Bowl"));
        assert!(blocks[1].contains("Tofu Bowl"));
    }

    #[test]
    fn test_bullet_list_blocks() {
        let text = "Pantry Staples • dried lentils and split peas • canned chickpeas and beans \
                    • brown rice, quinoa and oats • spices such as cumin and paprika";
        let blocks = bullet_lists(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Pantry Staples • dried lentils"));
    }

    #[test]
    fn test_step_list_blocks() {
        let text = "Preparation:\n1. Soak the chickpeas overnight in cold water\n\
                    2. Drain and simmer them for forty minutes\n\
                    3. Blend with tahini, lemon and garlic until smooth\nUnrelated line";
        let blocks = step_lists(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Preparation • 1. Soak"));
        assert!(!blocks[0].contains("Unrelated"));
    }

    #[test]
    fn test_heading_sections() {
        let text = "Weekend Brunch\nShakshuka with peppers and tomatoes is easy to scale up.\n\
                    Serve it with crusty bread.\nMidweek Dinners\nA tray bake of roasted roots \
                    and chickpeas needs little attention.";
        let chunks = split_into_chunks(text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("Weekend Brunch\nShakshuka"));
        assert!(chunks[1].starts_with("Midweek Dinners\nA tray bake"));
    }

    #[test]
    fn test_paragraph_chunks() {
        let long = "This paragraph describes the weekly plan in detail, including shopping, \
                    batch cooking and storage so that every dinner is ready quickly.";
        let text = format!("{long}\n\nshort one.\n\n{long}");
        let chunks = split_into_chunks(&text);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_sentence_accumulation_for_short_paragraphs() {
        let text = "one two three. four five six! seven eight nine? ten eleven twelve.";
        let chunks = split_into_chunks(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Soak beans. Cook 2.5 hours!  Serve?"),
            vec!["Soak beans.", "Cook 2.5 hours!", "Serve?"]
        );
        assert_eq!(split_sentences("no terminator"), vec!["no terminator"]);
        assert!(split_sentences("").is_empty());
    }
}
