//! Persona-driven analysis.
//!
//! Leaf first: [`font_profile`] summarizes font sizes, [`titles`] proposes
//! section titles, [`persona`] derives keywords and requirement terms,
//! [`relevance`] scores text against them, [`content`] extracts excerpts and
//! [`select`] ranks and diversifies across a collection.

pub mod content;
pub mod font_profile;
pub mod lexicon;
pub mod persona;
pub mod relevance;
pub mod rules;
pub mod select;
pub mod titles;

pub use content::{completeness_score, ContentExtractor};
pub use font_profile::FontProfile;
pub use lexicon::{DomainLexicon, LexiconEntry};
pub use persona::PersonaProfile;
pub use relevance::{content_relevance, title_relevance};
pub use select::{select_content, select_sections, DEFAULT_SELECTION_LIMIT};
pub use titles::{extract_clean_title, is_valid_section_title, TitleGenerator};
