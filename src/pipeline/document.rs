//! Per-document analysis: titles and excerpts of one decoded document.

use crate::analysis::{ContentExtractor, FontProfile, PersonaProfile, TitleGenerator};
use crate::model::{DocumentAnalysis, DocumentText, ExtractedSection, SubsectionAnalysis};
use crate::render::clean_special_symbols;

use super::options::EngineOptions;

/// Rank the section titles and content excerpts of `doc` for `persona`.
///
/// Sections carry per-document ranks starting at 1. Excerpt text is passed
/// through the symbol cleaner and excerpts that end up empty are dropped.
pub fn analyze_document(
    doc: &DocumentText,
    persona: &PersonaProfile,
    options: &EngineOptions,
) -> DocumentAnalysis {
    if doc.is_empty() {
        log::warn!("{}: no extractable text", doc.name);
        return DocumentAnalysis::empty(&doc.name);
    }

    let profile = FontProfile::from_blocks(doc.blocks());

    let sections: Vec<ExtractedSection> = TitleGenerator::new(persona)
        .with_fallback_limit(options.fallback_limit)
        .generate(doc, &profile)
        .into_iter()
        .take(options.sections_per_document)
        .zip(1..)
        .map(|(candidate, rank)| ExtractedSection {
            document: doc.name.clone(),
            section_title: candidate.title,
            importance_rank: rank,
            page_number: candidate.page,
        })
        .collect();

    let content: Vec<SubsectionAnalysis> = ContentExtractor::new(persona)
        .with_max_chars(options.max_content_chars)
        .with_limit(options.content_per_document)
        .extract(doc)
        .into_iter()
        .filter_map(|block| {
            let refined_text = clean_special_symbols(&block.text);
            (!refined_text.is_empty()).then(|| SubsectionAnalysis {
                document: doc.name.clone(),
                refined_text,
                page_number: block.page,
            })
        })
        .collect();

    log::debug!(
        "{}: {} sections, {} excerpts",
        doc.name,
        sections.len(),
        content.len()
    );

    DocumentAnalysis {
        document: doc.name.clone(),
        sections,
        content,
    }
}
