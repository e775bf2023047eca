//! Global ranking and diversification across a collection.

use std::collections::HashSet;

use super::persona::PersonaProfile;
use super::relevance::{content_relevance, title_relevance};
use crate::model::{DocumentAnalysis, ExtractedSection, SubsectionAnalysis};

/// Number of sections and excerpts in the collection output.
pub const DEFAULT_SELECTION_LIMIT: usize = 5;

/// Leading excerpt slots where an unused page number also counts as diverse.
const PAGE_DIVERSE_SLOTS: usize = 3;

/// Pick the top sections across all documents, at most one per document
/// until every document is represented or the limit is reached, then the
/// best of the rest. Ranks are renumbered from 1.
pub fn select_sections(
    analyses: &[DocumentAnalysis],
    persona: &PersonaProfile,
    limit: usize,
) -> Vec<ExtractedSection> {
    let mut scored: Vec<(f32, &ExtractedSection)> = analyses
        .iter()
        .flat_map(|analysis| &analysis.sections)
        .map(|section| (title_relevance(&section.section_title, persona), section))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut taken = vec![false; scored.len()];
    let mut documents = HashSet::new();
    let mut selected = Vec::new();

    for (i, (_, section)) in scored.iter().enumerate() {
        if selected.len() >= limit {
            break;
        }
        if documents.insert(section.document.as_str()) {
            taken[i] = true;
            selected.push(*section);
        }
    }
    for (i, (_, section)) in scored.iter().enumerate() {
        if selected.len() >= limit {
            break;
        }
        if !taken[i] {
            selected.push(*section);
        }
    }

    selected
        .into_iter()
        .zip(1..)
        .map(|(section, rank)| ExtractedSection {
            importance_rank: rank,
            ..section.clone()
        })
        .collect()
}

/// Pick the top excerpts across all documents, preferring unused documents
/// and, for the first slots, unused page numbers.
pub fn select_content(
    analyses: &[DocumentAnalysis],
    persona: &PersonaProfile,
    limit: usize,
) -> Vec<SubsectionAnalysis> {
    let mut scored: Vec<(f32, &SubsectionAnalysis)> = analyses
        .iter()
        .flat_map(|analysis| &analysis.content)
        .map(|excerpt| (content_relevance(&excerpt.refined_text, persona), excerpt))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut taken = vec![false; scored.len()];
    let mut documents = HashSet::new();
    let mut pages = HashSet::new();
    let mut selected = Vec::new();

    for (i, (_, excerpt)) in scored.iter().enumerate() {
        if selected.len() >= limit {
            break;
        }
        let new_document = !documents.contains(excerpt.document.as_str());
        let new_page = !pages.contains(&excerpt.page_number);
        if new_document || (selected.len() < PAGE_DIVERSE_SLOTS && new_page) {
            documents.insert(excerpt.document.as_str());
            pages.insert(excerpt.page_number);
            taken[i] = true;
            selected.push((*excerpt).clone());
        }
    }
    for (i, (_, excerpt)) in scored.iter().enumerate() {
        if selected.len() >= limit {
            break;
        }
        // identical excerpts count once
        if !taken[i] && !selected.contains(*excerpt) {
            selected.push((*excerpt).clone());
        }
    }

    selected
}
