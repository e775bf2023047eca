//! JSON rendering for collection output.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::model::CollectionOutput;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to JSON.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Write `output` as pretty UTF-8 JSON to `path`, replacing any existing file.
pub fn write_output<P: AsRef<Path>>(output: &CollectionOutput, path: P) -> Result<()> {
    let json = to_json(output, JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractedSection, OutputMetadata, SubsectionAnalysis};

    fn output() -> CollectionOutput {
        CollectionOutput {
            metadata: OutputMetadata {
                input_documents: vec!["menu.pdf".to_string()],
                persona: "Food Contractor".to_string(),
                job_to_be_done: "Prepare a vegetarian buffet".to_string(),
                processing_timestamp: "2025-07-10T15:31:22.632389".to_string(),
            },
            extracted_sections: vec![ExtractedSection {
                document: "menu.pdf".to_string(),
                section_title: "Falafel Wraps".to_string(),
                importance_rank: 1,
                page_number: 4,
            }],
            subsection_analysis: vec![SubsectionAnalysis {
                document: "menu.pdf".to_string(),
                refined_text: "Falafel • Ingredients: chickpeas".to_string(),
                page_number: 4,
            }],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&output(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"section_title\": \"Falafel Wraps\""));
        assert!(json.contains('\n'));
        // non-ASCII stays as UTF-8
        assert!(json.contains('•'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&output(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_write_output_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c1_output.json");
        write_output(&output(), &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let parsed: CollectionOutput = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, output());
    }
}
