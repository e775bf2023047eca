//! Collection input metadata and JSON output records.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the per-collection metadata.
pub const METADATA_FILE: &str = "challenge1b_input.json";

/// The persona block of the input metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

/// The job block of the input metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// Contents of `challenge1b_input.json`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMetadata {
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl InputMetadata {
    /// Create metadata from a role and a task.
    pub fn new(role: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona: Persona { role: role.into() },
            job_to_be_done: JobToBeDone { task: task.into() },
        }
    }

    /// Read and parse a metadata file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Role and task joined into the text a persona profile is built from.
    pub fn persona_text(&self) -> String {
        format!("{} {}", self.persona.role, self.job_to_be_done.task)
    }
}

/// A ranked section title in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

/// A refined content excerpt in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// The `metadata` block of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// The serialized `<collection>_output.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionOutput {
    pub metadata: OutputMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

/// Per-document result: at most five sections and five excerpts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentAnalysis {
    pub document: String,
    pub sections: Vec<ExtractedSection>,
    pub content: Vec<SubsectionAnalysis>,
}

impl DocumentAnalysis {
    /// A result that contributes nothing, used for failed documents.
    pub fn empty(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            ..Default::default()
        }
    }

    /// Check if the document contributed nothing.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_ignores_extra_fields() {
        let raw = r#"{
            "challenge_info": {"challenge_id": "round_1b_001"},
            "documents": [{"filename": "a.pdf", "title": "A"}],
            "persona": {"role": "Food Contractor"},
            "job_to_be_done": {"task": "Prepare a vegetarian buffet"}
        }"#;
        let meta: InputMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.persona.role, "Food Contractor");
        assert_eq!(
            meta.persona_text(),
            "Food Contractor Prepare a vegetarian buffet"
        );
    }

    #[test]
    fn test_metadata_missing_fields_is_error() {
        let raw = r#"{"persona": {"role": "Chef"}}"#;
        assert!(serde_json::from_str::<InputMetadata>(raw).is_err());
    }

    #[test]
    fn test_output_field_names() {
        let output = CollectionOutput {
            metadata: OutputMetadata {
                input_documents: vec!["a.pdf".into()],
                persona: "Chef".into(),
                job_to_be_done: "Cook".into(),
                processing_timestamp: "2025-01-01T00:00:00".into(),
            },
            extracted_sections: vec![ExtractedSection {
                document: "a.pdf".into(),
                section_title: "Lentil Soup".into(),
                importance_rank: 1,
                page_number: 2,
            }],
            subsection_analysis: vec![],
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["extracted_sections"][0]["importance_rank"], 1);
        assert_eq!(value["metadata"]["job_to_be_done"], "Cook");
        assert!(value["subsection_analysis"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_load_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(METADATA_FILE);
        fs::write(
            &path,
            r#"{"persona": {"role": "Analyst"}, "job_to_be_done": {"task": "Review"}}"#,
        )
        .unwrap();
        let meta = InputMetadata::load(&path).unwrap();
        assert_eq!(meta, InputMetadata::new("Analyst", "Review"));
    }
}
