//! Collection and batch processing.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use rayon::prelude::*;

use crate::analysis::{select_content, select_sections, PersonaProfile};
use crate::detect::{document_name, list_pdf_documents};
use crate::error::{Error, Result};
use crate::model::{
    CollectionOutput, DocumentAnalysis, InputMetadata, OutputMetadata, METADATA_FILE,
};
use crate::parser::DocumentDecoder;
use crate::render::write_output;

use super::document::analyze_document;
use super::options::EngineOptions;
use super::Engine;

/// What happened to one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// The output file was written.
    Written(PathBuf),
    /// Nothing was written; the reason is logged.
    Skipped(String),
}

/// Counters over one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Collection directories found
    pub total: usize,
    /// Collections with an output file
    pub processed: usize,
    /// Collections without metadata or documents
    pub skipped: usize,
    /// Collections that failed with an error
    pub failed: usize,
}

impl BatchSummary {
    /// Count the result of one collection.
    pub fn record(&mut self, result: &Result<CollectionOutcome>) {
        self.total += 1;
        match result {
            Ok(CollectionOutcome::Written(_)) => self.processed += 1,
            Ok(CollectionOutcome::Skipped(_)) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Check if every collection produced an output file.
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} collections processed ({} skipped, {} failed)",
            self.processed, self.total, self.skipped, self.failed
        )
    }
}

/// Hooks called while a batch runs.
///
/// All methods do nothing by default.
pub trait BatchObserver {
    /// Called once the collections have been listed.
    fn on_batch_start(&mut self, total: usize) {
        let _ = total;
    }

    /// Called before a collection is processed.
    fn on_collection_start(&mut self, dir: &Path) {
        let _ = dir;
    }

    /// Called with the result of each collection, after it has been counted.
    fn on_collection_end(&mut self, dir: &Path, result: &Result<CollectionOutcome>) {
        let _ = (dir, result);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultObserver;

impl BatchObserver for DefaultObserver {}

/// List the collection directories of `input_dir`, sorted by name.
pub fn list_collections<P: AsRef<Path>>(input_dir: P) -> Result<Vec<PathBuf>> {
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(Error::InvalidPath(input_dir.to_path_buf()));
    }

    let mut collections: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    collections.sort();
    Ok(collections)
}

/// Directory name of a collection.
pub fn collection_name(dir: &Path) -> String {
    document_name(dir)
}

/// Output file name of a collection: `<collection>_output.json`.
pub fn output_file_name(dir: &Path) -> String {
    format!("{}_output.json", collection_name(dir))
}

/// Local time with microseconds, ISO-8601 without offset.
pub fn processing_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

impl Engine {
    /// Analyze a collection directory without writing anything.
    ///
    /// Fails with [`Error::MissingMetadata`] or [`Error::NoDocuments`] when
    /// the collection cannot produce an output. Failed or timed-out
    /// documents only log a warning.
    pub fn analyze_collection<P: AsRef<Path>>(&self, dir: P) -> Result<CollectionOutput> {
        let dir = dir.as_ref();
        let metadata_path = dir.join(METADATA_FILE);
        if !metadata_path.is_file() {
            return Err(Error::MissingMetadata(metadata_path));
        }
        let metadata = InputMetadata::load(&metadata_path)?;

        let documents = list_pdf_documents(dir)?;
        if documents.is_empty() {
            return Err(Error::NoDocuments(dir.to_path_buf()));
        }

        let persona = Arc::new(PersonaProfile::from_metadata(
            &metadata,
            &self.options.lexicon,
        ));
        log::info!(
            "Collection {}: {} documents, persona {:?}",
            collection_name(dir),
            documents.len(),
            metadata.persona.role
        );

        let analyses = self.analyze_documents(&documents, &persona);
        let extracted_sections = select_sections(&analyses, &persona, self.options.selection_limit);
        let subsection_analysis =
            select_content(&analyses, &persona, self.options.selection_limit);

        Ok(CollectionOutput {
            metadata: OutputMetadata {
                input_documents: documents.iter().map(|p| document_name(p)).collect(),
                persona: metadata.persona.role,
                job_to_be_done: metadata.job_to_be_done.task,
                processing_timestamp: processing_timestamp(),
            },
            extracted_sections,
            subsection_analysis,
        })
    }

    /// Analyze a collection and write `<collection>_output.json` into
    /// `output_dir`.
    ///
    /// Collections without metadata or documents are skipped with an error
    /// log; other failures are returned.
    pub fn process_collection<P, Q>(&self, dir: P, output_dir: Q) -> Result<CollectionOutcome>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let output = match self.analyze_collection(dir) {
            Ok(output) => output,
            Err(e @ (Error::MissingMetadata(_) | Error::NoDocuments(_))) => {
                log::error!("Skipping collection {}: {e}", collection_name(dir));
                return Ok(CollectionOutcome::Skipped(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        let path = output_dir.as_ref().join(output_file_name(dir));
        write_output(&output, &path)?;
        log::info!(
            "Wrote {} ({} sections, {} excerpts)",
            path.display(),
            output.extracted_sections.len(),
            output.subsection_analysis.len()
        );
        Ok(CollectionOutcome::Written(path))
    }

    /// Process every collection under `input_dir`, one after another.
    ///
    /// Fails only when `input_dir` is not a directory or `output_dir`
    /// cannot be created. Per-collection failures are logged and counted.
    pub fn run_batch<P, Q>(&self, input_dir: P, output_dir: Q) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.run_batch_with(input_dir, output_dir, &mut DefaultObserver)
    }

    /// [`run_batch`](Self::run_batch), reporting progress to `observer`.
    pub fn run_batch_with<P, Q>(
        &self,
        input_dir: P,
        output_dir: Q,
        observer: &mut dyn BatchObserver,
    ) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        let collections = list_collections(input_dir)?;
        fs::create_dir_all(output_dir)?;

        log::info!(
            "Found {} collections in {}",
            collections.len(),
            input_dir.display()
        );
        observer.on_batch_start(collections.len());

        let mut summary = BatchSummary::default();
        for dir in &collections {
            observer.on_collection_start(dir);
            let result = self.process_collection(dir, output_dir);
            if let Err(e) = &result {
                log::error!("Collection {} failed: {e:?}", collection_name(dir));
            }
            summary.record(&result);
            observer.on_collection_end(dir, &result);
        }

        log::info!("{summary}");
        Ok(summary)
    }

    /// Analyze every document, keeping the input order.
    fn analyze_documents(
        &self,
        documents: &[PathBuf],
        persona: &Arc<PersonaProfile>,
    ) -> Vec<DocumentAnalysis> {
        let analyze = |path: &PathBuf| {
            self.analyze_path(path, persona).unwrap_or_else(|e| {
                log::warn!("Skipping {}: {e}", path.display());
                DocumentAnalysis::empty(document_name(path))
            })
        };

        if self.options.parallel {
            documents.par_iter().map(analyze).collect()
        } else {
            documents.iter().map(analyze).collect()
        }
    }

    /// Decode and analyze one document within the configured timeout.
    fn analyze_path(&self, path: &Path, persona: &Arc<PersonaProfile>) -> Result<DocumentAnalysis> {
        let Some(limit) = self.options.timeout else {
            return decode_and_analyze(self.decoder.as_ref(), path, persona, &self.options);
        };

        let (tx, rx) = crossbeam_channel::bounded(1);
        let decoder = Arc::clone(&self.decoder);
        let persona = Arc::clone(persona);
        let options = Arc::clone(&self.options);
        let owned = path.to_path_buf();

        // The worker is detached; after a timeout its result is dropped.
        thread::Builder::new()
            .name(format!("docsift-{}", document_name(path)))
            .spawn(move || {
                let result = decode_and_analyze(decoder.as_ref(), &owned, &persona, &options);
                let _ = tx.send(result);
            })?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout {
                document: document_name(path),
                seconds: whole_seconds(limit),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Other(format!(
                "analysis of {} stopped without a result",
                document_name(path)
            ))),
        }
    }
}

fn decode_and_analyze(
    decoder: &dyn DocumentDecoder,
    path: &Path,
    persona: &PersonaProfile,
    options: &EngineOptions,
) -> Result<DocumentAnalysis> {
    let doc = decoder.decode(path)?;
    Ok(analyze_document(&doc, persona, options))
}

fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs().max(u64::from(duration.subsec_nanos() > 0))
}
