//! Batch conversion of an input folder of IEPs into tracking-sheet reports.
//!
//! Every document is handled in isolation: a document that fails to decode,
//! parse, or render is recorded as a failed outcome and the batch carries on.
//! Each report is written as soon as it and every document before it are
//! ready, so outputs are claimed in sorted input order and collisions are
//! deterministic: the first document to claim a name keeps it and later ones
//! fail. Rendered bytes are dropped once their file is written.
//!
//! # Example
//!
//! ```no_run
//! use iepsheet::batch::{Batch, BatchOptions};
//!
//! let report = Batch::new(BatchOptions::default()).run("inputs", "outputs")?;
//! println!("{} written, {} failed", report.succeeded(), report.failed());
//! # Ok::<(), iepsheet::Error>(())
//! ```

mod naming;
mod options;

pub use naming::{output_file_name, sanitize_name};
pub use options::{
    BatchOptions, Term, DEFAULT_DECODE_TIMEOUT, OUTPUT_PREFIX, TERM_END, TERM_START, TERM_TITLE,
};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde_json::json;

use crate::decode::{decode_document, LopdfDecoder, PdfDecoder};
use crate::error::{Error, Result};
use crate::extract::StudentRecord;
use crate::report::{write_pdf, PageGeometry, ReportDocument};

/// A rendered report that has not been written yet.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Student name and goals extracted from the input
    pub record: StudentRecord,

    /// File name the report should be written under
    pub file_name: String,

    /// Number of pages in the rendered report
    pub page_count: usize,

    /// Rendered PDF bytes
    pub pdf: Vec<u8>,
}

/// Summary of a report written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub output: PathBuf,
    pub record: StudentRecord,
    pub pages: usize,
}

/// What happened to one input document.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub input: PathBuf,
    pub result: Result<WrittenReport>,
}

impl DocumentOutcome {
    /// Check if the report was written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-document outcomes of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Number of reports written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when every document produced a report.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed documents with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    /// JSON summary of all outcomes.
    pub fn to_json(&self) -> Result<String> {
        let to_json_err = |e: serde_json::Error| Error::Render(e.to_string());

        let mut documents = Vec::with_capacity(self.outcomes.len());
        for o in &self.outcomes {
            let document = match &o.result {
                Ok(written) => json!({
                    "input": o.input.display().to_string(),
                    "status": "written",
                    "output": written.output.display().to_string(),
                    "record": serde_json::to_value(&written.record).map_err(to_json_err)?,
                    "pages": written.pages,
                }),
                Err(e) => json!({
                    "input": o.input.display().to_string(),
                    "status": "failed",
                    "kind": e.kind(),
                    "error": e.to_string(),
                }),
            };
            documents.push(document);
        }

        let summary = json!({
            "succeeded": self.succeeded(),
            "failed": self.failed(),
            "documents": documents,
        });
        serde_json::to_string_pretty(&summary).map_err(to_json_err)
    }
}

/// List the PDF files in `dir`, sorted by file name.
///
/// Entries without a `.pdf` extension (any case) are skipped.
///
/// # Errors
///
/// [`Error::InputDirectoryMissing`] when `dir` is not a directory.
pub fn discover_inputs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InputDirectoryMissing(dir.to_path_buf()));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            inputs.push(path);
        } else {
            log::info!("Skipping non-PDF input {}", path.display());
        }
    }

    inputs.sort();
    log::debug!("Found {} input documents in {}", inputs.len(), dir.display());
    Ok(inputs)
}

/// Batch runner.
pub struct Batch {
    decoder: Arc<dyn PdfDecoder>,
    options: BatchOptions,
}

impl Batch {
    /// Create a runner that decodes with lopdf.
    pub fn new(options: BatchOptions) -> Self {
        Self::with_decoder(Arc::new(LopdfDecoder::new()), options)
    }

    /// Create a runner with a custom decoder.
    pub fn with_decoder(decoder: Arc<dyn PdfDecoder>, options: BatchOptions) -> Self {
        Self { decoder, options }
    }

    /// Options this runner was created with.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Convert every PDF in `input_dir`, writing reports to `output_dir`.
    ///
    /// # Errors
    ///
    /// Only batch-level problems are errors: a missing input directory or an
    /// output directory that cannot be created. Per-document failures are
    /// reported in the returned [`BatchReport`].
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        let inputs = discover_inputs(input_dir)?;
        self.run_files(&inputs, output_dir.as_ref(), |_| {})
    }

    /// Convert the given files, calling `on_outcome` as each one is written
    /// or fails, in input order.
    pub fn run_files<F>(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        mut on_outcome: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(&DocumentOutcome),
    {
        fs::create_dir_all(output_dir)?;

        let mut writer = ReportWriter::new(output_dir);
        let mut report = BatchReport::default();
        let mut finish = |input: &Path, processed: Result<ProcessedDocument>| {
            let outcome = writer.write(input, processed);
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        };

        if self.options.parallel {
            self.process_in_order(inputs, |index, processed| {
                finish(inputs[index].as_path(), processed)
            });
        } else {
            for input in inputs {
                let processed = self.process(input);
                finish(input.as_path(), processed);
            }
        }

        Ok(report)
    }

    /// Prepare documents on the rayon pool and pass each one to `sink` in input
    /// order as soon as it and all earlier documents are ready.
    fn process_in_order<F>(&self, inputs: &[PathBuf], mut sink: F)
    where
        F: FnMut(usize, Result<ProcessedDocument>),
    {
        let (tx, rx) = crossbeam_channel::bounded(rayon::current_num_threads().max(1));

        std::thread::scope(|scope| {
            scope.spawn(move || {
                inputs
                    .par_iter()
                    .enumerate()
                    .for_each_with(tx, |tx, (index, path)| {
                        // The receiver lives until every sender is dropped.
                        let _ = tx.send((index, self.process(path)));
                    });
            });

            let mut pending = BTreeMap::new();
            let mut next = 0;
            for (index, processed) in rx {
                pending.insert(index, processed);
                while let Some(processed) = pending.remove(&next) {
                    sink(next, processed);
                    next += 1;
                }
            }
        });
    }

    /// Decode, parse and render one document without writing it.
    pub fn process(&self, path: &Path) -> Result<ProcessedDocument> {
        let text = decode_document(&self.decoder, path, self.options.decode_timeout)?;
        let record = StudentRecord::from_text(text.as_str(), self.options.extract_options())?;
        if record.goals.is_empty() {
            log::warn!("No goals found in {}", path.display());
        }

        let term = &self.options.term;
        let weeks = term.weeks();
        let report = ReportDocument::build(&term.title, &record.name, &record.goals, &weeks);
        let pages = report.layout();
        let pdf = write_pdf(&pages, PageGeometry::LETTER, &report.title)?;

        Ok(ProcessedDocument {
            file_name: output_file_name(&term.file_prefix, &record.name),
            page_count: pages.len(),
            record,
            pdf,
        })
    }
}

/// Claims output names and writes reports, one document at a time.
struct ReportWriter<'a> {
    output_dir: &'a Path,
    // Lower-cased so names differing only by case still collide on
    // case-insensitive filesystems.
    claimed: HashMap<String, PathBuf>,
}

impl<'a> ReportWriter<'a> {
    fn new(output_dir: &'a Path) -> Self {
        Self {
            output_dir,
            claimed: HashMap::new(),
        }
    }

    fn write(&mut self, input: &Path, processed: Result<ProcessedDocument>) -> DocumentOutcome {
        let result = processed.and_then(|doc| {
            let key = doc.file_name.to_lowercase();
            if let Some(first) = self.claimed.get(&key) {
                return Err(Error::OutputCollision {
                    name: doc.file_name,
                    first: first.clone(),
                });
            }
            let written = write_report(self.output_dir, doc)?;
            self.claimed.insert(key, input.to_path_buf());
            Ok(written)
        });

        match &result {
            Ok(written) => log::info!(
                "{} -> {} ({} goals)",
                input.display(),
                written.output.display(),
                written.record.goals.len()
            ),
            Err(e) => log::warn!("{} failed: {}", input.display(), e),
        }

        DocumentOutcome {
            input: input.to_path_buf(),
            result,
        }
    }
}

/// Write through a temp file in the same directory so a failure never
/// leaves a partial report behind.
fn write_report(output_dir: &Path, doc: ProcessedDocument) -> Result<WrittenReport> {
    let target = output_dir.join(&doc.file_name);
    let compose_err = |e: std::io::Error| {
        Error::ComposeFailure(format!("{}: {}", target.display(), e))
    };

    let mut tmp = tempfile::NamedTempFile::new_in(output_dir).map_err(compose_err)?;
    tmp.write_all(&doc.pdf).map_err(compose_err)?;
    tmp.as_file().sync_all().map_err(compose_err)?;
    tmp.persist(&target).map_err(|e| compose_err(e.error))?;

    Ok(WrittenReport {
        output: target.clone(),
        record: doc.record,
        pages: doc.page_count,
    })
}

/// Convert every PDF in `input_dir` with the lopdf decoder.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: BatchOptions,
) -> Result<BatchReport> {
    Batch::new(options).run(input_dir, output_dir)
}

/// Decode, parse and render a single PDF.
pub fn process_file<P: AsRef<Path>>(path: P, options: BatchOptions) -> Result<ProcessedDocument> {
    Batch::new(options).process(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::GoalMap;

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("inputs");
        assert!(matches!(
            discover_inputs(&missing),
            Err(Error::InputDirectoryMissing(p)) if p == missing
        ));
    }

    #[test]
    fn test_discover_sorted_pdfs_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", ".DS_Store"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let inputs = discover_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_report_counts() {
        let mut goals = GoalMap::new();
        goals.insert("Math".to_string(), "Count.".to_string());
        goals.insert("Art".to_string(), "Draw.".to_string());
        let report = BatchReport {
            outcomes: vec![
                DocumentOutcome {
                    input: PathBuf::from("a.pdf"),
                    result: Ok(WrittenReport {
                        output: PathBuf::from("out/a.pdf"),
                        record: StudentRecord {
                            name: "A".to_string(),
                            goals,
                        },
                        pages: 2,
                    }),
                },
                DocumentOutcome {
                    input: PathBuf::from("b.pdf"),
                    result: Err(Error::NameNotFound),
                },
            ],
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("b.pdf"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["documents"][1]["kind"], "name_not_found");
        let record = &json["documents"][0]["record"];
        assert_eq!(record["name"], "A");
        assert_eq!(record["goals"][1]["competency"], "Art");
        assert_eq!(record["goals"][1]["goal"], "Draw.");
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BatchReport::default().is_success());
    }
}
