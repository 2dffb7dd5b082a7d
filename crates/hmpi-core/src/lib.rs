pub mod engine;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod reference;
pub mod session;
pub mod store;
pub mod validation;

use engine::SampleResult;
use error::HmpiError;
use import::{BatchFormat, RecordFailure};
use reference::ReferenceTable;
use serde::Serialize;
use session::Session;
use std::path::Path;
use store::StoreSummary;

/// Everything a front end needs to render one analysed batch.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Name of the reference table the results were computed with.
    pub reference: String,
    pub results: Vec<SampleResult>,
    pub summary: StoreSummary,
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<RecordFailure>,
}

/// Main API entry point: import a batch and compute every valid sample.
///
/// Rejected records are reported in the analysis rather than failing it;
/// structural problems and batches with no valid record are errors.
pub fn analyze_batch(
    content: &[u8],
    format: BatchFormat,
    reference: ReferenceTable,
) -> Result<Analysis, HmpiError> {
    let mut session = Session::new(reference);
    let summary = session.on_batch_file_loaded(content, format)?;

    let store = session.store();
    Ok(Analysis {
        reference: store.reference().name().to_string(),
        results: store.results().into_iter().cloned().collect(),
        summary: store.summary(),
        success_count: summary.success_count,
        error_count: summary.error_count,
        failures: summary.failures,
    })
}

/// Read a batch file and analyse it, choosing the format by extension.
pub fn analyze_file(path: &Path, reference: ReferenceTable) -> Result<Analysis, HmpiError> {
    let format = BatchFormat::for_file(path)?;
    let content = std::fs::read(path)?;
    analyze_batch(&content, format, reference)
}
