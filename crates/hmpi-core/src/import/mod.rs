pub mod header;
pub mod records;
pub mod tabular;
pub mod workbook;

use crate::error::HmpiError;
use crate::model::{RawSample, Sample, SampleId};
use crate::validation::validate;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Supported batch input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    Csv,
    Json,
    Xlsx,
}

impl BatchFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<BatchFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(BatchFormat::Csv),
            "json" => Some(BatchFormat::Json),
            "xlsx" => Some(BatchFormat::Xlsx),
            _ => None,
        }
    }

    /// Like `from_path`, but an unrecognised extension is an import error.
    pub fn for_file(path: &Path) -> Result<BatchFormat, HmpiError> {
        BatchFormat::from_path(path).ok_or_else(|| {
            HmpiError::ImportFormat(format!(
                "unsupported file type '{}' (expected .csv, .json or .xlsx)",
                path.display()
            ))
        })
    }
}

/// A record the validator rejected during a batch import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// 1-based position of the record in the batch.
    pub record: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub field: String,
    pub reason: String,
}

/// Outcome of a batch import with at least one valid record.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: Vec<Sample>,
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<RecordFailure>,
    /// 1-based record number of each entry in `imported`.
    #[serde(skip)]
    positions: Vec<usize>,
}

impl ImportSummary {
    /// Move an imported sample over to the failures, keeping failures in
    /// record order. Returns false if no imported sample has this id.
    pub fn reject(&mut self, id: SampleId, field: &str, reason: String) -> bool {
        let Some(idx) = self.imported.iter().position(|s| s.id() == id) else {
            return false;
        };
        let sample = self.imported.remove(idx);
        let record = self.positions.remove(idx);

        self.failures.push(RecordFailure {
            record,
            name: Some(sample.name().to_string()),
            field: field.to_string(),
            reason,
        });
        self.failures.sort_by_key(|f| f.record);
        self.success_count -= 1;
        self.error_count += 1;
        true
    }
}

/// Validate every record independently.
///
/// A rejected record is logged and counted; it never stops the batch.
/// Fails with `NoValidRecords` when nothing validated.
pub fn import_batch(records: &[RawSample]) -> Result<ImportSummary, HmpiError> {
    let mut imported = Vec::new();
    let mut positions = Vec::new();
    let mut failures = Vec::new();

    for (i, raw) in records.iter().enumerate() {
        match validate(raw) {
            Ok(sample) => {
                imported.push(sample);
                positions.push(i + 1);
            }
            Err(e) => {
                warn!("skipped record {}: {}", i + 1, e);
                failures.push(RecordFailure {
                    record: i + 1,
                    name: raw.name.clone(),
                    field: e.field().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if imported.is_empty() {
        return Err(HmpiError::NoValidRecords {
            errors: failures.len(),
        });
    }

    info!(
        "imported {} sample(s), {} record(s) rejected",
        imported.len(),
        failures.len()
    );

    Ok(ImportSummary {
        success_count: imported.len(),
        error_count: failures.len(),
        imported,
        failures,
        positions,
    })
}

/// Parse batch content in the given format into raw records.
pub fn parse_batch(content: &[u8], format: BatchFormat) -> Result<Vec<RawSample>, HmpiError> {
    match format {
        BatchFormat::Csv => {
            let text = std::str::from_utf8(content)
                .map_err(|e| HmpiError::ImportFormat(format!("CSV is not valid UTF-8: {e}")))?;
            tabular::parse_csv(text)
        }
        BatchFormat::Json => records::parse_records(content),
        BatchFormat::Xlsx => workbook::parse_workbook(content),
    }
}

/// Parse and validate batch content.
pub fn import_bytes(content: &[u8], format: BatchFormat) -> Result<ImportSummary, HmpiError> {
    let records = parse_batch(content, format)?;
    import_batch(&records)
}

/// Read, parse and validate a batch file, choosing the format by extension.
pub fn import_file(path: &Path) -> Result<ImportSummary, HmpiError> {
    let format = BatchFormat::for_file(path)?;
    let content = std::fs::read(path)?;
    import_bytes(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetalKey;
    use std::io::Write;

    fn record(name: &str, cd: &str) -> RawSample {
        RawSample::new(name)
            .with_metal(MetalKey::Cd, cd)
            .with_metal(MetalKey::Pb, "0.01")
            .with_metal(MetalKey::Cr, "0.05")
            .with_metal(MetalKey::Cu, "2")
            .with_metal(MetalKey::Zn, "3")
            .with_metal(MetalKey::Ni, "0.07")
    }

    #[test]
    fn test_partial_failure() {
        let records = vec![
            record("A", "0.001"),
            record("B", "0.002"),
            record("C", "-0.003"),
            record("D", "0.004"),
            record("E", "0.005"),
        ];
        let summary = import_batch(&records).unwrap();
        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.imported.len(), 4);
        assert_eq!(summary.failures[0].record, 3);
        assert_eq!(summary.failures[0].field, "cd");
        let names: Vec<&str> = summary.imported.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "B", "D", "E"]);
    }

    #[test]
    fn test_reject_moves_sample_to_failures() {
        let records = vec![record("A", "0.001"), record("B", "-1"), record("C", "0.002")];
        let mut summary = import_batch(&records).unwrap();
        let id = summary.imported[1].id();

        assert!(summary.reject(id, "cd", "too large".into()));

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 2);
        let failed: Vec<usize> = summary.failures.iter().map(|f| f.record).collect();
        assert_eq!(failed, vec![2, 3]);
        assert_eq!(summary.failures[1].name.as_deref(), Some("C"));
        assert!(!summary.reject(id, "cd", "again".into()));
    }

    #[test]
    fn test_all_invalid_fails() {
        let records = vec![record("A", "x"), record("", "1")];
        let err = import_batch(&records).unwrap_err();
        assert!(matches!(err, HmpiError::NoValidRecords { errors: 2 }));
    }

    #[test]
    fn test_empty_batch_fails() {
        assert!(matches!(
            import_batch(&[]),
            Err(HmpiError::NoValidRecords { errors: 0 })
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(BatchFormat::from_path(Path::new("a.CSV")), Some(BatchFormat::Csv));
        assert_eq!(BatchFormat::from_path(Path::new("a.json")), Some(BatchFormat::Json));
        assert_eq!(BatchFormat::from_path(Path::new("a.xlsx")), Some(BatchFormat::Xlsx));
        assert_eq!(BatchFormat::from_path(Path::new("a.pdf")), None);
        assert_eq!(BatchFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_import_file_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "sampleName,latitude,longitude,cd,pb,cr,cu,zn,ni").unwrap();
        writeln!(file, "W1,10,20,0.003,0.01,0.05,2,3,0.07").unwrap();
        writeln!(file, "W2,95,20,0.003,0.01,0.05,2,3,0.07").unwrap();
        let summary = import_file(file.path()).unwrap();
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failures[0].field, "latitude");
    }

    #[test]
    fn test_import_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        assert!(matches!(
            import_file(file.path()),
            Err(HmpiError::ImportFormat(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_csv() {
        assert!(matches!(
            import_bytes(&[0xff, 0xfe, 0x00], BatchFormat::Csv),
            Err(HmpiError::ImportFormat(_))
        ));
    }
}
