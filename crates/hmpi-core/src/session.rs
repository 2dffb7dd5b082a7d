use crate::engine::{compute_sample, SampleResult};
use crate::error::HmpiError;
use crate::import::{import_bytes, BatchFormat, ImportSummary};
use crate::model::{RawSample, SampleId};
use crate::reference::ReferenceTable;
use crate::store::SampleStore;
use crate::validation::validate;
use log::info;

/// What a calculate request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculateTarget {
    Sample(SampleId),
    All,
}

/// The command surface a front end drives.
///
/// One session is created per analysis and owns the store. Every command
/// runs to completion and either commits fully or leaves the store as it was.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: SampleStore,
}

impl Session {
    pub fn new(reference: ReferenceTable) -> Self {
        Session {
            store: SampleStore::new(reference),
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SampleStore {
        &mut self.store
    }

    /// Validate a single submitted sample, store it and compute its result.
    pub fn on_sample_submitted(
        &mut self,
        raw: &RawSample,
    ) -> Result<SampleResult, HmpiError> {
        let sample = validate(raw)?;
        let result = compute_sample(&sample, self.store.reference())?;
        self.store.insert(sample, result.clone());
        Ok(result)
    }

    /// Import a batch file and compute results for every valid sample.
    ///
    /// Records that fail validation or whose index cannot be computed are
    /// reported in the summary; the samples it lists are now in the store.
    /// Fails with `NoValidRecords` when no record made it into the store.
    pub fn on_batch_file_loaded(
        &mut self,
        content: &[u8],
        format: BatchFormat,
    ) -> Result<ImportSummary, HmpiError> {
        let mut summary = import_bytes(content, format)?;
        let (added, failed) = self.store.add_computed(summary.imported.clone());

        for failure in &failed {
            summary.reject(failure.sample.id(), failure.field(), failure.error.to_string());
        }
        if summary.imported.is_empty() {
            return Err(HmpiError::NoValidRecords {
                errors: summary.error_count,
            });
        }

        info!(
            "batch loaded: {} sample(s) added, {} total",
            added.len(),
            self.store.len()
        );
        Ok(summary)
    }

    /// Recompute one sample or all of them and return the fresh results.
    ///
    /// An unknown sample id yields an empty list.
    pub fn on_calculate_requested(
        &mut self,
        target: CalculateTarget,
    ) -> Result<Vec<SampleResult>, HmpiError> {
        match target {
            CalculateTarget::Sample(id) => {
                Ok(self.store.recompute(id)?.cloned().into_iter().collect())
            }
            CalculateTarget::All => {
                self.store.recompute_all()?;
                Ok(self.store.results().into_iter().cloned().collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, MetalKey};
    use rust_decimal_macros::dec;

    const CSV: &str = "sampleName,latitude,longitude,cd,pb,cr,cu,zn,ni\n\
                       W1,10,20,0.003,0.01,0.05,2,3,0.07\n\
                       W2,,,0.009,0.03,0.15,6,9,0.21\n\
                       W3,,,-1,0.01,0.05,2,3,0.07\n";

    fn raw() -> RawSample {
        RawSample::new("Form sample")
            .with_metal(MetalKey::Cd, "0.006")
            .with_metal(MetalKey::Pb, "0.02")
            .with_metal(MetalKey::Cr, "0.1")
            .with_metal(MetalKey::Cu, "4")
            .with_metal(MetalKey::Zn, "6")
            .with_metal(MetalKey::Ni, "0.14")
    }

    #[test]
    fn test_sample_submitted() {
        let mut session = Session::default();
        let result = session.on_sample_submitted(&raw()).unwrap();
        assert_eq!(result.hmpi, dec!(200));
        assert_eq!(result.category, Category::Moderate);
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().result(result.sample_id), Some(&result));
    }

    #[test]
    fn test_invalid_submission_changes_nothing() {
        let mut session = Session::default();
        let err = session
            .on_sample_submitted(&raw().with_metal(MetalKey::Zn, "-3"))
            .unwrap_err();
        assert!(matches!(err, HmpiError::Validation(_)));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_batch_loaded() {
        let mut session = Session::default();
        let summary = session
            .on_batch_file_loaded(CSV.as_bytes(), BatchFormat::Csv)
            .unwrap();
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.error_count, 1);

        let results = session.store().results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].category, Category::Safe);
        assert_eq!(results[1].hmpi, dec!(300));
        assert_eq!(results[1].category, Category::Hazardous);
    }

    #[test]
    fn test_batch_overflowing_row_is_rejected_alone() {
        let csv = "sampleName,latitude,longitude,cd,pb,cr,cu,zn,ni\n\
                   Good,,,0.003,0.01,0.05,2,3,0.07\n\
                   Huge,,,1e27,0.01,0.05,2,3,0.07\n";
        let mut session = Session::default();

        let summary = session
            .on_batch_file_loaded(csv.as_bytes(), BatchFormat::Csv)
            .unwrap();

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.imported.len(), 1);
        assert_eq!(summary.failures[0].record, 2);
        assert_eq!(summary.failures[0].field, "cd");
        assert!(summary.failures[0].reason.contains("cadmium"));
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().results()[0].sample_name, "Good");
    }

    #[test]
    fn test_batch_with_only_overflowing_rows_fails() {
        let csv = "sampleName,latitude,longitude,cd,pb,cr,cu,zn,ni\n\
                   Huge,,,0,1e28,0,0,0,0\n";
        let mut session = Session::default();

        let err = session
            .on_batch_file_loaded(csv.as_bytes(), BatchFormat::Csv)
            .unwrap_err();

        assert!(matches!(err, HmpiError::NoValidRecords { errors: 1 }));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_batch_missing_columns_changes_nothing() {
        let mut session = Session::default();
        let err = session
            .on_batch_file_loaded(b"sampleName,cd\nW,1\n", BatchFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, HmpiError::MissingColumns(_)));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_calculate_requested() {
        let mut session = Session::default();
        let first = session.on_sample_submitted(&raw()).unwrap();
        session
            .on_batch_file_loaded(CSV.as_bytes(), BatchFormat::Csv)
            .unwrap();

        let one = session
            .on_calculate_requested(CalculateTarget::Sample(first.sample_id))
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].outcome(), first.outcome());

        let all = session.on_calculate_requested(CalculateTarget::All).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].sample_id, first.sample_id);

        session.store_mut().remove(first.sample_id);
        let none = session
            .on_calculate_requested(CalculateTarget::Sample(first.sample_id))
            .unwrap();
        assert!(none.is_empty());
    }
}
