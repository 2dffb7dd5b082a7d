use crate::engine::{compute_sample, SampleResult};
use crate::error::HmpiError;
use crate::model::{Category, Sample, SampleId};
use crate::reference::ReferenceTable;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// In-memory collection of samples and their computed results.
///
/// Samples keep insertion order. At most one result exists per sample and
/// removing a sample removes its result.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    reference: ReferenceTable,
    samples: Vec<Sample>,
    results: HashMap<SampleId, SampleResult>,
}

/// Aggregate view over the computed results, used for chart scaling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub samples: usize,
    pub computed: usize,
    pub safe: usize,
    pub moderate: usize,
    pub hazardous: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hmpi: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hmpi: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_hmpi: Option<Decimal>,
}

/// A sample left out of the store because its index could not be computed.
#[derive(Debug)]
pub struct ComputeFailure {
    pub sample: Sample,
    pub error: HmpiError,
}

impl ComputeFailure {
    /// Input field the failure refers to, using import column names.
    pub fn field(&self) -> &'static str {
        match &self.error {
            HmpiError::ComputeOverflow { metal } => metal.code(),
            _ => "hmpi",
        }
    }
}

impl StoreSummary {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Safe => self.safe,
            Category::Moderate => self.moderate,
            Category::Hazardous => self.hazardous,
        }
    }
}

impl SampleStore {
    pub fn new(reference: ReferenceTable) -> Self {
        SampleStore {
            reference,
            samples: Vec::new(),
            results: HashMap::new(),
        }
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    /// Append a sample. Returns false if a sample with the same id is
    /// already stored.
    pub fn add(&mut self, sample: Sample) -> bool {
        if self.sample(sample.id()).is_some() {
            return false;
        }
        self.samples.push(sample);
        true
    }

    /// Add samples and compute their results.
    ///
    /// A sample the engine cannot compute is not stored; it comes back in
    /// the failure list and the remaining samples are still added.
    pub fn add_computed(
        &mut self,
        samples: Vec<Sample>,
    ) -> (Vec<SampleResult>, Vec<ComputeFailure>) {
        let mut added = Vec::with_capacity(samples.len());
        let mut failed = Vec::new();

        for sample in samples {
            match compute_sample(&sample, &self.reference) {
                Ok(result) => {
                    if self.insert(sample, result.clone()) {
                        added.push(result);
                    }
                }
                Err(error) => {
                    warn!(
                        "sample {} '{}' not stored: {}",
                        sample.id(),
                        sample.name(),
                        error
                    );
                    failed.push(ComputeFailure { sample, error });
                }
            }
        }

        (added, failed)
    }

    /// Store a sample together with a result computed from it.
    pub(crate) fn insert(&mut self, sample: Sample, result: SampleResult) -> bool {
        let id = sample.id();
        if !self.add(sample) {
            return false;
        }
        self.results.insert(id, result);
        true
    }

    /// Remove a sample and its result.
    pub fn remove(&mut self, id: SampleId) -> Option<Sample> {
        let pos = self.samples.iter().position(|s| s.id() == id)?;
        self.results.remove(&id);
        Some(self.samples.remove(pos))
    }

    /// Compute (or recompute) the result for one sample.
    ///
    /// An unknown id is not an error: nothing happens and `Ok(None)` is
    /// returned.
    pub fn recompute(&mut self, id: SampleId) -> Result<Option<&SampleResult>, HmpiError> {
        let Some(sample) = self.samples.iter().find(|s| s.id() == id) else {
            debug!("recompute ignored for unknown sample {id}");
            return Ok(None);
        };
        let result = compute_sample(sample, &self.reference)?;
        self.results.insert(id, result);
        Ok(self.results.get(&id))
    }

    /// Recompute every sample in insertion order.
    ///
    /// All results are computed first and committed together; on error the
    /// previous results stay in place.
    pub fn recompute_all(&mut self) -> Result<usize, HmpiError> {
        let fresh = self
            .samples
            .iter()
            .map(|s| compute_sample(s, &self.reference))
            .collect::<Result<Vec<_>, _>>()?;

        self.results = fresh.into_iter().map(|r| (r.sample_id, r)).collect();
        Ok(self.results.len())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.results.clear();
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, id: SampleId) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id() == id)
    }

    pub fn result(&self, id: SampleId) -> Option<&SampleResult> {
        self.results.get(&id)
    }

    /// Computed results in sample insertion order.
    pub fn results(&self) -> Vec<&SampleResult> {
        self.samples
            .iter()
            .filter_map(|s| self.results.get(&s.id()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn summary(&self) -> StoreSummary {
        let results = self.results();
        let mut summary = StoreSummary {
            samples: self.samples.len(),
            computed: results.len(),
            ..Default::default()
        };

        for r in &results {
            match r.category {
                Category::Safe => summary.safe += 1,
                Category::Moderate => summary.moderate += 1,
                Category::Hazardous => summary.hazardous += 1,
            }
        }

        summary.min_hmpi = results.iter().map(|r| r.hmpi).min();
        summary.max_hmpi = results.iter().map(|r| r.hmpi).max();
        summary.mean_hmpi = results
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.hmpi))
            .and_then(|total| total.checked_div(Decimal::from(results.len())))
            .map(|mean| mean.round_dp(2));

        summary
    }
}
