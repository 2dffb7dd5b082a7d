use crate::model::{Category, Concentrations, MetalKey, SampleId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the engine derives from one set of concentrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmpiOutcome {
    /// Weighted mean of per-metal percentages of the regulatory standard.
    pub hmpi: Decimal,
    pub category: Category,
    /// Metal with the largest concentration/standard ratio, `None` when every
    /// ratio is zero.
    pub dominant_metal: Option<MetalKey>,
}

/// Computed result for a single stored sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Back-reference to the sample this was computed from.
    pub sample_id: SampleId,
    pub sample_name: String,
    pub hmpi: Decimal,
    pub category: Category,
    pub dominant_metal: Option<MetalKey>,
    pub computed_at: DateTime<Utc>,
    /// Copy of the sample's concentrations for display.
    pub metals: Concentrations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Decimal>,
}

impl SampleResult {
    pub fn outcome(&self) -> HmpiOutcome {
        HmpiOutcome {
            hmpi: self.hmpi,
            category: self.category,
            dominant_metal: self.dominant_metal,
        }
    }

    /// Dominant metal symbol, or "none".
    pub fn dominant_label(&self) -> &'static str {
        self.dominant_metal.map(|m| m.symbol()).unwrap_or("none")
    }
}
