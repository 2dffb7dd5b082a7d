use crate::model::MetalKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reference table as written in a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub metals: Vec<MetalReference>,
}

/// Regulatory standard and index weight for one metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalReference {
    pub metal: MetalKey,
    /// Maximum permissible concentration in mg/L (as string for exact decimal).
    pub standard: Decimal,
    /// Relative importance in the index, in (0, 1].
    pub weight: Decimal,
    #[serde(default)]
    pub info: MetalInfo,
}

/// Display metadata shown next to a metal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub health_effects: String,
    #[serde(default)]
    pub sources: String,
    /// Limit as quoted by the issuing body, e.g. "0.003 mg/L (WHO)".
    #[serde(default)]
    pub limit: String,
}
