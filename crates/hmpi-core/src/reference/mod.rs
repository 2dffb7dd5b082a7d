pub mod builtin;
pub mod schema;

use crate::error::HmpiError;
use crate::model::MetalKey;
use rust_decimal::Decimal;
use schema::{MetalInfo, MetalReference, ReferenceTableDef};
use std::collections::BTreeSet;
use std::path::Path;

/// A validated reference table: one standard and weight for every metal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    name: String,
    version: String,
    description: Option<String>,
    /// Exactly one entry per metal, in canonical order.
    entries: Vec<MetalReference>,
}

impl ReferenceTable {
    fn from_entries(
        name: String,
        version: String,
        description: Option<String>,
        mut entries: Vec<MetalReference>,
    ) -> Self {
        entries.sort_by_key(|e| e.metal);
        ReferenceTable {
            name,
            version,
            description,
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn entry(&self, metal: MetalKey) -> &MetalReference {
        &self.entries[metal.index()]
    }

    pub fn standard(&self, metal: MetalKey) -> Decimal {
        self.entry(metal).standard
    }

    pub fn weight(&self, metal: MetalKey) -> Decimal {
        self.entry(metal).weight
    }

    pub fn info(&self, metal: MetalKey) -> &MetalInfo {
        &self.entry(metal).info
    }

    pub fn total_weight(&self) -> Decimal {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetalReference> {
        self.entries.iter()
    }

    pub fn to_def(&self) -> ReferenceTableDef {
        ReferenceTableDef {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            metals: self.entries.clone(),
        }
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        builtin::builtin()
    }
}

impl TryFrom<ReferenceTableDef> for ReferenceTable {
    type Error = HmpiError;

    fn try_from(def: ReferenceTableDef) -> Result<Self, Self::Error> {
        validate_table(&def)?;
        Ok(ReferenceTable::from_entries(
            def.name,
            def.version,
            def.description,
            def.metals,
        ))
    }
}

/// Load a reference table from a JSON file.
pub fn load_table(path: &Path) -> Result<ReferenceTable, HmpiError> {
    let content = std::fs::read_to_string(path).map_err(|e| HmpiError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: ReferenceTableDef =
        serde_json::from_str(&content).map_err(|e| HmpiError::ReferenceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    ReferenceTable::try_from(def)
}

/// Parse a reference table from a JSON string (no file path context).
pub fn parse_table_str(json: &str) -> Result<ReferenceTable, HmpiError> {
    let def: ReferenceTableDef = serde_json::from_str(json)?;
    ReferenceTable::try_from(def)
}

/// Validate that a reference table defines every metal exactly once with a
/// positive standard and a weight in (0, 1].
pub fn validate_table(def: &ReferenceTableDef) -> Result<(), HmpiError> {
    let mut seen = BTreeSet::new();

    for entry in &def.metals {
        if !seen.insert(entry.metal) {
            return Err(HmpiError::ReferenceInvalid(format!(
                "{} is defined more than once",
                entry.metal
            )));
        }

        if entry.standard <= Decimal::ZERO {
            return Err(HmpiError::ReferenceInvalid(format!(
                "{} standard must be positive (got {})",
                entry.metal, entry.standard
            )));
        }

        if entry.weight <= Decimal::ZERO || entry.weight > Decimal::ONE {
            return Err(HmpiError::ReferenceInvalid(format!(
                "{} weight must be in (0, 1] (got {})",
                entry.metal, entry.weight
            )));
        }
    }

    let missing: Vec<&str> = MetalKey::ALL
        .iter()
        .filter(|m| !seen.contains(*m))
        .map(|m| m.code())
        .collect();
    if !missing.is_empty() {
        return Err(HmpiError::ReferenceInvalid(format!(
            "no standard and weight defined for: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}
