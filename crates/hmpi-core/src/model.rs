use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Measured concentrations in mg/L, iterated in canonical metal order.
pub type Concentrations = BTreeMap<MetalKey, Decimal>;

/// The six metals the index is defined over.
///
/// Declaration order is the canonical order: it drives iteration in the
/// engine, tie-breaking for the dominant metal and the export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalKey {
    Cd,
    Pb,
    Cr,
    Cu,
    Zn,
    Ni,
}

impl MetalKey {
    pub const ALL: [MetalKey; 6] = [
        MetalKey::Cd,
        MetalKey::Pb,
        MetalKey::Cr,
        MetalKey::Cu,
        MetalKey::Zn,
        MetalKey::Ni,
    ];

    /// Position in canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name used in import files (`cd`, `pb`, ...).
    pub fn code(self) -> &'static str {
        match self {
            MetalKey::Cd => "cd",
            MetalKey::Pb => "pb",
            MetalKey::Cr => "cr",
            MetalKey::Cu => "cu",
            MetalKey::Zn => "zn",
            MetalKey::Ni => "ni",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MetalKey::Cd => "Cd",
            MetalKey::Pb => "Pb",
            MetalKey::Cr => "Cr",
            MetalKey::Cu => "Cu",
            MetalKey::Zn => "Zn",
            MetalKey::Ni => "Ni",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetalKey::Cd => "cadmium",
            MetalKey::Pb => "lead",
            MetalKey::Cr => "chromium",
            MetalKey::Cu => "copper",
            MetalKey::Zn => "zinc",
            MetalKey::Ni => "nickel",
        }
    }

    /// Accepts a field code, a chemical symbol or the English name.
    pub fn from_str_loose(s: &str) -> Option<MetalKey> {
        let lower = s.trim().to_lowercase();
        MetalKey::ALL
            .into_iter()
            .find(|m| lower == m.code() || lower == m.name())
    }
}

impl fmt::Display for MetalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Risk bucket derived from the HMPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safe,
    Moderate,
    Hazardous,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Safe, Category::Moderate, Category::Hazardous];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safe => "safe",
            Category::Moderate => "moderate",
            Category::Hazardous => "hazardous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque sample identifier, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(u64);

static NEXT_SAMPLE_ID: AtomicU64 = AtomicU64::new(1);

impl SampleId {
    pub(crate) fn next() -> SampleId {
        SampleId(NEXT_SAMPLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An unvalidated sample as it arrives from a form or an import file.
///
/// All values are kept as text; the validator decides what parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[serde(default)]
    pub metals: BTreeMap<MetalKey, String>,
}

impl RawSample {
    pub fn new(name: impl Into<String>) -> Self {
        RawSample {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_metal(mut self, metal: MetalKey, value: impl Into<String>) -> Self {
        self.metals.insert(metal, value.into());
        self
    }

    pub fn with_coordinates(
        mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }
}

/// A validated field measurement.
///
/// Only the validator constructs samples, so every sample carries all six
/// metals with non-negative concentrations and in-range coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    id: SampleId,
    name: String,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    metals: Concentrations,
}

impl Sample {
    pub(crate) fn new(
        name: String,
        latitude: Option<Decimal>,
        longitude: Option<Decimal>,
        metals: Concentrations,
    ) -> Self {
        Sample {
            id: SampleId::next(),
            name,
            latitude,
            longitude,
            metals,
        }
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> Option<Decimal> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<Decimal> {
        self.longitude
    }

    pub fn metals(&self) -> &Concentrations {
        &self.metals
    }

    pub fn concentration(&self, metal: MetalKey) -> Option<Decimal> {
        self.metals.get(&metal).copied()
    }
}
