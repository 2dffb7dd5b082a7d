use super::schema::{MetalInfo, MetalReference, ReferenceTableDef};
use super::ReferenceTable;
use crate::model::MetalKey;
use rust_decimal::Decimal;

pub const BUILTIN_NAME: &str = "WHO drinking-water guidelines";
pub const BUILTIN_VERSION: &str = "2022";

/// The reference table used when no custom file is given.
pub fn builtin() -> ReferenceTable {
    let metals = MetalKey::ALL.into_iter().map(builtin_entry).collect::<Vec<_>>();
    ReferenceTable::from_entries(
        BUILTIN_NAME.into(),
        BUILTIN_VERSION.into(),
        Some("Groundwater heavy metal limits used for the pollution index".into()),
        metals,
    )
}

/// The built-in table in file form, e.g. as a starting point for a custom table.
pub fn builtin_def() -> ReferenceTableDef {
    builtin().to_def()
}

fn builtin_entry(metal: MetalKey) -> MetalReference {
    let (standard, weight, health_effects, sources, limit) = match metal {
        MetalKey::Cd => (
            Decimal::new(3, 3),
            Decimal::new(20, 2),
            "Kidney damage and bone demineralisation; classified as a human carcinogen",
            "Phosphate fertilisers, zinc smelting, batteries, industrial effluent",
            "0.003 mg/L (WHO)",
        ),
        MetalKey::Pb => (
            Decimal::new(1, 2),
            Decimal::new(20, 2),
            "Neurotoxic, especially to children; anaemia, kidney and cardiovascular effects",
            "Old plumbing and solder, mining, battery recycling, leaded paint",
            "0.01 mg/L (WHO)",
        ),
        MetalKey::Cr => (
            Decimal::new(5, 2),
            Decimal::new(15, 2),
            "Hexavalent chromium is carcinogenic; skin and gastrointestinal irritation",
            "Tanneries, electroplating, steel production, wood preservatives",
            "0.05 mg/L (WHO, total chromium)",
        ),
        MetalKey::Cu => (
            Decimal::new(20, 1),
            Decimal::new(15, 2),
            "Gastrointestinal distress; liver and kidney damage under chronic exposure",
            "Copper pipes, mining, fungicides, industrial discharge",
            "2.0 mg/L (WHO)",
        ),
        MetalKey::Zn => (
            Decimal::new(30, 1),
            Decimal::new(15, 2),
            "Nausea and stomach cramps at high intake; interferes with copper uptake",
            "Galvanised pipes, mining, smelting, fertilisers",
            "3.0 mg/L (acceptability limit)",
        ),
        MetalKey::Ni => (
            Decimal::new(7, 2),
            Decimal::new(15, 2),
            "Allergic dermatitis; lung and nasal cancers under chronic exposure",
            "Stainless steel and alloy industries, electroplating, batteries",
            "0.07 mg/L (WHO)",
        ),
    };

    MetalReference {
        metal,
        standard,
        weight,
        info: MetalInfo {
            name: capitalize(metal.name()),
            health_effects: health_effects.into(),
            sources: sources.into(),
            limit: limit.into(),
        },
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
