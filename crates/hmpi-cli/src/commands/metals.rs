use hmpi_core::engine::hmpi::{MODERATE_LIMIT, SAFE_LIMIT};
use hmpi_core::error::HmpiError;
use hmpi_core::model::MetalKey;
use hmpi_core::reference::{self, ReferenceTable};
use std::path::{Path, PathBuf};

use super::load_reference;

pub fn list(reference_file: Option<PathBuf>) -> Result<(), HmpiError> {
    let table = load_reference(reference_file.as_deref())?;

    println!("{} (version {})\n", table.name(), table.version());
    if let Some(desc) = table.description() {
        println!("{}\n", desc);
    }

    println!("  {:<10} {:<6} {:>12}  {:>6}", "Metal", "Symbol", "Standard", "Weight");
    println!("  {}", "-".repeat(40));
    for entry in table.iter() {
        println!(
            "  {:<10} {:<6} {:>7} mg/L  {:>6}",
            entry.metal.name(),
            entry.metal.symbol(),
            entry.standard.to_string(),
            entry.weight.to_string()
        );
    }
    println!();
    println!("  Total weight: {}", table.total_weight());
    println!();

    Ok(())
}

pub fn explain(metal: &str, reference_file: Option<PathBuf>) -> Result<(), HmpiError> {
    let key = MetalKey::from_str_loose(metal).ok_or_else(|| {
        HmpiError::ReferenceInvalid(format!(
            "unknown metal '{metal}' (expected one of: {})",
            MetalKey::ALL.map(|m| m.code()).join(", ")
        ))
    })?;
    let table = load_reference(reference_file.as_deref())?;

    for line in explain_lines(key, &table) {
        println!("{line}");
    }

    Ok(())
}

fn explain_lines(key: MetalKey, table: &ReferenceTable) -> Vec<String> {
    let entry = table.entry(key);
    let info = &entry.info;
    let title = if info.name.is_empty() {
        key.name()
    } else {
        info.name.as_str()
    };

    let mut lines = vec![
        format!("{} ({})\n", title, key.symbol()),
        format!("  Table:          {} (v{})", table.name(), table.version()),
        format!("  Standard:       {} mg/L", entry.standard),
        format!("  Weight:         {}", entry.weight),
    ];
    if !info.limit.is_empty() {
        lines.push(format!("  Quoted limit:   {}", info.limit));
    }
    lines.push(String::new());
    if !info.health_effects.is_empty() {
        lines.push(format!("  Health effects: {}", info.health_effects));
    }
    if !info.sources.is_empty() {
        lines.push(format!("  Sources:        {}", info.sources));
    }
    lines.push(String::new());
    lines.push("A concentration equal to the standard contributes 100 to the index;".into());
    lines.push(format!(
        "samples up to {} are safe, up to {} moderate, above that hazardous.\n",
        SAFE_LIMIT, MODERATE_LIMIT
    ));
    lines
}

pub fn schema() -> Result<(), HmpiError> {
    print!(
        r#"JSON Reference Table Schema
===========================

A reference table gives every metal a regulatory standard and a weight.
`hmpi calculate --reference FILE` uses it instead of the built-in WHO
limits.

Top-level fields:
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  Where the limits come from
  version       (string, required)  Version identifier (e.g., "2022")
  metals        (array, required)   One entry per metal (see below)

Each entry in the "metals" array:
  metal         (string, required)  One of: cd, pb, cr, cu, zn, ni.
                                    Every metal must appear exactly once.
  standard      (string, required)  Maximum permissible concentration in
                                    mg/L. Must be greater than zero.
  weight        (string, required)  Relative importance in the index,
                                    greater than 0 and at most 1. Weights
                                    do not need to sum to 1.
  info          (object, optional)  Display text: name, health_effects,
                                    sources, limit.

Index:
  hmpi = sum(concentration / standard * weight * 100) / sum(weight)

Example:
"#
    );

    let example = reference::builtin::builtin_def();
    println!("{}", serde_json::to_string_pretty(&example)?);
    println!();
    println!("Note: standards and weights must be quoted strings, not bare");
    println!("numbers, to preserve exact decimal precision (e.g., \"0.003\").");

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), HmpiError> {
    let table = reference::load_table(file)?;

    println!(
        "Reference table '{}' (v{}) is valid.",
        table.name(),
        table.version()
    );
    println!("  Metals: {}", MetalKey::ALL.map(|m| m.code()).join(", "));
    println!("  Total weight: {}", table.total_weight());

    let mut warnings = Vec::new();
    for entry in table.iter() {
        if entry.info.health_effects.is_empty() {
            warnings.push(format!("{} has no health effects text", entry.metal));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
