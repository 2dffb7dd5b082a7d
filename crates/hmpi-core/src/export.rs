use crate::engine::SampleResult;
use crate::error::HmpiError;
use crate::model::MetalKey;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

pub const EXPORT_HEADER: [&str; 12] = [
    "Sample Name",
    "Latitude",
    "Longitude",
    "HMPI",
    "Category",
    "Dominant Metal",
    "Cd",
    "Pb",
    "Cr",
    "Cu",
    "Zn",
    "Ni",
];

/// HMPI as shown in exports and tables: two decimals, halves rounded away
/// from zero.
pub fn format_hmpi(hmpi: Decimal) -> String {
    let rounded = hmpi.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write results as CSV, one row per result.
///
/// Concentrations are written at full precision so they import back
/// unchanged; missing coordinates are empty fields.
pub fn write_csv<'a, W, I>(writer: W, results: I) -> Result<(), HmpiError>
where
    W: Write,
    I: IntoIterator<Item = &'a SampleResult>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;

    for result in results {
        let mut row = vec![
            result.sample_name.clone(),
            optional(result.latitude),
            optional(result.longitude),
            format_hmpi(result.hmpi),
            result.category.to_string(),
            result.dominant_label().to_string(),
        ];
        row.extend(
            MetalKey::ALL
                .iter()
                .map(|m| optional(result.metals.get(m).copied())),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render results as a CSV string.
pub fn to_csv<'a, I>(results: I) -> Result<String, HmpiError>
where
    I: IntoIterator<Item = &'a SampleResult>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, results)?;
    String::from_utf8(buf).map_err(|e| HmpiError::Export(e.to_string()))
}
