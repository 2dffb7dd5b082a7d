use crate::error::HmpiError;
use crate::import::header::ColumnMap;
use crate::model::RawSample;

/// Parse comma-separated text into raw records.
///
/// The first line is the header. Required columns are checked before any
/// data row is read, so a bad header fails the whole import up front.
pub fn parse_csv(text: &str) -> Result<Vec<RawSample>, HmpiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(HmpiError::ImportFormat("CSV input has no header row".into()));
    }
    let columns = ColumnMap::from_headers(headers.iter())?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(columns.raw_sample(|idx| row.get(idx)));
    }

    Ok(records)
}
