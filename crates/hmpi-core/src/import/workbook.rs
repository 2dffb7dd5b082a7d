use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::HmpiError;
use crate::import::header::ColumnMap;
use crate::model::RawSample;

/// Parse the first worksheet of an xlsx workbook laid out like the CSV
/// import: a header row followed by one sample per row.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawSample>, HmpiError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| HmpiError::ImportFormat(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HmpiError::ImportFormat("workbook has no worksheets".into()))?
        .map_err(|e| HmpiError::ImportFormat(format!("failed to read worksheet: {e}")))?;

    parse_range(&sheet)
}

/// Convert a worksheet range into raw records. Fully empty rows are skipped.
pub fn parse_range(sheet: &Range<Data>) -> Result<Vec<RawSample>, HmpiError> {
    let mut rows = sheet.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| HmpiError::ImportFormat("worksheet is empty".into()))?
        .iter()
        .map(|cell| cell_as_string(cell).unwrap_or_default())
        .collect();
    let columns = ColumnMap::from_headers(header.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<Option<String>> = row.iter().map(cell_as_string).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        records.push(columns.raw_sample(|idx| cells.get(idx).and_then(|c| c.as_deref())));
    }

    Ok(records)
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::header::REQUIRED_COLUMNS;
    use crate::model::MetalKey;

    fn sheet(rows: &[Vec<Data>]) -> Range<Data> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn header_row() -> Vec<Data> {
        REQUIRED_COLUMNS
            .iter()
            .map(|h| Data::String(h.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_range() {
        let range = sheet(&[
            header_row(),
            vec![
                Data::String("Well 1".into()),
                Data::Float(28.5),
                Data::Float(77.25),
                Data::Float(0.003),
                Data::Float(0.01),
                Data::Float(0.05),
                Data::Int(2),
                Data::Float(3.0),
                Data::Float(0.07),
            ],
        ]);
        let records = parse_range(&range).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Well 1"));
        assert_eq!(records[0].latitude.as_deref(), Some("28.5"));
        assert_eq!(
            records[0].metals.get(&MetalKey::Cd).map(String::as_str),
            Some("0.003")
        );
        assert_eq!(
            records[0].metals.get(&MetalKey::Cu).map(String::as_str),
            Some("2")
        );
    }

    #[test]
    fn test_blank_rows_skipped() {
        let range = sheet(&[header_row(), vec![Data::Empty; 9]]);
        assert!(parse_range(&range).unwrap().is_empty());
    }

    #[test]
    fn test_missing_header_column() {
        let mut header = header_row();
        header.pop();
        let range = sheet(&[header]);
        assert!(matches!(
            parse_range(&range),
            Err(HmpiError::MissingColumns(cols)) if cols == vec!["ni"]
        ));
    }

    #[test]
    fn test_not_a_workbook() {
        assert!(matches!(
            parse_workbook(b"sampleName,cd"),
            Err(HmpiError::ImportFormat(_))
        ));
    }
}
