use crate::error::HmpiError;
use crate::model::{MetalKey, RawSample};

/// Column names a tabular import must provide, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "sampleName",
    "latitude",
    "longitude",
    "cd",
    "pb",
    "cr",
    "cu",
    "zn",
    "ni",
];

/// Reduce a header cell to a comparison key: lowercase, no spaces,
/// underscores or hyphens, no byte-order mark.
///
/// "sampleName", "Sample Name" and "sample_name" all map to "samplename",
/// so an exported file can be imported again as-is.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Positions of the required fields within a tabular row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    name: usize,
    latitude: usize,
    longitude: usize,
    metals: [usize; 6],
}

impl ColumnMap {
    /// Locate every required column in a header row.
    ///
    /// Extra columns are ignored and the first occurrence of a duplicate wins.
    /// Fails with `MissingColumns` listing every absent column.
    pub fn from_headers<'a, I>(headers: I) -> Result<ColumnMap, HmpiError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: [Option<usize>; 9] = [None; 9];
        let wanted: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .map(|c| normalize_header(c))
            .collect();

        for (idx, header) in headers.into_iter().enumerate() {
            let key = normalize_header(header);
            if let Some(slot) = wanted.iter().position(|w| *w == key) {
                if found[slot].is_none() {
                    found[slot] = Some(idx);
                }
            }
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(found.iter())
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(HmpiError::MissingColumns(missing));
        }

        let pos = found.map(|p| p.unwrap_or_default());
        Ok(ColumnMap {
            name: pos[0],
            latitude: pos[1],
            longitude: pos[2],
            metals: [pos[3], pos[4], pos[5], pos[6], pos[7], pos[8]],
        })
    }

    /// Build a raw sample from a row, given a way to read a cell by index.
    ///
    /// Missing trailing cells read as absent; the validator reports them.
    pub fn raw_sample<'a, F>(&self, cell: F) -> RawSample
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let text = |idx: usize| cell(idx).map(|s| s.trim().to_string());

        let mut raw = RawSample {
            name: text(self.name),
            latitude: text(self.latitude),
            longitude: text(self.longitude),
            ..Default::default()
        };
        for metal in MetalKey::ALL {
            if let Some(value) = text(self.metals[metal.index()]) {
                raw.metals.insert(metal, value);
            }
        }
        raw
    }
}
