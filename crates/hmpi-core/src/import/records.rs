use crate::error::HmpiError;
use crate::model::{MetalKey, RawSample};
use serde::Deserialize;
use serde_json::Value;

/// One structured record as it appears in a JSON import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordDef {
    #[serde(default)]
    sample_name: Option<RawValue>,
    #[serde(default)]
    latitude: Option<RawValue>,
    #[serde(default)]
    longitude: Option<RawValue>,
    #[serde(default)]
    cd: Option<RawValue>,
    #[serde(default)]
    pb: Option<RawValue>,
    #[serde(default)]
    cr: Option<RawValue>,
    #[serde(default)]
    cu: Option<RawValue>,
    #[serde(default)]
    zn: Option<RawValue>,
    #[serde(default)]
    ni: Option<RawValue>,
}

/// A field value that may be a number, a numeric string or anything else.
///
/// Anything else is kept as its JSON text so the validator can reject it
/// with the field name instead of failing the whole document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl RawValue {
    fn into_text(self) -> Option<String> {
        match self {
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Text(s) => Some(s),
            RawValue::Other(Value::Null) => None,
            RawValue::Other(v) => Some(v.to_string()),
        }
    }
}

impl RecordDef {
    fn into_raw(self, position: usize) -> RawSample {
        let name = self
            .sample_name
            .and_then(RawValue::into_text)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Sample {position}"));

        let mut raw = RawSample {
            name: Some(name),
            latitude: self.latitude.and_then(RawValue::into_text),
            longitude: self.longitude.and_then(RawValue::into_text),
            ..Default::default()
        };

        let metals = [
            (MetalKey::Cd, self.cd),
            (MetalKey::Pb, self.pb),
            (MetalKey::Cr, self.cr),
            (MetalKey::Cu, self.cu),
            (MetalKey::Zn, self.zn),
            (MetalKey::Ni, self.ni),
        ];
        for (metal, value) in metals {
            if let Some(text) = value.and_then(RawValue::into_text) {
                raw.metals.insert(metal, text);
            }
        }

        raw
    }
}

/// Parse a JSON array of sample records.
///
/// Records with a missing, null or blank `sampleName` are labelled
/// "Sample N" by their 1-based position. The document must be an array of objects.
pub fn parse_records(json: &[u8]) -> Result<Vec<RawSample>, HmpiError> {
    let value: Value = serde_json::from_slice(json)
        .map_err(|e| HmpiError::ImportFormat(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(HmpiError::ImportFormat(
            "expected a JSON array of sample records".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(HmpiError::ImportFormat(format!(
                    "record {} is not an object",
                    i + 1
                )));
            }
            let def: RecordDef = serde_json::from_value(item)?;
            Ok(def.into_raw(i + 1))
        })
        .collect()
}
