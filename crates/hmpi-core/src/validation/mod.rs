pub mod values;

use crate::error::ValidationError;
use crate::model::{Concentrations, MetalKey, RawSample, Sample};
use rust_decimal::Decimal;
use values::{is_blank, parse_decimal};

const LATITUDE_LIMIT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const LONGITUDE_LIMIT: Decimal = Decimal::from_parts(180, 0, 0, false, 0);

/// Validate a raw record and build a `Sample` with a fresh id.
///
/// Rules are checked in order and the first failure is returned:
/// 1. name present and non-empty after trimming
/// 2. every metal present, numeric and >= 0
/// 3. latitude, if given, numeric and in [-90, 90]
/// 4. longitude, if given, numeric and in [-180, 180]
///
/// Latitude and longitude are independently optional: a sample may carry
/// one without the other.
pub fn validate(raw: &RawSample) -> Result<Sample, ValidationError> {
    let name = match raw.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Err(ValidationError::MissingName),
    };

    let metals = validate_metals(raw)?;

    let latitude = validate_coordinate(
        raw.latitude.as_deref(),
        LATITUDE_LIMIT,
        ValidationError::InvalidLatitude,
        ValidationError::LatitudeOutOfRange,
    )?;
    let longitude = validate_coordinate(
        raw.longitude.as_deref(),
        LONGITUDE_LIMIT,
        ValidationError::InvalidLongitude,
        ValidationError::LongitudeOutOfRange,
    )?;

    Ok(Sample::new(name, latitude, longitude, metals))
}

fn validate_metals(raw: &RawSample) -> Result<Concentrations, ValidationError> {
    let mut metals = Concentrations::new();

    for metal in MetalKey::ALL {
        let field = raw.metals.get(&metal).map(String::as_str);
        if is_blank(field) {
            return Err(ValidationError::MissingConcentration { metal });
        }
        let text = field.unwrap_or_default();

        let value = parse_decimal(text).ok_or_else(|| ValidationError::InvalidConcentration {
            metal,
            value: text.trim().to_string(),
        })?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::NegativeConcentration { metal, value });
        }

        metals.insert(metal, value);
    }

    Ok(metals)
}

fn validate_coordinate(
    field: Option<&str>,
    limit: Decimal,
    invalid: fn(String) -> ValidationError,
    out_of_range: fn(Decimal) -> ValidationError,
) -> Result<Option<Decimal>, ValidationError> {
    if is_blank(field) {
        return Ok(None);
    }
    let text = field.unwrap_or_default().trim();

    let value = parse_decimal(text).ok_or_else(|| invalid(text.to_string()))?;
    if value < -limit || value > limit {
        return Err(out_of_range(value));
    }

    Ok(Some(value))
}
