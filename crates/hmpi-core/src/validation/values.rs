use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a numeric field as it appears in a form or an import file.
///
/// Handles formats like:
/// - "0.003" -> 0.003
/// - " 12 " -> 12
/// - "1.5e-3" -> 0.0015
///
/// Returns `None` for anything else, including "NaN" and "inf".
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// True when a raw field was omitted or left blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
