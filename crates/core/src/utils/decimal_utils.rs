use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a stored decimal string, falling back to zero for malformed values.
pub fn parse_decimal_or_zero(value: &str) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or(Decimal::ZERO)
}

/// Parses an optional stored decimal string. Malformed values become `None`.
pub fn parse_optional_decimal(value: Option<&str>) -> Option<Decimal> {
    value.and_then(|v| Decimal::from_str(v.trim()).ok())
}

/// Lossy conversion used for presentation-level numbers (charts, percentages).
pub fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}
