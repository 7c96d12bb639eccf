use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::crypto::signature::DELIMITER;
use crate::error::{AppError, Result};

/// Returns the trimmed value if it is present and non-empty.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ensures both `amount` and `reference` are present.
///
/// # Returns
///
/// The trimmed `(amount, reference)` pair, or `AppError::MissingField`
/// naming every missing field.
pub fn require_amount_and_reference<'a>(
    amount: Option<&'a str>,
    reference: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    match (non_empty(amount), non_empty(reference)) {
        (Some(amount), Some(reference)) => Ok((amount, reference)),
        (None, None) => Err(AppError::MissingField("amount and reference".to_string())),
        (None, Some(_)) => Err(AppError::MissingField("amount".to_string())),
        (Some(_), None) => Err(AppError::MissingField("reference".to_string())),
    }
}

/// Formats an amount with exactly two decimals.
///
/// The output is used both for the signature and for the transmitted
/// `amount` field. Accepts plain and scientific notation.
///
/// # Returns
///
/// The formatted amount, or `AppError::Validation` if the amount is not a
/// positive number.
pub fn format_amount(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let not_a_number = || AppError::Validation(format!("amount must be a number, got {:?}", raw));

    // rust_decimal accepts `_` digit separators; a plain number never has them.
    if raw.contains('_') {
        return Err(not_a_number());
    }

    let amount = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| not_a_number())?;

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        return Err(AppError::Validation(
            "amount must be at least 0.01".to_string(),
        ));
    }

    Ok(format!("{:.2}", rounded))
}

/// Rejects a signed field that contains the signature delimiter.
pub fn reject_delimiter(name: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) {
        return Err(AppError::Validation(format!(
            "{} must not contain {:?}",
            name, DELIMITER
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_two_decimals() {
        assert_eq!(format_amount("10").unwrap(), "10.00");
        assert_eq!(format_amount("10.5").unwrap(), "10.50");
        assert_eq!(format_amount(" 25000 ").unwrap(), "25000.00");
    }

    #[test]
    fn rounds_extra_decimals() {
        assert_eq!(format_amount("10.125").unwrap(), "10.13");
        assert_eq!(format_amount("10.124").unwrap(), "10.12");
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(format_amount("1e3").unwrap(), "1000.00");
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(matches!(format_amount("ten"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("NaN"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("10,00"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("1_000"), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(matches!(format_amount("0"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("-5"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("0.001"), Err(AppError::Validation(_))));
        assert!(matches!(format_amount("0.004"), Err(AppError::Validation(_))));
        assert_eq!(format_amount("0.005").unwrap(), "0.01");
    }

    #[test]
    fn reports_missing_fields() {
        assert!(matches!(
            require_amount_and_reference(Some("10"), None),
            Err(AppError::MissingField(f)) if f == "reference"
        ));
        assert!(matches!(
            require_amount_and_reference(Some("  "), Some("R1")),
            Err(AppError::MissingField(f)) if f == "amount"
        ));
        assert!(matches!(
            require_amount_and_reference(None, Some("")),
            Err(AppError::MissingField(f)) if f == "amount and reference"
        ));
        assert_eq!(
            require_amount_and_reference(Some(" 10 "), Some("R1")).unwrap(),
            ("10", "R1")
        );
    }

    #[test]
    fn rejects_signature_delimiter() {
        assert!(matches!(
            reject_delimiter("reference", "R1~COP"),
            Err(AppError::Validation(msg)) if msg.contains("reference")
        ));
        assert!(reject_delimiter("reference", "R-1").is_ok());
    }
}
