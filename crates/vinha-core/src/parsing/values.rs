use crate::error::VinhaError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Upstream marker for a cell with no data.
pub const MISSING: &str = "-";

/// Parse a Brazilian-formatted number from an upstream cell.
///
/// Handles formats like:
/// - "169.762.429" -> Some(169762429)
/// - "1.234,56" -> Some(1234.56)
/// - "-" -> None (no data, not zero)
///
/// Anything else that is not numeric after cleaning is a `MalformedNumber`.
pub fn normalize(raw: &str) -> Result<Option<Decimal>, VinhaError> {
    let s = raw.trim();

    if s == MISSING {
        return Ok(None);
    }

    let cleaned = s.replace('.', "").replace(',', ".");
    if !is_plain_decimal(&cleaned) {
        return Err(VinhaError::MalformedNumber(s.to_string()));
    }
    Decimal::from_str(&cleaned)
        .map(Some)
        .map_err(|_| VinhaError::MalformedNumber(s.to_string()))
}

/// Digits with at most one '.', optionally preceded by '-'.
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thousands_separators() {
        assert_eq!(normalize("169.762.429").unwrap(), Some(dec!(169762429)));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(normalize("1.234,56").unwrap(), Some(dec!(1234.56)));
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(normalize("42").unwrap(), Some(dec!(42)));
    }

    #[test]
    fn test_dash_is_missing() {
        assert_eq!(normalize("-").unwrap(), None);
        assert_eq!(normalize("  -  ").unwrap(), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(normalize("  50.000,00 ").unwrap(), Some(dec!(50000.00)));
    }

    #[test]
    fn test_letters_rejected() {
        assert!(matches!(
            normalize("abc"),
            Err(VinhaError::MalformedNumber(s)) if s == "abc"
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(normalize(""), Err(VinhaError::MalformedNumber(_))));
    }

    #[test]
    fn test_double_dash_rejected() {
        assert!(normalize("--").is_err());
    }

    #[test]
    fn test_underscore_separator_rejected() {
        assert!(matches!(
            normalize("1_000"),
            Err(VinhaError::MalformedNumber(s)) if s == "1_000"
        ));
    }

    #[test]
    fn test_plus_sign_rejected() {
        assert!(matches!(normalize("+5"), Err(VinhaError::MalformedNumber(_))));
    }

    #[test]
    fn test_negative_and_multiple_commas() {
        assert_eq!(normalize("-1.234,5").unwrap(), Some(dec!(-1234.5)));
        assert!(normalize("1,2,3").is_err());
        assert!(normalize(",5").is_err());
    }
}
