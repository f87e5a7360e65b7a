//! Euro amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::EURO_AMOUNT;
use super::{FieldRule, RuleMatch};

/// Euro amount rule.
///
/// The value is the digits after the sign, punctuation intact
/// (`"1,500.00"` keeps its comma). It is never parsed into a number
/// before it reaches the record.
pub struct AmountRule;

impl AmountRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for AmountRule {
    type Output = String;

    fn name(&self) -> &'static str {
        "amount"
    }

    fn extract(&self, text: &str) -> Option<RuleMatch<String>> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<RuleMatch<String>> {
        EURO_AMOUNT
            .captures_iter(text)
            .map(|caps| {
                let full = caps.get(0).unwrap();
                RuleMatch::new(caps[1].to_string(), full.start(), full.end())
            })
            .collect()
    }
}

/// Extract the first euro amount from text, sign stripped, commas kept.
pub fn extract_amount(text: &str) -> Option<String> {
    AmountRule::new().extract(text).map(|m| m.value)
}

/// Parse a matched amount into a decimal (e.g. "1,500.00" -> 1500.00).
///
/// Records keep the raw string; this is for consumers that need
/// arithmetic over it.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_amount() {
        assert_eq!(
            extract_amount("Total €150.00 due"),
            Some("150.00".to_string())
        );
    }

    #[test]
    fn test_sign_stripped_commas_kept() {
        assert_eq!(
            extract_amount("Amount: €1,500.00"),
            Some("1,500.00".to_string())
        );
    }

    #[test]
    fn test_single_space_after_sign() {
        assert_eq!(extract_amount("€ 99.50"), Some("99.50".to_string()));
        assert_eq!(extract_amount("€  99.50"), None);
    }

    #[test]
    fn test_requires_euro_sign() {
        assert_eq!(extract_amount("Total 150.00"), None);
        assert_eq!(extract_amount("$150.00"), None);
    }

    #[test]
    fn test_requires_two_fraction_digits() {
        assert_eq!(extract_amount("€150.0"), None);
        // Extra digits beyond two are left behind.
        assert_eq!(extract_amount("€150.004"), Some("150.00".to_string()));
    }

    #[test]
    fn test_first_of_multiple_wins() {
        let rule = AmountRule::new();
        let matches = rule.extract_all("Subtotal €100.00 VAT €21.00");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "100.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("1,500.00"),
            Some(Decimal::from_str("1500.00").unwrap())
        );
        assert_eq!(
            parse_amount("150.00"),
            Some(Decimal::from_str("150.00").unwrap())
        );
        assert_eq!(parse_amount("not a number"), None);
    }
}
