//! Invoice number extraction.

use super::patterns::INVOICE_NUMBER;
use super::{FieldRule, RuleMatch};

/// Invoice number rule: 3-5 letters followed by 6-8 digits.
///
/// The match is kept exactly as written, original casing included.
pub struct InvoiceNumberRule;

impl InvoiceNumberRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for InvoiceNumberRule {
    type Output = String;

    fn name(&self) -> &'static str {
        "invoice_number"
    }

    fn extract(&self, text: &str) -> Option<RuleMatch<String>> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<RuleMatch<String>> {
        INVOICE_NUMBER
            .captures_iter(text)
            .map(|caps| {
                let full = caps.get(0).unwrap();
                RuleMatch::new(caps[1].to_string(), full.start(), full.end())
            })
            .collect()
    }
}

/// Extract the first invoice number from text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberRule::new().extract(text).map(|m| m.value)
}
