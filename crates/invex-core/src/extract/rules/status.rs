//! Payment status detection.

use crate::models::record::PaymentStatus;

use super::patterns::PAID_WORD;
use super::{FieldRule, RuleMatch};

/// Standalone "Paid" word rule.
pub struct PaymentStatusRule;

impl PaymentStatusRule {
    pub fn new() -> Self {
        Self
    }

    /// Detect the payment status. Total: no marker means unpaid.
    pub fn detect(&self, text: &str) -> PaymentStatus {
        if PAID_WORD.is_match(text) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    }
}

impl Default for PaymentStatusRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for PaymentStatusRule {
    type Output = PaymentStatus;

    fn name(&self) -> &'static str {
        "payment_status"
    }

    fn extract(&self, text: &str) -> Option<RuleMatch<PaymentStatus>> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<RuleMatch<PaymentStatus>> {
        PAID_WORD
            .find_iter(text)
            .map(|m| RuleMatch::new(PaymentStatus::Paid, m.start(), m.end()))
            .collect()
    }
}

/// Detect the payment status of text.
pub fn detect_payment_status(text: &str) -> PaymentStatus {
    PaymentStatusRule::new().detect(text)
}
