//! Pattern rules for invoice field extraction.

pub mod amount;
pub mod date;
pub mod number;
pub mod patterns;
pub mod status;

pub use amount::{extract_amount, parse_amount, AmountRule};
pub use date::{extract_due_date, DueDateRule};
pub use number::{extract_invoice_number, InvoiceNumberRule};
pub use status::{detect_payment_status, PaymentStatusRule};
pub use patterns::*;

/// Trait for single-field pattern rules.
pub trait FieldRule {
    /// The type of value this rule produces.
    type Output;

    /// Rule name used in logs.
    fn name(&self) -> &'static str;

    /// Extract the field from text. First match wins.
    fn extract(&self, text: &str) -> Option<RuleMatch<Self::Output>>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<RuleMatch<Self::Output>>;
}

/// A single rule match with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the full match.
    pub span: (usize, usize),
}

impl<T> RuleMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self {
            value,
            span: (start, end),
        }
    }
}
