//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::PatternFieldExtractor;

use crate::models::record::{FieldValue, PaymentStatus};

/// Fields recovered from one document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    /// Extracted invoice number.
    pub invoice_number: FieldValue,
    /// Extracted amount, sign stripped, punctuation intact.
    pub amount: FieldValue,
    /// Extracted due date as matched.
    pub due_date: FieldValue,
    /// Detected payment status.
    pub payment_status: PaymentStatus,
}

impl InvoiceFields {
    /// A full set of misses: everything unknown, payment status unpaid.
    pub fn empty() -> Self {
        Self {
            invoice_number: FieldValue::Unknown,
            amount: FieldValue::Unknown,
            due_date: FieldValue::Unknown,
            payment_status: PaymentStatus::Unpaid,
        }
    }
}

/// Trait for invoice field extractors.
///
/// Extraction is total: it never fails, and a text without matches
/// produces `Unknown` fields rather than an error.
pub trait FieldExtractor {
    /// Extract all fields from text.
    fn extract(&self, text: &str) -> InvoiceFields;
}
