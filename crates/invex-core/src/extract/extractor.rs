//! Pattern-rule field extractor.

use tracing::debug;

use crate::models::record::FieldValue;

use super::rules::{AmountRule, DueDateRule, FieldRule, InvoiceNumberRule, PaymentStatusRule};
use super::{FieldExtractor, InvoiceFields};

/// Extractor running the fixed pattern rule set over a text.
///
/// Rules run in a fixed order (number, amount, due date, status), each
/// over the full text, and the first match of each rule wins. Running
/// it twice over the same text gives the same fields.
pub struct PatternFieldExtractor {
    number: InvoiceNumberRule,
    amount: AmountRule,
    due_date: DueDateRule,
    status: PaymentStatusRule,
}

impl PatternFieldExtractor {
    pub fn new() -> Self {
        Self {
            number: InvoiceNumberRule::new(),
            amount: AmountRule::new(),
            due_date: DueDateRule::new(),
            status: PaymentStatusRule::new(),
        }
    }
}

impl Default for PatternFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PatternFieldExtractor {
    fn extract(&self, text: &str) -> InvoiceFields {
        let number = self.number.extract(text);
        if let Some(m) = &number {
            debug!("rule {} matched at {:?}", self.number.name(), m.span);
        }

        let amount = self.amount.extract(text);
        if let Some(m) = &amount {
            debug!("rule {} matched at {:?}", self.amount.name(), m.span);
        }

        let due_date = self.due_date.extract(text);
        if let Some(m) = &due_date {
            debug!("rule {} matched at {:?}", self.due_date.name(), m.span);
        }

        let payment_status = self.status.detect(text);

        InvoiceFields {
            invoice_number: FieldValue::from(number.map(|m| m.value)),
            amount: FieldValue::from(amount.map(|m| m.value)),
            due_date: FieldValue::from(due_date.map(|m| m.value)),
            payment_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::PaymentStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_complete_invoice() {
        let extractor = PatternFieldExtractor::new();
        let fields =
            extractor.extract("Invoice ABC123456 Due Date: 01/05/2025 Total €150.00");

        assert_eq!(
            fields,
            InvoiceFields {
                invoice_number: FieldValue::known("ABC123456"),
                amount: FieldValue::known("150.00"),
                due_date: FieldValue::known("01/05/2025"),
                payment_status: PaymentStatus::Unpaid,
            }
        );
    }

    #[test]
    fn test_extract_paid_invoice() {
        let extractor = PatternFieldExtractor::new();
        let fields = extractor
            .extract("Invoice ABC123456 Due Date: 01/05/2025 Total €150.00 Status: Paid");

        assert_eq!(fields.payment_status, PaymentStatus::Paid);
        assert_eq!(fields.invoice_number, FieldValue::known("ABC123456"));
    }

    #[test]
    fn test_no_matches_yield_unknowns() {
        let extractor = PatternFieldExtractor::new();

        assert_eq!(extractor.extract(""), InvoiceFields::empty());
        assert_eq!(
            extractor.extract("Thanks for your business!"),
            InvoiceFields::empty()
        );
        assert_eq!(extractor.extract("   \n\t  "), InvoiceFields::empty());
    }

    #[test]
    fn test_partial_matches() {
        let extractor = PatternFieldExtractor::new();
        let fields = extractor.extract("Amount due: €42.00, reference pending");

        assert_eq!(fields.invoice_number, FieldValue::Unknown);
        assert_eq!(fields.amount, FieldValue::known("42.00"));
        assert_eq!(fields.due_date, FieldValue::Unknown);
        assert_eq!(fields.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_first_candidate_wins() {
        let extractor = PatternFieldExtractor::new();
        let fields = extractor.extract("Invoices INV2025001 and XYZ999999 attached");

        assert_eq!(fields.invoice_number, FieldValue::known("INV2025001"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = PatternFieldExtractor::new();
        let text = "Invoice ABC123456 Due Date: 01/05/2025 Total €1,500.00 Paid";

        let first = extractor.extract(text);
        let second = extractor.extract(text);
        assert_eq!(first, second);
    }
}
