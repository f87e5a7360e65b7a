//! Message processing pipeline: extract, classify, file.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{ClassificationEngine, RecordSink, RecordStore};
use crate::error::Result;
use crate::extract::{FieldExtractor, PatternFieldExtractor};
use crate::models::message::{ExtractedText, RawMessage};
use crate::models::record::{Disposition, InvoiceRecord};

/// Result of processing one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// The record built for the message.
    pub record: InvoiceRecord,

    /// How the record was classified and filed.
    pub disposition: Disposition,

    /// When processing finished.
    pub processed_at: DateTime<Utc>,
}

/// Processing pipeline for mailbox messages.
///
/// Holds an extractor, the classification engine, and the two injected
/// destinations: the primary store (lookups plus new invoices) and the
/// recurring sink. It owns no mailbox, OCR, or database plumbing.
///
/// The classify-then-insert sequence is not atomic across callers:
/// feed a given store from one pipeline serially, or supply a store
/// with a conditional insert.
pub struct Pipeline<E = PatternFieldExtractor> {
    extractor: E,
    engine: ClassificationEngine,
    primary: Arc<dyn RecordStore>,
    recurring: Arc<dyn RecordSink>,
    text_delimiter: String,
}

impl Pipeline {
    /// Create a pipeline with the pattern extractor and default settings.
    pub fn new(primary: Arc<dyn RecordStore>, recurring: Arc<dyn RecordSink>) -> Self {
        Self::with_extractor(PatternFieldExtractor::new(), primary, recurring)
    }
}

impl<E: FieldExtractor> Pipeline<E> {
    /// Create a pipeline around a custom extractor.
    pub fn with_extractor(
        extractor: E,
        primary: Arc<dyn RecordStore>,
        recurring: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            extractor,
            engine: ClassificationEngine::new(),
            primary,
            recurring,
            text_delimiter: "\n\n".to_string(),
        }
    }

    /// Set the separator placed between attachment texts.
    pub fn with_text_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.text_delimiter = delimiter.into();
        self
    }

    /// Process one message against its recovered texts.
    ///
    /// All recovered texts are combined into a single blob before
    /// extraction, so a message yields exactly one record even with
    /// several attachments. Fields may then match across attachments;
    /// the delimiter keeps tokens from merging at the seams.
    ///
    /// Every message produces a record. Extraction misses become
    /// `Unknown` fields; only a failing store makes this return `Err`,
    /// in which case nothing was inserted.
    pub fn process(&self, message: &RawMessage, texts: &ExtractedText) -> Result<ProcessOutcome> {
        let combined = self.combine_texts(message, texts);
        debug!(
            "message {}: combined {} chars from {} attachments",
            message.uid,
            combined.len(),
            message.attachments.len()
        );

        let fields = self.extractor.extract(&combined);

        let record = InvoiceRecord {
            message_id: message.uid.clone(),
            sender: message.sender.clone(),
            subject: message.subject.clone(),
            attachment_paths: message.attachment_names(),
            invoice_number: fields.invoice_number,
            amount: fields.amount,
            due_date: fields.due_date,
            payment_status: fields.payment_status,
        };

        let disposition = self.engine.classify(&record, self.primary.as_ref())?;
        debug!(
            "message {} classified as {}",
            record.message_id,
            disposition.label()
        );

        match disposition {
            Disposition::New => self.primary.insert_one(&record)?,
            Disposition::Recurring => self.recurring.insert_one(&record)?,
            Disposition::Duplicate => {}
        }

        Ok(ProcessOutcome {
            record,
            disposition,
            processed_at: Utc::now(),
        })
    }

    /// Combine recovered texts in attachment order. Attachments without
    /// recovered text are skipped.
    fn combine_texts(&self, message: &RawMessage, texts: &ExtractedText) -> String {
        let parts: Vec<&str> = message
            .attachments
            .iter()
            .filter_map(|a| texts.get(&a.filename))
            .collect();
        parts.join(&self.text_delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MemoryStore;
    use crate::error::StoreError;
    use crate::models::message::Attachment;
    use crate::models::record::{FieldValue, IdentityKey, PaymentStatus, RecurrenceKey};
    use pretty_assertions::assert_eq;

    fn message_with_text(uid: &str, sender: &str, text: &str) -> (RawMessage, ExtractedText) {
        let message = RawMessage::new(uid, sender, "Invoice")
            .with_attachment(Attachment::new("invoice.pdf", Vec::new()));
        let mut texts = ExtractedText::new();
        texts.insert("invoice.pdf", text);
        (message, texts)
    }

    fn pipeline_with_stores() -> (Pipeline, Arc<MemoryStore>, Arc<MemoryStore>) {
        let primary = Arc::new(MemoryStore::new());
        let recurring = Arc::new(MemoryStore::new());
        let pipeline = Pipeline::new(primary.clone(), recurring.clone());
        (pipeline, primary, recurring)
    }

    #[test]
    fn test_new_invoice_is_extracted_and_filed() {
        let (pipeline, primary, recurring) = pipeline_with_stores();
        let (message, texts) = message_with_text(
            "101",
            "billing@acme.example",
            "Invoice ABC123456 Due Date: 01/05/2025 Total €150.00",
        );

        let outcome = pipeline.process(&message, &texts).unwrap();

        assert_eq!(outcome.disposition, Disposition::New);
        assert_eq!(outcome.record.invoice_number, FieldValue::known("ABC123456"));
        assert_eq!(outcome.record.amount, FieldValue::known("150.00"));
        assert_eq!(outcome.record.due_date, FieldValue::known("01/05/2025"));
        assert_eq!(outcome.record.payment_status, PaymentStatus::Unpaid);
        assert_eq!(outcome.record.attachment_paths, vec!["invoice.pdf"]);

        assert_eq!(primary.records(), vec![outcome.record]);
        assert!(recurring.is_empty());
    }

    #[test]
    fn test_reprocessing_same_message_is_duplicate() {
        let (pipeline, primary, recurring) = pipeline_with_stores();
        let (message, texts) = message_with_text(
            "101",
            "billing@acme.example",
            "Invoice ABC123456 Due Date: 01/05/2025 Total €150.00",
        );

        let first = pipeline.process(&message, &texts).unwrap();
        let second = pipeline.process(&message, &texts).unwrap();

        assert_eq!(first.disposition, Disposition::New);
        assert_eq!(second.disposition, Disposition::Duplicate);
        assert_eq!(second.record, first.record);
        // Duplicates are reported but never stored again.
        assert_eq!(primary.len(), 1);
        assert!(recurring.is_empty());
    }

    #[test]
    fn test_recurring_routed_to_recurring_sink() {
        let (pipeline, primary, recurring) = pipeline_with_stores();

        let (first, first_texts) = message_with_text(
            "101",
            "billing@acme.example",
            "Invoice ABC123456 Due Date: 01/05/2025 Total €150.00",
        );
        pipeline.process(&first, &first_texts).unwrap();

        // Next month: same sender and amount, new number and due date.
        let (next, next_texts) = message_with_text(
            "202",
            "billing@acme.example",
            "Invoice XYZ999999 Due Date: 01/06/2025 Total €150.00",
        );
        let outcome = pipeline.process(&next, &next_texts).unwrap();

        assert_eq!(outcome.disposition, Disposition::Recurring);
        assert_eq!(primary.len(), 1);
        assert_eq!(recurring.records(), vec![outcome.record]);
    }

    #[test]
    fn test_same_key_without_due_date_is_new() {
        let (pipeline, primary, recurring) = pipeline_with_stores();

        let (first, first_texts) = message_with_text(
            "101",
            "billing@acme.example",
            "Invoice ABC123456 Due Date: 01/05/2025 Total €150.00",
        );
        pipeline.process(&first, &first_texts).unwrap();

        let (next, next_texts) = message_with_text(
            "202",
            "billing@acme.example",
            "Invoice XYZ999999 Total €150.00",
        );
        let outcome = pipeline.process(&next, &next_texts).unwrap();

        assert_eq!(outcome.disposition, Disposition::New);
        assert_eq!(primary.len(), 2);
        assert!(recurring.is_empty());
    }

    #[test]
    fn test_multi_attachment_fields_combine() {
        let (pipeline, _primary, _recurring) = pipeline_with_stores();

        let message = RawMessage::new("101", "billing@acme.example", "Invoice")
            .with_attachment(Attachment::new("cover.txt", Vec::new()))
            .with_attachment(Attachment::new("invoice.pdf", Vec::new()));
        let mut texts = ExtractedText::new();
        texts.insert("cover.txt", "Please find invoice ABC123456 attached.");
        texts.insert("invoice.pdf", "Total €150.00 Due Date: 01/05/2025");

        let outcome = pipeline.process(&message, &texts).unwrap();

        assert_eq!(outcome.record.invoice_number, FieldValue::known("ABC123456"));
        assert_eq!(outcome.record.amount, FieldValue::known("150.00"));
        assert_eq!(outcome.record.due_date, FieldValue::known("01/05/2025"));
        assert_eq!(
            outcome.record.attachment_paths,
            vec!["cover.txt", "invoice.pdf"]
        );
    }

    #[test]
    fn test_delimiter_keeps_tokens_apart() {
        let (pipeline, _primary, _recurring) = pipeline_with_stores();

        // "ABC" ends one attachment and "123456" starts the next; only
        // a joined blob with no separator would produce a number here.
        let message = RawMessage::new("101", "billing@acme.example", "Invoice")
            .with_attachment(Attachment::new("a.txt", Vec::new()))
            .with_attachment(Attachment::new("b.txt", Vec::new()));
        let mut texts = ExtractedText::new();
        texts.insert("a.txt", "ref ABC");
        texts.insert("b.txt", "123456 units");

        let outcome = pipeline.process(&message, &texts).unwrap();
        assert_eq!(outcome.record.invoice_number, FieldValue::Unknown);
    }

    #[test]
    fn test_attachment_without_text_is_skipped() {
        let (pipeline, _primary, _recurring) = pipeline_with_stores();

        let message = RawMessage::new("101", "billing@acme.example", "Invoice")
            .with_attachment(Attachment::new("scan.jpg", Vec::new()))
            .with_attachment(Attachment::new("invoice.pdf", Vec::new()));
        let mut texts = ExtractedText::new();
        texts.insert("invoice.pdf", "Invoice ABC123456 Total €150.00");

        let outcome = pipeline.process(&message, &texts).unwrap();

        assert_eq!(outcome.record.invoice_number, FieldValue::known("ABC123456"));
        // The record still lists every attachment.
        assert_eq!(outcome.record.attachment_paths, vec!["scan.jpg", "invoice.pdf"]);
    }

    #[test]
    fn test_empty_texts_still_produce_record() {
        let (pipeline, primary, _recurring) = pipeline_with_stores();
        let message = RawMessage::new("101", "billing@acme.example", "FYI");

        let outcome = pipeline.process(&message, &ExtractedText::new()).unwrap();

        assert_eq!(outcome.disposition, Disposition::New);
        assert_eq!(outcome.record.invoice_number, FieldValue::Unknown);
        assert_eq!(outcome.record.amount, FieldValue::Unknown);
        assert_eq!(outcome.record.due_date, FieldValue::Unknown);
        assert_eq!(outcome.record.payment_status, PaymentStatus::Unpaid);
        assert_eq!(primary.len(), 1);
    }

    /// Store double whose lookups always fail.
    struct FailingStore;

    impl crate::classify::RecordLookup for FailingStore {
        fn find_by_identity(
            &self,
            _key: &IdentityKey<'_>,
        ) -> std::result::Result<Option<InvoiceRecord>, StoreError> {
            Err(StoreError::Unavailable("primary store down".to_string()))
        }

        fn find_by_recurrence(
            &self,
            _key: &RecurrenceKey<'_>,
        ) -> std::result::Result<Option<InvoiceRecord>, StoreError> {
            Err(StoreError::Unavailable("primary store down".to_string()))
        }
    }

    impl RecordSink for FailingStore {
        fn insert_one(&self, _record: &InvoiceRecord) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("primary store down".to_string()))
        }
    }

    #[test]
    fn test_store_failure_propagates_without_insert() {
        let recurring = Arc::new(MemoryStore::new());
        let pipeline = Pipeline::new(Arc::new(FailingStore), recurring.clone());
        let (message, texts) = message_with_text(
            "101",
            "billing@acme.example",
            "Invoice ABC123456 Total €150.00",
        );

        let result = pipeline.process(&message, &texts);
        assert!(result.is_err());
        assert!(recurring.is_empty());
    }
}
