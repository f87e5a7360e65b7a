//! Invoice record model and the key projections used for triage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal stored for an absent field, kept byte-compatible with
/// records written by earlier versions of this system.
const UNKNOWN: &str = "Unknown";

/// An extracted field that may be absent.
///
/// Inside the crate absence is explicit; at serialization boundaries it
/// becomes the literal `"Unknown"` and is parsed back from it, so
/// persisted records keep their flat string shape. `Unknown` compares
/// equal to `Unknown`, which the duplicate key relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldValue {
    /// A value the pattern rules recovered, stored verbatim.
    Known(String),
    /// No value could be recovered.
    #[default]
    Unknown,
}

impl FieldValue {
    /// Wrap a recovered value.
    pub fn known(value: impl Into<String>) -> Self {
        Self::Known(value.into())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, FieldValue::Known(_))
    }

    /// Borrow the value if one was recovered.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Known(value) => Some(value),
            FieldValue::Unknown => None,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => FieldValue::Known(value),
            None => FieldValue::Unknown,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        if value == UNKNOWN {
            FieldValue::Unknown
        } else {
            FieldValue::Known(value)
        }
    }
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Known(value) => value,
            FieldValue::Unknown => UNKNOWN.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Known(value) => f.write_str(value),
            FieldValue::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// Payment status detected from the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The text contains a standalone "Paid".
    Paid,
    /// No payment marker found.
    #[default]
    Unpaid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => f.write_str("Paid"),
            PaymentStatus::Unpaid => f.write_str("Unpaid"),
        }
    }
}

/// One processed invoice, built once per message and never mutated.
///
/// `amount` and `due_date` stay exactly as matched (`"1,500.00"` keeps
/// its comma, `31/13/2025` is accepted); comparisons elsewhere are
/// verbatim string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// UID of the originating message.
    pub message_id: String,

    /// Sender address of the originating message.
    pub sender: String,

    /// Subject line of the originating message.
    pub subject: String,

    /// File names of the attachments the text came from, in message order.
    #[serde(default)]
    pub attachment_paths: Vec<String>,

    /// Extracted invoice number.
    pub invoice_number: FieldValue,

    /// Extracted amount, punctuation intact, currency sign stripped.
    pub amount: FieldValue,

    /// Extracted due date as matched (DD/MM/YYYY, not validated).
    pub due_date: FieldValue,

    /// Detected payment status.
    pub payment_status: PaymentStatus,
}

impl InvoiceRecord {
    /// Key that identifies a re-delivery of the same invoice.
    ///
    /// `Unknown` is a matchable value here: two records with no
    /// recovered number are duplicates when message id and sender also
    /// agree, which keeps reprocessing the same message idempotent.
    pub fn identity_key(&self) -> IdentityKey<'_> {
        IdentityKey {
            message_id: &self.message_id,
            sender: &self.sender,
            invoice_number: &self.invoice_number,
        }
    }

    /// Key that links distinct invoices from one sender over the same
    /// amount. A recurrence additionally requires a known due date.
    pub fn recurrence_key(&self) -> RecurrenceKey<'_> {
        RecurrenceKey {
            sender: &self.sender,
            amount: &self.amount,
        }
    }
}

/// Duplicate-detection key: `(message_id, sender, invoice_number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityKey<'a> {
    pub message_id: &'a str,
    pub sender: &'a str,
    pub invoice_number: &'a FieldValue,
}

/// Recurrence-detection key: `(sender, amount)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceKey<'a> {
    pub sender: &'a str,
    pub amount: &'a FieldValue,
}

/// Outcome of classifying a record against prior persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// First sighting; filed into the primary store.
    New,
    /// Same invoice seen before; not stored again.
    Duplicate,
    /// Same sender and amount with a due date; filed as recurring.
    Recurring,
}

impl Disposition {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::New => "new",
            Disposition::Duplicate => "duplicate",
            Disposition::Recurring => "recurring",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
