//! Data models for messages, records, and configuration.

pub mod config;
pub mod message;
pub mod record;

pub use config::InvexConfig;
pub use message::{Attachment, ExtractedText, RawMessage};
pub use record::{Disposition, FieldValue, IdentityKey, InvoiceRecord, PaymentStatus, RecurrenceKey};
