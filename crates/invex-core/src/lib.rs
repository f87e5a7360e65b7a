//! Core library for invoice mailbox triage.
//!
//! This crate provides:
//! - Data models for mailbox messages and invoice records
//! - Pattern-rule field extraction (invoice number, euro amount, due date, payment status)
//! - Duplicate and recurring classification against injected record stores
//! - A processing pipeline composing extraction, classification, and filing
//!
//! Mailbox access, OCR, and database drivers live outside this crate;
//! the pipeline receives materialized messages and recovered text, and
//! talks to storage only through the store traits.

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;

pub use error::{InvexError, Result, StoreError};
pub use models::config::InvexConfig;
pub use models::message::{Attachment, ExtractedText, RawMessage};
pub use models::record::{Disposition, FieldValue, InvoiceRecord, PaymentStatus};
pub use extract::{FieldExtractor, InvoiceFields, PatternFieldExtractor};
pub use classify::{ClassificationEngine, MemoryStore, RecordLookup, RecordSink, RecordStore};
pub use pipeline::{Pipeline, ProcessOutcome};
