//! Duplicate and recurrence classification.

use tracing::debug;

use crate::error::StoreError;
use crate::models::record::{Disposition, InvoiceRecord};

use super::store::RecordLookup;

/// Classifies a record against prior persisted state.
///
/// Checks run in a fixed order and the first hit wins: a duplicate
/// short-circuits, so the store sees one lookup for duplicates and two
/// for everything else. The engine never inserts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationEngine;

impl ClassificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify one record using the given lookup.
    pub fn classify<L>(
        &self,
        record: &InvoiceRecord,
        lookup: &L,
    ) -> Result<Disposition, StoreError>
    where
        L: RecordLookup + ?Sized,
    {
        if lookup.find_by_identity(&record.identity_key())?.is_some() {
            debug!("identity key hit for message {}", record.message_id);
            return Ok(Disposition::Duplicate);
        }

        // The recurrence lookup runs before the due date test; its
        // result only counts when a due date was recovered.
        if lookup.find_by_recurrence(&record.recurrence_key())?.is_some()
            && record.due_date.is_known()
        {
            debug!("recurrence key hit for message {}", record.message_id);
            return Ok(Disposition::Recurring);
        }

        Ok(Disposition::New)
    }
}
