//! File-backed persistence for the record collections.
//!
//! Each collection is one JSON file holding an array of records. A
//! file is loaded into a [`MemoryStore`] at startup, the pipeline works
//! against the shared handle, and the store is written back when the
//! run finishes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use invex_core::models::config::InvexConfig;
use invex_core::models::record::InvoiceRecord;
use invex_core::{MemoryStore, Pipeline};

/// One persisted record collection.
pub struct JsonStore {
    path: PathBuf,
    records: Arc<MemoryStore>,
}

impl JsonStore {
    /// Open a collection file, or start empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let store = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let records: Vec<InvoiceRecord> = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("malformed store file {}: {}", path.display(), e))?;
            MemoryStore::with_records(records)
        } else {
            MemoryStore::new()
        };

        Ok(Self {
            path,
            records: Arc::new(store),
        })
    }

    /// Shared handle for pipelines and direct queries.
    pub fn handle(&self) -> Arc<MemoryStore> {
        self.records.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Snapshot of the records in insertion order.
    pub fn records(&self) -> Vec<InvoiceRecord> {
        self.records.records()
    }

    /// Write the current records back to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.records.records())?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// The primary and recurring collections of one data directory.
pub struct Stores {
    pub primary: JsonStore,
    pub recurring: JsonStore,
}

impl Stores {
    /// Open both collections under the given data directory.
    pub fn open(data_dir: &Path, config: &InvexConfig) -> anyhow::Result<Self> {
        Ok(Self {
            primary: JsonStore::open(data_dir.join(&config.store.primary_file))?,
            recurring: JsonStore::open(data_dir.join(&config.store.recurring_file))?,
        })
    }

    /// Build a pipeline over these collections.
    pub fn pipeline(&self, config: &InvexConfig) -> Pipeline {
        Pipeline::new(self.primary.handle(), self.recurring.handle())
            .with_text_delimiter(config.pipeline.text_delimiter.clone())
    }

    /// Write both collections back to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.primary.save()?;
        self.recurring.save()
    }
}

/// Resolve the directory holding the persisted collections.
///
/// Precedence: command line flag, then config, then the platform data
/// directory.
pub fn resolve_data_dir(flag: Option<&Path>, config: &InvexConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.store.data_dir.clone())
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("invex")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use invex_core::models::record::{FieldValue, PaymentStatus};
    use invex_core::RecordSink;

    fn record(message_id: &str) -> InvoiceRecord {
        InvoiceRecord {
            message_id: message_id.to_string(),
            sender: "billing@acme.example".to_string(),
            subject: "Invoice".to_string(),
            attachment_paths: Vec::new(),
            invoice_number: FieldValue::known("ABC123456"),
            amount: FieldValue::known("150.00"),
            due_date: FieldValue::Unknown,
            payment_status: PaymentStatus::Unpaid,
        }
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("invoices.json")).unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_save_and_reopen_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("invoices.json");

        let store = JsonStore::open(&path).unwrap();
        store.handle().insert_one(&record("101")).unwrap();
        store.save().unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.records(), vec![record("101")]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoices.json");
        fs::write(&path, "not json").unwrap();

        let result = JsonStore::open(&path);
        assert!(result.is_err());
    }
}
