//! Configuration structures for the triage pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Mailbox intake configuration.
    pub mailbox: MailboxConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Pipeline configuration.
    pub pipeline: PipelineConfig,
}

impl Default for InvexConfig {
    fn default() -> Self {
        Self {
            mailbox: MailboxConfig::default(),
            store: StoreConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Mailbox intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Attachment extensions treated as invoice documents (lowercase).
    pub allowed_extensions: Vec<String>,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "pdf".to_string(),
                "jpg".to_string(),
                "png".to_string(),
                "txt".to_string(),
            ],
        }
    }
}

impl MailboxConfig {
    /// Check whether a lowercased extension is accepted.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the persisted collections. `None` means the
    /// platform data directory, resolved by the caller.
    pub data_dir: Option<PathBuf>,

    /// File name of the primary invoice collection.
    pub primary_file: String,

    /// File name of the recurring invoice collection.
    pub recurring_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            primary_file: "invoices.json".to_string(),
            recurring_file: "recurring.json".to_string(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Separator placed between the texts of a message's attachments
    /// before extraction runs over the combined blob.
    pub text_delimiter: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_delimiter: "\n\n".to_string(),
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
