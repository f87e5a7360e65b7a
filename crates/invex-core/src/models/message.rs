//! Mailbox message models consumed by the pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single attachment carried on a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// File name the attachment was stored under.
    pub filename: String,

    /// Raw attachment bytes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// One message as handed over by the mailbox acquisition layer.
///
/// The pipeline never talks to a mailbox itself; it receives these
/// fully materialized, attachments included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    /// Mailbox UID. Opaque here; assumed unique per mailbox, not enforced.
    pub uid: String,

    /// Sender address as reported by the mailbox.
    pub sender: String,

    /// Message subject line.
    #[serde(default)]
    pub subject: String,

    /// Attachments in mailbox order.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl RawMessage {
    pub fn new(uid: impl Into<String>, sender: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            sender: sender.into(),
            subject: subject.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment, builder style.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// File names of all attachments, in message order.
    pub fn attachment_names(&self) -> Vec<String> {
        self.attachments.iter().map(|a| a.filename.clone()).collect()
    }
}

/// Text recovered from a message's attachments, keyed by attachment
/// file name.
///
/// Produced by the external OCR collaborator, consumed once by the
/// pipeline. The map does not define an order; the owning message's
/// attachment list does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText(HashMap<String, String>);

impl ExtractedText {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Record the text recovered for one attachment.
    pub fn insert(&mut self, filename: impl Into<String>, text: impl Into<String>) {
        self.0.insert(filename.into(), text.into());
    }

    /// Text for one attachment, if any was recovered.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.0.get(filename).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FromIterator<(K, V)> for ExtractedText
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_extension() {
        assert_eq!(
            Attachment::new("invoice.PDF", vec![]).extension(),
            Some("pdf".to_string())
        );
        assert_eq!(Attachment::new("README", vec![]).extension(), None);
    }

    #[test]
    fn test_attachment_names_preserve_order() {
        let message = RawMessage::new("101", "billing@acme.example", "Invoice")
            .with_attachment(Attachment::new("b.pdf", vec![]))
            .with_attachment(Attachment::new("a.pdf", vec![]));

        assert_eq!(message.attachment_names(), vec!["b.pdf", "a.pdf"]);
    }

    #[test]
    fn test_extracted_text_lookup() {
        let mut texts = ExtractedText::new();
        texts.insert("a.pdf", "Invoice ABC123456");

        assert_eq!(texts.get("a.pdf"), Some("Invoice ABC123456"));
        assert_eq!(texts.get("b.pdf"), None);
        assert_eq!(texts.len(), 1);
    }
}
