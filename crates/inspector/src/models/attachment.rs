//! Attachment metadata for a captured message

use serde::{Deserialize, Serialize};

/// A single attachment as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    #[serde(alias = "content_type", default)]
    pub media_type: String,
}

impl Attachment {
    /// Human readable size, e.g. "12.3 KB"
    pub fn size_label(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;

        let size = self.size as f64;
        if size >= MB {
            format!("{:.1} MB", size / MB)
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} bytes", self.size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(size: u64) -> Attachment {
        Attachment {
            id: "0".to_string(),
            filename: "report.pdf".to_string(),
            size,
            media_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_content_type_alias() {
        let json = r#"{"id":"1","filename":"a.txt","content_type":"text/plain","size":5}"#;
        let parsed: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.media_type, "text/plain");
        assert_eq!(parsed.size, 5);
    }

    #[test]
    fn test_size_label() {
        assert_eq!(attachment(512).size_label(), "512 bytes");
        assert_eq!(attachment(2048).size_label(), "2.0 KB");
        assert_eq!(attachment(3 * 1024 * 1024).size_label(), "3.0 MB");
    }
}
