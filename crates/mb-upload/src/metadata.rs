//! Upload metadata wire types
//!
//! Field names are wire-exact: the frame's ingest service parses this
//! JSON shape from the `metadata` part of each multipart request.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Envelope for one photo's upload metadata. Constructed transiently per
/// upload call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub update_display_immediately: bool,
    pub media: Media,
}

/// Descriptive fields of the photo being uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Capture date, `YYYY-MM-DD`.
    pub date: String,
    /// User-entered description, may be empty.
    pub description: String,
    /// Reserved for the ingest service; always empty on upload.
    pub url: String,
    /// Tagged person names, serialized in sorted order.
    pub people: BTreeSet<String>,
}

impl Media {
    pub fn new(date: String, description: String, people: BTreeSet<String>) -> Self {
        Self {
            date,
            description,
            url: String::new(),
            people,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_exact_field_names() {
        let mut people = BTreeSet::new();
        people.insert("Person B".to_string());
        people.insert("Person A".to_string());

        let metadata = UploadMetadata {
            update_display_immediately: true,
            media: Media::new("2024-02-02".into(), "birthday".into(), people),
        };

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "update_display_immediately": true,
                "media": {
                    "date": "2024-02-02",
                    "description": "birthday",
                    "url": "",
                    "people": ["Person A", "Person B"],
                }
            })
        );
    }

    #[test]
    fn round_trips_through_json() {
        let metadata = UploadMetadata {
            update_display_immediately: false,
            media: Media::new("2020-10-08".into(), String::new(), BTreeSet::new()),
        };

        let encoded = serde_json::to_vec(&metadata).unwrap();
        let decoded: UploadMetadata = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, metadata);
    }
}
