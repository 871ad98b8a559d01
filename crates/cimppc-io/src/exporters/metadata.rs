//! Export metadata helpers shared by format-specific serializers.
use chrono::{DateTime, Utc};

/// Provenance written alongside an exported case.
#[derive(Debug, Clone, Default)]
pub struct ExportMetadata {
    pub source: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub tool_version: Option<String>,
}

impl ExportMetadata {
    /// Metadata for a case converted from `source` right now.
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            created_at: Some(Utc::now()),
            tool_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn creation_timestamp(&self) -> Option<String> {
        self.created_at
            .as_ref()
            .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }

    pub fn tool_version(&self) -> Option<&str> {
        self.tool_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_rfc3339_seconds() {
        let meta = ExportMetadata {
            source: Some("data/1.xml".into()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
            tool_version: None,
        };
        assert_eq!(meta.creation_timestamp().as_deref(), Some("2024-05-01T12:30:00Z"));
        assert_eq!(meta.source_description(), Some("data/1.xml"));
        assert_eq!(meta.tool_version(), None);
    }

    #[test]
    fn test_for_source_fills_everything() {
        let meta = ExportMetadata::for_source("grid.xml");
        assert!(meta.created_at.is_some());
        assert_eq!(meta.tool_version(), Some(env!("CARGO_PKG_VERSION")));
    }
}
