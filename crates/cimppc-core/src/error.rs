//! Conversion error types
//!
//! [`ConversionError`] covers everything that can abort the conversion of a
//! single CIM document. Element-scoped variants name the offending element as
//! `Class 'rdf:ID'` so a failure can be traced back to the source document.
//!
//! # Example
//!
//! ```
//! use cimppc_core::{ConversionError, ConversionResult};
//!
//! fn nominal(text: &str) -> ConversionResult<f64> {
//!     text.trim().parse().map_err(|_| ConversionError::InvalidNumber {
//!         element: "BaseVoltage 'bv1'".into(),
//!         field: "BaseVoltage.nominalVoltage".into(),
//!         value: text.into(),
//!     })
//! }
//!
//! assert!(nominal("11.0").is_ok());
//! assert!(nominal("eleven").is_err());
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    /// A required child element or attribute is absent.
    #[error("{element}: missing required field `{field}`")]
    MissingField { element: String, field: String },

    /// A reference points at an identifier the document does not define.
    #[error("{element}: `{field}` references unknown identifier '{target}'")]
    UnresolvedReference {
        element: String,
        field: String,
        target: String,
    },

    /// A field that must be numeric could not be parsed.
    #[error("{element}: `{field}` is not a number: '{value}'")]
    InvalidNumber {
        element: String,
        field: String,
        value: String,
    },

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// Element label for element-scoped errors.
    pub fn element(&self) -> Option<&str> {
        match self {
            ConversionError::MissingField { element, .. }
            | ConversionError::UnresolvedReference { element, .. }
            | ConversionError::InvalidNumber { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Short machine-readable kind, used in manifests.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::MissingField { .. } => "missing-field",
            ConversionError::UnresolvedReference { .. } => "unresolved-reference",
            ConversionError::InvalidNumber { .. } => "invalid-number",
            ConversionError::Xml(_) => "xml",
            ConversionError::Io(_) => "io",
        }
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ConversionError::MissingField {
            element: "ConnectivityNode 'cn1'".into(),
            field: "IdentifiedObject.name".into(),
        };
        let text = err.to_string();
        assert!(text.contains("ConnectivityNode 'cn1'"));
        assert!(text.contains("IdentifiedObject.name"));
        assert_eq!(err.kind(), "missing-field");
        assert_eq!(err.element(), Some("ConnectivityNode 'cn1'"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = ConversionError::UnresolvedReference {
            element: "Disconnector 'sw1'".into(),
            field: "ConductingEquipment.BaseVoltage".into(),
            target: "bv9".into(),
        };
        assert!(err.to_string().contains("'bv9'"));
        assert_eq!(err.kind(), "unresolved-reference");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConversionError = io_err.into();
        assert!(matches!(err, ConversionError::Io(_)));
        assert_eq!(err.element(), None);
    }
}
