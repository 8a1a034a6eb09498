//! Error types for the PSD layer converter

use crate::types::LayerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layer {layer} references parent {parent}, which is not in the layer list")]
    MissingParent { layer: LayerId, parent: LayerId },

    #[error("Layer id {layer} appears more than once in the layer list")]
    DuplicateLayer { layer: LayerId },

    #[error("Layer {layer} is part of a parent cycle")]
    ParentCycle { layer: LayerId },

    #[error("Document has no root layer at index {index} ({root_count} roots)")]
    NoRoot { index: usize, root_count: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// True for errors caused by inconsistent parent references in the input
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingParent { .. } | Self::DuplicateLayer { .. } | Self::ParentCycle { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors() {
        let missing = ConvertError::MissingParent {
            layer: LayerId(3),
            parent: LayerId(9),
        };
        assert!(missing.is_structural());
        assert_eq!(
            missing.to_string(),
            "Layer #3 references parent #9, which is not in the layer list"
        );

        assert!(!ConvertError::invalid_format("bad").is_structural());
    }
}
