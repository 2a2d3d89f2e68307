//! Error types for annotation dumping.

use thiserror::Error;

/// Errors that can occur while writing a CVAT XML document.
///
/// None of these are transient: dumping is a deterministic transform over
/// immutable input, so a failed dump fails the same way every time.
#[derive(Error, Debug)]
pub enum DumpError {
    /// I/O error on the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Unbalanced or out-of-order element open/close
    #[error("Structural error: {message}")]
    Structural {
        /// What went wrong with the element stack
        message: String,
    },

    /// Shape type outside the rectangle/polygon/polyline/points set
    #[error("Unsupported shape type '{shape}'")]
    UnsupportedShape {
        /// The shape type that was encountered
        shape: String,
    },

    /// Task metadata is missing a required field or holds an unusable value
    #[error("Malformed meta: {message}")]
    MalformedMeta {
        /// Description of the problem
        message: String,
    },

    /// Coordinate list does not fit the shape type
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },

    /// Dumper name not recognized
    #[error("Unknown dump mode '{0}'")]
    UnknownMode(String),
}

impl DumpError {
    /// Create a structural error with a message.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// Create an unsupported shape error.
    pub fn unsupported_shape(shape: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            shape: shape.into(),
        }
    }

    /// Create a malformed meta error.
    pub fn malformed_meta(message: impl Into<String>) -> Self {
        Self::MalformedMeta {
            message: message.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }
}
