//! Errors raised while parsing `--input_shapes` strings.

use thiserror::Error;

/// Errors that can occur while parsing a shape specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeParseError {
    #[error("Invalid dimension '{token}' in shape '{shape}': expected a positive integer")]
    InvalidDimension { shape: String, token: String },

    #[error("Dimension 0 in shape '{shape}' is not allowed")]
    ZeroDimension { shape: String },

    #[error("Dimension '{token}' in shape '{shape}' exceeds the int32 limit")]
    DimensionTooLarge { shape: String, token: String },

    #[error("Shape '{shape}' has too many elements")]
    TooManyElements { shape: String },

    #[error("Shape specification '{spec}' does not contain any shape")]
    Empty { spec: String },
}
