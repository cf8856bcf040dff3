//! Error types shared by the viewer core and its hosts

use thiserror::Error;

/// Failure to resolve a locator into a mesh
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model data is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("failed to parse OBJ at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to fetch {locator}: {message}")]
    Fetch { locator: String, message: String },
}

/// Errors raised by viewer operations
#[derive(Debug, Error, PartialEq)]
pub enum ViewerError {
    #[error("unknown view preset: {0}")]
    UnknownView(String),

    #[error("camera is already attached")]
    CameraAlreadyAttached,

    #[error("{field} must be a positive finite number, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("invalid viewer props: {0}")]
    InvalidProps(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = LoadError::Parse {
            line: 12,
            message: "face index 9 out of range".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse OBJ at line 12: face index 9 out of range"
        );
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ViewerError::InvalidValue {
            field: "zoom",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "zoom must be a positive finite number, got -1");
    }
}
