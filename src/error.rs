//! Error types for cognite-unions
//!
//! This module defines the error hierarchy for the codec and the union families
//! built on it. All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for cognite-unions
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Registry Definition Errors
    // ============================================================================
    #[error("Duplicate tag '{tag}' registered in union '{family}'")]
    DuplicateTag { family: String, tag: String },

    #[error("Variant {variant} registered twice in union '{family}'")]
    DuplicateVariant { family: String, variant: String },

    #[error("Invalid tag in union '{family}': {message}")]
    InvalidTag { family: String, message: String },

    #[error("Union '{family}' has no registered variants")]
    EmptyRegistry { family: String },

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Malformed '{family}' payload: {message}")]
    MalformedPayload { family: String, message: String },

    #[error("Unknown '{family}' variant: {tag}")]
    UnknownVariant { family: String, tag: String },

    #[error("No '{family}' variant matches the document ({attempts})")]
    NoMatchingVariant { family: String, attempts: String },

    #[error("Document matches several '{family}' variants: {}", candidates.join(", "))]
    AmbiguousVariant {
        family: String,
        candidates: Vec<String>,
    },

    #[error("Failed to decode '{family}' variant {variant} at {path}: {message}")]
    VariantDecode {
        family: String,
        variant: String,
        path: String,
        message: String,
    },

    // ============================================================================
    // Encode Errors
    // ============================================================================
    #[error("Value is not a registered '{family}' variant: {variant}")]
    UnregisteredVariant { family: String, variant: String },

    #[error("Failed to encode '{family}' variant {variant}: {message}")]
    Encode {
        family: String,
        variant: String,
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a malformed payload error
    pub fn malformed(family: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            family: family.into(),
            message: message.into(),
        }
    }

    /// Create an unknown variant error
    pub fn unknown_variant(family: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnknownVariant {
            family: family.into(),
            tag: tag.into(),
        }
    }

    /// Create an unregistered variant error
    pub fn unregistered(family: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::UnregisteredVariant {
            family: family.into(),
            variant: variant.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error came from decoding a document
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Error::MalformedPayload { .. }
                | Error::UnknownVariant { .. }
                | Error::NoMatchingVariant { .. }
                | Error::AmbiguousVariant { .. }
                | Error::VariantDecode { .. }
                | Error::JsonParse(_)
        )
    }

    /// Check if this error is caused by a variant the server knows and we don't
    pub fn is_forward_compatible(&self) -> bool {
        matches!(self, Error::UnknownVariant { .. })
    }
}

/// Result type alias for cognite-unions
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
