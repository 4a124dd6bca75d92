//! # Error Handling
//!
//! Hierarchical error types for the scan pipeline, with rich context and
//! classification helpers.
//!
//! ## Taxonomy
//!
//! Every failure in this application belongs to one of a few classes:
//!
//! - **Validation**: input precondition failures (oversized upload)
//! - **Decode**: the bytes cannot be decoded into a pixel surface
//! - **Surface**: a resize/encode surface could not be driven (environment
//!   or resource failure, non-retryable without user action)
//! - **Network / MalformedAnalysis**: the remote identification call failed
//!   or came back off-contract
//! - **Storage**: persistence reads/writes
//! - **Acquire**: image-source acquisition (camera permission, missing file)
//! - **Config**: invalid configuration values
//!
//! No error is fatal to the process; callers surface a user-facing message
//! where one exists and return the application to an idle state.
//!
//! ## Usage
//!
//! ```rust
//! use prospector_pal::error::{PalError, Recoverable};
//!
//! let error = PalError::decode("not a decodable image")
//!     .with_operation("normalize")
//!     .with_recovery_suggestion("Try a JPEG or PNG file");
//! assert!(error.is_recoverable());
//! ```

use std::{error::Error as StdError, fmt, time::SystemTime};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational errors
    Info,
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that affect the current operation but leave the app healthy
    Error,
}

/// Core error context containing metadata about when and where an error occurred
#[derive(Debug)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Whether the caller can recover by returning to idle
    pub recoverable: bool,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            recoverable: true,
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Base error type for the scan pipeline
#[derive(Debug)]
pub enum PalError {
    /// Input precondition failures
    Validation {
        field: String,
        constraint: String,
        value: String,
        context: ErrorContext,
    },
    /// The raw bytes could not be decoded into a pixel surface
    Decode {
        reason: String,
        context: ErrorContext,
    },
    /// A drawing/encoding surface could not be acquired or driven
    Surface {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// Remote identification transport failures
    Network {
        operation: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// The remote result deviated from the analysis schema
    MalformedAnalysis {
        reason: String,
        context: ErrorContext,
    },
    /// Persistence read/write failures
    Storage {
        operation: String,
        path: Option<String>,
        source: Option<std::io::Error>,
        context: ErrorContext,
    },
    /// Image-source acquisition failures
    Acquire {
        reason: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
}

impl PalError {
    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a surface error
    pub fn surface(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Surface {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a network error
    pub fn network(operation: impl Into<String>) -> Self {
        Self::Network {
            operation: operation.into(),
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create a network error carrying its transport source
    pub fn network_with(
        operation: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            operation: operation.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(),
        }
    }

    /// Create a malformed-analysis error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedAnalysis {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a storage error
    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            path: None,
            source: Some(source),
            context: ErrorContext::new(),
        }
    }

    /// Create an acquisition error
    pub fn acquire(reason: impl Into<String>) -> Self {
        Self::Acquire {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Attach an operation name to the error context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Attach a recovery suggestion to the error context
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set the path involved in a storage error
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        if let Self::Storage { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Surface { context, .. } => context,
            Self::Network { context, .. } => context,
            Self::MalformedAnalysis { context, .. } => context,
            Self::Storage { context, .. } => context,
            Self::Acquire { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Validation { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Surface { context, .. } => context,
            Self::Network { context, .. } => context,
            Self::MalformedAnalysis { context, .. } => context,
            Self::Storage { context, .. } => context,
            Self::Acquire { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Decode { .. } => "decode",
            Self::Surface { .. } => "surface",
            Self::Network { .. } => "network",
            Self::MalformedAnalysis { .. } => "malformed_analysis",
            Self::Storage { .. } => "storage",
            Self::Acquire { .. } => "acquire",
            Self::Config { .. } => "config",
        }
    }

    /// The message shown to the user, if this error class is user-facing.
    ///
    /// Storage errors degrade silently (the gallery simply loads empty) and
    /// therefore carry no user-facing message.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation {
                field, constraint, ..
            } => Some(format!("Invalid {}: {}.", field, constraint)),
            Self::Decode { .. } => Some(
                "That file doesn't look like a readable image. Try a JPEG or PNG.".to_string(),
            ),
            Self::Surface { .. } => {
                Some("Couldn't prepare the image for analysis. Please try again.".to_string())
            }
            Self::Network { .. } | Self::MalformedAnalysis { .. } => Some(
                "We couldn't identify this rock. Please try a clearer image or a different angle."
                    .to_string(),
            ),
            Self::Storage { .. } => None,
            Self::Acquire { reason, .. } => Some(format!(
                "Couldn't read the image source ({}). Try uploading a file instead.",
                reason
            )),
            Self::Config { field, reason, .. } => {
                Some(format!("Configuration error in '{}': {}.", field, reason))
            }
        }
    }
}

impl fmt::Display for PalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PalError::Validation {
                field,
                constraint,
                value,
                ..
            } => {
                write!(
                    f,
                    "Validation failed for '{}': {} (value: {})",
                    field, constraint, value
                )
            }
            PalError::Decode { reason, .. } => {
                write!(f, "Image decode failed: {}", reason)
            }
            PalError::Surface {
                operation, reason, ..
            } => {
                write!(f, "Surface failure during {}: {}", operation, reason)
            }
            PalError::Network {
                operation, source, ..
            } => {
                if let Some(source) = source {
                    write!(f, "Network error during {}: {}", operation, source)
                } else {
                    write!(f, "Network error during {}", operation)
                }
            }
            PalError::MalformedAnalysis { reason, .. } => {
                write!(f, "Malformed analysis result: {}", reason)
            }
            PalError::Storage {
                operation,
                path,
                source,
                ..
            } => match (path, source) {
                (Some(path), Some(source)) => {
                    write!(
                        f,
                        "Storage error during {} on '{}': {}",
                        operation, path, source
                    )
                }
                (None, Some(source)) => {
                    write!(f, "Storage error during {}: {}", operation, source)
                }
                (Some(path), None) => {
                    write!(f, "Storage error during {} on '{}'", operation, path)
                }
                (None, None) => write!(f, "Storage error during {}", operation),
            },
            PalError::Acquire { reason, .. } => {
                write!(f, "Image acquisition failed: {}", reason)
            }
            PalError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
        }
    }
}

impl StdError for PalError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Network {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            Self::Storage {
                source: Some(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type PalResult<T> = Result<T, PalError>;

/// Trait for errors that can be recovered from by returning to idle
pub trait Recoverable {
    fn is_recoverable(&self) -> bool;
}

impl Recoverable for PalError {
    fn is_recoverable(&self) -> bool {
        // Config errors need operator intervention; everything else returns
        // the app to idle with state cleared.
        self.context().recoverable && !matches!(self, Self::Config { .. })
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for PalError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for PalError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Errors the user must see before the app returns to idle
    pub fn is_user_facing(error: &PalError) -> bool {
        error.user_message().is_some()
    }

    /// Errors that degrade silently (logged, never surfaced)
    pub fn degrades_silently(error: &PalError) -> bool {
        matches!(error, PalError::Storage { .. })
    }
}

/// Error conversion implementations
impl From<std::io::Error> for PalError {
    fn from(error: std::io::Error) -> Self {
        Self::storage("io", error)
    }
}

impl From<serde_json::Error> for PalError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed(error.to_string())
    }
}

impl From<reqwest::Error> for PalError {
    fn from(error: reqwest::Error) -> Self {
        Self::network_with("identify", error)
    }
}

impl From<image::ImageError> for PalError {
    fn from(error: image::ImageError) -> Self {
        Self::decode(error.to_string())
    }
}

impl From<pal_scale::cpu::ScaleError> for PalError {
    fn from(error: pal_scale::cpu::ScaleError) -> Self {
        Self::surface("resize", error.to_string())
    }
}
