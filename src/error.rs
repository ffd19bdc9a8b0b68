//! Error types for the resource-set planner.
//!
//! This module provides the error hierarchy for every stage of a planning
//! pass: loading the cluster specification, validating it, and planning.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the resource-set planner.
#[derive(Debug, Error)]
pub enum ResourceSetError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Planning errors.
    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The specification file was not found.
    #[error("Specification file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The specification file could not be parsed.
    #[error("Failed to parse specification: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Specification validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// A service is defined more than once.
    #[error("Duplicate service definition: {name}")]
    DuplicateService {
        /// The duplicated service name.
        name: String,
    },

    /// Base services have no definition.
    #[error("Missing service definitions: {}", names.join(", "))]
    MissingServices {
        /// Names of the base services without a definition.
        names: Vec<String>,
    },

    /// A service definition names a service outside the known set.
    #[error("Unknown service name: {name}")]
    UnknownService {
        /// The unrecognized name.
        name: String,
    },
}

/// Planning errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// An active service has no resolvable definition in the specification.
    #[error("No service definition found for active service '{service}'")]
    ServiceLookup {
        /// Name of the service that could not be resolved.
        service: String,
    },

    /// No builder is registered for a planned kind.
    #[error("No resource builder registered for kind '{kind}'")]
    MissingBuilder {
        /// The unhandled builder kind.
        kind: String,
    },

    /// A builder failed to render its resource.
    #[error("Failed to render {instance}: {reason}")]
    RenderFailed {
        /// The instance being rendered.
        instance: String,
        /// Reason for failure.
        reason: String,
    },

    /// The same builder instance was planned for creation and pruning.
    #[error("Conflicting builder instances in plan: {message}")]
    ConflictingInstances {
        /// Description of the conflict.
        message: String,
    },
}

/// Result type alias for resource-set operations.
pub type Result<T> = std::result::Result<T, ResourceSetError>;

impl ResourceSetError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable.
    ///
    /// Planning is a pure function of the specification, so nothing it
    /// raises can succeed on a retry with the same input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a validation error without a specific field.
    #[must_use]
    pub fn validation_general(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }
}

impl PlanError {
    /// Creates a service lookup error.
    #[must_use]
    pub fn service_lookup(service: impl Into<String>) -> Self {
        Self::ServiceLookup {
            service: service.into(),
        }
    }
}
