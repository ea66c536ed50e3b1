//! Core error types for breakloop-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! messages are user-facing and surfaced verbatim by callers, so their
//! wording is part of the library contract.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for breakloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Entity validation errors.
///
/// Returned by the `Habit` and `Urge` constructors and setters. Each
/// message is shown to the user as-is when a form submission is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name is empty or whitespace-only
    #[error("Habit name cannot be empty.")]
    EmptyName,

    /// Habit description is empty or whitespace-only
    #[error("Habit description cannot be empty.")]
    EmptyDescription,

    /// Habit has no replacement strategies at all
    #[error("At least one replacement strategy is required.")]
    NoReplacementStrategies,

    /// A replacement strategy entry is empty or whitespace-only
    #[error("Replacement strategies cannot be empty.")]
    EmptyReplacementStrategy,

    /// Urge context is empty or whitespace-only
    #[error("Context cannot be empty.")]
    EmptyContext,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A stored row no longer passes entity validation
    #[error("Stored {entity} {id} is invalid: {source}")]
    Corrupted {
        entity: &'static str,
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Referenced habit does not exist
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    /// Referenced urge does not exist
    #[error("Urge not found: {0}")]
    UrgeNotFound(String),

    /// Habit still has logged urges and deletion was not a cascade
    #[error("Habit {id} still has {urge_count} logged urge(s); delete them first or use a cascading delete")]
    HabitInUse { id: String, urge_count: usize },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
