//! Error types for the GAC decoder and interpreter.
//!
//! This module defines the error hierarchies used across the crate: decode
//! errors (format recovery over a raw snapshot), runtime errors (loading or
//! running a decoded database), and a top-level error that the CLI surfaces
//! as a single human-readable line.

use thiserror::Error;

/// Errors that can occur while decoding a memory snapshot into a [`crate::database::Database`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The snapshot file is not the expected size.
    #[error("invalid file size: expected {expected} bytes, found {found}")]
    SnapshotSize {
        /// The size a valid snapshot must be.
        expected: usize,
        /// The size actually read from disk.
        found: usize,
    },

    /// The punctuation magic bytes were not found at their fixed address.
    #[error("magic characters not found")]
    BadMagic,

    /// A table walk read past the end of the addressable image.
    #[error("truncated record in {table} table at offset {offset:#06x}")]
    TruncatedRecord {
        /// Name of the table being walked (e.g. "messages", "rooms").
        table: &'static str,
        /// The address at which the read failed.
        offset: u16,
    },

    /// The decoded text was not valid ASCII.
    #[error("invalid ASCII in decoded text at offset {offset:#06x}: byte {byte:#04x}")]
    InvalidText {
        /// The address of the bad byte.
        offset: u16,
        /// The offending byte value.
        byte: u8,
    },

    /// An I/O error occurred while reading the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading or running a decoded database.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The database document is missing a required field or has the wrong shape.
    #[error("schema violation: {reason}")]
    SchemaViolation {
        /// A description of what makes the document invalid.
        reason: String,
    },

    /// The initial room id was zero at startup.
    #[error("invalid initial location: init_loc must be non-zero")]
    BadInitialLocation,

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred while loading or saving state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error surfaced at the CLI boundary.
#[derive(Error, Debug)]
pub enum GacError {
    /// A decode-time failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A runtime (load or execution) failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl DecodeError {
    /// Creates a [`DecodeError::TruncatedRecord`] for the given table and offset.
    #[must_use]
    pub fn truncated(table: &'static str, offset: u16) -> Self {
        DecodeError::TruncatedRecord { table, offset }
    }
}

/// A specialized `Result` for decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// A specialized `Result` for runtime (load/execution) operations.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// A specialized `Result` for CLI-facing operations.
pub type Result<T> = std::result::Result<T, GacError>;
