//! Rich diagnostic error types for exo-triples.
//!
//! Store operations are infallible by contract: querying an empty store,
//! removing an absent triple and re-adding an existing one are normal
//! outcomes. Errors only arise from transaction misuse and from the
//! surrounding plumbing (term syntax, config and snapshot files).

use miette::Diagnostic;
use thiserror::Error;

use crate::graph::transaction::TransactionState;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ExoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Term(#[from] TermParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),
}

// ---------------------------------------------------------------------------
// Transaction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TransactionError {
    #[error("transaction already {state}")]
    #[diagnostic(
        code(exo::tx::closed),
        help(
            "A transaction accepts operations only while open. \
             Start a new one with `store.begin_transaction()`."
        )
    )]
    Closed { state: TransactionState },
}

// ---------------------------------------------------------------------------
// Term syntax errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TermParseError {
    #[error("invalid term `{input}`: {message}")]
    #[diagnostic(
        code(exo::term::invalid),
        help(
            "Write IRIs as <iri> (or a bare token), blank nodes as _:id, and \
             literals as \"value\", \"value\"@lang or \"value\"^^<datatype>."
        )
    )]
    Invalid { input: String, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(exo::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}")]
    #[diagnostic(
        code(exo::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(exo::config::parse),
        help("The config is TOML with optional keys `cache_capacity` and `uuid_index`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config for {path}: {message}")]
    #[diagnostic(
        code(exo::config::serialize),
        help("The in-memory config could not be rendered as TOML.")
    )]
    Serialize { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Snapshot errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    #[error("snapshot I/O error at {path}")]
    #[diagnostic(
        code(exo::snapshot::io),
        help(
            "A filesystem operation failed. Check that the path exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization error: {message}")]
    #[diagnostic(
        code(exo::snapshot::serde),
        help("The snapshot file is not valid JSON or does not contain a triple list.")
    )]
    Serialization { message: String },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    #[diagnostic(
        code(exo::snapshot::version),
        help("The snapshot was written by an incompatible release. Re-export it.")
    )]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Convenience alias for functions returning exo-triples results.
pub type ExoResult<T> = std::result::Result<T, ExoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_error_converts_to_exo_error() {
        let err = TransactionError::Closed {
            state: TransactionState::Committed,
        };
        let exo: ExoError = err.into();
        assert!(matches!(
            exo,
            ExoError::Transaction(TransactionError::Closed { .. })
        ));
    }

    #[test]
    fn closed_message_names_the_state() {
        let committed = TransactionError::Closed {
            state: TransactionState::Committed,
        };
        let rolled_back = TransactionError::Closed {
            state: TransactionState::RolledBack,
        };
        assert_eq!(committed.to_string(), "transaction already committed");
        assert_eq!(rolled_back.to_string(), "transaction already rolled back");
    }

    #[test]
    fn config_serialize_error_is_distinct_from_parse() {
        let err = ConfigError::Serialize {
            path: "store.toml".into(),
            message: "unsupported value".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to serialize config for store.toml"));
        assert!(!msg.contains("invalid config file"));
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("exo::config::serialize")
        );
    }

    #[test]
    fn snapshot_version_message_is_descriptive() {
        let err = SnapshotError::UnsupportedVersion {
            found: 9,
            expected: 1,
        };
        let msg = format!("{err}");
        assert!(msg.contains('9'));
        assert!(msg.contains('1'));
    }
}
