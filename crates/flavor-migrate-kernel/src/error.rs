//! Error types for flavor migration.

use flavor_migrate_schema::SchemaError;

/// Errors that abort a migration run.
///
/// Unmatched conditions, categories without rules and banks without legacy
/// data are not errors; they produce empty or unchanged results instead.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The legacy flavor part is not well-formed JSON.
    #[error("malformed legacy flavor part: {source}")]
    MalformedDocument {
        #[source]
        source: serde_json::Error,
    },

    /// The document or a template failed typed decoding.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A signed flavor already carries `pcr_logs`; converting converted
    /// output is unsupported.
    #[error("signed flavor {position} is already in pcr log format")]
    AlreadyConverted { position: usize },
}
