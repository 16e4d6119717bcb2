//! Error types for decoding flavor documents.

/// Failure to decode one of the migration's input documents.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The legacy flavor part is not valid JSON or does not have the
    /// `signed_flavors` shape.
    #[error("invalid legacy flavor part json: {source}")]
    LegacyDocument {
        #[source]
        source: serde_json::Error,
    },

    /// A flavor template is not valid JSON or has the wrong shape.
    #[error("invalid flavor template json: {source}")]
    Template {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize flavor collection: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}
