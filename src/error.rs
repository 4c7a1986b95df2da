use thiserror::Error;

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Errors produced by the schema engine.
///
/// "Not found" results are not errors: an unknown term, an empty ancestor
/// set, or an empty violation list come back as ordinary `Ok` values. The
/// variants here cover failed loads, bad query templates, and failures
/// surfaced by the underlying store.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported extension {ext:?} for {path}")]
    UnsupportedFormat { path: String, ext: String },

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    #[error("no prepared query named {0:?}")]
    UnknownQuery(String),

    #[error("invalid query template {name:?}: {message}")]
    QueryParse { name: String, message: String },

    #[error("invalid binding variable {0:?}")]
    InvalidVariable(String),

    #[error(transparent)]
    Evaluation(#[from] oxigraph::sparql::EvaluationError),

    #[error(transparent)]
    Storage(#[from] oxigraph::store::StorageError),

    #[error(transparent)]
    Binding(#[from] crate::binding::BindingError),

    #[error("failed to parse config {path}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
