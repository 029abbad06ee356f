use thiserror::Error;

/// Error taxonomy for the analysis pipeline
///
/// Network, Api and Parse errors are recoverable: the fetch loop logs them
/// and degrades to fewer pages (or fewer records) of data. Everything else
/// aborts the run with context at the binary boundary.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScopeError {
    /// Errors the fetch loop may swallow while continuing with the run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScopeError::Network(_) | ScopeError::Api(_) | ScopeError::Parse(_)
        )
    }
}
