use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Report compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Report endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Exporter configuration error: {0}")]
    Config(String),
}

impl ExportError {
    /// Whether the failure came from the remote end rather than this process
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}
