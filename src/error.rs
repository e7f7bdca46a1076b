use serde::Serialize;
use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Machine-readable classification of a failure, suitable for returning to
/// API callers alongside the human-readable message
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    ContentInsufficient,
    UpstreamEnhancement,
    Emitter,
    Font,
    Io,
}

/// All errors a render can fail with
#[derive(Error, Debug)]
pub enum RenderError {
    /// The caller's input was rejected before any layout work started
    #[error("invalid request: {0}")]
    Validation(String),

    /// Layout completed but produced a near-empty document
    #[error("insufficient content: {0}")]
    ContentInsufficient(String),

    /// Serialization produced an implausibly small document
    #[error("document emitter produced {size} bytes, below the plausible minimum of {minimum}")]
    Emitter { size: usize, minimum: usize },

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a supplied font
    Font(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Validation(_) => ErrorKind::Validation,
            RenderError::ContentInsufficient(_) => ErrorKind::ContentInsufficient,
            RenderError::Emitter { .. } => ErrorKind::Emitter,
            RenderError::Font(_) => ErrorKind::Font,
            RenderError::Io(_) => ErrorKind::Io,
        }
    }
}
