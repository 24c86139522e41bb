use thiserror::Error;

#[derive(Error, Debug)]
pub enum MindnotesError {
    #[error("Not in a mindnotes project. Run 'mindnotes init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .mindnotes/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Remote sync error: {0}")]
    RemoteSync(#[from] RemoteSyncError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Loro error: {0}")]
    Loro(#[from] loro::LoroError),

    #[error("Loro encode error: {0}")]
    LoroEncode(#[from] loro::LoroEncodeError),
}

/// User input rejected before any state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Cannot link a note to itself!")]
    SelfLink,

    #[error("Unknown note: {0}")]
    UnknownNote(String),

    #[error("Attachment not found: {0}")]
    MissingAttachment(String),
}

/// Failure while mirroring a note to the remote collaborators.
///
/// These are logged and reported back in the save outcome; they never undo
/// the local write.
#[derive(Error, Debug)]
pub enum RemoteSyncError {
    #[error("remote sync is not configured: {0}")]
    NotConfigured(String),

    #[error("invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("no download token returned for {0}")]
    MissingDownloadToken(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("failed to read attachment '{name}': {source}")]
    Attachment {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure producing graph markup from a description.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("diagram renderer unavailable: {0}")]
    Unavailable(String),

    #[error("diagram renderer failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MindnotesError>;
