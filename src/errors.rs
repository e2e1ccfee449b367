use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate can produce.
///
/// `From<Error> for Response` in `http::response` maps these onto status codes;
/// only `NotFound` and `BadRequest` carry their message back to the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No response from server")]
    NoResponse,

    #[error("Connection reset by peer")]
    ConnectionReset,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP parse error: {0}")]
    Http(#[from] httparse::Error),

    #[error("Route error: {0}")]
    Route(#[from] matchit::InsertError),

    #[error("Worker pool unavailable")]
    PoolClosed,

    #[error(transparent)]
    Cli(#[from] crate::cli::CLIError),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl Error {
    /// HTTP status code used when this error escapes a handler
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::BadRequest(_) => 400,
            _ => 500,
        }
    }
}
