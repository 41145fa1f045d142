use thiserror::Error;

pub type Result<T> = std::result::Result<T, FoldError>;

/// Everything that can stop a fold run. Every variant is fatal; the binary
/// maps all of them to exit code 1.
#[derive(Debug, Error)]
pub enum FoldError {
    #[error("the '{var}' environment variable is not set")]
    MissingCredential { var: &'static str },

    #[error("credential contains characters not allowed in an HTTP header")]
    InvalidCredential,

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response shape: {reason} (keys: [{}])", .keys.join(", "))]
    ResponseShape { reason: String, keys: Vec<String> },

    #[error("failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Render(String),
}

impl FoldError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
