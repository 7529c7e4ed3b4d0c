use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("No API credential configured and ANTHROPIC_API_KEY is not set")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classification service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Classification service returned no text")]
    EmptyResponse,

    #[error("Malformed structured response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
