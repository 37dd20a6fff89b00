use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request failed with status {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("Source error: {0}")]
    Source(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown occurrence type: {0}")]
    UnknownType(u32),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("CSV error ({0}): {1}")]
    Csv(&'static str, csv::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl From<ureq::Error> for AlertaError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => AlertaError::Fetch {
                status,
                body: String::new(),
            },
            other => AlertaError::Http(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertaError>;
