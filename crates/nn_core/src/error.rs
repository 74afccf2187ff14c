use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page lacks the wrapper element every other field is read from.
    #[error("Missing required container: {0}")]
    MissingContainer(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Article already exists: {0}")]
    DuplicateTitle(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

impl Error {
    /// True for failures that only concern the candidate being processed.
    pub fn is_candidate_local(&self) -> bool {
        matches!(
            self,
            Error::MissingContainer(_) | Error::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_local_errors() {
        assert!(Error::MissingContainer("article").is_candidate_local());
        assert!(Error::InvalidUrl("nope".to_string()).is_candidate_local());
        assert!(!Error::Storage("down".to_string()).is_candidate_local());
        assert!(!Error::Cancelled.is_candidate_local());
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
