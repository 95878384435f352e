use thiserror::Error;

/// The error taxonomy for every fallible operation in this crate.
///
/// Variants map directly onto exit-code policy in the CLI: `AlreadyExists`,
/// `NotFound` and `StaleFactor` are "expected" refusals, everything else is
/// an unexpected failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(String),

    #[error("authentication failed: {0}")]
    AuthFail(String),

    #[error("{0} already exists in dataroom")]
    AlreadyExists(String),

    #[error("{0} not found in dataroom")]
    NotFound(String),

    #[error("manifest entry for {0} exists but its on-disk blob is missing")]
    MissingBlob(String),

    #[error(
        "stale rotation factor present at .meta/factor; finish `rekey` or discard it before continuing"
    )]
    StaleFactor,

    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Format(format!("invalid hex: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Format(format!("invalid manifest JSON: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
