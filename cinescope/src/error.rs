use reqwest::StatusCode;

use crate::{schema::ValidationError, status::ExpectedStatus};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a status outside the expected set.
    #[error("Unexpected status code: {}. Expected: {expected}", actual.as_u16())]
    UnexpectedStatus {
        actual: StatusCode,
        expected: ExpectedStatus,
    },
    /// `expected_status` was given as an empty collection.
    #[error("expected status must name at least one status code")]
    EmptyExpectedStatus,
    /// A successful response lacks a field the caller depends on.
    #[error("response body has no \"{0}\" field")]
    MissingField(&'static str),
    /// Connection, TLS or timeout failure reported by the transport.
    #[error("HttpError: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to serialize request body: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to deserialize http response into the specified type: {0}")]
    Deserialize(#[from] serde_json::Error),
    /// The body parsed but violates the declared field constraints.
    #[error(transparent)]
    Schema(#[from] ValidationError),
    /// Query or connection failure against the service database.
    #[error("DatabaseError: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no account for user \"{0}\"")]
    AccountNotFound(String),
    #[error("account \"{user}\" holds {balance}, cannot transfer {amount}")]
    InsufficientBalance { user: String, balance: i32, amount: i32 },
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Occurs when `cinescope.toml` fails to load.
    #[error("failed to load cinescope.toml: {0}")]
    LoadError(String),
    #[error("invalid configuration value for \"{key}\": {source}")]
    ValueError { key: String, source: eyre::Error },
    #[error("SUPER_ADMIN_USERNAME and SUPER_ADMIN_PASSWORD must be set")]
    MissingCredentials,
}

impl Error {
    /// Returns the received status when this is a status mismatch.
    pub fn unexpected_status(&self) -> Option<StatusCode> {
        match self {
            Error::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}
