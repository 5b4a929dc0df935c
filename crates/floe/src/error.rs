use derive_more::Display;
use floe_core::{
    codec::{DecodeError, EncodeError},
    config::ConfigError,
    error::{CoreError, UsageError},
    port::StoreError,
    query::QueryError,
    response::ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Usage(err) => err.into(),
            CoreError::Query(err) => err.into(),
            CoreError::Encode(err) => err.into(),
            CoreError::Decode(err) => err.into(),
            CoreError::Store(err) => err.into(),
            CoreError::Response(err) => err.into(),
            CoreError::Config(err) => err.into(),
        }
    }
}

impl From<UsageError> for Error {
    fn from(err: UsageError) -> Self {
        Self::new(ErrorKind::InvalidInput, ErrorOrigin::Session, err.to_string())
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::new(ErrorKind::InvalidInput, ErrorOrigin::Query, err.to_string())
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Self::new(ErrorKind::InvalidInput, ErrorOrigin::Codec, err.to_string())
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::new(ErrorKind::Corruption, ErrorOrigin::Codec, err.to_string())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match &err {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Unavailable { .. } => ErrorKind::Unavailable,
            StoreError::Backend { .. } => ErrorKind::Internal,
        };

        Self::new(kind, ErrorOrigin::Store, err.to_string())
    }
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        let kind = match &err {
            ResponseError::NotFound => ErrorKind::NotFound,
            ResponseError::NotUnique { .. } => ErrorKind::Conflict,
        };

        Self::new(kind, ErrorOrigin::Response, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::InvalidInput, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers and service interfaces.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The caller passed something malformed; retrying as-is cannot help.
    InvalidInput,

    /// Valid request, but no matching record.
    NotFound,

    /// The request expected one record and matched many.
    Conflict,

    /// Stored rows could not be decoded.
    Corruption,

    /// The store cannot be reached right now; retrying may help.
    Unavailable,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers and service interfaces.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Query,
    Response,
    Session,
    Store,
}

///
/// TESTS
///
