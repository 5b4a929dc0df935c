use crate::{
    codec::{DecodeError, EncodeError},
    config::ConfigError,
    port::StoreError,
    query::QueryError,
    response::ResponseError,
};
use thiserror::Error as ThisError;

///
/// CoreError
///
/// Top-level runtime error returned by session operations. Each variant
/// wraps the error owned by one boundary; nothing is reinterpreted or
/// retried on the way up.
///

#[derive(Debug, ThisError)]
pub enum CoreError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CoreError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::NotFound { .. }) | Self::Response(ResponseError::NotFound)
        )
    }
}

///
/// UsageError
///
/// Caller mistakes caught synchronously, before any store call is issued.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum UsageError {
    #[error("collection name must not be empty")]
    EmptyCollection,

    #[error("record identifier must not be empty")]
    EmptyIdentifier,
}
