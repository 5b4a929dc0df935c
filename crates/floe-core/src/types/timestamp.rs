use derive_more::{Add, AddAssign, Display, FromStr, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Add,
    AddAssign,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Sub,
    SubAssign,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);
    pub const MIN: Self = Self(u64::MIN);
    pub const MAX: Self = Self(u64::MAX);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    /// Construct from milliseconds (truncate to seconds).
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms / 1_000)
    }

    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampError> {
        let dt = OffsetDateTime::parse(s, &Rfc3339).map_err(|err| TimestampError::Parse {
            message: err.to_string(),
        })?;

        let secs = dt.unix_timestamp();
        if secs < 0 {
            return Err(TimestampError::BeforeEpoch);
        }

        Ok(Self(secs.unsigned_abs()))
    }

    pub fn parse_flexible(s: &str) -> Result<Self, TimestampError> {
        // Try integer seconds
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Self(n));
        }

        // Try RFC3339
        Self::parse_rfc3339(s)
    }

    /// Format as an RFC 3339 UTC string.
    pub fn format_rfc3339(self) -> Result<String, TimestampError> {
        let secs = i64::try_from(self.0).map_err(|_| TimestampError::OutOfRange)?;
        let dt =
            OffsetDateTime::from_unix_timestamp(secs).map_err(|_| TimestampError::OutOfRange)?;

        dt.format(&Rfc3339).map_err(|err| TimestampError::Format {
            message: err.to_string(),
        })
    }

    /// Current wall-clock timestamp in seconds.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());

        Self(secs)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(u: u64) -> Self {
        Self(u)
    }
}

///
/// TimestampError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TimestampError {
    #[error("timestamp parse error: {message}")]
    Parse { message: String },

    #[error("timestamp format error: {message}")]
    Format { message: String },

    #[error("timestamp before epoch")]
    BeforeEpoch,

    #[error("timestamp outside the formattable range")]
    OutOfRange,
}

///
/// TESTS
///
