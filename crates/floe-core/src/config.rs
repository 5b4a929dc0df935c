//! Module: config
//! Responsibility: connection settings for a store port, read from the
//! environment or built directly.
//! Does not own: credential parsing or any store handshake.

use std::{env, path::PathBuf};
use thiserror::Error as ThisError;

/// Project the store rows belong to. Required.
pub const ENV_PROJECT_ID: &str = "FLOE_PROJECT_ID";

/// Namespace partition within the project. Optional.
pub const ENV_NAMESPACE: &str = "FLOE_NAMESPACE";

/// Path to a credentials file. Optional; ports fall back to ambient
/// credentials when unset.
pub const ENV_CREDENTIALS: &str = "FLOE_CREDENTIALS";

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("environment variable {name} is required")]
    MissingVar { name: &'static str },

    #[error("environment variable {name} is not valid unicode")]
    InvalidVar { name: &'static str },
}

///
/// Config
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub project_id: String,
    pub namespace: Option<String>,
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            namespace: None,
            credentials_path: None,
        }
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Read the configuration from `FLOE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = normalize(ENV_PROJECT_ID, env::var(ENV_PROJECT_ID))?
            .ok_or(ConfigError::MissingVar {
                name: ENV_PROJECT_ID,
            })?;
        let namespace = normalize(ENV_NAMESPACE, env::var(ENV_NAMESPACE))?;
        let credentials_path =
            normalize(ENV_CREDENTIALS, env::var(ENV_CREDENTIALS))?.map(PathBuf::from);

        Ok(Self {
            project_id,
            namespace,
            credentials_path,
        })
    }
}

// Present-but-empty behaves like absent.
fn normalize(
    name: &'static str,
    result: Result<String, env::VarError>,
) -> Result<Option<String>, ConfigError> {
    match result {
        Ok(text) if text.is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidVar { name }),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn builder_fills_optional_settings() {
        let config = Config::new("proj-1")
            .namespace("staging")
            .credentials_path("/tmp/creds.json");

        assert_eq!(config.project_id, "proj-1");
        assert_eq!(config.namespace.as_deref(), Some("staging"));
        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("/tmp/creds.json"))
        );
    }

    #[test]
    fn empty_variables_behave_like_absent_ones() {
        assert_eq!(normalize("X", Ok(String::new())), Ok(None));
        assert_eq!(normalize("X", Ok("v".to_string())), Ok(Some("v".to_string())));
        assert_eq!(normalize("X", Err(env::VarError::NotPresent)), Ok(None));
    }

    #[test]
    fn non_unicode_variables_are_rejected() {
        let err = normalize(
            "X",
            Err(env::VarError::NotUnicode(OsString::from("raw"))),
        )
        .unwrap_err();

        assert_eq!(err, ConfigError::InvalidVar { name: "X" });
    }
}
