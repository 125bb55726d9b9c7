//! Replay configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable toggling parallel slice replay.
pub const PARALLEL_ENV: &str = "SLICECHECK_PARALLEL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected true/false, 1/0 or yes/no")]
    InvalidFlag { key: &'static str, value: String },
}

/// How the engine schedules slices. Timelines within a slice always replay in
/// order on one thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Replay each slice on its own scoped thread.
    pub parallel: bool,
}

impl ReplayConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(PARALLEL_ENV) {
            match parse_flag(PARALLEL_ENV, &raw) {
                Ok(parallel) => config.parallel = parallel,
                Err(e) => tracing::warn!("{e}; using parallel={}", config.parallel),
            }
        }
        config
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

pub fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sequential() {
        assert!(!ReplayConfig::default().parallel);
        assert!(ReplayConfig::default().with_parallel(true).parallel);
    }

    #[test]
    fn flags_accept_common_spellings() {
        for raw in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_flag(PARALLEL_ENV, raw), Ok(true), "{raw:?}");
        }
        for raw in ["0", "false", "No", "off", ""] {
            assert_eq!(parse_flag(PARALLEL_ENV, raw), Ok(false), "{raw:?}");
        }
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let err = parse_flag(PARALLEL_ENV, "sometimes").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidFlag {
                key: PARALLEL_ENV,
                value: "sometimes".into()
            }
        );
        assert!(err.to_string().contains("SLICECHECK_PARALLEL"));
    }

    fn set_parallel(value: Option<&str>) {
        // SAFETY: this is the only test in the crate that touches the variable.
        unsafe {
            match value {
                Some(value) => std::env::set_var(PARALLEL_ENV, value),
                None => std::env::remove_var(PARALLEL_ENV),
            }
        }
    }

    #[test]
    fn environment_toggles_parallel_replay() {
        let original = std::env::var(PARALLEL_ENV).ok();

        set_parallel(None);
        assert_eq!(ReplayConfig::from_env(), ReplayConfig::default());

        set_parallel(Some("yes"));
        assert!(ReplayConfig::from_env().parallel);
        assert!(crate::engine::ReplayEngine::from_env().config().parallel);

        set_parallel(Some("0"));
        assert!(!ReplayConfig::from_env().parallel);

        // Unparsable values are logged and ignored.
        set_parallel(Some("sometimes"));
        assert_eq!(ReplayConfig::from_env(), ReplayConfig::default());
        assert!(!crate::engine::ReplayEngine::from_env().config().parallel);

        set_parallel(original.as_deref());
    }
}
