use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`SynthConfig`](crate::config::SynthConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("voice count {0} outside 1..={max}", max = crate::MAX_VOICES)]
    InvalidVoiceCount(usize),

    #[error("invalid value {value} for '{param}': {reason}")]
    InvalidParameter {
        param: &'static str,
        value: f32,
        reason: String,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// `value` lies outside `[min, max]`.
    pub fn out_of_range(param: &'static str, value: f32, (min, max): (f32, f32)) -> Self {
        ConfigError::InvalidParameter {
            param,
            value,
            reason: format!("expected {min}..={max}"),
        }
    }
}
