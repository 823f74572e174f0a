use thiserror::Error;

/// Why an environment variable could not be turned into configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Variable name and the reason its value was refused
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
