use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
