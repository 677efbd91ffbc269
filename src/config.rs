use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
}

/// Credentials and blog coordinates, loaded from the environment before any
/// remote call is attempted.
#[derive(Debug, Clone)]
pub struct Config {
    pub hatena_id: String,
    pub blog_id: String,
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            hatena_id: require("HATENA_ID")?,
            blog_id: require("BLOG_ID")?,
            api_key: require("API_KEY")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
