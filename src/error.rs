use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selector for '{name}': {reason}")]
    Selector { name: &'static str, reason: String },

    #[error("Missing {section} section on {url}")]
    MissingSection { url: String, section: &'static str },
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Failure of a single field resolver.
///
/// Distinct from a selector that simply matched nothing, which resolvers turn
/// into the field's default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("enclosing {0} block not found")]
    MissingContext(&'static str),
}
