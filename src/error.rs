//! Error types shared across the site

use thiserror::Error;

/// Result type alias for site operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Errors raised while loading data, fetching content or rendering pages
#[derive(Error, Debug)]
pub enum SiteError {
    /// No post or route matches the requested identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote or on-disk post content could not be retrieved
    #[error("Failed to fetch content from {source_ref}: {reason}")]
    ContentFetchFailed { source_ref: String, reason: String },

    /// The bundled data file could not be read or parsed
    #[error("Malformed data in {path}: {reason}")]
    MalformedData { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SiteError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a content fetch error
    pub fn fetch_failed(source_ref: impl Into<String>, reason: impl ToString) -> Self {
        Self::ContentFetchFailed {
            source_ref: source_ref.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed data error
    pub fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SiteError::fetch_failed("/content/a.md", "connection refused");
        assert_eq!(
            err.to_string(),
            "Failed to fetch content from /content/a.md: connection refused"
        );

        let err = SiteError::not_found("post z");
        assert_eq!(err.to_string(), "Not found: post z");
    }
}
