//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub data_dir: String,
    pub posts_file: String,
    pub audits_file: String,
    pub static_dir: String,
    pub public_dir: String,

    // Remote content
    /// Base URL that relative `contentPath` values are fetched from.
    /// When unset they are read from `static_dir` instead.
    pub content_base_url: Option<String>,
    pub fetch_timeout_secs: u64,

    // Writing
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Arjuna".to_string(),
            description: "Expert analyses, guides, and insights on blockchain security from the Arjuna audit team.".to_string(),
            author: "Arjuna Security".to_string(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            data_dir: "data".to_string(),
            posts_file: "posts.json".to_string(),
            audits_file: "audits.json".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            content_base_url: None,
            fetch_timeout_secs: 10,

            highlight: HighlightConfig::default(),

            per_page: 9,
            pagination_dir: "page".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timeout applied to every content fetch
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    /// Posts per listing page, never zero
    pub fn page_size(&self) -> usize {
        self.per_page.max(1)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Arjuna");
        assert_eq!(config.posts_file, "posts.json");
        assert_eq!(config.per_page, 9);
        assert!(config.content_base_url.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Arjuna Labs
per_page: 6
content_base_url: https://cdn.example.com/blog
highlight:
  theme: InspiredGitHub
  line_number: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Arjuna Labs");
        assert_eq!(config.per_page, 6);
        assert_eq!(
            config.content_base_url.as_deref(),
            Some("https://cdn.example.com/blog")
        );
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(!config.highlight.line_number);
        // untouched fields keep their defaults
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn test_page_size_never_zero() {
        let config = SiteConfig {
            per_page: 0,
            ..SiteConfig::default()
        };
        assert_eq!(config.page_size(), 1);
    }
}
