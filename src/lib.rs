//! arjuna-site: the Arjuna security audit website
//!
//! Serves the home page, the audit portfolio and the blog from bundled JSON
//! data, or exports the same pages as static HTML. Pages are rendered with
//! Tera templates embedded in the binary.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod helpers;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site directory and its configuration
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the posts and audits JSON files
    pub data_dir: PathBuf,
    /// Static assets, including fetched post bodies
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let data_dir = base_dir.join(&config.data_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            data_dir,
            static_dir,
            public_dir,
        })
    }

    pub fn posts_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.posts_file)
    }

    pub fn audits_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.audits_file)
    }

    /// Export the site as static HTML
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
