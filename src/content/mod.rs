//! Content module - posts, audits, fetching and rendering

mod audit;
mod fetcher;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod store;

pub use audit::{AuditReport, AuditStore, Severity};
pub use fetcher::{ContentFetcher, HttpFetcher, LocalFetcher, SiteFetcher};
pub use frontmatter::FrontMatter;
pub use markdown::{FenceInfo, MarkdownRenderer};
pub use post::{ContentFormat, ContentRef, Post, PostId, Tag};
pub use store::PostStore;
