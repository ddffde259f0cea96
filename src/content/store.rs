//! Immutable post store loaded once at startup

use std::fs;
use std::path::Path;

use super::Post;
use crate::error::{Result, SiteError};
use crate::filter;

/// Read-only table of every post in the bundled data file
///
/// Posts are kept in file order; filtering and sorting always produce new
/// vectors of references so the store itself never changes after loading.
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    /// Build a store from already-parsed posts
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Parse a JSON array of posts
    ///
    /// A record that is not a valid post is skipped with a warning; only a
    /// file that is not a JSON array fails as a whole.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut posts = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match Post::from_record(record) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post record #{}: {}", index, e),
            }
        }
        Ok(Self::new(posts))
    }

    /// Load the store from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SiteError::malformed(path.display().to_string(), e))?;
        let store = Self::from_json(&content)
            .map_err(|e| SiteError::malformed(path.display().to_string(), e))?;

        let duplicates = store.duplicate_ids();
        if !duplicates.is_empty() {
            tracing::warn!(
                "Duplicate post ids in {:?}: {}; lookups return the first match",
                path,
                duplicates.join(", ")
            );
        }

        tracing::info!("Loaded {} posts from {:?}", store.len(), path);
        Ok(store)
    }

    /// Load the store, degrading to an empty store when the file is missing
    /// or malformed
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Post data unavailable, serving an empty blog: {}", e);
                Self::default()
            }
        }
    }

    /// Serialise the store back to the data file format
    pub fn to_json(&self) -> Result<String> {
        let records = self
            .posts
            .iter()
            .map(Post::to_record)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// All posts in file order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Exact lookup by route id
    pub fn find(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id.matches(id))
    }

    /// Like [`find`](Self::find), but a missing id is an error
    pub fn get(&self, id: &str) -> Result<&Post> {
        self.find(id)
            .ok_or_else(|| SiteError::not_found(format!("post {}", id)))
    }

    /// The featured post (first flagged record)
    pub fn featured(&self) -> Option<&Post> {
        filter::featured_post(&self.posts)
    }

    /// All posts, newest first
    pub fn sorted_by_date(&self) -> Vec<&Post> {
        filter::sort_by_date_desc(self.posts.iter().collect())
    }

    fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for post in &self.posts {
            if !seen.insert(&post.id) {
                duplicates.push(post.id.to_string());
            }
        }
        duplicates
    }
}
