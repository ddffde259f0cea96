//! Post model as stored in the bundled posts file

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::helpers::parse_calendar_date;

/// Post identifier: the data file uses either integers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(i64),
    Str(String),
}

impl PostId {
    /// Whether a route segment names this post
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            PostId::Int(n) => raw.parse::<i64>().map(|r| r == *n).unwrap_or(false),
            PostId::Str(s) => s == raw,
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Int(n) => write!(f, "{}", n),
            PostId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId::Str(s.to_string())
    }
}

impl From<i64> for PostId {
    fn from(n: i64) -> Self {
        PostId::Int(n)
    }
}

impl From<i32> for PostId {
    fn from(n: i32) -> Self {
        PostId::Int(n.into())
    }
}

/// A blog post
///
/// Fields this struct does not know about are kept in `extra`. Records read
/// with [`Post::from_record`] remember their key order, so
/// [`Post::to_record`] writes them back as they were.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,

    pub title: String,

    /// Short text for list views
    #[serde(default)]
    pub excerpt: String,

    /// Inline HTML or Markdown body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Path or URL the body is fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_path: Option<String>,

    /// Image URL or CSS gradient class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    /// Calendar date as written in the data file
    pub date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    /// Custom fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Keys in the order the data file wrote them
    #[serde(skip)]
    key_order: Vec<String>,
}

/// Where a post body comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRef<'a> {
    /// Body stored in the post record itself
    Inline(&'a str),
    /// Relative path or absolute URL to fetch
    Remote(&'a str),
}

/// How a post body is turned into HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// Trusted first-party HTML, inserted verbatim
    Html,
    Markdown,
}

impl ContentFormat {
    /// Format of inline content: markup if it opens with a tag
    pub fn of_inline(content: &str) -> Self {
        if content.trim_start().starts_with('<') {
            ContentFormat::Html
        } else {
            ContentFormat::Markdown
        }
    }

    /// Format of fetched content, judged by the path extension
    pub fn of_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("html") | Some("htm") => ContentFormat::Html,
            _ => ContentFormat::Markdown,
        }
    }
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(id: impl Into<PostId>, title: &str, date: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            excerpt: String::new(),
            content: None,
            content_path: None,
            cover_image: None,
            date: date.to_string(),
            read_time: None,
            author: None,
            author_image: None,
            tags: Vec::new(),
            featured: None,
            extra: Map::new(),
            key_order: Vec::new(),
        }
    }

    /// Read one record of the data file
    pub fn from_record(record: Value) -> serde_json::Result<Self> {
        let key_order = record
            .as_object()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        let mut post: Post = serde_json::from_value(record)?;
        post.key_order = key_order;
        Ok(post)
    }

    /// Write the post as a data file record
    ///
    /// Keys the record was read with come first, in their original order.
    /// A key read as `null` is written as `null`. Defaulted fields the file
    /// never had (`excerpt`, `tags`) stay out while they are empty.
    pub fn to_record(&self) -> serde_json::Result<Map<String, Value>> {
        let fields: Map<String, Value> = serde_json::from_value(serde_json::to_value(self)?)?;
        if self.key_order.is_empty() {
            return Ok(fields);
        }

        let mut record = Map::new();
        for key in &self.key_order {
            let value = fields.get(key).cloned().unwrap_or(Value::Null);
            record.insert(key.clone(), value);
        }
        for (key, value) in fields {
            if !record.contains_key(&key) && !is_empty_default(&value) {
                record.insert(key, value);
            }
        }
        Ok(record)
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_content_path(mut self, path: &str) -> Self {
        self.content_path = Some(path.to_string());
        self
    }

    /// Whether the record is flagged as featured
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Parsed publication date, `None` when the date string is not understood
    pub fn timestamp(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Whether the post carries a tag (exact, case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Body reference; inline content wins when both are present
    pub fn content_ref(&self) -> Option<ContentRef<'_>> {
        match (&self.content, &self.content_path) {
            (Some(inline), _) => Some(ContentRef::Inline(inline)),
            (None, Some(path)) => Some(ContentRef::Remote(path)),
            (None, None) => None,
        }
    }

    /// Get the previous (newer) post in a date-ordered list
    pub fn prev<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        if pos > 0 {
            Some(posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a date-ordered list
    pub fn next<'a>(&self, posts: &[&'a Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        posts.get(pos + 1).copied()
    }
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug::slugify(name),
            count: 0,
        }
    }
}

fn is_empty_default(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
