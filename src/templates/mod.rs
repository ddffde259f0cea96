//! Built-in site templates using Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off; text coming
//! from data files or the query string goes through the `escape_html` filter
//! in the templates themselves.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::error::Result;
use crate::helpers;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("audits.html", include_str!("site/audits.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        tera.register_filter("escape_html", escape_html_filter);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML bodies and attribute values
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_html", "value", String, value);
    Ok(tera::Value::String(helpers::html_escape(&s)))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };
    Ok(tera::Value::String(helpers::truncate(
        &s,
        length,
        Some(&omission),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// A post as shown in lists, cards and the detail header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub date: String,
    /// ISO date for `<time datetime>`, absent when the date is not understood
    pub datetime: Option<String>,
    pub read_time: Option<String>,
    pub author: Option<String>,
    pub author_image: Option<String>,
    /// Image URL when the cover is a picture
    pub cover_image: Option<String>,
    /// CSS classes when the cover is a gradient token
    pub cover_class: Option<String>,
    pub tags: Vec<TagLink>,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

/// Tag filter button on the blog list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagButton {
    pub name: String,
    pub url: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub current_url: String,
    pub prev: usize,
    pub prev_link: String,
    pub next: usize,
    pub next_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRow {
    pub id: u32,
    pub project_name: String,
    pub category: String,
    pub platform: String,
    pub date: String,
    pub severity: String,
    pub severity_class: String,
    pub status: String,
    pub findings: u32,
    pub report_url: Option<String>,
}
