//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::post::ContentFormat;
use super::FrontMatter;
use crate::helpers::html_escape;

lazy_static! {
    /// `title="lib.rs"`, `title=lib.rs` or `file=lib.rs` in a fence info string
    static ref FENCE_TITLE_RE: Regex =
        Regex::new(r#"(?:title|file)=(?:"([^"]*)"|(\S+))"#).unwrap();
}

/// Language and optional file name parsed from a fence info string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceInfo {
    pub lang: Option<String>,
    pub file_name: Option<String>,
}

impl FenceInfo {
    /// Parse "rust title=\"lib.rs\"" style info strings
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        let lang = info
            .split_whitespace()
            .next()
            .filter(|first| !first.contains('='))
            .map(|first| first.trim_matches(|c| c == '{' || c == '}').to_string())
            .filter(|l| !l.is_empty());

        let file_name = FENCE_TITLE_RE.captures(info).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
        });

        Self { lang, file_name }
    }
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render a post body in the given format
    ///
    /// HTML is first-party content and passes through untouched. Markdown may
    /// open with a front-matter block, which is dropped.
    pub fn render_content(&self, body: &str, format: ContentFormat) -> String {
        match format {
            ContentFormat::Html => body.to_string(),
            ContentFormat::Markdown => {
                let (fm, body) = FrontMatter::parse(body);
                if let Some(title) = fm.title {
                    tracing::debug!("Stripped front-matter for {:?}", title);
                }
                self.render(body)
            }
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut fence: Option<FenceInfo> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    fence = Some(match kind {
                        CodeBlockKind::Fenced(info) => FenceInfo::parse(&info),
                        CodeBlockKind::Indented => FenceInfo {
                            lang: None,
                            file_name: None,
                        },
                    });
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(info) = fence.take() {
                        let highlighted = self.highlight_code(&code_block_content, &info);
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if fence.is_some() => {
                    code_block_content.push_str(&text);
                }
                _ => {
                    if fence.is_none() {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Syntax used for a fence language, plain text when unknown or missing
    fn resolve_syntax(&self, lang: Option<&str>) -> &SyntaxReference {
        lang.and_then(|lang| {
            self.syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
        })
        .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Name of the syntax a language tag resolves to
    pub fn syntax_name(&self, lang: Option<&str>) -> &str {
        &self.resolve_syntax(lang).name
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, info: &FenceInfo) -> String {
        let lang = info.lang.as_deref().unwrap_or("text");
        let syntax = self.resolve_syntax(info.lang.as_deref());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
                .map_err(|e| tracing::warn!("Highlighting {} failed: {}", lang, e))
                .ok()
        });

        let body = match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(code, &highlighted),
            Some(highlighted) => highlighted,
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        };

        let caption = info
            .file_name
            .as_ref()
            .map(|name| {
                format!(
                    r#"<figcaption><span class="file-name">{}</span><span class="lang-badge">{}</span></figcaption>"#,
                    html_escape(name),
                    html_escape(lang)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<figure class="highlight language-{}">{}{}</figure>"#,
            html_escape(lang),
            caption,
            body
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Put a line-number gutter next to highlighted code
fn add_line_numbers(code: &str, highlighted: &str) -> String {
    let line_count = code.lines().count().max(1);

    let gutter = (1..=line_count)
        .map(|i| format!(r#"<span class="line-number">{}</span>"#, i))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table>"#,
        gutter, highlighted
    )
}
