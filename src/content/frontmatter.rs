//! Front-matter stripping for Markdown post bodies

use serde::Deserialize;

/// Keys that mark a leading `---` block as front-matter rather than Markdown
const FRONT_MATTER_KEYS: &[&str] = &[
    "title",
    "date",
    "author",
    "tags",
    "categories",
    "description",
    "excerpt",
];

/// Front-matter block at the top of a fetched Markdown body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
}

impl FrontMatter {
    /// Split a leading YAML block off a Markdown body
    ///
    /// The block must open with `---` on the very first line, close with a
    /// `---` line, and parse as a YAML mapping holding at least one known
    /// front-matter key. Anything else is Markdown (a thematic break or a
    /// setext heading) and the body comes back untouched.
    pub fn parse(content: &str) -> (Self, &str) {
        match Self::split(content) {
            Some((yaml, body)) => match Self::read_block(yaml) {
                Some(fm) => (fm, body),
                None => (FrontMatter::default(), content),
            },
            None => (FrontMatter::default(), content),
        }
    }

    /// `(yaml, body)` when the content opens with a closed `---` block
    fn split(content: &str) -> Option<(&str, &str)> {
        let rest = content
            .strip_prefix("---\n")
            .or_else(|| content.strip_prefix("---\r\n"))?;

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end_matches(['\n', '\r']) == "---" {
                let body = &rest[offset + line.len()..];
                return Some((&rest[..offset], body.trim_start_matches(['\n', '\r'])));
            }
            offset += line.len();
        }
        None
    }

    fn read_block(yaml: &str) -> Option<Self> {
        let mapping: serde_yaml::Mapping = match serde_yaml::from_str(yaml) {
            Ok(mapping) => mapping,
            Err(e) => {
                tracing::debug!("Leading block is not YAML front-matter: {}", e);
                return None;
            }
        };

        let known = mapping
            .keys()
            .filter_map(|k| k.as_str())
            .any(|k| FRONT_MATTER_KEYS.contains(&k));
        if !known {
            return None;
        }

        match serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)) {
            Ok(fm) => Some(fm),
            Err(e) => {
                tracing::warn!("Unreadable front-matter title, ignoring it: {}", e);
                Some(FrontMatter::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_yaml_block() {
        let content = "---\ntitle: Exploiting Solana Programs\nauthor: Alex Johnson\ntags: [Security, Solana]\n---\n\nSmart contracts on Solana are written in Rust.\n";

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Exploiting Solana Programs"));
        assert_eq!(body, "Smart contracts on Solana are written in Rust.\n");
    }

    #[test]
    fn test_block_without_title_is_still_stripped() {
        let (fm, body) = FrontMatter::parse("---\ndate: 2023-06-15\n---\nBody");
        assert!(fm.title.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_body_without_front_matter_is_untouched() {
        let content = "    let x = 1;\n";
        assert_eq!(FrontMatter::parse(content), (FrontMatter::default(), content));

        let content = "\n---\ntitle: Not at the start\n---\n";
        assert_eq!(FrontMatter::parse(content).1, content);
    }

    #[test]
    fn test_setext_heading_after_rule_is_kept() {
        let content = "---\nNote: read this first\n---\n\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.title.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_thematic_break_with_prose_is_kept() {
        let content = "---\n\nCheck out https://example.com/path\n\n---\nMore content.\n";
        assert_eq!(FrontMatter::parse(content).1, content);
    }

    #[test]
    fn test_unclosed_block_is_kept() {
        let content = "---\ntitle: Draft\n\nNo closing line";
        assert_eq!(FrontMatter::parse(content).1, content);
    }
}
