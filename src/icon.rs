//! Resolved icon values

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::attributes::Attributes;

/// An icon resolved by [`crate::IconFactory::svg`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Svg {
    name: String,
    contents: String,
    attributes: Attributes,
}

impl Svg {
    pub fn new(name: impl Into<String>, contents: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            attributes,
        }
    }

    /// Icon name without its set prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw file contents, trimmed
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Markup with the attributes spliced into the opening `<svg` tag.
    ///
    /// `true` renders as a bare attribute name; `false` and `null` are omitted,
    /// as are keys that aren't valid attribute names. Contents without an
    /// `<svg` element outside of comments are returned unchanged.
    pub fn to_html(&self) -> String {
        let rendered = self.render_attributes();
        let Some(start) = open_tag(&self.contents).filter(|_| !rendered.is_empty()) else {
            return self.contents.clone();
        };

        let insert_at = start + "<svg".len();
        let mut html = String::with_capacity(self.contents.len() + rendered.len());
        html.push_str(&self.contents[..insert_at]);
        html.push_str(&rendered);
        html.push_str(&self.contents[insert_at..]);
        html
    }

    fn render_attributes(&self) -> String {
        self.attributes
            .iter()
            .filter(|(key, _)| {
                let valid = is_attribute_name(key);
                if !valid {
                    warn!(icon = %self.name, key = %key, "Skipping invalid attribute name");
                }
                valid
            })
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null | serde_json::Value::Bool(false) => None,
                serde_json::Value::Bool(true) => Some(format!(" {}", key)),
                serde_json::Value::String(s) => Some(format!(" {}=\"{}\"", key, escape(s))),
                other => Some(format!(" {}=\"{}\"", key, escape(&other.to_string()))),
            })
            .collect()
    }
}

/// Byte offset of the first `<svg` element outside of `<!-- -->` comments
fn open_tag(contents: &str) -> Option<usize> {
    let mut pos = 0;
    while pos < contents.len() {
        let rest = &contents[pos..];
        let tag = rest.find("<svg")?;

        if let Some(comment) = rest.find("<!--").filter(|&c| c < tag) {
            let body = pos + comment + "<!--".len();
            pos = body + contents[body..].find("-->")? + "-->".len();
            continue;
        }

        let at = pos + tag;
        let after = at + "<svg".len();
        match contents[after..].chars().next() {
            None => return Some(at),
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            Some(_) => pos = after,
        }
    }
    None
}

fn is_attribute_name(key: &str) -> bool {
    !key.is_empty()
        && !key.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

impl fmt::Display for Svg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_html_without_attributes() {
        let svg = Svg::new("github", "<svg>A</svg>", Attributes::new());
        assert_eq!(svg.to_html(), "<svg>A</svg>");
    }

    #[test]
    fn test_to_html_with_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), json!("icon w-4"));
        attributes.insert("aria-hidden".to_string(), json!(true));
        attributes.insert("hidden".to_string(), json!(false));
        attributes.insert("width".to_string(), json!(24));
        attributes.insert("title".to_string(), json!("a \"b\" & c"));

        let svg = Svg::new("github", "<svg viewBox=\"0 0 24 24\"><path/></svg>", attributes);
        assert_eq!(
            svg.to_string(),
            "<svg class=\"icon w-4\" aria-hidden width=\"24\" title=\"a &quot;b&quot; &amp; c\" viewBox=\"0 0 24 24\"><path/></svg>"
        );
    }

    #[test]
    fn test_to_html_skips_commented_and_lookalike_tags() {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), json!("icon"));

        let contents = "<!-- <svg old --><svgfoo/><svg\nviewBox=\"0 0 1 1\"/>";
        let svg = Svg::new("x", contents, attributes.clone());
        assert_eq!(
            svg.to_html(),
            "<!-- <svg old --><svgfoo/><svg class=\"icon\"\nviewBox=\"0 0 1 1\"/>"
        );

        let no_tag = Svg::new("x", "<!-- <svg> -->", attributes);
        assert_eq!(no_tag.to_html(), "<!-- <svg> -->");
    }

    #[test]
    fn test_to_html_drops_invalid_attribute_names() {
        let mut attributes = Attributes::new();
        attributes.insert("onload=\"x\" a".to_string(), json!("1"));
        attributes.insert("data id".to_string(), json!("2"));
        attributes.insert("".to_string(), json!(true));
        attributes.insert("data-id".to_string(), json!("3"));

        let svg = Svg::new("x", "<svg></svg>", attributes);
        assert_eq!(svg.to_html(), "<svg data-id=\"3\"></svg>");
    }
}
