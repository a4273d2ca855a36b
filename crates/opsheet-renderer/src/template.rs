//! Page template with named placeholders.
//!
//! Placeholders are written `${name}`; `$$` is a literal `$`, and a `$` not
//! followed by `{` or `$` is kept as is. Substitution is literal: values are
//! inserted without escaping.

use std::collections::HashMap;

/// Placeholders a page template must contain, each exactly once.
pub const PAGE_PLACEHOLDERS: [&str; 4] = [
    "version",
    "encoded_favicon",
    "section_links",
    "section_content",
];

/// Built-in cheatsheet page.
///
/// Sidebar is rotated into a vertical strip on the left; content scrolls on the
/// right.
const BUILTIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>${version}</title>
<link id="favicon" rel="shortcut icon" type="image/png" href="${encoded_favicon}">
<link rel="preconnect" href="https://fonts.googleapis.com">
<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
<link href="https://fonts.googleapis.com/css2?family=Roboto+Mono:wght@600&family=Roboto:wght@500&display=swap" rel="stylesheet">
<meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0">
<style type="text/css">
body {
    background: #eeeef2; color: #222228;
}
a {
    color: inherit; text-decoration: inherit;
}
.links {
    font-family: 'Roboto Mono', monospace; writing-mode: vertical-rl; text-orientation: mixed; transform: rotate(180deg); text-align: right; padding: 1%; font-size: larger;
    height: 100vh; width: 10vw; position: fixed; top: 0; left: 0;
}
.content {
    padding: 1%;
    height: 100vh; width: 90vw; position: fixed; top: 0; left: 10vw; overflow-y: auto;
}
.fixturtle {
    transform: rotate(180deg); display: inline-block;
}
.section-title {
    font-family: 'Roboto', sans-serif; font-size: larger; margin: 1em 0 0.5em 0;
}
.prototype {
    font-family: 'Roboto Mono', monospace;
}
.short {
    font-family: 'Roboto', sans-serif; font-size: smaller; margin-bottom: 0.5em;
}
</style>
</head>
<body>
<div class="links">${section_links}</div>
<div class="content">${section_content}</div>
</body>
</html>
"#;

/// Error returned by template parsing and substitution.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `${` without a closing `}` or with an invalid name.
    #[error("Malformed placeholder at byte {offset}")]
    Malformed {
        /// Byte offset of the `$`.
        offset: usize,
    },
    /// A required placeholder does not appear in the template.
    #[error("Template is missing placeholder ${{{0}}}")]
    MissingPlaceholder(String),
    /// A required placeholder appears more than once.
    #[error("Template placeholder ${{{0}}} appears more than once")]
    DuplicatePlaceholder(String),
    /// The template contains a placeholder nobody provides.
    #[error("Template has unknown placeholder ${{{0}}}")]
    UnknownPlaceholder(String),
    /// No value was supplied for a placeholder.
    #[error("No value for template placeholder ${{{0}}}")]
    MissingValue(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Parsed template.
#[derive(Clone, Debug)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template without checking which placeholders it contains.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] for an unterminated or empty
    /// `${...}`.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(pos) = rest.find('$') {
            let offset = text.len() - rest.len() + pos;
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                literal.push('$');
                rest = tail;
            } else if let Some(tail) = after.strip_prefix('{') {
                let end = tail.find('}').ok_or(TemplateError::Malformed { offset })?;
                let name = &tail[..end];
                if !is_identifier(name) {
                    return Err(TemplateError::Malformed { offset });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name.to_owned()));
                rest = &tail[end + 1..];
            } else {
                literal.push('$');
                rest = after;
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Parse a page template.
    ///
    /// Every name in [`PAGE_PLACEHOLDERS`] must appear exactly once and no
    /// other placeholder may appear.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if parsing or the placeholder check fails.
    pub fn page(text: &str) -> Result<Self, TemplateError> {
        let template = Self::parse(text)?;
        template.require_exactly_once(&PAGE_PLACEHOLDERS)?;
        Ok(template)
    }

    /// The built-in cheatsheet page template.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::page(BUILTIN_PAGE)
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Check that each of `names` appears exactly once and nothing else does.
    ///
    /// # Errors
    ///
    /// Returns the first missing, duplicated or unknown placeholder.
    pub fn require_exactly_once(&self, names: &[&str]) -> Result<(), TemplateError> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in self.placeholders() {
            if !names.contains(&name) {
                return Err(TemplateError::UnknownPlaceholder(name.to_owned()));
            }
            *counts.entry(name).or_default() += 1;
        }
        for name in names {
            match counts.get(name).copied().unwrap_or(0) {
                0 => return Err(TemplateError::MissingPlaceholder((*name).to_owned())),
                1 => {}
                _ => return Err(TemplateError::DuplicatePlaceholder((*name).to_owned())),
            }
        }
        Ok(())
    }

    /// Substitute values into the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingValue`] if a placeholder has no value.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        let capacity = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.len(),
                Segment::Placeholder(name) => values.get(name.as_str()).map_or(0, |v| v.len()),
            })
            .sum();

        let mut output = String::with_capacity(capacity);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values
                        .get(name.as_str())
                        .ok_or_else(|| TemplateError::MissingValue(name.clone()))?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }
}

/// Placeholder names are ASCII identifiers.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
