//! Inline markup for operation descriptions.
//!
//! The only construct recognized is a backtick-delimited code span:
//! delimiter 1 opens `<code>`, delimiter 2 closes it, delimiter 3 opens again,
//! and so on. There is no nesting and no escaping of the delimiter. Every other
//! character passes through untouched.

/// Inline code delimiter.
const DELIMITER: char = '`';

const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";

/// Error returned for malformed inline markup.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// An odd number of delimiters leaves a code span open.
    #[error("Unbalanced inline code: found {count} backticks, expected an even number")]
    Unbalanced {
        /// Number of backticks found.
        count: usize,
    },
}

/// Convert backtick-delimited spans into inline code elements.
///
/// Text without backticks is returned unchanged. Text outside the delimiters is
/// not escaped.
///
/// # Examples
///
/// ```
/// use opsheet_renderer::transform;
///
/// assert_eq!(transform("a `b` c").unwrap(), "a <code>b</code> c");
/// assert_eq!(transform("no backticks").unwrap(), "no backticks");
/// assert!(transform("one ` only").is_err());
/// ```
///
/// # Errors
///
/// Returns [`MarkupError::Unbalanced`] if the number of backticks is odd.
pub fn transform(text: &str) -> Result<String, MarkupError> {
    let count = text.matches(DELIMITER).count();
    if count == 0 {
        return Ok(text.to_owned());
    }
    if count % 2 != 0 {
        return Err(MarkupError::Unbalanced { count });
    }

    let mut output =
        String::with_capacity(text.len() + count / 2 * (CODE_OPEN.len() + CODE_CLOSE.len()));
    for (index, part) in text.split(DELIMITER).enumerate() {
        if index > 0 {
            output.push_str(if index % 2 == 1 { CODE_OPEN } else { CODE_CLOSE });
        }
        output.push_str(part);
    }
    Ok(output)
}

/// Escape HTML special characters.
///
/// Backticks are left alone, so escaping before [`transform`] keeps code spans
/// intact.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
