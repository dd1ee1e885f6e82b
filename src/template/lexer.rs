//! Splits template text into literal spans and `{{...}}` placeholder spans.

use super::error::{TemplateError, TemplateResult};

/// One span of template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Literal SQL text, copied through unchanged.
    Text(&'a str),
    /// A placeholder. `offset` is the byte position of its opening `{{`,
    /// `body` is the trimmed text between the braces.
    Placeholder {
        offset: usize,
        body: &'a str,
        source: &'a str,
    },
}

/// Scan `text` into segments.
///
/// A `{{` without a closing `}}`, or with another `{{` before its close,
/// is unterminated. A lone `}}` in literal text is left alone.
pub(crate) fn tokenize(text: &str) -> TemplateResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find("{{") {
        let start = pos + rel;
        if start > pos {
            segments.push(Segment::Text(&text[pos..start]));
        }

        let body_start = start + 2;
        let close = text[body_start..]
            .find("}}")
            .map(|i| body_start + i)
            .ok_or_else(|| TemplateError::syntax(start, "unterminated placeholder"))?;

        let raw_body = &text[body_start..close];
        if raw_body.contains("{{") {
            return Err(TemplateError::syntax(start, "unterminated placeholder"));
        }
        let body = raw_body.trim();
        if body.is_empty() {
            return Err(TemplateError::syntax(start, "empty placeholder"));
        }

        segments.push(Segment::Placeholder {
            offset: start,
            body,
            source: &text[start..close + 2],
        });
        pos = close + 2;
    }

    if pos < text.len() {
        segments.push(Segment::Text(&text[pos..]));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            tokenize("SELECT 1").unwrap(),
            vec![Segment::Text("SELECT 1")]
        );
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_placeholders_and_text() {
        let segments = tokenize("SELECT {{ columns }} FROM {{table}}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("SELECT "),
                Segment::Placeholder {
                    offset: 7,
                    body: "columns",
                    source: "{{ columns }}",
                },
                Segment::Text(" FROM "),
                Segment::Placeholder {
                    offset: 26,
                    body: "table",
                    source: "{{table}}",
                },
            ]
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            tokenize("SELECT {{columns FROM x"),
            Err(TemplateError::syntax(7, "unterminated placeholder"))
        );
        assert_eq!(
            tokenize("{{table {{columns}}"),
            Err(TemplateError::syntax(0, "unterminated placeholder"))
        );
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(matches!(
            tokenize("a {{  }} b"),
            Err(TemplateError::Syntax { offset: 2, .. })
        ));
    }

    #[test]
    fn test_lone_close_braces_are_text() {
        assert_eq!(
            tokenize("SELECT '}}'").unwrap(),
            vec![Segment::Text("SELECT '}}'")]
        );
    }
}
