//! Placeholder parser.
//!
//! Turns lexer segments into a tree: literal text, placeholders with a
//! validated option bag, and `{{if}}` blocks nested with a stack.
//!
//! Placeholder body grammar:
//!
//! ```text
//! body      = keyword (option)*  |  shorthand (option)*  |  "if" condition  |  "/if"
//! keyword   = table | columns | values | set | where | limit | offset | arg
//! shorthand = ("@" | ":" | "$") name          ; same as `arg --param name`
//! option    = "--" flag value                 ; value runs until the next --flag
//! condition = ("notnull" | "notempty") "=" name
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{TemplateError, TemplateResult};
use super::lexer::Segment;

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name regex"));

/// Placeholder kinds of the mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Table,
    Columns,
    Values,
    Set,
    Where,
    Limit,
    Offset,
    Arg,
}

impl PlaceholderKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword.to_ascii_lowercase().as_str() {
            "table" => PlaceholderKind::Table,
            "columns" => PlaceholderKind::Columns,
            "values" => PlaceholderKind::Values,
            "set" => PlaceholderKind::Set,
            "where" => PlaceholderKind::Where,
            "limit" => PlaceholderKind::Limit,
            "offset" => PlaceholderKind::Offset,
            "arg" => PlaceholderKind::Arg,
            _ => return None,
        })
    }

    fn allowed_flags(self) -> &'static [Flag] {
        match self {
            PlaceholderKind::Table => &[],
            PlaceholderKind::Columns => &[Flag::Exclude],
            PlaceholderKind::Values | PlaceholderKind::Set => &[Flag::Exclude, Flag::Inline],
            PlaceholderKind::Where
            | PlaceholderKind::Limit
            | PlaceholderKind::Offset
            | PlaceholderKind::Arg => &[Flag::Param, Flag::Name],
        }
    }

    fn requires_param(self) -> bool {
        matches!(
            self,
            PlaceholderKind::Where
                | PlaceholderKind::Limit
                | PlaceholderKind::Offset
                | PlaceholderKind::Arg
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Exclude,
    Inline,
    Param,
    Name,
}

impl Flag {
    fn parse(word: &str) -> Option<Self> {
        Some(match word {
            "--exclude" => Flag::Exclude,
            "--inline" => Flag::Inline,
            "--param" => Flag::Param,
            "--name" => Flag::Name,
            _ => return None,
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Flag::Exclude => "--exclude",
            Flag::Inline => "--inline",
            Flag::Param => "--param",
            Flag::Name => "--name",
        }
    }
}

/// Parsed option bag of one placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Member names to drop from the column set.
    pub exclude: Vec<String>,
    /// `(member, sql)` pairs emitted verbatim instead of a bind parameter.
    pub inline: Vec<(String, String)>,
    /// Runtime key read at render time.
    pub param: Option<String>,
    /// Emitted parameter name, when it differs from `param`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub options: Options,
    pub offset: usize,
    /// Original `{{...}}` text.
    pub source: String,
}

/// Condition of an `{{if}}` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    NotNull(String),
    NotEmpty(String),
}

impl Condition {
    pub fn key(&self) -> &str {
        match self {
            Condition::NotNull(k) | Condition::NotEmpty(k) => k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Placeholder(Placeholder),
    If {
        condition: Condition,
        body: Vec<Node>,
    },
}

/// Build the placeholder tree from lexer segments.
pub(crate) fn parse(segments: Vec<Segment<'_>>) -> TemplateResult<Vec<Node>> {
    // Each open `if` keeps its condition, offset and collected children.
    let mut stack: Vec<(Condition, usize, Vec<Node>)> = Vec::new();
    let mut root = Vec::new();

    for segment in segments {
        let node = match segment {
            Segment::Text(text) => Node::Text(text.to_string()),
            Segment::Placeholder {
                offset,
                body,
                source,
            } => {
                let (keyword, rest) = split_keyword(body);
                if keyword.eq_ignore_ascii_case("if") {
                    let condition = parse_condition(rest, offset)?;
                    stack.push((condition, offset, Vec::new()));
                    continue;
                }
                if keyword.eq_ignore_ascii_case("/if") {
                    if !rest.is_empty() {
                        return Err(TemplateError::syntax(offset, "{{/if}} takes no arguments"));
                    }
                    let (condition, _, body) = stack
                        .pop()
                        .ok_or_else(|| TemplateError::syntax(offset, "unmatched {{/if}}"))?;
                    Node::If { condition, body }
                } else {
                    Node::Placeholder(parse_placeholder(keyword, rest, offset, source)?)
                }
            }
        };

        match stack.last_mut() {
            Some((_, _, children)) => children.push(node),
            None => root.push(node),
        }
    }

    if let Some((_, offset, _)) = stack.pop() {
        return Err(TemplateError::syntax(offset, "unclosed {{if}} block"));
    }

    Ok(root)
}

fn split_keyword(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], body[i..].trim()),
        None => (body, ""),
    }
}

fn parse_condition(rest: &str, offset: usize) -> TemplateResult<Condition> {
    let (test, key) = rest.split_once('=').ok_or_else(|| {
        TemplateError::syntax(offset, "{{if}} needs notnull=<name> or notempty=<name>")
    })?;
    let key = key.trim();
    if !NAME.is_match(key) {
        return Err(TemplateError::syntax(
            offset,
            format!("invalid parameter name '{}' in {{{{if}}}}", key),
        ));
    }
    match test.trim() {
        "notnull" => Ok(Condition::NotNull(key.to_string())),
        "notempty" => Ok(Condition::NotEmpty(key.to_string())),
        other => Err(TemplateError::syntax(
            offset,
            format!("unknown {{{{if}}}} test '{}'", other),
        )),
    }
}

/// Resolve one `{{keyword ...}}` body into a placeholder.
///
/// A bare word such as `{{userId}}` is an unknown placeholder; write
/// `{{@userId}}` (or `{{arg --param userId}}`) for a runtime argument.
fn parse_placeholder(
    keyword: &str,
    rest: &str,
    offset: usize,
    source: &str,
) -> TemplateResult<Placeholder> {
    let mut options = Options::default();

    let kind = match keyword.strip_prefix(['@', ':', '$']) {
        Some(name) if NAME.is_match(name) => {
            options.param = Some(name.to_string());
            PlaceholderKind::Arg
        }
        _ => PlaceholderKind::from_keyword(keyword).ok_or_else(|| {
            TemplateError::UnknownPlaceholder {
                keyword: keyword.to_string(),
                offset,
            }
        })?,
    };

    let words = split_words(rest, offset)?;
    let mut words = words.into_iter().peekable();
    let mut seen: Vec<Flag> = Vec::new();

    while let Some(word) = words.next() {
        let flag = match Flag::parse(&word) {
            Some(flag) => flag,
            None if word.starts_with("--") => {
                return Err(TemplateError::syntax(
                    offset,
                    format!("unknown option '{}'", word),
                ))
            }
            None => {
                return Err(TemplateError::syntax(
                    offset,
                    format!("unexpected argument '{}'", word),
                ))
            }
        };

        if !kind.allowed_flags().contains(&flag) {
            return Err(TemplateError::syntax(
                offset,
                format!("option {} is not valid for {:?}", flag.as_str(), kind),
            ));
        }
        if seen.contains(&flag) || (flag == Flag::Param && options.param.is_some()) {
            return Err(TemplateError::syntax(
                offset,
                format!("option {} given more than once", flag.as_str()),
            ));
        }
        seen.push(flag);

        let mut value_words = Vec::new();
        while let Some(next) = words.next_if(|w| !w.starts_with("--")) {
            value_words.push(next);
        }
        if value_words.is_empty() {
            return Err(TemplateError::syntax(
                offset,
                format!("option {} requires a value", flag.as_str()),
            ));
        }
        let value = value_words.join(" ");

        match flag {
            Flag::Exclude => {
                options.exclude = value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            Flag::Inline => options.inline = parse_inline(&value, offset)?,
            Flag::Param | Flag::Name => {
                if !NAME.is_match(&value) {
                    return Err(TemplateError::syntax(
                        offset,
                        format!("invalid parameter name '{}'", value),
                    ));
                }
                if flag == Flag::Param {
                    options.param = Some(value);
                } else {
                    options.name = Some(value);
                }
            }
        }
    }

    if kind.requires_param() && options.param.is_none() {
        return Err(TemplateError::syntax(
            offset,
            format!("{:?} requires --param <name>", kind),
        ));
    }

    Ok(Placeholder {
        kind,
        options,
        offset,
        source: source.to_string(),
    })
}

/// Split on whitespace outside quotes and parentheses.
fn split_words(s: &str, offset: usize) -> TemplateResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
                continue;
            }
            None => {}
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    TemplateError::syntax(offset, "unbalanced parentheses in placeholder")
                })?;
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(TemplateError::syntax(offset, "unterminated quote in placeholder"));
    }
    if depth != 0 {
        return Err(TemplateError::syntax(
            offset,
            "unbalanced parentheses in placeholder",
        ));
    }
    if !current.is_empty() {
        words.push(current);
    }
    Ok(words)
}

/// Split `Name=Expr[,Name2=Expr2]` on commas outside quotes and parentheses.
fn parse_inline(value: &str, offset: usize) -> TemplateResult<Vec<(String, String)>> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in value.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);

    items
        .into_iter()
        .map(|item| {
            let (name, expr) = item.split_once('=').ok_or_else(|| {
                TemplateError::syntax(
                    offset,
                    format!("--inline expects Name=Expression, got '{}'", item.trim()),
                )
            })?;
            let (name, expr) = (name.trim(), expr.trim());
            if !NAME.is_match(name) || expr.is_empty() {
                return Err(TemplateError::syntax(
                    offset,
                    format!("--inline expects Name=Expression, got '{}'", item.trim()),
                ));
            }
            Ok((name.to_string(), expr.to_string()))
        })
        .collect()
}
