//! Placeholder handlers.
//!
//! Static kinds resolve to SQL text at prepare time. Dynamic kinds become
//! a [`DynamicSite`] rendered against runtime parameters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::error::{TemplateError, TemplateResult};
use super::parser::{Condition, Options, Placeholder, PlaceholderKind};
use super::{Params, PlaceholderContext};
use crate::catalog::{snake_case, ColumnMetadata};
use crate::sql::dialect::{Dialect, PaginationStyle, SqlDialect};
use crate::sql::query::TableRef;
use crate::sql::token::Token;

/// Lexes an inline expression: quoted strings and identifiers are whole
/// tokens so substitution never reaches inside them.
static INLINE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)'(?:[^']|'')*'|"(?:[^"]|"")*"|`[^`]*`|\[[^\]]*\]|[A-Za-z_][A-Za-z0-9_]*|[0-9]+(?:\.[0-9]+)?|."#,
    )
    .expect("valid inline token regex")
});

/// Result of resolving one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fragment {
    /// Folded text plus the bind names it emitted.
    Static { sql: String, binds: Vec<String> },
    Dynamic(DynamicSite),
}

/// A placeholder deferred to render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DynamicSite {
    Where { key: String },
    Limit { key: String },
    Offset { key: String },
    Arg { key: String, bind: String },
}

impl DynamicSite {
    pub(crate) fn key(&self) -> &str {
        match self {
            DynamicSite::Where { key }
            | DynamicSite::Limit { key }
            | DynamicSite::Offset { key }
            | DynamicSite::Arg { key, .. } => key,
        }
    }
}

pub(crate) fn resolve(placeholder: &Placeholder, ctx: &PlaceholderContext) -> Fragment {
    let options = &placeholder.options;
    // The parser guarantees --param for the dynamic kinds.
    let key = || options.param.clone().unwrap_or_default();

    match placeholder.kind {
        PlaceholderKind::Table => Fragment::Static {
            sql: table(ctx),
            binds: Vec::new(),
        },
        PlaceholderKind::Columns => Fragment::Static {
            sql: columns(ctx, options),
            binds: Vec::new(),
        },
        PlaceholderKind::Values => {
            let (items, binds) = assignments(ctx, options);
            Fragment::Static {
                sql: items
                    .into_iter()
                    .map(|(_, value)| value)
                    .collect::<Vec<_>>()
                    .join(", "),
                binds,
            }
        }
        PlaceholderKind::Set => {
            let (items, binds) = assignments(ctx, options);
            Fragment::Static {
                sql: items
                    .into_iter()
                    .map(|(column, value)| format!("{} = {}", column, value))
                    .collect::<Vec<_>>()
                    .join(", "),
                binds,
            }
        }
        // --name only renames bind parameters; the other dynamic kinds
        // never emit one.
        PlaceholderKind::Where => Fragment::Dynamic(DynamicSite::Where { key: key() }),
        PlaceholderKind::Limit => Fragment::Dynamic(DynamicSite::Limit { key: key() }),
        PlaceholderKind::Offset => Fragment::Dynamic(DynamicSite::Offset { key: key() }),
        PlaceholderKind::Arg => {
            let key = key();
            let bind = options.name.clone().unwrap_or_else(|| key.clone());
            Fragment::Dynamic(DynamicSite::Arg { key, bind })
        }
    }
}

fn table(ctx: &PlaceholderContext) -> String {
    let table = TableRef::parse(ctx.table());
    Token::QualifiedIdent {
        schema: table.schema,
        name: table.table,
    }
    .serialize(ctx.dialect)
}

fn included<'a>(ctx: &'a PlaceholderContext, options: &Options) -> Vec<&'a ColumnMetadata> {
    ctx.catalog
        .columns()
        .iter()
        .filter(|c| !options.exclude.iter().any(|e| *e == c.member_name))
        .collect()
}

fn columns(ctx: &PlaceholderContext, options: &Options) -> String {
    included(ctx, options)
        .into_iter()
        .map(|c| ctx.dialect.quote_identifier(&c.db_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `(quoted column, value)` pairs for `values`/`set`, and the bind names
/// emitted in order.
fn assignments(ctx: &PlaceholderContext, options: &Options) -> (Vec<(String, String)>, Vec<String>) {
    let mut items = Vec::new();
    let mut binds = Vec::new();

    for column in included(ctx, options) {
        let inline = options
            .inline
            .iter()
            .find(|(target, _)| *target == column.member_name);

        let value = match inline {
            Some((_, expr)) => substitute_columns(expr, ctx),
            None => {
                let bind = snake_case(&column.member_name);
                let param = ctx.dialect.format_parameter(&bind);
                binds.push(bind);
                param
            }
        };
        items.push((ctx.dialect.quote_identifier(&column.db_name), value));
    }

    (items, binds)
}

/// Replace bare identifiers naming catalog members with quoted db names.
///
/// Skips quoted spans, parameter references (`@x`, `:x`, `$x`), qualified
/// parts (`t.x`) and function names.
pub(crate) fn substitute_columns(expr: &str, ctx: &PlaceholderContext) -> String {
    let mut out = String::with_capacity(expr.len());

    for m in INLINE_TOKEN.find_iter(expr) {
        let token = m.as_str();
        let Some(column) = ctx.catalog.column(token) else {
            out.push_str(token);
            continue;
        };

        let before = expr[..m.start()].chars().next_back();
        let after = expr[m.end()..].trim_start().chars().next();
        let skip = matches!(before, Some('@' | ':' | '$' | '.')) || after == Some('(');

        if skip {
            out.push_str(token);
        } else {
            out.push_str(&ctx.dialect.quote_identifier(&column.db_name));
        }
    }

    out
}

/// Render-time state shared by all sites of one render call.
pub(crate) struct RenderState<'a> {
    pub params: Option<&'a Params>,
    pub dialect: Dialect,
    pub limit_key: Option<&'a str>,
    pub offset_key: Option<&'a str>,
    /// Set once an OFFSET/FETCH dialect has emitted its combined clause.
    pub fetch_emitted: bool,
}

impl RenderState<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.params.and_then(|p| p.get(key))
    }

    fn pagination(&self, key: Option<&str>) -> TemplateResult<Option<u64>> {
        match key {
            Some(key) => pagination_value(key, self.get(key)),
            None => Ok(None),
        }
    }

    pub(crate) fn render_site(&mut self, site: &DynamicSite) -> TemplateResult<String> {
        match site {
            DynamicSite::Where { key } => match self.get(key) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(TemplateError::invalid(
                    key,
                    format!("expected a SQL string, got {}", other),
                )),
            },
            DynamicSite::Arg { key, bind } => match self.get(key) {
                Some(_) => Ok(self.dialect.format_parameter(bind)),
                None => Err(TemplateError::MissingParameter { name: key.clone() }),
            },
            DynamicSite::Limit { key } | DynamicSite::Offset { key } => {
                match self.dialect.pagination_style() {
                    PaginationStyle::LimitOffset => self.render_limit_offset(site, key),
                    PaginationStyle::OffsetFetch => self.render_fetch(),
                }
            }
        }
    }

    fn render_limit_offset(&self, site: &DynamicSite, key: &str) -> TemplateResult<String> {
        let Some(value) = pagination_value(key, self.get(key))? else {
            return Ok(String::new());
        };
        let tokens = match site {
            DynamicSite::Limit { .. } => self.dialect.emit_limit_offset(Some(value), None),
            _ if self.pagination(self.limit_key)?.is_some() => {
                // The limit site supplies LIMIT; an offset alone is plain.
                crate::sql::dialect::helpers::emit_limit_offset_standard(None, Some(value))
            }
            _ => self.dialect.emit_limit_offset(None, Some(value)),
        };
        Ok(tokens.serialize(self.dialect))
    }

    fn render_fetch(&mut self) -> TemplateResult<String> {
        if self.fetch_emitted {
            return Ok(String::new());
        }
        let limit = self.pagination(self.limit_key)?;
        let offset = self.pagination(self.offset_key)?;
        if limit.is_none() && offset.is_none() {
            return Ok(String::new());
        }
        self.fetch_emitted = true;
        Ok(self.dialect.emit_limit_offset(limit, offset).serialize(self.dialect))
    }
}

/// Non-negative integer (or numeric string) pagination value.
fn pagination_value(key: &str, value: Option<&Value>) -> TemplateResult<Option<u64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(Some(v));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Ok(Some(f as u64))
                }
                Some(f) if f < 0.0 => Err(TemplateError::invalid(key, "must not be negative")),
                _ => Err(TemplateError::invalid(key, format!("{} is not a whole number", n))),
            }
        }
        Some(Value::String(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| {
            TemplateError::invalid(key, format!("'{}' is not a non-negative integer", s))
        }),
        Some(other) => Err(TemplateError::invalid(
            key,
            format!("expected a non-negative integer, got {}", other),
        )),
    }
}

impl Condition {
    /// Whether an `{{if}}` block is included for these parameters.
    pub(crate) fn holds(&self, params: Option<&Params>) -> bool {
        let value = params.and_then(|p| p.get(self.key()));
        match (self, value) {
            (_, None | Some(Value::Null)) => false,
            (Condition::NotNull(_), Some(_)) => true,
            (Condition::NotEmpty(_), Some(Value::String(s))) => !s.is_empty(),
            (Condition::NotEmpty(_), Some(Value::Array(a))) => !a.is_empty(),
            (Condition::NotEmpty(_), Some(Value::Object(o))) => !o.is_empty(),
            (Condition::NotEmpty(_), Some(_)) => true,
        }
    }
}
