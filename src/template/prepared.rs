//! Template preparation and rendering.

use std::borrow::Cow;

use super::error::TemplateResult;
use super::handlers::{self, DynamicSite, Fragment, RenderState};
use super::lexer::tokenize;
use super::parser::{self, Condition, Node};
use super::{Params, PlaceholderContext};
use crate::sql::dialect::Dialect;

/// One piece of a prepared template.
#[derive(Debug, Clone, PartialEq)]
enum Part {
    Static(String),
    Dynamic { site: DynamicSite, source: String },
    If { condition: Condition, body: Vec<Part> },
}

/// A template with every static placeholder resolved.
///
/// Immutable once prepared; `render` allocates its own output, so one
/// instance can be shared across threads (`Arc<PreparedTemplate>`).
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTemplate {
    parts: Vec<Part>,
    sql: String,
    has_dynamic: bool,
    parameter_names: Vec<String>,
    runtime_keys: Vec<String>,
    original_text: String,
    dialect: Dialect,
}

/// Parse `text` and resolve its static placeholders against `ctx`.
///
/// Fails on syntax errors and unknown placeholders; a template either
/// prepares fully or not at all.
pub fn prepare(text: &str, ctx: &PlaceholderContext) -> TemplateResult<PreparedTemplate> {
    let nodes = parser::parse(tokenize(text)?)?;

    let mut builder = Builder::default();
    let parts = builder.lower(nodes, ctx);

    let has_dynamic = parts.iter().any(|p| !matches!(p, Part::Static(_)));
    let mut sql = String::with_capacity(text.len());
    write_sql(&parts, &mut sql);

    crate::sqlstencil_trace_prepare!(ctx.dialect, text.len(), has_dynamic);

    Ok(PreparedTemplate {
        parts,
        sql,
        has_dynamic,
        parameter_names: builder.parameter_names,
        runtime_keys: builder.runtime_keys,
        original_text: text.to_string(),
        dialect: ctx.dialect,
    })
}

#[derive(Default)]
struct Builder {
    parameter_names: Vec<String>,
    runtime_keys: Vec<String>,
}

impl Builder {
    fn lower(&mut self, nodes: Vec<Node>, ctx: &PlaceholderContext) -> Vec<Part> {
        let mut parts: Vec<Part> = Vec::new();

        for node in nodes {
            let part = match node {
                Node::Text(text) => Part::Static(text),
                Node::Placeholder(placeholder) => match handlers::resolve(&placeholder, ctx) {
                    Fragment::Static { sql, binds } => {
                        for bind in binds {
                            push_unique(&mut self.parameter_names, bind);
                        }
                        Part::Static(sql)
                    }
                    Fragment::Dynamic(site) => {
                        self.record_site(&site);
                        Part::Dynamic {
                            site,
                            source: placeholder.source,
                        }
                    }
                },
                Node::If { condition, body } => {
                    push_unique(&mut self.runtime_keys, condition.key().to_string());
                    let body = self.lower(body, ctx);
                    Part::If { condition, body }
                }
            };

            // Merge adjacent static text.
            match (parts.last_mut(), part) {
                (Some(Part::Static(prev)), Part::Static(next)) => prev.push_str(&next),
                (_, part) => parts.push(part),
            }
        }

        parts
    }

    fn record_site(&mut self, site: &DynamicSite) {
        push_unique(&mut self.runtime_keys, site.key().to_string());
        if let DynamicSite::Arg { bind, .. } = site {
            push_unique(&mut self.parameter_names, bind.clone());
        }
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Static text with each dynamic slot shown as its placeholder source.
fn write_sql(parts: &[Part], out: &mut String) {
    for part in parts {
        match part {
            Part::Static(text) => out.push_str(text),
            Part::Dynamic { source, .. } => out.push_str(source),
            Part::If { condition, body } => {
                match condition {
                    Condition::NotNull(key) => out.push_str(&format!("{{{{if notnull={}}}}}", key)),
                    Condition::NotEmpty(key) => {
                        out.push_str(&format!("{{{{if notempty={}}}}}", key))
                    }
                }
                write_sql(body, out);
                out.push_str("{{/if}}");
            }
        }
    }
}

impl PreparedTemplate {
    /// Prepared SQL. Fully resolved when the template has no dynamic
    /// placeholders; otherwise dynamic slots appear as their `{{...}}` text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn has_dynamic_placeholders(&self) -> bool {
        self.has_dynamic
    }

    /// Bind parameter names emitted by `values`, `set` and `arg`, in order.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Runtime keys read by `render`, in order.
    pub fn runtime_keys(&self) -> &[String] {
        &self.runtime_keys
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Render against runtime parameters.
    ///
    /// A static template returns `sql()` itself, borrowed, whatever the
    /// parameters. A missing key counts as null except for `arg`, where it
    /// is [`MissingParameter`](super::TemplateError::MissingParameter).
    pub fn render<'a>(&'a self, params: Option<&Params>) -> TemplateResult<Cow<'a, str>> {
        if !self.has_dynamic {
            return Ok(Cow::Borrowed(&self.sql));
        }

        let mut live = LivePagination::default();
        live.collect(&self.parts, params);

        let mut state = RenderState {
            params,
            dialect: self.dialect,
            limit_key: live.limit,
            offset_key: live.offset,
            fetch_emitted: false,
        };
        let mut out = String::with_capacity(self.sql.len());
        render_parts(&self.parts, &mut state, &mut out)?;

        crate::sqlstencil_trace_render!(out);
        Ok(Cow::Owned(out))
    }
}

/// First `limit` and `offset` sites that a render will actually reach.
#[derive(Default)]
struct LivePagination<'a> {
    limit: Option<&'a str>,
    offset: Option<&'a str>,
}

impl<'a> LivePagination<'a> {
    fn collect(&mut self, parts: &'a [Part], params: Option<&Params>) {
        for part in parts {
            match part {
                Part::Dynamic {
                    site: DynamicSite::Limit { key },
                    ..
                } => {
                    self.limit.get_or_insert(key);
                }
                Part::Dynamic {
                    site: DynamicSite::Offset { key },
                    ..
                } => {
                    self.offset.get_or_insert(key);
                }
                Part::If { condition, body } if condition.holds(params) => {
                    self.collect(body, params)
                }
                _ => {}
            }
        }
    }
}

fn render_parts(parts: &[Part], state: &mut RenderState<'_>, out: &mut String) -> TemplateResult<()> {
    for part in parts {
        match part {
            Part::Static(text) => out.push_str(text),
            Part::Dynamic { site, .. } => out.push_str(&state.render_site(site)?),
            Part::If { condition, body } => {
                if condition.holds(state.params) {
                    render_parts(body, state, out)?;
                }
            }
        }
    }
    Ok(())
}
