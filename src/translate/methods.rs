//! String, math and collection method calls.
//!
//! Host string positions are 0-based; SQL positions are 1-based. Starts
//! passed in get `+ 1`, and positions coming back get `- 1`, so IndexOf
//! returns -1 when the value is absent.

use crate::sql::dialect::{IndexOfStyle, PadStyle, SqlDialect};
use crate::sql::expr::{concat, func, lit_int, lit_str, Expr, ExprExt, Literal};

use super::ast::{Method, Node};
use super::context::{Mode, TranslateContext};
use super::error::{TranslateError, TranslateResult};
use super::{bind_constant, value};

pub(super) fn lower(method: &Method, ctx: &TranslateContext) -> TranslateResult<Expr> {
    let call = |name: &str, args: &[&Node]| -> TranslateResult<Expr> {
        let args = args
            .iter()
            .map(|a| value(a, ctx))
            .collect::<TranslateResult<Vec<_>>>()?;
        Ok(func(name, args))
    };

    match method {
        Method::Contains { target, value: v } => like(target, v, true, true, ctx),
        Method::StartsWith { target, value: v } => like(target, v, false, true, ctx),
        Method::EndsWith { target, value: v } => like(target, v, true, false, ctx),
        Method::ToUpper(t) => call("UPPER", &[t]),
        Method::ToLower(t) => call("LOWER", &[t]),
        Method::Trim(t) => call("TRIM", &[t]),
        Method::TrimStart(t) => call("LTRIM", &[t]),
        Method::TrimEnd(t) => call("RTRIM", &[t]),
        Method::Length(t) => call("LENGTH", &[t]),
        Method::IndexOf {
            target,
            value: v,
            start,
        } => index_of(target, v, start.as_ref(), ctx),
        Method::PadLeft { target, width, pad } => pad_string(target, width, pad, true, ctx),
        Method::PadRight { target, width, pad } => pad_string(target, width, pad, false, ctx),
        Method::Substring {
            target,
            start,
            length,
        } => {
            let haystack = value(target, ctx)?;
            let mut args = vec![haystack.clone(), one_based(start, ctx)?];
            match length {
                Some(length) => args.push(value(length, ctx)?),
                None if ctx.dialect.substring_requires_length() => {
                    args.push(func("LENGTH", vec![haystack]))
                }
                None => {}
            }
            Ok(func("SUBSTRING", args))
        }
        Method::Replace { target, from, to } => call("REPLACE", &[target, from, to]),
        Method::IsNullOrEmpty(t) => {
            let expr = value(t, ctx)?;
            Ok(expr.clone().is_null().or(expr.eq(lit_str(""))))
        }

        Method::Abs(v) => call("ABS", &[v]),
        Method::Round { value: v, digits } => match digits {
            Some(d) => call("ROUND", &[v, d]),
            // SQL Server has no one-argument ROUND
            None => Ok(func("ROUND", vec![value(v, ctx)?, lit_int(0)])),
        },
        Method::Floor(v) => call("FLOOR", &[v]),
        Method::Ceiling(v) => call("CEILING", &[v]),
        Method::Pow { base, exponent } => call("POWER", &[base, exponent]),
        Method::Sqrt(v) => call("SQRT", &[v]),

        Method::ListContains { list, item } => match list {
            Node::List(values) => {
                let values = values
                    .iter()
                    .map(bind_constant)
                    .collect::<TranslateResult<Vec<_>>>()?;
                // An empty list renders `1 = 0`.
                Ok(value(item, ctx)?.in_list(values))
            }
            _ => Err(TranslateError::InvalidArgument {
                method: "Contains",
                reason: "collection must be a constant list".into(),
            }),
        },
    }
}

fn like(
    target: &Node,
    pattern: &Node,
    leading: bool,
    trailing: bool,
    ctx: &TranslateContext,
) -> TranslateResult<Expr> {
    let target = value(target, ctx)?;
    match pattern {
        Node::Constant(Literal::Null) => Err(TranslateError::InvalidArgument {
            method: "Contains",
            reason: "pattern must not be null".into(),
        }),
        Node::Constant(Literal::String(s)) if ctx.mode == Mode::Literal => {
            let pattern = format!(
                "{}{}{}",
                if leading { "%" } else { "" },
                s,
                if trailing { "%" } else { "" }
            );
            Ok(target.like(Expr::Bind(Literal::String(pattern))))
        }
        other => {
            let mut parts = Vec::with_capacity(3);
            if leading {
                parts.push(lit_str("%"));
            }
            parts.push(value(other, ctx)?);
            if trailing {
                parts.push(lit_str("%"));
            }
            Ok(target.like(concat(parts)))
        }
    }
}

/// 0-based host start to a 1-based SQL start. Constant starts fold in
/// literal mode.
fn one_based(start: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    match start {
        Node::Constant(Literal::Int(n)) if ctx.mode == Mode::Literal => {
            let n = n.checked_add(1).ok_or_else(|| TranslateError::InvalidArgument {
                method: "start index",
                reason: format!("{} is out of range", n),
            })?;
            Ok(Expr::Bind(Literal::Int(n)))
        }
        other => Ok(value(other, ctx)?.add(lit_int(1))),
    }
}

/// 1-based position of `needle` in `haystack`, 0 when absent.
fn position(needle: Expr, haystack: Expr, ctx: &TranslateContext) -> Expr {
    match ctx.dialect.index_of_style() {
        IndexOfStyle::Instr { .. } => func("INDEX_OF", vec![haystack, needle]),
        IndexOfStyle::Locate | IndexOfStyle::CharIndex => func("INDEX_OF", vec![needle, haystack]),
        IndexOfStyle::Position => Expr::Position {
            needle: Box::new(needle),
            haystack: Box::new(haystack),
        },
    }
}

fn index_of(
    target: &Node,
    needle: &Node,
    start: Option<&Node>,
    ctx: &TranslateContext,
) -> TranslateResult<Expr> {
    let haystack = value(target, ctx)?;
    let needle = value(needle, ctx)?;

    let Some(start) = start else {
        return Ok(position(needle, haystack, ctx).sub(lit_int(1)));
    };

    let from = one_based(start, ctx)?;
    match ctx.dialect.index_of_style() {
        IndexOfStyle::Locate | IndexOfStyle::CharIndex => {
            Ok(func("INDEX_OF", vec![needle, haystack, from]).sub(lit_int(1)))
        }
        IndexOfStyle::Instr {
            supports_start: true,
        } => Ok(func("INDEX_OF", vec![haystack, needle, from]).sub(lit_int(1))),
        IndexOfStyle::Instr {
            supports_start: false,
        }
        | IndexOfStyle::Position => {
            // Search the tail, then shift the hit back by the start.
            let tail = func("SUBSTRING", vec![haystack, from]);
            let hit = position(needle, tail, ctx);
            let start = value(start, ctx)?;
            Ok(Expr::Case {
                operand: None,
                when_clauses: vec![(hit.clone().eq(lit_int(0)), lit_int(-1))],
                else_clause: Some(Box::new(hit.add(start).sub(lit_int(1)))),
            })
        }
    }
}

fn pad_string(
    target: &Node,
    width: &Node,
    pad: &Node,
    left: bool,
    ctx: &TranslateContext,
) -> TranslateResult<Expr> {
    let s = value(target, ctx)?;
    let n = value(width, ctx)?;
    let c = value(pad, ctx)?;

    Ok(match ctx.dialect.pad_style() {
        PadStyle::Native => func(if left { "LPAD" } else { "RPAD" }, vec![s, n, c]),
        PadStyle::Replicate => {
            let fill = func("REPLICATE", vec![c, n.clone()]);
            if left {
                func("RIGHT", vec![concat(vec![fill, s]), n])
            } else {
                func("LEFT", vec![concat(vec![s, fill]), n])
            }
        }
        PadStyle::ZeroBlob => {
            // HEX(ZEROBLOB(n)) is 2n zeros; each "00" becomes one pad char.
            let fill = func(
                "REPLACE",
                vec![
                    func("HEX", vec![func("ZEROBLOB", vec![n.clone()])]),
                    lit_str("00"),
                    c,
                ],
            );
            if left {
                func("SUBSTR", vec![concat(vec![fill, s]), n.clone().neg(), n])
            } else {
                func("SUBSTR", vec![concat(vec![s, fill]), lit_int(1), n])
            }
        }
    })
}
