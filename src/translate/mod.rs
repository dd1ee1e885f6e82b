//! Expression translator: lowers [`ast::Node`] trees into SQL [`Expr`]s.
//!
//! Constants become [`Expr::Bind`], so the same lowered expression serializes
//! with inline literals or, after `TokenStream::bind_parameters`, with
//! `p0, p1, ...` bind parameters. [`Mode`] only changes constant folding
//! and LIKE pattern shape.

pub mod ast;
mod context;
mod error;
mod methods;

use crate::sql::dialect::Dialect;
use crate::sql::expr::{
    coalesce, concat, count_star, func, lit_bool, truth, BinaryOperator, Expr, ExprExt, Literal,
};
use crate::sql::query::SelectExpr;

use ast::{AggregateFunc, BinaryOp, Node, UnaryOp};

pub use context::{ColumnSource, GroupKey, Mode, SourceBinding, TranslateContext};
pub use error::{TranslateError, TranslateResult};

/// Lowered projection: select items plus the `(member, column)` names a
/// wrapping query sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub items: Vec<SelectExpr>,
    pub columns: Vec<(String, String)>,
}

/// Column name given to a projection of a single computed expression.
pub const SCALAR_COLUMN: &str = "value";

/// Lower a predicate (WHERE/ON position).
pub fn translate_predicate(node: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    predicate(node, ctx)
}

/// Lower a value expression (SELECT, ORDER BY, GROUP BY position).
pub fn translate_value(node: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    value(node, ctx)
}

/// Lower a `Select` body.
pub fn translate_projection(node: &Node, ctx: &TranslateContext) -> TranslateResult<Projection> {
    let fields: Vec<(Option<&str>, &Node)> = match node {
        Node::New(fields) => fields.iter().map(|(n, f)| (Some(n.as_str()), f)).collect(),
        other => vec![(None, other)],
    };

    let mut items = Vec::with_capacity(fields.len());
    let mut columns = Vec::with_capacity(fields.len());
    for (name, field) in fields {
        let expr = value(field, ctx)?;
        // A plain member under its own name keeps its column, unaliased.
        let plain = match (&expr, field) {
            (Expr::Column { column, .. }, Node::Member { name: member, .. })
                if name.map_or(true, |n| n == member) =>
            {
                Some((member.clone(), column.clone()))
            }
            _ => None,
        };
        match plain {
            Some(mapping) => {
                columns.push(mapping);
                items.push(SelectExpr::new(expr));
            }
            None => {
                let alias = name.unwrap_or(SCALAR_COLUMN).to_string();
                columns.push((alias.clone(), alias.clone()));
                items.push(SelectExpr::new(expr).with_alias(&alias));
            }
        }
    }

    Ok(Projection { items, columns })
}

/// Translate a predicate against one source to SQL text with inline
/// literals.
pub fn predicate_to_sql(
    node: &Node,
    dialect: Dialect,
    columns: ColumnSource,
) -> TranslateResult<String> {
    let ctx = TranslateContext::single(dialect, Mode::Literal, columns);
    Ok(predicate(node, &ctx)?.to_tokens_for_dialect(dialect).serialize(dialect))
}

fn check_finite(lit: &Literal) -> TranslateResult<()> {
    match lit {
        Literal::Float(f) if !f.is_finite() => Err(TranslateError::NonFiniteFloat(*f)),
        _ => Ok(()),
    }
}

pub(crate) fn bind_constant(lit: &Literal) -> TranslateResult<Expr> {
    check_finite(lit)?;
    Ok(Expr::Bind(lit.clone()))
}

pub(crate) fn value(node: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    match node {
        Node::Member { source, name } => {
            let binding = ctx.source(*source)?;
            Ok(Expr::Column {
                table: binding.alias.clone(),
                column: binding.columns.column_name(name),
            })
        }
        Node::Constant(lit) => bind_constant(lit),
        Node::List(_) => Err(TranslateError::Unsupported(
            "collection constant outside Contains".into(),
        )),
        Node::Binary { op, left, right } => lower_binary(*op, left, right, ctx),
        Node::Unary {
            op: UnaryOp::Not,
            operand,
        } => negated(operand, ctx),
        Node::Unary {
            op: UnaryOp::Negate,
            operand,
        } => Ok(value(operand, ctx)?.neg()),
        Node::Call(method) => methods::lower(method, ctx),
        Node::Conditional {
            test,
            if_true,
            if_false,
        } => Ok(Expr::Case {
            operand: None,
            when_clauses: vec![(predicate(test, ctx)?, value(if_true, ctx)?)],
            else_clause: Some(Box::new(value(if_false, ctx)?)),
        }),
        Node::Coalesce(left, right) => {
            let mut args = vec![value(left, ctx)?];
            match value(right, ctx)? {
                Expr::Function { name, args: inner, .. } if name == "COALESCE" => {
                    args.extend(inner)
                }
                other => args.push(other),
            }
            Ok(coalesce(args))
        }
        Node::New(_) => Err(TranslateError::Unsupported(
            "projection inside an expression".into(),
        )),
        Node::Aggregate { func: f, arg } => lower_aggregate(*f, arg.as_deref(), ctx),
        Node::GroupKey(field) => lower_group_key(field.as_deref(), ctx),
    }
}

pub(crate) fn predicate(node: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    match node {
        Node::Member { .. } => Ok(value(node, ctx)?.eq(lit_bool(true))),
        Node::Constant(Literal::Bool(b)) => Ok(truth(*b)),
        Node::Binary {
            op: BinaryOp::AndAlso,
            left,
            right,
        } => Ok(predicate(left, ctx)?.and(predicate(right, ctx)?)),
        Node::Binary {
            op: BinaryOp::OrElse,
            left,
            right,
        } => Ok(predicate(left, ctx)?.or(predicate(right, ctx)?)),
        _ => value(node, ctx),
    }
}

/// Lower `!node`.
fn negated(node: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    match node {
        Node::Member { .. } => Ok(value(node, ctx)?.eq(lit_bool(false))),
        Node::Constant(Literal::Bool(b)) => Ok(truth(!*b)),
        Node::Unary {
            op: UnaryOp::Not,
            operand,
        } => predicate(operand, ctx),
        _ => match predicate(node, ctx)? {
            Expr::BinaryOp { left, op, right } => match op.negate() {
                Some(op) => Ok(Expr::BinaryOp { left, op, right }),
                None => Ok(Expr::BinaryOp { left, op, right }.not()),
            },
            Expr::IsNull { expr, negated } => Ok(Expr::IsNull {
                expr,
                negated: !negated,
            }),
            Expr::In {
                expr,
                values,
                negated,
            } => Ok(Expr::In {
                expr,
                values,
                negated: !negated,
            }),
            other => Ok(other.not()),
        },
    }
}

fn is_null(node: &Node) -> bool {
    matches!(node, Node::Constant(Literal::Null))
}

fn lower_binary(op: BinaryOp, left: &Node, right: &Node, ctx: &TranslateContext) -> TranslateResult<Expr> {
    // `x == null` must never reach SQL as `= NULL`.
    if matches!(op, BinaryOp::Eq | BinaryOp::Ne) && (is_null(left) || is_null(right)) {
        let operand = if is_null(left) { right } else { left };
        if is_null(operand) {
            return Ok(truth(op == BinaryOp::Eq));
        }
        let expr = value(operand, ctx)?;
        return Ok(if op == BinaryOp::Eq {
            expr.is_null()
        } else {
            expr.is_not_null()
        });
    }

    if op == BinaryOp::Add && (is_string(left, ctx) || is_string(right, ctx)) {
        let mut parts = Vec::new();
        for side in [value(left, ctx)?, value(right, ctx)?] {
            match side {
                Expr::Concat(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        return Ok(concat(parts));
    }

    if matches!(op, BinaryOp::AndAlso | BinaryOp::OrElse) {
        return predicate(&Node::Binary {
            op,
            left: Box::new(left.clone()),
            right: Box::new(right.clone()),
        }, ctx);
    }

    let op = match op {
        BinaryOp::Eq => BinaryOperator::Eq,
        BinaryOp::Ne => BinaryOperator::Ne,
        BinaryOp::Gt => BinaryOperator::Gt,
        BinaryOp::Gte => BinaryOperator::Gte,
        BinaryOp::Lt => BinaryOperator::Lt,
        BinaryOp::Lte => BinaryOperator::Lte,
        BinaryOp::Add => BinaryOperator::Plus,
        BinaryOp::Subtract => BinaryOperator::Minus,
        BinaryOp::Multiply => BinaryOperator::Mul,
        BinaryOp::Divide => BinaryOperator::Div,
        BinaryOp::Modulo => BinaryOperator::Mod,
        BinaryOp::AndAlso => BinaryOperator::And,
        BinaryOp::OrElse => BinaryOperator::Or,
    };
    Ok(Expr::BinaryOp {
        left: Box::new(value(left, ctx)?),
        op,
        right: Box::new(value(right, ctx)?),
    })
}

/// Whether `node` is known to produce a string, making `+` a concatenation.
fn is_string(node: &Node, ctx: &TranslateContext) -> bool {
    match node {
        Node::Constant(Literal::String(_)) => true,
        Node::Member { source, name } => ctx
            .source(*source)
            .ok()
            .and_then(|s| s.columns.catalog())
            .and_then(|c| c.column(name))
            .is_some_and(|c| c.data_type.is_string()),
        Node::Call(method) => method.returns_string(),
        Node::Binary {
            op: BinaryOp::Add,
            left,
            right,
        } => is_string(left, ctx) || is_string(right, ctx),
        Node::Coalesce(left, right) => is_string(left, ctx) || is_string(right, ctx),
        Node::Conditional {
            if_true, if_false, ..
        } => is_string(if_true, ctx) || is_string(if_false, ctx),
        _ => false,
    }
}

fn lower_aggregate(f: AggregateFunc, arg: Option<&Node>, ctx: &TranslateContext) -> TranslateResult<Expr> {
    let name = match f {
        AggregateFunc::Count => "COUNT",
        AggregateFunc::Sum => "SUM",
        AggregateFunc::Avg => "AVG",
        AggregateFunc::Min => "MIN",
        AggregateFunc::Max => "MAX",
    };
    match (f, arg) {
        (AggregateFunc::Count, None) => Ok(count_star()),
        (_, Some(arg)) => Ok(func(name, vec![value(arg, ctx)?])),
        (_, None) => Err(TranslateError::InvalidArgument {
            method: "aggregate",
            reason: format!("{} needs an argument", name),
        }),
    }
}

fn lower_group_key(field: Option<&str>, ctx: &TranslateContext) -> TranslateResult<Expr> {
    let key = ctx
        .group_key()
        .ok_or(TranslateError::GroupKeyOutsideGrouping)?;
    match (key, field) {
        (GroupKey::Single(expr), None) => Ok(expr.clone()),
        (GroupKey::Composite(fields), Some(name)) => fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e.clone())
            .ok_or_else(|| TranslateError::UnknownGroupKeyField(name.to_string())),
        (GroupKey::Single(_), Some(name)) => {
            Err(TranslateError::UnknownGroupKeyField(name.to_string()))
        }
        (GroupKey::Composite(_), None) => Err(TranslateError::Unsupported(
            "a composite group key must be read field by field".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ast::*;
    use super::*;
    use crate::catalog::{ColumnCatalog, ColumnMetadata};
    use crate::sql::types::DataType;

    fn users() -> ColumnSource {
        ColumnSource::Catalog(Arc::new(
            ColumnCatalog::new(
                "users",
                vec![
                    ColumnMetadata::new("Id", DataType::Int64),
                    ColumnMetadata::new("Name", DataType::String),
                    ColumnMetadata::new("Age", DataType::Int32),
                    ColumnMetadata::new("IsActive", DataType::Bool),
                    ColumnMetadata::new("Email", DataType::String).nullable(true),
                ],
            )
            .unwrap(),
        ))
    }

    fn sql(node: Node, dialect: Dialect) -> String {
        predicate_to_sql(&node, dialect, users()).unwrap()
    }

    #[test]
    fn test_null_comparisons() {
        assert_eq!(sql(member("Email").eq(null()), Dialect::Sqlite), "[email] IS NULL");
        assert_eq!(
            sql(null().ne(member("Email")), Dialect::Sqlite),
            "[email] IS NOT NULL"
        );
    }

    #[test]
    fn test_bool_member_predicate() {
        assert_eq!(sql(member("IsActive"), Dialect::Sqlite), "[is_active] = 1");
        assert_eq!(sql(member("IsActive"), Dialect::Postgres), "\"is_active\" = true");
        assert_eq!(sql(member("IsActive").not(), Dialect::MySql), "`is_active` = 0");
        assert_eq!(
            sql(member("IsActive").eq(true), Dialect::Postgres),
            "\"is_active\" = true"
        );
        for dialect in [Dialect::Sqlite, Dialect::MySql, Dialect::SqlServer, Dialect::Oracle, Dialect::Db2] {
            assert!(sql(member("IsActive").eq(true), dialect).ends_with("= 1"));
        }
    }

    #[test]
    fn test_constant_predicates() {
        assert_eq!(sql(constant(true), Dialect::Sqlite), "1 = 1");
        assert_eq!(sql(constant(true).not(), Dialect::Sqlite), "1 = 0");
    }

    #[test]
    fn test_mixed_logic_parenthesized() {
        let pred = member("Age")
            .gt(18)
            .and(member("Name").eq("A").or(member("Name").eq("B")));
        insta::assert_snapshot!(sql(pred, Dialect::Sqlite), @"[age] > 18 AND ([name] = 'A' OR [name] = 'B')");
    }

    #[test]
    fn test_negated_comparison_flips_operator() {
        assert_eq!(sql(member("Age").gt(18).not(), Dialect::Sqlite), "[age] <= 18");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            sql(member("Name").eq("O'Brien"), Dialect::Sqlite),
            "[name] = 'O''Brien'"
        );
    }

    #[test]
    fn test_string_add_concatenates() {
        let pred = member("Name").add(" x").eq("a x");
        assert_eq!(sql(pred.clone(), Dialect::Sqlite), "[name] || ' x' = 'a x'");
        assert_eq!(sql(pred.clone(), Dialect::SqlServer), "[name] + ' x' = 'a x'");
        assert_eq!(sql(pred, Dialect::MySql), "CONCAT(`name`, ' x') = 'a x'");
    }

    #[test]
    fn test_numeric_add_stays_arithmetic() {
        assert_eq!(sql(member("Age").add(1).gt(30), Dialect::Sqlite), "[age] + 1 > 30");
    }

    #[test]
    fn test_coalesce_and_conditional() {
        let pred = member("Email").coalesce("none").eq("none");
        assert_eq!(sql(pred, Dialect::Sqlite), "COALESCE([email], 'none') = 'none'");

        let ctx = TranslateContext::single(Dialect::Sqlite, Mode::Literal, users());
        let expr = translate_value(
            &if_else(member("Age").lt(18), "minor", if_else(member("Age").lt(65), "adult", "senior")),
            &ctx,
        )
        .unwrap();
        insta::assert_snapshot!(
            expr.to_tokens_for_dialect(Dialect::Sqlite).serialize(Dialect::Sqlite),
            @"CASE WHEN [age] < 18 THEN 'minor' ELSE CASE WHEN [age] < 65 THEN 'adult' ELSE 'senior' END END"
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let ctx = TranslateContext::single(Dialect::Sqlite, Mode::Literal, users());
        assert!(matches!(
            translate_predicate(&member("Age").gt(f64::NAN), &ctx),
            Err(TranslateError::NonFiniteFloat(_))
        ));
    }

    #[test]
    fn test_unknown_source() {
        let ctx = TranslateContext::single(Dialect::Sqlite, Mode::Literal, users());
        assert_eq!(
            translate_value(&member_of(2, "Id"), &ctx),
            Err(TranslateError::UnknownSource {
                index: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_untyped_members_snake_case() {
        let out = predicate_to_sql(&member("LastLogin").eq(null()), Dialect::Sqlite, ColumnSource::Untyped);
        assert_eq!(out.unwrap(), "[last_login] IS NULL");
    }

    #[test]
    fn test_projection_aliases() {
        let ctx = TranslateContext::single(Dialect::Sqlite, Mode::Literal, users());
        let projection = translate_projection(
            &project(vec![("Name", member("Name")), ("Years", member("Age"))]),
            &ctx,
        )
        .unwrap();
        assert_eq!(projection.items[0].alias, None);
        assert_eq!(projection.items[1].alias.as_deref(), Some("Years"));
        assert_eq!(
            projection.columns,
            vec![
                ("Name".to_string(), "name".to_string()),
                ("Years".to_string(), "Years".to_string())
            ]
        );
    }

    #[test]
    fn test_group_key_requires_grouping() {
        let ctx = TranslateContext::single(Dialect::Sqlite, Mode::Literal, users());
        assert_eq!(
            translate_value(&group_key(), &ctx),
            Err(TranslateError::GroupKeyOutsideGrouping)
        );
    }
}
