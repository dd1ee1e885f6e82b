//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.
//! Parentheses are inserted from operator precedence when tokens are
//! emitted, so builders never need to wrap operands by hand.

use super::dialect::{ConcatStyle, Dialect, SqlDialect};
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens_for_dialect()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Structural literal, always emitted inline.
    Literal(Literal),

    /// Caller-supplied constant. Inline by default, extracted into a bind
    /// parameter when the statement is parameterized.
    Bind(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Function call: name(args...)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// String concatenation of two or more operands, rendered with the
    /// dialect's operator or CONCAT function.
    Concat(Vec<Expr>),

    /// POSITION(needle IN haystack)
    Position {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Wildcard: * or table.*
    Star { table: Option<String> },

    /// Parenthesized expression
    Paren(Box<Expr>),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl Literal {
    /// JSON form used when handing bound values to a driver.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Int(n) => serde_json::Value::from(*n),
            Literal::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Literal::String(s) => serde_json::Value::String(s.clone()),
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Null => serde_json::Value::Null,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Like,
}

impl BinaryOperator {
    /// Binding strength, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte
            | BinaryOperator::Like => 4,
            BinaryOperator::Plus | BinaryOperator::Minus => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }

    /// `a op (b op c) == (a op b) op c` for the same operator.
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Plus | BinaryOperator::Mul
        )
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 4
    }

    /// Logical negation of a comparison, if it has one.
    pub fn negate(self) -> Option<BinaryOperator> {
        match self {
            BinaryOperator::Eq => Some(BinaryOperator::Ne),
            BinaryOperator::Ne => Some(BinaryOperator::Eq),
            BinaryOperator::Lt => Some(BinaryOperator::Gte),
            BinaryOperator::Gte => Some(BinaryOperator::Lt),
            BinaryOperator::Gt => Some(BinaryOperator::Lte),
            BinaryOperator::Lte => Some(BinaryOperator::Gt),
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

/// Sort direction (shared with query ORDER BY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

const PREC_NOT: u8 = 3;
const PREC_COMPARISON: u8 = 4;
const PREC_ADDITIVE: u8 = 5;
const PREC_NEGATE: u8 = 7;
const PREC_ATOM: u8 = 9;

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    /// Convert this expression to a token stream (default dialect).
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Precedence of the outermost operator as rendered for `dialect`.
    pub fn precedence(&self, dialect: Dialect) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => PREC_NOT,
            Expr::UnaryOp {
                op: UnaryOperator::Minus,
                ..
            } => PREC_NEGATE,
            Expr::In { .. } | Expr::IsNull { .. } => PREC_COMPARISON,
            Expr::Concat(parts) if parts.len() > 1 => match dialect.concat_style() {
                ConcatStyle::Operator(_) => PREC_ADDITIVE,
                ConcatStyle::Function | ConcatStyle::BinaryFunction => PREC_ATOM,
            },
            _ => PREC_ATOM,
        }
    }

    /// Convert this expression to a token stream for a specific dialect.
    ///
    /// This handles dialect-specific features like concatenation style.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Null => Token::LitNull,
                });
            }

            Expr::Bind(lit) => {
                ts.push(Token::Bind(lit.clone()));
            }

            Expr::BinaryOp { left, op, right } => {
                let prec = op.precedence();
                let left_paren = {
                    let p = left.precedence(dialect);
                    p < prec || (p == prec && op.is_comparison())
                };
                let right_paren = {
                    let p = right.precedence(dialect);
                    let same_op = matches!(**right, Expr::BinaryOp { op: r, .. } if r == *op);
                    p < prec || (p == prec && !(same_op && op.is_associative()))
                };
                emit_operand(&mut ts, left, dialect, left_paren);
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                emit_operand(&mut ts, right, dialect, right_paren);
            }

            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Not => {
                    ts.push(Token::Not).space();
                    let wrap = expr.precedence(dialect) < PREC_ATOM;
                    emit_operand(&mut ts, expr, dialect, wrap);
                }
                UnaryOperator::Minus => {
                    ts.push(Token::Minus);
                    // `--` would open a line comment
                    let wrap = expr.precedence(dialect) < PREC_ATOM || expr.starts_with_minus();
                    emit_operand(&mut ts, expr, dialect, wrap);
                }
            },

            Expr::Function {
                name,
                args,
                distinct,
            } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                emit_list(&mut ts, args, dialect);
                ts.rparen();
            }

            Expr::Concat(parts) => emit_concat(&mut ts, parts, dialect),

            Expr::Position { needle, haystack } => {
                ts.push(Token::FunctionName("POSITION".into()));
                ts.lparen();
                // IN binds looser than +/||, keep compound operands grouped
                let wrap = needle.precedence(dialect) < PREC_ATOM;
                emit_operand(&mut ts, needle, dialect, wrap);
                ts.space().push(Token::In).space();
                let wrap = haystack.precedence(dialect) < PREC_ATOM;
                emit_operand(&mut ts, haystack, dialect, wrap);
                ts.rparen();
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                ts.push(Token::Case);
                if let Some(op) = operand {
                    ts.space().append(&op.to_tokens_for_dialect(dialect));
                }
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    ts.append(&when.to_tokens_for_dialect(dialect));
                    ts.space().push(Token::Then).space();
                    ts.append(&then.to_tokens_for_dialect(dialect));
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    ts.append(&else_expr.to_tokens_for_dialect(dialect));
                }
                ts.space().push(Token::End);
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL; not every dialect has TRUE/FALSE
                if values.is_empty() {
                    ts.push(Token::LitInt(1)).space().push(Token::Eq).space();
                    ts.push(Token::LitInt(if *negated { 1 } else { 0 }));
                } else {
                    let wrap = expr.precedence(dialect) <= PREC_COMPARISON;
                    emit_operand(&mut ts, expr, dialect, wrap);
                    if *negated {
                        ts.space().push(Token::Not);
                    }
                    ts.space().push(Token::In).space().lparen();
                    emit_list(&mut ts, values, dialect);
                    ts.rparen();
                }
            }

            Expr::IsNull { expr, negated } => {
                let wrap = expr.precedence(dialect) <= PREC_COMPARISON;
                emit_operand(&mut ts, expr, dialect, wrap);
                ts.space();
                ts.push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::Star { table } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens_for_dialect(dialect));
                ts.rparen();
            }
        }

        ts
    }
}

impl Expr {
    fn starts_with_minus(&self) -> bool {
        match self {
            Expr::Literal(lit) | Expr::Bind(lit) => match lit {
                Literal::Int(n) => *n < 0,
                Literal::Float(f) => f.is_sign_negative(),
                _ => false,
            },
            Expr::UnaryOp {
                op: UnaryOperator::Minus,
                ..
            } => true,
            _ => false,
        }
    }
}

fn emit_operand(ts: &mut TokenStream, expr: &Expr, dialect: Dialect, wrap: bool) {
    if wrap {
        ts.lparen();
    }
    ts.append(&expr.to_tokens_for_dialect(dialect));
    if wrap {
        ts.rparen();
    }
}

fn emit_list(ts: &mut TokenStream, exprs: &[Expr], dialect: Dialect) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&expr.to_tokens_for_dialect(dialect));
    }
}

fn emit_concat(ts: &mut TokenStream, parts: &[Expr], dialect: Dialect) {
    match parts {
        [] => {
            ts.push(Token::LitString(String::new()));
        }
        [single] => {
            ts.append(&single.to_tokens_for_dialect(dialect));
        }
        _ => match dialect.concat_style() {
            ConcatStyle::Operator(_) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        ts.space().push(Token::Concat).space();
                    }
                    let wrap = part.precedence(dialect) <= PREC_ADDITIVE;
                    emit_operand(ts, part, dialect, wrap);
                }
            }
            ConcatStyle::Function => {
                ts.push(Token::FunctionName("CONCAT".into()));
                ts.lparen();
                emit_list(ts, parts, dialect);
                ts.rparen();
            }
            ConcatStyle::BinaryFunction => {
                // CONCAT(CONCAT(a, b), c)
                let (last, init) = match parts.split_last() {
                    Some(split) => split,
                    None => return,
                };
                ts.push(Token::FunctionName("CONCAT".into()));
                ts.lparen();
                emit_concat(ts, init, dialect);
                ts.comma().space();
                ts.append(&last.to_tokens_for_dialect(dialect));
                ts.rparen();
            }
        },
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
        BinaryOperator::Like => Token::Like,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Create a bindable constant.
pub fn bind(lit: Literal) -> Expr {
    Expr::Bind(lit)
}

/// Create a star (*) expression.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Create a qualified star (table.*) expression.
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

/// `1 = 1` or `1 = 0`: a boolean predicate every dialect accepts.
pub fn truth(value: bool) -> Expr {
    lit_int(1).eq(lit_int(if value { 1 } else { 0 }))
}

// =============================================================================
// Aggregate Functions
// =============================================================================

/// COUNT(*)
pub fn count_star() -> Expr {
    func("COUNT", vec![star()])
}

/// COALESCE(args...)
pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
    }
}

/// Concatenate operands with the dialect's concatenation syntax.
pub fn concat(parts: Vec<Expr>) -> Expr {
    Expr::Concat(parts)
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mul, other.into())
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Div, other.into())
    }

    fn modulo(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mod, other.into())
    }

    fn neg(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(self.into_expr()),
        }
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> super::query::SelectExpr {
        super::query::SelectExpr {
            expr: self.into_expr(),
            alias: Some(name.into()),
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

macro_rules! literal_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Literal {
            fn from(v: $ty) -> Self {
                Literal::$variant(v.into())
            }
        })*
    };
}

literal_from!(i64 => Int, i32 => Int, u32 => Int, f64 => Float, f32 => Float, bool => Bool, String => String, &str => String);

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map_or(Literal::Null, Into::into)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;

    fn render(expr: &Expr, dialect: Dialect) -> String {
        expr.to_tokens_for_dialect(dialect).serialize(dialect)
    }

    #[test]
    fn test_column() {
        let expr = col("name");
        assert_eq!(render(&expr, Dialect::Postgres), "\"name\"");
    }

    #[test]
    fn test_table_column() {
        let expr = table_col("t1", "name");
        assert_eq!(render(&expr, Dialect::SqlServer), "[t1].[name]");
    }

    #[test]
    fn test_binary_op() {
        let expr = col("age").gte(lit_int(18));
        assert_eq!(render(&expr, Dialect::Postgres), "\"age\" >= 18");
    }

    #[test]
    fn test_or_inside_and_is_parenthesized() {
        let expr = col("a").eq(1).or(col("b").eq(2)).and(col("c").eq(3));
        assert_eq!(
            render(&expr, Dialect::Postgres),
            "(\"a\" = 1 OR \"b\" = 2) AND \"c\" = 3"
        );
    }

    #[test]
    fn test_and_inside_or_is_bare() {
        let expr = col("a").eq(1).and(col("b").eq(2)).or(col("c").eq(3));
        assert_eq!(
            render(&expr, Dialect::Postgres),
            "\"a\" = 1 AND \"b\" = 2 OR \"c\" = 3"
        );
    }

    #[test]
    fn test_right_nested_subtraction() {
        let expr = col("a").sub(col("b").sub(col("c")));
        assert_eq!(render(&expr, Dialect::Postgres), "\"a\" - (\"b\" - \"c\")");

        let expr = col("a").sub(col("b")).sub(col("c"));
        assert_eq!(render(&expr, Dialect::Postgres), "\"a\" - \"b\" - \"c\"");
    }

    #[test]
    fn test_mixed_multiplicative_keeps_grouping() {
        let expr = col("a").mul(col("b").div(col("c")));
        assert_eq!(render(&expr, Dialect::Postgres), "\"a\" * (\"b\" / \"c\")");
    }

    #[test]
    fn test_not_wraps_compound() {
        let expr = col("a").eq(1).and(col("b").eq(2)).not();
        assert_eq!(
            render(&expr, Dialect::Postgres),
            "NOT (\"a\" = 1 AND \"b\" = 2)"
        );
    }

    #[test]
    fn test_function_remap() {
        let expr = func("LENGTH", vec![col("name")]);
        assert_eq!(render(&expr, Dialect::SqlServer), "LEN([name])");
        assert_eq!(render(&expr, Dialect::Sqlite), "LENGTH([name])");
    }

    #[test]
    fn test_in_list() {
        let expr = col("status").in_list(vec![lit_str("active"), lit_str("pending")]);
        assert_eq!(
            render(&expr, Dialect::Postgres),
            "\"status\" IN ('active', 'pending')"
        );
    }

    #[test]
    fn test_in_list_empty() {
        let expr = col("status").in_list(vec![]);
        assert_eq!(render(&expr, Dialect::SqlServer), "1 = 0");

        let expr = col("status").not_in_list(vec![]);
        assert_eq!(render(&expr, Dialect::SqlServer), "1 = 1");
    }

    #[test]
    fn test_case() {
        let expr = Expr::Case {
            operand: None,
            when_clauses: vec![(col("age").gte(18), lit_str("adult"))],
            else_clause: Some(Box::new(lit_str("minor"))),
        };
        assert_eq!(
            render(&expr, Dialect::Sqlite),
            "CASE WHEN [age] >= 18 THEN 'adult' ELSE 'minor' END"
        );
    }

    #[test]
    fn test_concat_styles() {
        let expr = concat(vec![lit_str("%"), col("name"), lit_str("%")]);
        assert_eq!(render(&expr, Dialect::Postgres), "'%' || \"name\" || '%'");
        assert_eq!(render(&expr, Dialect::SqlServer), "'%' + [name] + '%'");
        assert_eq!(render(&expr, Dialect::MySql), "CONCAT('%', `name`, '%')");
        assert_eq!(
            render(&expr, Dialect::Db2),
            "CONCAT(CONCAT('%', \"name\"), '%')"
        );
    }

    #[test]
    fn test_like_with_concat_operand() {
        let expr = col("name").like(concat(vec![lit_str("%"), bind(Literal::String("a".into()))]));
        assert_eq!(render(&expr, Dialect::Oracle), "\"name\" LIKE '%' || 'a'");
    }

    #[test]
    fn test_position() {
        let expr = Expr::Position {
            needle: Box::new(lit_str("x")),
            haystack: Box::new(col("name")),
        };
        assert_eq!(render(&expr, Dialect::Postgres), "POSITION('x' IN \"name\")");
    }

    #[test]
    fn test_is_null_on_arithmetic() {
        let expr = col("a").add(col("b")).is_null();
        assert_eq!(render(&expr, Dialect::Postgres), "\"a\" + \"b\" IS NULL");
        let expr = col("a").eq(1).is_null();
        assert_eq!(render(&expr, Dialect::Postgres), "(\"a\" = 1) IS NULL");
    }

    #[test]
    fn test_negative_operand() {
        let expr = col("n").neg();
        assert_eq!(render(&expr, Dialect::Sqlite), "-[n]");
        let expr = col("a").add(col("b")).neg();
        assert_eq!(render(&expr, Dialect::Sqlite), "-([a] + [b])");
    }

    #[test]
    fn test_double_negation_never_emits_comment() {
        let expr = bind(Literal::Int(-5)).neg();
        assert_eq!(render(&expr, Dialect::Sqlite), "-(-5)");
        let expr = lit_float(-1.5).neg();
        assert_eq!(render(&expr, Dialect::Postgres), "-(-1.5)");
        let expr = col("n").neg().neg();
        assert_eq!(render(&expr, Dialect::Sqlite), "-(-[n])");
    }

    #[test]
    fn test_truth() {
        assert_eq!(render(&truth(true), Dialect::Postgres), "1 = 1");
        assert_eq!(render(&truth(false), Dialect::Postgres), "1 = 0");
    }

    #[test]
    fn test_literal_to_json() {
        assert_eq!(Literal::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(Literal::String("x".into()).to_json(), serde_json::json!("x"));
        assert_eq!(Literal::Bool(true).to_json(), serde_json::json!(true));
    }
}
