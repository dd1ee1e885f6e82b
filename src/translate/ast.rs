//! Language-neutral expression tree for predicates and projections.
//!
//! Host code builds these trees with the helpers below (the equivalent of
//! a lambda such as `u => u.IsActive && u.Name.StartsWith("A")`):
//!
//! ```ignore
//! use sqlstencil::translate::ast::{member, NodeExt};
//!
//! let pred = member("IsActive").and(member("Name").starts_with("A"));
//! ```
//!
//! `Member { source, .. }` addresses the query source by position: 0 is the
//! primary source, 1.. are joined sources in join order.

use crate::sql::expr::Literal;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Property access on a source row.
    Member { source: usize, name: String },
    /// Caller-supplied constant.
    Constant(Literal),
    /// Constant collection (for `list.Contains(x)`).
    List(Vec<Literal>),
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary { op: UnaryOp, operand: Box<Node> },
    Call(Box<Method>),
    /// `test ? if_true : if_false`
    Conditional {
        test: Box<Node>,
        if_true: Box<Node>,
        if_false: Box<Node>,
    },
    /// `left ?? right`
    Coalesce(Box<Node>, Box<Node>),
    /// Anonymous-object projection: `new { Name = ..., Total = ... }`.
    New(Vec<(String, Node)>),
    /// Aggregate over the current group (or the whole query).
    Aggregate {
        func: AggregateFunc,
        arg: Option<Box<Node>>,
    },
    /// `g.Key`, or `g.Key.Field` for a composite key.
    GroupKey(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// Method calls with their receiver and arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    // String
    Contains { target: Node, value: Node },
    StartsWith { target: Node, value: Node },
    EndsWith { target: Node, value: Node },
    ToUpper(Node),
    ToLower(Node),
    Trim(Node),
    TrimStart(Node),
    TrimEnd(Node),
    Length(Node),
    /// 0-based result, -1 when absent. `start` is 0-based.
    IndexOf {
        target: Node,
        value: Node,
        start: Option<Node>,
    },
    PadLeft {
        target: Node,
        width: Node,
        pad: Node,
    },
    PadRight {
        target: Node,
        width: Node,
        pad: Node,
    },
    /// `start` is 0-based.
    Substring {
        target: Node,
        start: Node,
        length: Option<Node>,
    },
    Replace { target: Node, from: Node, to: Node },
    IsNullOrEmpty(Node),

    // Math
    Abs(Node),
    Round { value: Node, digits: Option<Node> },
    Floor(Node),
    Ceiling(Node),
    Pow { base: Node, exponent: Node },
    Sqrt(Node),

    // Collection
    ListContains { list: Node, item: Node },
}

impl Method {
    /// Whether the call yields a string.
    pub fn returns_string(&self) -> bool {
        matches!(
            self,
            Method::ToUpper(_)
                | Method::ToLower(_)
                | Method::Trim(_)
                | Method::TrimStart(_)
                | Method::TrimEnd(_)
                | Method::PadLeft { .. }
                | Method::PadRight { .. }
                | Method::Substring { .. }
                | Method::Replace { .. }
        )
    }

    /// Whether the call yields a boolean (usable as a predicate).
    pub fn returns_bool(&self) -> bool {
        matches!(
            self,
            Method::Contains { .. }
                | Method::StartsWith { .. }
                | Method::EndsWith { .. }
                | Method::IsNullOrEmpty(_)
                | Method::ListContains { .. }
        )
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Member of the primary source.
pub fn member(name: &str) -> Node {
    member_of(0, name)
}

/// Member of the source at `source` (0 = primary, 1.. = joined).
pub fn member_of(source: usize, name: &str) -> Node {
    Node::Member {
        source,
        name: name.into(),
    }
}

pub fn constant(value: impl Into<Literal>) -> Node {
    Node::Constant(value.into())
}

pub fn null() -> Node {
    Node::Constant(Literal::Null)
}

pub fn list<T: Into<Literal>>(values: impl IntoIterator<Item = T>) -> Node {
    Node::List(values.into_iter().map(Into::into).collect())
}

/// `new { a = ..., b = ... }`
pub fn project(fields: Vec<(&str, Node)>) -> Node {
    Node::New(
        fields
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect(),
    )
}

pub fn if_else(test: Node, if_true: impl Into<Node>, if_false: impl Into<Node>) -> Node {
    Node::Conditional {
        test: Box::new(test),
        if_true: Box::new(if_true.into()),
        if_false: Box::new(if_false.into()),
    }
}

pub fn is_null_or_empty(value: Node) -> Node {
    Node::Call(Box::new(Method::IsNullOrEmpty(value)))
}

pub fn count() -> Node {
    Node::Aggregate {
        func: AggregateFunc::Count,
        arg: None,
    }
}

fn aggregate(func: AggregateFunc, arg: Node) -> Node {
    Node::Aggregate {
        func,
        arg: Some(Box::new(arg)),
    }
}

pub fn sum(arg: Node) -> Node {
    aggregate(AggregateFunc::Sum, arg)
}

pub fn avg(arg: Node) -> Node {
    aggregate(AggregateFunc::Avg, arg)
}

pub fn min(arg: Node) -> Node {
    aggregate(AggregateFunc::Min, arg)
}

pub fn max(arg: Node) -> Node {
    aggregate(AggregateFunc::Max, arg)
}

/// `g.Key`
pub fn group_key() -> Node {
    Node::GroupKey(None)
}

/// `g.Key.Field` for a key built with [`project`].
pub fn group_key_field(name: &str) -> Node {
    Node::GroupKey(Some(name.into()))
}

fn binary(left: Node, op: BinaryOp, right: Node) -> Node {
    Node::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn call(method: Method) -> Node {
    Node::Call(Box::new(method))
}

/// Fluent builders on [`Node`], mirroring the host operators and methods.
pub trait NodeExt: Sized {
    fn into_node(self) -> Node;

    fn eq(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Eq, other.into())
    }

    fn ne(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Ne, other.into())
    }

    fn gt(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Gt, other.into())
    }

    fn gte(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Gte, other.into())
    }

    fn lt(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Lt, other.into())
    }

    fn lte(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Lte, other.into())
    }

    fn and(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::AndAlso, other.into())
    }

    fn or(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::OrElse, other.into())
    }

    fn not(self) -> Node {
        Node::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self.into_node()),
        }
    }

    fn neg(self) -> Node {
        Node::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(self.into_node()),
        }
    }

    fn add(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Add, other.into())
    }

    fn sub(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Subtract, other.into())
    }

    fn mul(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Multiply, other.into())
    }

    fn div(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Divide, other.into())
    }

    fn modulo(self, other: impl Into<Node>) -> Node {
        binary(self.into_node(), BinaryOp::Modulo, other.into())
    }

    /// `self ?? other`
    fn coalesce(self, other: impl Into<Node>) -> Node {
        Node::Coalesce(Box::new(self.into_node()), Box::new(other.into()))
    }

    /// String `Contains`, or collection `Contains` when `self` is a
    /// [`list`].
    fn contains(self, value: impl Into<Node>) -> Node {
        match self.into_node() {
            list @ Node::List(_) => call(Method::ListContains {
                list,
                item: value.into(),
            }),
            target => call(Method::Contains {
                target,
                value: value.into(),
            }),
        }
    }

    fn starts_with(self, value: impl Into<Node>) -> Node {
        call(Method::StartsWith {
            target: self.into_node(),
            value: value.into(),
        })
    }

    fn ends_with(self, value: impl Into<Node>) -> Node {
        call(Method::EndsWith {
            target: self.into_node(),
            value: value.into(),
        })
    }

    fn to_upper(self) -> Node {
        call(Method::ToUpper(self.into_node()))
    }

    fn to_lower(self) -> Node {
        call(Method::ToLower(self.into_node()))
    }

    fn trim(self) -> Node {
        call(Method::Trim(self.into_node()))
    }

    fn trim_start(self) -> Node {
        call(Method::TrimStart(self.into_node()))
    }

    fn trim_end(self) -> Node {
        call(Method::TrimEnd(self.into_node()))
    }

    fn length(self) -> Node {
        call(Method::Length(self.into_node()))
    }

    fn index_of(self, value: impl Into<Node>) -> Node {
        call(Method::IndexOf {
            target: self.into_node(),
            value: value.into(),
            start: None,
        })
    }

    fn index_of_from(self, value: impl Into<Node>, start: impl Into<Node>) -> Node {
        call(Method::IndexOf {
            target: self.into_node(),
            value: value.into(),
            start: Some(start.into()),
        })
    }

    fn pad_left(self, width: impl Into<Node>, pad: char) -> Node {
        call(Method::PadLeft {
            target: self.into_node(),
            width: width.into(),
            pad: constant(pad.to_string()),
        })
    }

    fn pad_right(self, width: impl Into<Node>, pad: char) -> Node {
        call(Method::PadRight {
            target: self.into_node(),
            width: width.into(),
            pad: constant(pad.to_string()),
        })
    }

    fn substring(self, start: impl Into<Node>) -> Node {
        call(Method::Substring {
            target: self.into_node(),
            start: start.into(),
            length: None,
        })
    }

    fn substring_len(self, start: impl Into<Node>, length: impl Into<Node>) -> Node {
        call(Method::Substring {
            target: self.into_node(),
            start: start.into(),
            length: Some(length.into()),
        })
    }

    fn replace(self, from: impl Into<Node>, to: impl Into<Node>) -> Node {
        call(Method::Replace {
            target: self.into_node(),
            from: from.into(),
            to: to.into(),
        })
    }

    fn abs(self) -> Node {
        call(Method::Abs(self.into_node()))
    }

    fn round(self) -> Node {
        call(Method::Round {
            value: self.into_node(),
            digits: None,
        })
    }

    fn round_to(self, digits: impl Into<Node>) -> Node {
        call(Method::Round {
            value: self.into_node(),
            digits: Some(digits.into()),
        })
    }

    fn floor(self) -> Node {
        call(Method::Floor(self.into_node()))
    }

    fn ceiling(self) -> Node {
        call(Method::Ceiling(self.into_node()))
    }

    fn pow(self, exponent: impl Into<Node>) -> Node {
        call(Method::Pow {
            base: self.into_node(),
            exponent: exponent.into(),
        })
    }

    fn sqrt(self) -> Node {
        call(Method::Sqrt(self.into_node()))
    }
}

impl NodeExt for Node {
    fn into_node(self) -> Node {
        self
    }
}

macro_rules! node_from_constant {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Node {
            fn from(v: $ty) -> Self {
                Node::Constant(v.into())
            }
        })*
    };
}

node_from_constant!(i64, i32, u32, f64, f32, bool, String, &str, Literal);

impl<T: Into<Literal>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        Node::Constant(v.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_dispatches_on_receiver() {
        assert!(matches!(
            member("Name").contains("a"),
            Node::Call(m) if matches!(*m, Method::Contains { .. })
        ));
        assert!(matches!(
            list([1, 2]).contains(member("Id")),
            Node::Call(m) if matches!(*m, Method::ListContains { .. })
        ));
    }

    #[test]
    fn test_constant_conversions() {
        assert_eq!(Node::from(5), Node::Constant(Literal::Int(5)));
        assert_eq!(Node::from("x"), Node::Constant(Literal::String("x".into())));
        assert_eq!(Node::from(None::<i64>), null());
    }

    #[test]
    fn test_method_result_kinds() {
        assert!(Method::Trim(member("A")).returns_string());
        assert!(!Method::Length(member("A")).returns_string());
        assert!(Method::IsNullOrEmpty(member("A")).returns_bool());
    }
}
