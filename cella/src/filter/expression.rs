use crate::collection::Document;
use crate::filter::{Comparator, QuerySpec};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// A boolean predicate over documents, kept as a binary expression tree.
///
/// Leaves are criteria comparing one top-level field with a literal operand;
/// inner nodes combine two sub-expressions with AND or OR. `All` is the
/// always-true predicate an empty query specification parses to.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::filter::field;
///
/// let adult_woman = field("age").gte(18).and(field("sex").eq("F"));
/// assert!(adult_woman.matches(&doc! { "age": 30, "sex": "F" }));
/// assert!(!adult_woman.matches(&doc! { "age": 12, "sex": "F" }));
/// assert_eq!(adult_woman.to_string(), r#"((age >= 18) && (sex == "F"))"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Matches every document.
    All,
    /// Compares `field` of a document with `operand`.
    Criterion {
        field: String,
        comparator: Comparator,
        operand: Value,
    },
    /// Both sides must match.
    And(Box<Expression>, Box<Expression>),
    /// At least one side must match.
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Creates a criterion leaf.
    pub fn criterion<V: Into<Value>>(field: &str, comparator: Comparator, operand: V) -> Self {
        Expression::Criterion {
            field: field.to_string(),
            comparator,
            operand: operand.into(),
        }
    }

    /// Combines this expression with `other` using logical AND.
    pub fn and(self, other: Expression) -> Expression {
        Expression::And(Box::new(self), Box::new(other))
    }

    /// Combines this expression with `other` using logical OR.
    pub fn or(self, other: Expression) -> Expression {
        Expression::Or(Box::new(self), Box::new(other))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Expression::All)
    }

    /// Evaluates the expression against a document.
    #[inline]
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Expression::All => true,
            Expression::Criterion {
                field,
                comparator,
                operand,
            } => comparator.test(document.get(field), operand),
            Expression::And(left, right) => left.matches(document) && right.matches(document),
            Expression::Or(left, right) => left.matches(document) || right.matches(document),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::All => write!(f, "(all)"),
            Expression::Criterion {
                field,
                comparator,
                operand,
            } => write!(f, "({} {} {})", field, comparator, operand),
            Expression::And(left, right) => write!(f, "({} && {})", left, right),
            Expression::Or(left, right) => write!(f, "({} || {})", left, right),
        }
    }
}

/// Anything a collection can scan with: a parsed [`Expression`] or a
/// [`QuerySpec`] that is parsed on the way in.
pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for &Expression {
    fn into_expression(self) -> Expression {
        self.clone()
    }
}

impl IntoExpression for QuerySpec {
    fn into_expression(self) -> Expression {
        self.parse()
    }
}

impl IntoExpression for &QuerySpec {
    fn into_expression(self) -> Expression {
        self.parse()
    }
}
