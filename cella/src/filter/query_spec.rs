use crate::collection::{Document, Index};
use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::filter::{Comparator, Expression};
use serde_json::Value;

/// The right-hand side of one query specification clause.
///
/// A plain literal means equality; a comparison carries its comparator
/// explicitly. Build comparisons with [`eq`](crate::filter::eq),
/// [`gt`](crate::filter::gt) and friends; literals convert with `into()`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Literal(Value),
    Comparison(Comparator, Value),
}

impl QueryValue {
    /// Turns the clause into a criterion on `field`.
    pub fn to_criterion(&self, field: &str) -> Expression {
        match self {
            QueryValue::Literal(value) => Expression::criterion(field, Comparator::Eq, value.clone()),
            QueryValue::Comparison(comparator, operand) => {
                Expression::criterion(field, *comparator, operand.clone())
            }
        }
    }
}

macro_rules! impl_literal_query_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_literal_query_value!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String);

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        QueryValue::Literal(value)
    }
}

impl From<Index> for QueryValue {
    fn from(value: Index) -> Self {
        QueryValue::Literal(value.to_value())
    }
}

impl From<Document> for QueryValue {
    fn from(value: Document) -> Self {
        QueryValue::Literal(value.into())
    }
}

/// A field-based query specification.
///
/// An ordered list of `(field, value)` clauses. Parsing turns each clause
/// into a criterion and folds them left to right with AND, so every clause
/// must hold. The same field may appear more than once, which expresses
/// ranges. An empty specification matches every document.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::filter::{gt, lt, QuerySpec};
///
/// let spec = QuerySpec::new()
///     .field("age", gt(10))
///     .field("age", lt(30))
///     .field("sex", "F");
///
/// let expr = spec.parse();
/// assert!(expr.matches(&doc! { "age": 24, "sex": "F" }));
/// assert!(!expr.matches(&doc! { "age": 24, "sex": "M" }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    clauses: Vec<(String, QueryValue)>,
}

impl QuerySpec {
    pub fn new() -> Self {
        QuerySpec { clauses: Vec::new() }
    }

    /// Appends a clause and returns the specification for chaining.
    pub fn field<V: Into<QueryValue>>(mut self, name: &str, value: V) -> Self {
        self.clauses.push((name.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[(String, QueryValue)] {
        &self.clauses
    }

    /// Parses the specification into an expression tree.
    ///
    /// `[a, b, c]` becomes `And(And(a, b), c)`; an empty specification
    /// becomes [`Expression::All`].
    pub fn parse(&self) -> Expression {
        let mut clauses = self.clauses.iter();
        let first = match clauses.next() {
            Some((field, value)) => value.to_criterion(field),
            None => return Expression::All,
        };
        clauses.fold(first, |acc, (field, value)| acc.and(value.to_criterion(field)))
    }

    /// Parses a JSON query specification.
    ///
    /// The value must be an object. Each member is either a literal
    /// (implicit equality) or an operator object with exactly one key among
    /// `$eq`, `$ne`, `$lt`, `$lte`, `$gt`, `$gte`:
    ///
    /// ```json
    /// { "sex": "F", "age": { "$gt": 10 } }
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::FilterError`] for a non-object specification,
    /// an operator object with zero or several keys, or an unknown operator.
    pub fn from_json(value: &Value) -> CellaResult<QuerySpec> {
        let members = match value {
            Value::Object(members) => members,
            other => {
                log::error!("Query specification {} is not an object", other);
                return Err(CellaError::new(
                    &format!("A query specification must be a JSON object, found {}", other),
                    ErrorKind::FilterError,
                ));
            }
        };

        let mut spec = QuerySpec::new();
        for (field, member) in members {
            let value = match member {
                Value::Object(operator) => {
                    let mut entries = operator.iter();
                    match (entries.next(), entries.next()) {
                        (Some((key, operand)), None) => match Comparator::from_operator_key(key) {
                            Some(comparator) => QueryValue::Comparison(comparator, operand.clone()),
                            None => {
                                log::error!("Unknown query operator {} on field {}", key, field);
                                return Err(CellaError::new(
                                    &format!("Unknown query operator '{}' on field '{}'", key, field),
                                    ErrorKind::FilterError,
                                ));
                            }
                        },
                        _ => {
                            log::error!("Invalid operator object {} on field {}", member, field);
                            return Err(CellaError::new(
                                &format!(
                                    "The clause on field '{}' must hold a literal or exactly one operator",
                                    field
                                ),
                                ErrorKind::FilterError,
                            ));
                        }
                    }
                }
                literal => QueryValue::Literal(literal.clone()),
            };
            spec.clauses.push((field.clone(), value));
        }
        Ok(spec)
    }
}
