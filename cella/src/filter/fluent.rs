use crate::filter::{Comparator, Expression, QueryValue};
use serde_json::Value;

/// Creates a fluent criterion builder for the specified field name.
///
/// # Arguments
///
/// * `field_name` - The top-level field to compare
///
/// # Returns
///
/// A `FluentField` whose comparison methods each produce an [`Expression`]
pub fn field(field_name: &str) -> FluentField {
    FluentField {
        field_name: field_name.to_string(),
    }
}

/// Returns the expression matching every document.
pub fn all() -> Expression {
    Expression::All
}

/// A fluent builder for criteria on a single field.
///
/// Each method consumes the builder and returns a criterion leaf that can be
/// combined further with [`Expression::and`] and [`Expression::or`].
pub struct FluentField {
    field_name: String,
}

impl FluentField {
    /// Creates a criterion matching documents whose field equals `value`.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to match against
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Eq, value)
    }

    /// Creates a criterion matching documents whose field differs from
    /// `value`, including documents lacking the field.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Ne, value)
    }

    /// Creates a criterion matching documents whose field is less than `value`.
    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Lt, value)
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Lte, value)
    }

    /// Creates a criterion matching documents whose field is greater than `value`.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Gt, value)
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Expression {
        Expression::criterion(&self.field_name, Comparator::Gte, value)
    }
}

/// Explicit equality clause for a [`QuerySpec`](crate::filter::QuerySpec).
pub fn eq<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Eq, value.into())
}

/// Inequality clause for a [`QuerySpec`](crate::filter::QuerySpec).
pub fn ne<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Ne, value.into())
}

pub fn lt<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Lt, value.into())
}

pub fn lte<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Lte, value.into())
}

pub fn gt<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Gt, value.into())
}

pub fn gte<T: Into<Value>>(value: T) -> QueryValue {
    QueryValue::Comparison(Comparator::Gte, value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_fluent_builds_criteria() {
        assert_eq!(
            field("age").gt(10),
            Expression::criterion("age", Comparator::Gt, 10)
        );
        assert_eq!(
            field("name").ne("x"),
            Expression::criterion("name", Comparator::Ne, "x")
        );
        assert!(all().is_all());
    }

    #[test]
    fn test_fluent_chain_matches() {
        let expr = field("age").gte(10).and(field("age").lte(12)).or(field("vip").eq(true));
        assert!(expr.matches(&doc! { "age": 11 }));
        assert!(expr.matches(&doc! { "age": 40, "vip": true }));
        assert!(!expr.matches(&doc! { "age": 40 }));
    }

    #[test]
    fn test_clause_helpers() {
        assert_eq!(gt(3), QueryValue::Comparison(Comparator::Gt, Value::from(3)));
        assert_eq!(eq("a"), QueryValue::Comparison(Comparator::Eq, Value::from("a")));
        assert_eq!(lte(1.5), QueryValue::Comparison(Comparator::Lte, Value::from(1.5)));
    }
}
