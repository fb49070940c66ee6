use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The relational operator of a criterion.
///
/// Six independent kinds with their usual meaning. Numbers are compared
/// numerically regardless of integer/float representation, strings
/// lexicographically by bytes. Every other pairing is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    /// Infix symbol used when displaying expressions.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }

    /// Operator key used in JSON query specifications, e.g. `$gte`.
    pub fn operator_key(&self) -> &'static str {
        match self {
            Comparator::Eq => "$eq",
            Comparator::Ne => "$ne",
            Comparator::Lt => "$lt",
            Comparator::Lte => "$lte",
            Comparator::Gt => "$gt",
            Comparator::Gte => "$gte",
        }
    }

    pub fn from_operator_key(key: &str) -> Option<Comparator> {
        match key {
            "$eq" => Some(Comparator::Eq),
            "$ne" => Some(Comparator::Ne),
            "$lt" => Some(Comparator::Lt),
            "$lte" => Some(Comparator::Lte),
            "$gt" => Some(Comparator::Gt),
            "$gte" => Some(Comparator::Gte),
            _ => None,
        }
    }

    /// Applies the comparator to a document field value and an operand.
    ///
    /// `field_value` is `None` when the document lacks the field. A missing
    /// field never equals anything, so `Eq` is `false` and `Ne` is `true`.
    /// Relational kinds are `false` for a missing field, `null`, or any
    /// unordered pairing.
    pub fn test(&self, field_value: Option<&Value>, operand: &Value) -> bool {
        let value = match field_value {
            Some(value) => value,
            None => return *self == Comparator::Ne,
        };

        match self {
            Comparator::Eq => values_equal(value, operand),
            Comparator::Ne => !values_equal(value, operand),
            Comparator::Lt => compare_values(value, operand) == Some(Ordering::Less),
            Comparator::Lte => matches!(
                compare_values(value, operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Comparator::Gt => compare_values(value, operand) == Some(Ordering::Greater),
            Comparator::Gte => matches!(
                compare_values(value, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl Display for Comparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Equality with numeric normalization at the top level, `10 == 10.0`.
/// Arrays and objects fall back to structural JSON equality.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => compare_numbers(l, r) == Some(Ordering::Equal),
        _ => left == right,
    }
}

/// Ordering between two values, `None` when the pair is unordered.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => compare_numbers(l, r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Exact ordering of two JSON numbers.
///
/// Integers are widened to `i128`. An integer against a float is compared
/// with the float's integral part first, so no precision is lost above 2^53.
#[inline]
fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    match (integer_of(left), integer_of(right)) {
        (Some(l), Some(r)) => Some(l.cmp(&r)),
        (Some(l), None) => compare_integer_float(l, right.as_f64()?),
        (None, Some(r)) => compare_integer_float(r, left.as_f64()?).map(Ordering::reverse),
        (None, None) => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn integer_of(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn compare_integer_float(integer: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // i128::MAX as f64 rounds up to exactly 2^127.
    if float >= i128::MAX as f64 {
        return Some(Ordering::Less);
    }
    if float < i128::MIN as f64 {
        return Some(Ordering::Greater);
    }

    match integer.cmp(&(float.trunc() as i128)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&float.fract()),
        ordering => Some(ordering),
    }
}
