//! Predicate engine for selecting documents.
//!
//! Predicates are binary expression trees of criteria joined by AND/OR.
//! They can be written two ways:
//!
//! - fluently: `field("age").gt(10).and(field("sex").eq("F"))`
//! - as a field-based query specification, whose clauses are all ANDed:
//!   `QuerySpec::new().field("age", gt(10)).field("sex", "F")`
//!
//! A query specification can also be read from JSON, with `$eq`, `$ne`,
//! `$lt`, `$lte`, `$gt` and `$gte` operator objects:
//!
//! ```rust
//! use cella::doc;
//! use cella::filter::QuerySpec;
//! use serde_json::json;
//!
//! let spec = QuerySpec::from_json(&json!({ "sex": "F", "age": { "$gt": 10 } })).unwrap();
//! assert!(spec.parse().matches(&doc! { "sex": "F", "age": 11 }));
//! ```
//!
//! Only top-level fields are addressed. A document lacking the field never
//! equals the operand and fails every relational comparison.

mod comparator;
mod expression;
mod fluent;
mod query_spec;

pub use comparator::Comparator;
pub use expression::*;
pub use fluent::*;
pub use query_spec::*;
