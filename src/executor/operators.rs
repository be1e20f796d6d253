//! Filter operators
//!
//! The operator set is closed. Operator names are parsed once at the filter
//! boundary; an unknown name is an [`DataManagerError::UnknownOperator`].
//!
//! Operands follow a fixed convention: the *configured* value comes from the
//! filter clause, the *field* value is resolved from the task. Relational
//! operators read as `field OP configured`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::values::{is_truthy, partial_compare, values_equal};
use crate::errors::{DataManagerError, DmResult};

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    Empty,
    NotEmpty,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    In,
    NotIn,
}

impl Operator {
    /// Every supported operator
    pub const ALL: [Operator; 12] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Contains,
        Operator::NotContains,
        Operator::Empty,
        Operator::NotEmpty,
        Operator::Less,
        Operator::Greater,
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::In,
        Operator::NotIn,
    ];

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Empty => "empty",
            Operator::NotEmpty => "not_empty",
            Operator::Less => "less",
            Operator::Greater => "greater",
            Operator::LessOrEqual => "less_or_equal",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = DataManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DataManagerError::UnknownOperator(s.to_string()))
    }
}

/// Inclusive `{min, max}` range operand
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub min: Value,
    pub max: Value,
}

impl Range {
    /// Parses a range operand
    pub fn from_value(op: Operator, value: &Value) -> DmResult<Self> {
        let bound = |name: &str| {
            value
                .get(name)
                .cloned()
                .ok_or_else(|| DataManagerError::InvalidFilterValue {
                    operator: op.to_string(),
                    reason: format!("range operand requires '{}'", name),
                })
        };
        Ok(Self {
            min: bound("min")?,
            max: bound("max")?,
        })
    }

    /// `min <= value <= max`; incomparable values are outside the range
    pub fn contains(&self, value: &Value) -> bool {
        let above_min = partial_compare(&self.min, value).is_some_and(|o| o.is_le());
        let below_max = partial_compare(value, &self.max).is_some_and(|o| o.is_le());
        above_min && below_max
    }
}

/// An operator bound to its configured operand
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equal(Value),
    NotEqual(Value),
    Contains(Value),
    NotContains(Value),
    /// Holds the truthiness of the configured flag
    Empty(bool),
    /// Holds the truthiness of the configured flag
    NotEmpty(bool),
    Less(Value),
    Greater(Value),
    LessOrEqual(Value),
    GreaterOrEqual(Value),
    In(Range),
    NotIn(Range),
}

impl Predicate {
    /// Binds an operator to its configured operand
    pub fn compile(op: Operator, configured: &Value) -> DmResult<Self> {
        let predicate = match op {
            Operator::Equal => Predicate::Equal(configured.clone()),
            Operator::NotEqual => Predicate::NotEqual(configured.clone()),
            Operator::Contains => Predicate::Contains(configured.clone()),
            Operator::NotContains => Predicate::NotContains(configured.clone()),
            Operator::Empty => Predicate::Empty(is_truthy(configured)),
            Operator::NotEmpty => Predicate::NotEmpty(is_truthy(configured)),
            Operator::Less => Predicate::Less(configured.clone()),
            Operator::Greater => Predicate::Greater(configured.clone()),
            Operator::LessOrEqual => Predicate::LessOrEqual(configured.clone()),
            Operator::GreaterOrEqual => Predicate::GreaterOrEqual(configured.clone()),
            Operator::In => Predicate::In(Range::from_value(op, configured)?),
            Operator::NotIn => Predicate::NotIn(Range::from_value(op, configured)?),
        };
        Ok(predicate)
    }

    /// Returns the operator of this predicate
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Equal(_) => Operator::Equal,
            Predicate::NotEqual(_) => Operator::NotEqual,
            Predicate::Contains(_) => Operator::Contains,
            Predicate::NotContains(_) => Operator::NotContains,
            Predicate::Empty(_) => Operator::Empty,
            Predicate::NotEmpty(_) => Operator::NotEmpty,
            Predicate::Less(_) => Operator::Less,
            Predicate::Greater(_) => Operator::Greater,
            Predicate::LessOrEqual(_) => Operator::LessOrEqual,
            Predicate::GreaterOrEqual(_) => Operator::GreaterOrEqual,
            Predicate::In(_) => Operator::In,
            Predicate::NotIn(_) => Operator::NotIn,
        }
    }

    /// Checks a resolved field value against this predicate
    pub fn matches(&self, field: &Value) -> bool {
        match self {
            Predicate::Equal(expected) => values_equal(expected, field),
            Predicate::NotEqual(expected) => !values_equal(expected, field),
            Predicate::Contains(needle) => contains(needle, field),
            Predicate::NotContains(needle) => !contains(needle, field),
            // Gated on the configured flag, not only on the field
            Predicate::Empty(flag) => *flag && !is_truthy(field),
            Predicate::NotEmpty(flag) => !*flag && is_truthy(field),
            Predicate::Less(bound) => partial_compare(field, bound).is_some_and(|o| o.is_lt()),
            Predicate::Greater(bound) => partial_compare(field, bound).is_some_and(|o| o.is_gt()),
            Predicate::LessOrEqual(bound) => {
                partial_compare(field, bound).is_some_and(|o| o.is_le())
            }
            Predicate::GreaterOrEqual(bound) => {
                partial_compare(field, bound).is_some_and(|o| o.is_ge())
            }
            Predicate::In(range) => range.contains(field),
            Predicate::NotIn(range) => !range.contains(field),
        }
    }
}

/// Evaluates `op` with a configured operand against a field value
pub fn evaluate(op: Operator, configured: &Value, field: &Value) -> DmResult<bool> {
    Predicate::compile(op, configured).map(|predicate| predicate.matches(field))
}

/// Membership: substring of a string, element of an array, key of an object
fn contains(needle: &Value, haystack: &Value) -> bool {
    match haystack {
        Value::String(text) => needle.as_str().is_some_and(|n| text.contains(n)),
        Value::Array(items) => items.iter().any(|item| values_equal(needle, item)),
        Value::Object(map) => needle.as_str().is_some_and(|key| map.contains_key(key)),
        _ => false,
    }
}
