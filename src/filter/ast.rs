//! Filter expression tree per QUERY.md §4
//!
//! The parsed boolean filter the planner resolves against indexes.
//! Operand values are opaque to resolution: only the operator and the
//! path matter (QUERY.md §3).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::path::MetadataPath;

/// Comparison operators usable in filter leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    /// Equality: path = value
    Eq,
    /// Greater than: path > value
    Gt,
    /// Greater than or equal: path >= value
    Gte,
    /// Less than: path < value
    Lt,
    /// Less than or equal: path <= value
    Lte,
    /// Map contains key: path CONTAINSKEY value
    ContainsKey,
    /// Map contains value: path CONTAINSVALUE value
    ContainsValue,
    /// Full-text match: path CONTAINSTEXT value
    ContainsText,
}

impl ComparisonOp {
    /// Returns true if this is an ordered comparison
    pub fn is_order_comparison(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Gt | ComparisonOp::Gte | ComparisonOp::Lt | ComparisonOp::Lte
        )
    }

    /// Returns the operator rewritten under negation, where one
    /// exists: `<` ↔ `>=` and `>` ↔ `<=` are mutual inverses.
    ///
    /// Equality, map and text probes have no index-servable inverse,
    /// so `NOT` over them disables index use (QUERY.md §4).
    pub fn inverse(&self) -> Option<ComparisonOp> {
        match self {
            ComparisonOp::Lt => Some(ComparisonOp::Gte),
            ComparisonOp::Gte => Some(ComparisonOp::Lt),
            ComparisonOp::Gt => Some(ComparisonOp::Lte),
            ComparisonOp::Lte => Some(ComparisonOp::Gt),
            _ => None,
        }
    }

    /// Returns the operator name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Gte => "gte",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Lte => "lte",
            ComparisonOp::ContainsKey => "containskey",
            ComparisonOp::ContainsValue => "containsvalue",
            ComparisonOp::ContainsText => "containstext",
        }
    }
}

/// A single comparison leaf (path + operator + operand)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Dotted property path
    pub path: MetadataPath,
    /// Comparison operator
    pub op: ComparisonOp,
    /// Literal operand; opaque to resolution
    pub operand: Value,
}

impl Comparison {
    /// Creates a comparison leaf
    pub fn new(path: impl Into<MetadataPath>, op: ComparisonOp, operand: Value) -> Self {
        Self {
            path: path.into(),
            op,
            operand,
        }
    }
}

/// Boolean filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Comparison leaf
    Compare(Comparison),
    /// Conjunction; all children must hold
    And(Vec<FilterExpr>),
    /// Disjunction; at least one child must hold
    Or(Vec<FilterExpr>),
    /// Negation
    Not(Box<FilterExpr>),
}

impl FilterExpr {
    /// Equality comparison: `path = value`
    pub fn eq(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::Eq, value))
    }

    /// `path > value`
    pub fn gt(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::Gt, value))
    }

    /// `path >= value`
    pub fn gte(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::Gte, value))
    }

    /// `path < value`
    pub fn lt(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::Lt, value))
    }

    /// `path <= value`
    pub fn lte(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::Lte, value))
    }

    /// Map key containment
    pub fn contains_key(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::ContainsKey, value))
    }

    /// Map value containment
    pub fn contains_value(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::ContainsValue, value))
    }

    /// Full-text match
    pub fn contains_text(path: impl Into<MetadataPath>, value: Value) -> Self {
        FilterExpr::Compare(Comparison::new(path, ComparisonOp::ContainsText, value))
    }

    /// Conjunction of the given children
    pub fn and(children: Vec<FilterExpr>) -> Self {
        FilterExpr::And(children)
    }

    /// Disjunction of the given children
    pub fn or(children: Vec<FilterExpr>) -> Self {
        FilterExpr::Or(children)
    }

    /// Negation of the given expression
    pub fn not(inner: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders() {
        let filter = FilterExpr::and(vec![
            FilterExpr::eq("name", json!("a")),
            FilterExpr::gt("age", json!(18)),
        ]);
        match filter {
            FilterExpr::And(children) => {
                assert_eq!(children.len(), 2);
                match &children[0] {
                    FilterExpr::Compare(cmp) => {
                        assert_eq!(cmp.op, ComparisonOp::Eq);
                        assert_eq!(cmp.path.leaf(), "name");
                        assert_eq!(cmp.operand, json!("a"));
                    }
                    other => panic!("expected comparison, got {:?}", other),
                }
            }
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_path_builder() {
        let filter = FilterExpr::eq("friend.name", json!("a"));
        match filter {
            FilterExpr::Compare(cmp) => {
                assert_eq!(cmp.path.hops(), ["friend"]);
                assert_eq!(cmp.path.leaf(), "name");
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_inverse_pairs() {
        assert_eq!(ComparisonOp::Lt.inverse(), Some(ComparisonOp::Gte));
        assert_eq!(ComparisonOp::Gte.inverse(), Some(ComparisonOp::Lt));
        assert_eq!(ComparisonOp::Gt.inverse(), Some(ComparisonOp::Lte));
        assert_eq!(ComparisonOp::Lte.inverse(), Some(ComparisonOp::Gt));
    }

    #[test]
    fn test_no_inverse_for_non_order_ops() {
        assert_eq!(ComparisonOp::Eq.inverse(), None);
        assert_eq!(ComparisonOp::ContainsKey.inverse(), None);
        assert_eq!(ComparisonOp::ContainsValue.inverse(), None);
        assert_eq!(ComparisonOp::ContainsText.inverse(), None);
    }

    #[test]
    fn test_order_comparison_classification() {
        assert!(ComparisonOp::Gt.is_order_comparison());
        assert!(ComparisonOp::Lte.is_order_comparison());
        assert!(!ComparisonOp::Eq.is_order_comparison());
        assert!(!ComparisonOp::ContainsText.is_order_comparison());
    }
}
