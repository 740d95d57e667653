//! Index candidate model per QUERY.md
//!
//! An `IndexCandidate` is a structural proposal for satisfying part of
//! a filter with declared indexes. Candidates are transient: each
//! compilation builds its own tree, hands it to the execution-plan
//! builder and drops it. Nothing here touches the schema.
//!
//! The variant set is closed on purpose; `normalize` and the plan
//! builder match over it exhaustively (QUERY.md §5).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of index probe operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOperation {
    /// Exact key probe
    Eq,
    /// One-sided scan, exclusive lower bound
    Gt,
    /// One-sided scan, inclusive lower bound
    Gte,
    /// One-sided scan, exclusive upper bound
    Lt,
    /// One-sided scan, inclusive upper bound
    Lte,
    /// Two-sided bounded scan
    Range,
    /// Map-key probe
    Key,
    /// Map-value probe
    Value,
    /// Full-text probe
    FullText,
}

impl IndexOperation {
    /// Returns the operation name for explain output
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOperation::Eq => "eq",
            IndexOperation::Gt => "gt",
            IndexOperation::Gte => "gte",
            IndexOperation::Lt => "lt",
            IndexOperation::Lte => "lte",
            IndexOperation::Range => "range",
            IndexOperation::Key => "key",
            IndexOperation::Value => "value",
            IndexOperation::FullText => "fulltext",
        }
    }

    /// Returns true for the one-sided ordered-scan operations
    pub fn is_one_sided_range(&self) -> bool {
        matches!(
            self,
            IndexOperation::Gt | IndexOperation::Gte | IndexOperation::Lt | IndexOperation::Lte
        )
    }

    /// Returns true for operations that bound the scan from below
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, IndexOperation::Gt | IndexOperation::Gte)
    }

    /// Returns true for operations that bound the scan from above
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, IndexOperation::Lt | IndexOperation::Lte)
    }
}

impl fmt::Display for IndexOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One navigation hop of a chain candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHop {
    /// Class the hop starts from
    pub class: String,
    /// Link-typed property traversed
    pub field: String,
}

impl ChainHop {
    /// Creates a hop
    pub fn new(class: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            field: field.into(),
        }
    }
}

/// One bound of a merged two-sided range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    /// Bound value
    pub value: Value,
    /// Whether the bound itself is included (gte/lte)
    pub inclusive: bool,
}

impl RangeBound {
    /// Inclusive bound
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// Exclusive bound
    pub fn exclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A structural proposal for satisfying (part of) a filter with
/// declared indexes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexCandidate {
    /// One concrete index usable for one probe operation
    Leaf {
        /// Index name
        index: String,
        /// Class the index is declared on
        class: String,
        /// Leaf property the probe matched
        field: String,
        /// Probe operation
        operation: IndexOperation,
        /// Literal operand, attached by the walker; absent on
        /// composite-collapse results
        operand: Option<Value>,
    },
    /// A candidate reached through link navigation
    Chain {
        /// Navigation hops, outermost first
        hops: Vec<ChainHop>,
        /// The candidate on the final class; never itself a chain
        inner: Box<IndexCandidate>,
    },
    /// Intersection: all children must hold
    And {
        /// Resolved children, in filter order
        children: Vec<IndexCandidate>,
    },
    /// Union: all branches resolved, any may hold
    Or {
        /// Resolved branches, in filter order
        children: Vec<IndexCandidate>,
    },
    /// Merged two-sided bound on one index
    Range {
        /// Index name
        index: String,
        /// Class the index is declared on
        class: String,
        /// Leaf property the probe matched
        field: String,
        /// Lower bound, if any
        low: Option<RangeBound>,
        /// Upper bound, if any
        high: Option<RangeBound>,
    },
}

impl IndexCandidate {
    /// Creates a leaf candidate with no operand attached
    pub fn leaf(
        index: impl Into<String>,
        class: impl Into<String>,
        field: impl Into<String>,
        operation: IndexOperation,
    ) -> Self {
        IndexCandidate::Leaf {
            index: index.into(),
            class: class.into(),
            field: field.into(),
            operation,
            operand: None,
        }
    }

    /// Wraps the candidate behind a navigation hop, keeping chains
    /// flat: wrapping an existing chain prepends the hop.
    pub fn behind_hop(self, hop: ChainHop) -> Self {
        match self {
            IndexCandidate::Chain { mut hops, inner } => {
                hops.insert(0, hop);
                IndexCandidate::Chain { hops, inner }
            }
            other => IndexCandidate::Chain {
                hops: vec![hop],
                inner: Box::new(other),
            },
        }
    }

    /// Attaches the comparison operand to the underlying leaf.
    ///
    /// For chains the operand belongs to the inner candidate; groups
    /// and ranges are left untouched.
    pub fn with_operand(self, value: Value) -> Self {
        match self {
            IndexCandidate::Leaf {
                index,
                class,
                field,
                operation,
                ..
            } => IndexCandidate::Leaf {
                index,
                class,
                field,
                operation,
                operand: Some(value),
            },
            IndexCandidate::Chain { hops, inner } => IndexCandidate::Chain {
                hops,
                inner: Box::new(inner.with_operand(value)),
            },
            other => other,
        }
    }

    /// The probe operation, for candidates that have a single one
    pub fn operation(&self) -> Option<IndexOperation> {
        match self {
            IndexCandidate::Leaf { operation, .. } => Some(*operation),
            IndexCandidate::Chain { inner, .. } => inner.operation(),
            IndexCandidate::Range { .. } => Some(IndexOperation::Range),
            IndexCandidate::And { .. } | IndexCandidate::Or { .. } => None,
        }
    }

    /// Renders the candidate name.
    ///
    /// Leaf and range candidates are named after their index. A chain
    /// renders every hop as `<class>.<field>->` followed by the inner
    /// name and a trailing `->` (QUERY.md §2).
    pub fn name(&self) -> String {
        match self {
            IndexCandidate::Leaf { index, .. } => index.clone(),
            IndexCandidate::Range { index, .. } => index.clone(),
            IndexCandidate::Chain { hops, inner } => {
                let mut out = String::new();
                for hop in hops {
                    out.push_str(&hop.class);
                    out.push('.');
                    out.push_str(&hop.field);
                    out.push_str("->");
                }
                out.push_str(&inner.name());
                out.push_str("->");
                out
            }
            group @ (IndexCandidate::And { .. } | IndexCandidate::Or { .. }) => {
                group.to_string()
            }
        }
    }

    /// Number of index probes this candidate requires
    pub fn probe_count(&self) -> usize {
        match self {
            IndexCandidate::Leaf { .. } | IndexCandidate::Range { .. } => 1,
            IndexCandidate::Chain { inner, .. } => inner.probe_count(),
            IndexCandidate::And { children } | IndexCandidate::Or { children } => {
                children.iter().map(IndexCandidate::probe_count).sum()
            }
        }
    }
}

impl fmt::Display for IndexCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexCandidate::Leaf {
                index, operation, ..
            } => write!(f, "{}({})", operation, index),
            IndexCandidate::Range { index, .. } => write!(f, "range({})", index),
            IndexCandidate::Chain { inner, .. } => {
                let op = inner
                    .operation()
                    .map(|o| o.as_str())
                    .unwrap_or("probe");
                write!(f, "{}({})", op, self.name())
            }
            IndexCandidate::And { children } => {
                write!(f, "intersect(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            IndexCandidate::Or { children } => {
                write!(f, "union(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
