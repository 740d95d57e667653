//! Index resolution subsystem for kitedb
//!
//! Per QUERY.md, the planner maps boolean filter trees onto the
//! indexes a class declares, without a cost model.
//!
//! # Design Principles
//!
//! - Deterministic: same catalog and filter → same candidate
//! - Declaration-ordered: the first matching index wins, always
//! - Total: a filter no index serves yields `None`, never an error
//! - Closed: candidates are a fixed sum type consumers match exhaustively
//!
//! # Resolution pipeline
//!
//! 1. [`ClassIndexFinder`] answers per-path lookups against one class
//! 2. [`FilterResolver`] walks a [`crate::filter::FilterExpr`] and
//!    assembles a candidate tree from those lookups
//! 3. [`normalize`] collapses the tree onto composite indexes and
//!    two-sided ranges where the declarations allow it

mod candidate;
mod explain;
mod finder;
mod normalize;
mod resolver;

pub use candidate::{ChainHop, IndexCandidate, IndexOperation, RangeBound};
pub use explain::ResolutionExplain;
pub use finder::{ClassIndexFinder, IndexFinder, SchemaProvider};
pub use normalize::normalize;
pub use resolver::{FilterResolver, MAX_FILTER_DEPTH};
