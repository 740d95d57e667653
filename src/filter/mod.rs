//! Filter model for kitedb
//!
//! Per QUERY.md, a filter is a boolean tree of comparisons over dotted
//! property paths. Parsing query text into this tree is the parser's
//! job; the planner only consumes it.

mod ast;
mod path;

pub use ast::{Comparison, ComparisonOp, FilterExpr};
pub use path::MetadataPath;
