//! Filter-tree walker per QUERY.md §4
//!
//! Folds a parsed filter expression into an `IndexCandidate` using an
//! injected `IndexFinder`. Resolution is structural and deterministic:
//! the first valid candidate per branch, no cost model.

use log::warn;

use crate::filter::{Comparison, ComparisonOp, FilterExpr};

use super::candidate::IndexCandidate;
use super::finder::IndexFinder;
use super::IndexOperation;

/// Defensive recursion bound; filter trees deeper than this resolve
/// to no candidate instead of exhausting the stack
pub const MAX_FILTER_DEPTH: usize = 128;

/// Resolves filter trees bottom-up against one `IndexFinder`
pub struct FilterResolver<'a> {
    finder: &'a dyn IndexFinder,
}

impl<'a> FilterResolver<'a> {
    /// Creates a resolver over the given finder
    pub fn new(finder: &'a dyn IndexFinder) -> Self {
        Self { finder }
    }

    /// Resolves a filter tree to an index candidate, or `None` when
    /// no declared index can answer it (the caller falls back to a
    /// full scan).
    pub fn resolve(&self, filter: &FilterExpr) -> Option<IndexCandidate> {
        self.resolve_at(filter, 0)
    }

    fn resolve_at(&self, filter: &FilterExpr, depth: usize) -> Option<IndexCandidate> {
        if depth > MAX_FILTER_DEPTH {
            warn!(
                "filter tree exceeds depth {}; resolving to full scan",
                MAX_FILTER_DEPTH
            );
            return None;
        }

        match filter {
            FilterExpr::Compare(cmp) => self.resolve_comparison(cmp),

            // Unresolved AND children become residual post-probe
            // filters; the node resolves if at least one child does.
            FilterExpr::And(children) => {
                let mut resolved: Vec<IndexCandidate> = children
                    .iter()
                    .filter_map(|child| self.resolve_at(child, depth + 1))
                    .collect();
                match resolved.len() {
                    0 => None,
                    1 => resolved.pop(),
                    _ => Some(IndexCandidate::And { children: resolved }),
                }
            }

            // An OR is all-or-nothing: a partial union over an
            // index-only scan would silently miss rows satisfied only
            // by the unindexed branch.
            FilterExpr::Or(children) => {
                if children.is_empty() {
                    return None;
                }
                let resolved: Option<Vec<IndexCandidate>> = children
                    .iter()
                    .map(|child| self.resolve_at(child, depth + 1))
                    .collect();
                resolved.map(|children| IndexCandidate::Or { children })
            }

            // NOT resolves only over a single comparison with an
            // order-inverse; everything else disables index use for
            // the subtree.
            FilterExpr::Not(inner) => match inner.as_ref() {
                FilterExpr::Compare(cmp) => {
                    let inverted = Comparison::new(
                        cmp.path.clone(),
                        cmp.op.inverse()?,
                        cmp.operand.clone(),
                    );
                    self.resolve_comparison(&inverted)
                }
                _ => None,
            },
        }
    }

    fn resolve_comparison(&self, cmp: &Comparison) -> Option<IndexCandidate> {
        let candidate = match cmp.op {
            ComparisonOp::Eq => self.finder.find_exact(&cmp.path),
            ComparisonOp::Gt => self.finder.find_range(&cmp.path, IndexOperation::Gt),
            ComparisonOp::Gte => self.finder.find_range(&cmp.path, IndexOperation::Gte),
            ComparisonOp::Lt => self.finder.find_range(&cmp.path, IndexOperation::Lt),
            ComparisonOp::Lte => self.finder.find_range(&cmp.path, IndexOperation::Lte),
            ComparisonOp::ContainsKey => self.finder.find_by_key(&cmp.path),
            ComparisonOp::ContainsValue => self.finder.find_by_value(&cmp.path),
            ComparisonOp::ContainsText => self.finder.find_full_text(&cmp.path),
        }?;
        Some(candidate.with_operand(cmp.operand.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::finder::ClassIndexFinder;
    use crate::schema::{Catalog, ClassDef, IndexDef, IndexKind, PropertyDef};
    use serde_json::json;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .define_class(
                ClassDef::new("cl")
                    .with_property(PropertyDef::string("name"))
                    .with_property(PropertyDef::string("surname"))
                    .with_property(PropertyDef::string("note"))
                    .with_property(PropertyDef::link("friend", "cl"))
                    .with_index(IndexDef::new("cl.name", ["name"], IndexKind::NonUnique))
                    .with_index(IndexDef::new("cl.surname", ["surname"], IndexKind::NonUnique))
                    .with_index(IndexDef::new("cl.friend", ["friend"], IndexKind::NonUnique)),
            )
            .unwrap();
        catalog
    }

    fn resolve(catalog: &Catalog, filter: &FilterExpr) -> Option<IndexCandidate> {
        let finder = ClassIndexFinder::for_class(catalog, "cl").unwrap();
        FilterResolver::new(&finder).resolve(filter)
    }

    #[test]
    fn test_eq_comparison() {
        let catalog = sample_catalog();
        let found = resolve(&catalog, &FilterExpr::eq("name", json!("a"))).unwrap();
        match found {
            IndexCandidate::Leaf {
                index,
                operation,
                operand,
                ..
            } => {
                assert_eq!(index, "cl.name");
                assert_eq!(operation, IndexOperation::Eq);
                assert_eq!(operand, Some(json!("a")));
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_range_comparison() {
        let catalog = sample_catalog();
        let found = resolve(&catalog, &FilterExpr::gt("name", json!("b"))).unwrap();
        assert_eq!(found.operation(), Some(IndexOperation::Gt));
    }

    #[test]
    fn test_not_rewrites_order_comparison() {
        let catalog = sample_catalog();
        // NOT(name < 'a') resolves exactly like name >= 'a'
        let negated = resolve(
            &catalog,
            &FilterExpr::not(FilterExpr::lt("name", json!("a"))),
        )
        .unwrap();
        let direct = resolve(&catalog, &FilterExpr::gte("name", json!("a"))).unwrap();
        assert_eq!(negated, direct);
        assert_eq!(negated.operation(), Some(IndexOperation::Gte));
    }

    #[test]
    fn test_not_eq_never_resolves() {
        let catalog = sample_catalog();
        assert!(resolve(
            &catalog,
            &FilterExpr::not(FilterExpr::eq("name", json!("a")))
        )
        .is_none());
    }

    #[test]
    fn test_not_over_group_never_resolves() {
        let catalog = sample_catalog();
        let filter = FilterExpr::not(FilterExpr::and(vec![
            FilterExpr::lt("name", json!("a")),
            FilterExpr::lt("surname", json!("a")),
        ]));
        assert!(resolve(&catalog, &filter).is_none());
    }

    #[test]
    fn test_and_drops_unresolved_children() {
        let catalog = sample_catalog();
        // "note" is unindexed; it stays behind as a residual filter
        let filter = FilterExpr::and(vec![
            FilterExpr::eq("name", json!("a")),
            FilterExpr::eq("note", json!("x")),
        ]);
        let found = resolve(&catalog, &filter).unwrap();
        // A single surviving child stands alone, no trivial group
        assert_eq!(found.name(), "cl.name");
    }

    #[test]
    fn test_and_with_multiple_resolved_children() {
        let catalog = sample_catalog();
        let filter = FilterExpr::and(vec![
            FilterExpr::eq("name", json!("a")),
            FilterExpr::eq("surname", json!("b")),
        ]);
        match resolve(&catalog, &filter).unwrap() {
            IndexCandidate::And { children } => assert_eq!(children.len(), 2),
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_and_all_unresolved_fails() {
        let catalog = sample_catalog();
        let filter = FilterExpr::and(vec![
            FilterExpr::eq("note", json!("x")),
            FilterExpr::eq("ghost", json!("y")),
        ]);
        assert!(resolve(&catalog, &filter).is_none());
    }

    #[test]
    fn test_or_requires_every_branch() {
        let catalog = sample_catalog();
        let indexed = FilterExpr::or(vec![
            FilterExpr::eq("name", json!("a")),
            FilterExpr::eq("surname", json!("b")),
        ]);
        match resolve(&catalog, &indexed).unwrap() {
            IndexCandidate::Or { children } => assert_eq!(children.len(), 2),
            other => panic!("expected Or, got {:?}", other),
        }

        let partial = FilterExpr::or(vec![
            FilterExpr::eq("name", json!("a")),
            FilterExpr::eq("note", json!("x")),
        ]);
        assert!(resolve(&catalog, &partial).is_none());
    }

    #[test]
    fn test_empty_or_fails() {
        let catalog = sample_catalog();
        assert!(resolve(&catalog, &FilterExpr::or(Vec::new())).is_none());
    }

    #[test]
    fn test_chain_comparison_resolves() {
        let catalog = sample_catalog();
        let found = resolve(&catalog, &FilterExpr::eq("friend.friend.name", json!("a"))).unwrap();
        assert_eq!(found.name(), "cl.friend->cl.friend->cl.name->");
    }

    #[test]
    fn test_depth_guard() {
        let catalog = sample_catalog();
        let mut filter = FilterExpr::eq("name", json!("a"));
        for _ in 0..(MAX_FILTER_DEPTH + 2) {
            filter = FilterExpr::and(vec![filter]);
        }
        assert!(resolve(&catalog, &filter).is_none());
    }
}
