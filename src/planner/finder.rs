//! Per-class index resolution per QUERY.md §2-§3
//!
//! `ClassIndexFinder` answers: can this class (or a class reached
//! through link navigation) serve a probe on a given path? The schema
//! is injected as a capability so tests can substitute an in-memory
//! fixture for the production catalog.

use log::trace;

use crate::filter::MetadataPath;
use crate::schema::{Catalog, ClassDef, IndexKind, MapAccess, PropertyDef};

use super::candidate::{ChainHop, IndexCandidate, IndexOperation};

/// Superclass chains longer than this are treated as corrupt
const MAX_SUPERCLASS_DEPTH: usize = 32;

/// Read-only schema access capability
pub trait SchemaProvider {
    /// Looks up a class by name
    fn class(&self, name: &str) -> Option<&ClassDef>;
}

impl SchemaProvider for Catalog {
    fn class(&self, name: &str) -> Option<&ClassDef> {
        Catalog::class(self, name)
    }
}

/// The five resolution modes a filter leaf can request.
///
/// Every miss is `None` — unknown property, non-link hop, missing
/// target class, or no qualifying index (QUERY.md §1).
pub trait IndexFinder {
    /// Exact probe: any index kind whose field list begins with the
    /// leaf property
    fn find_exact(&self, path: &MetadataPath) -> Option<IndexCandidate>;

    /// Ordered-scan probe for `op` in {Gt, Gte, Lt, Lte}; only
    /// range-capable index kinds qualify
    fn find_range(&self, path: &MetadataPath, op: IndexOperation) -> Option<IndexCandidate>;

    /// Map-key probe: requires a map-typed property indexed "by key"
    fn find_by_key(&self, path: &MetadataPath) -> Option<IndexCandidate>;

    /// Map-value probe: requires a map-typed property indexed "by value"
    fn find_by_value(&self, path: &MetadataPath) -> Option<IndexCandidate>;

    /// Full-text probe: full-text index kind only
    fn find_full_text(&self, path: &MetadataPath) -> Option<IndexCandidate>;
}

/// Leaf resolution mode, shared by the chain-handling recursion
#[derive(Debug, Clone, Copy)]
enum LeafMode {
    Exact,
    Rangeable(IndexOperation),
    ByKey,
    ByValue,
    FullText,
}

/// Index finder bound to one class of a schema snapshot
pub struct ClassIndexFinder<'a> {
    schema: &'a dyn SchemaProvider,
    class: &'a ClassDef,
}

impl<'a> ClassIndexFinder<'a> {
    /// Binds a finder to the given class
    pub fn new(schema: &'a dyn SchemaProvider, class: &'a ClassDef) -> Self {
        Self { schema, class }
    }

    /// Binds a finder to the named class, if it exists
    pub fn for_class(schema: &'a dyn SchemaProvider, class_name: &str) -> Option<Self> {
        schema.class(class_name).map(|class| Self::new(schema, class))
    }

    /// The class this finder is bound to
    pub fn class(&self) -> &ClassDef {
        self.class
    }

    /// Property lookup including inherited properties, depth-bounded
    fn property(&self, name: &str) -> Option<&'a PropertyDef> {
        let mut current = self.class;
        for _ in 0..MAX_SUPERCLASS_DEPTH {
            if let Some(prop) = current.declared_property(name) {
                return Some(prop);
            }
            current = self.schema.class(current.superclass.as_deref()?)?;
        }
        None
    }

    /// Shared chain handling: peel the outermost hop (which must be a
    /// link-typed property with an existing target class), recurse
    /// into the target's finder and wrap the result. A failure at any
    /// hop discards the whole path.
    fn resolve(&self, path: &MetadataPath, mode: LeafMode) -> Option<IndexCandidate> {
        match path.split_first() {
            Some((hop, rest)) => {
                let prop = self.property(hop)?;
                let Some(target) = prop.property_type.link_target() else {
                    trace!(
                        "hop '{}' on class '{}' is {}-typed, not link; path discarded",
                        hop,
                        self.class.name,
                        prop.property_type.type_name()
                    );
                    return None;
                };
                let target_class = self.schema.class(target)?;
                let inner = ClassIndexFinder::new(self.schema, target_class).resolve(&rest, mode)?;
                Some(inner.behind_hop(ChainHop::new(&self.class.name, hop)))
            }
            None => self.resolve_leaf(path.leaf(), mode),
        }
    }

    /// Leaf resolution: first qualifying index in declaration order
    /// wins; no cost comparison (QUERY.md §1).
    fn resolve_leaf(&self, leaf: &str, mode: LeafMode) -> Option<IndexCandidate> {
        let class = &self.class.name;
        let candidate = self.class.indexes.iter().find_map(|index| {
            let leading = index.first_field() == Some(leaf);
            if !leading {
                return None;
            }
            let operation = match mode {
                // Map-access indexes cover a side of the map, not the
                // property value itself; exact and range probes never
                // see them (SCHEMA.md §3).
                LeafMode::Exact if index.map_access.is_none() => IndexOperation::Eq,
                LeafMode::Rangeable(op)
                    if index.map_access.is_none() && index.kind.supports_range() =>
                {
                    op
                }
                LeafMode::ByKey if index.map_access == Some(MapAccess::Key) => IndexOperation::Key,
                LeafMode::ByValue if index.map_access == Some(MapAccess::Value) => {
                    IndexOperation::Value
                }
                LeafMode::FullText if index.kind == IndexKind::FullText => IndexOperation::FullText,
                _ => return None,
            };
            Some(IndexCandidate::leaf(&index.name, class, leaf, operation))
        })?;

        // Map probes additionally require the property to actually be
        // map-typed; a stale by-key index over a retyped property
        // must not answer the probe.
        if matches!(mode, LeafMode::ByKey | LeafMode::ByValue)
            && !self.property(leaf).is_some_and(|p| p.property_type.is_map())
        {
            return None;
        }

        trace!(
            "class '{}': leaf '{}' resolved to {}",
            class,
            leaf,
            candidate.name()
        );
        Some(candidate)
    }
}

impl IndexFinder for ClassIndexFinder<'_> {
    fn find_exact(&self, path: &MetadataPath) -> Option<IndexCandidate> {
        self.resolve(path, LeafMode::Exact)
    }

    fn find_range(&self, path: &MetadataPath, op: IndexOperation) -> Option<IndexCandidate> {
        if !op.is_one_sided_range() {
            return None;
        }
        self.resolve(path, LeafMode::Rangeable(op))
    }

    fn find_by_key(&self, path: &MetadataPath) -> Option<IndexCandidate> {
        self.resolve(path, LeafMode::ByKey)
    }

    fn find_by_value(&self, path: &MetadataPath) -> Option<IndexCandidate> {
        self.resolve(path, LeafMode::ByValue)
    }

    fn find_full_text(&self, path: &MetadataPath) -> Option<IndexCandidate> {
        self.resolve(path, LeafMode::FullText)
    }
}
