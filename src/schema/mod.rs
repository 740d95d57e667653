//! Schema subsystem for kitedb
//!
//! Per SCHEMA.md, records belong to classes: each class declares typed
//! properties (possibly inherited through a superclass chain) and the
//! indexes defined over them.
//!
//! # Design Principles
//!
//! - Validated at definition time, read-only during planning
//! - Declaration order is significant and preserved
//! - Link-typed properties are the only traversable properties

mod catalog;
mod errors;
mod types;

pub use catalog::Catalog;
pub use errors::{SchemaError, SchemaResult};
pub use types::{ClassDef, IndexDef, IndexKind, MapAccess, PropertyDef, PropertyType};
