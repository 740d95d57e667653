//! In-memory class catalog per SCHEMA.md
//!
//! The catalog is the consistent snapshot the planner resolves
//! against. It is validated at definition time (SCHEMA.md §4) and
//! read-only afterwards as far as planning is concerned.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ClassDef, PropertyDef};

/// Superclass chains longer than this are treated as corrupt.
/// Keeps lookup loops bounded even if a snapshot is inconsistent.
const MAX_SUPERCLASS_DEPTH: usize = 32;

/// In-memory class catalog, preserving declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a class, validating its structure against the classes
    /// already defined.
    ///
    /// Per SCHEMA.md §4:
    /// - class names are unique
    /// - the superclass, if any, must already be defined
    /// - index names are unique within the class
    /// - index field lists are non-empty
    /// - every index field resolves to a declared or inherited property
    pub fn define_class(&mut self, class: ClassDef) -> SchemaResult<()> {
        if self.by_name.contains_key(&class.name) {
            return Err(SchemaError::DuplicateClass(class.name));
        }

        if let Some(superclass) = &class.superclass {
            if !self.by_name.contains_key(superclass) {
                return Err(SchemaError::UnknownSuperclass {
                    class: class.name,
                    superclass: superclass.clone(),
                });
            }
        }

        for (i, index) in class.indexes.iter().enumerate() {
            if class.indexes[..i].iter().any(|other| other.name == index.name) {
                return Err(SchemaError::DuplicateIndex {
                    class: class.name.clone(),
                    index: index.name.clone(),
                });
            }

            if index.fields.is_empty() {
                return Err(SchemaError::EmptyIndexFields {
                    class: class.name.clone(),
                    index: index.name.clone(),
                });
            }

            for field in &index.fields {
                let declared = class.declared_property(field).is_some();
                let inherited = class
                    .superclass
                    .as_deref()
                    .and_then(|s| self.property(s, field))
                    .is_some();
                if !declared && !inherited {
                    return Err(SchemaError::UnknownIndexField {
                        class: class.name.clone(),
                        index: index.name.clone(),
                        field: field.clone(),
                    });
                }
            }
        }

        self.by_name.insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
        Ok(())
    }

    /// Looks up a class by name
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.by_name.get(name).map(|&i| &self.classes[i])
    }

    /// Looks up a property on a class, walking the superclass chain.
    ///
    /// The walk is depth-bounded so a corrupt snapshot degrades to
    /// "not found" instead of looping.
    pub fn property(&self, class_name: &str, property: &str) -> Option<&PropertyDef> {
        let mut current = self.class(class_name)?;
        for _ in 0..MAX_SUPERCLASS_DEPTH {
            if let Some(prop) = current.declared_property(property) {
                return Some(prop);
            }
            current = self.class(current.superclass.as_deref()?)?;
        }
        None
    }

    /// Returns all classes in declaration order
    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }
}
