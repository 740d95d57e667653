//! Schema type definitions per SCHEMA.md
//!
//! Supported property types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - link: reference to a record of a named target class
//! - map: string-keyed map with a declared value type

use serde::{Deserialize, Serialize};

/// Supported property types as defined in SCHEMA.md §2
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Reference to a record of the target class
    Link {
        /// Target class name
        target: String,
    },
    /// String-keyed map with a single value type
    Map {
        /// Value type (boxed to allow nesting)
        value: Box<PropertyType>,
    },
}

impl PropertyType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Int => "int",
            PropertyType::Bool => "bool",
            PropertyType::Float => "float",
            PropertyType::Link { .. } => "link",
            PropertyType::Map { .. } => "map",
        }
    }

    /// Returns the link target class name, if this is a link type
    pub fn link_target(&self) -> Option<&str> {
        match self {
            PropertyType::Link { target } => Some(target),
            _ => None,
        }
    }

    /// Returns true if this is a map type
    pub fn is_map(&self) -> bool {
        matches!(self, PropertyType::Map { .. })
    }
}

/// Property definition as per SCHEMA.md §2
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name
    pub name: String,
    /// Property data type
    #[serde(flatten)]
    pub property_type: PropertyType,
    /// Whether the property must be present
    pub required: bool,
}

impl PropertyDef {
    /// Create an optional string property
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::String,
            required: false,
        }
    }

    /// Create an optional int property
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Int,
            required: false,
        }
    }

    /// Create an optional link property to the target class
    pub fn link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Link {
                target: target.into(),
            },
            required: false,
        }
    }

    /// Create an optional map property with the given value type
    pub fn map(name: impl Into<String>, value: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Map {
                value: Box::new(value),
            },
            required: false,
        }
    }

    /// Marks the property as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Index kinds as defined in SCHEMA.md §3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Ordered, unique keys
    Unique,
    /// Ordered, duplicate keys allowed
    NonUnique,
    /// Hash structure, exact probes only
    Hash,
    /// Inverted text index, text-match probes only
    FullText,
}

impl IndexKind {
    /// Returns true if the index is an ordered structure that can
    /// answer range probes
    pub fn supports_range(&self) -> bool {
        matches!(self, IndexKind::Unique | IndexKind::NonUnique)
    }

    /// Returns the kind name for error messages and explain output
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Unique => "unique",
            IndexKind::NonUnique => "nonunique",
            IndexKind::Hash => "hash",
            IndexKind::FullText => "fulltext",
        }
    }
}

/// Which side of a map-typed property an index covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapAccess {
    /// Index over the map keys ("by key")
    Key,
    /// Index over the map values ("by value")
    Value,
}

/// Index definition as per SCHEMA.md §3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name, unique within its class
    pub name: String,
    /// Ordered field list (length >= 1); order is significant for
    /// composite prefix matching
    pub fields: Vec<String>,
    /// Index kind
    pub kind: IndexKind,
    /// By-key / by-value flag for indexes over map-typed properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_access: Option<MapAccess>,
}

impl IndexDef {
    /// Create an index over the given fields
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        kind: IndexKind,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            kind,
            map_access: None,
        }
    }

    /// Sets the by-key / by-value flag
    pub fn with_map_access(mut self, access: MapAccess) -> Self {
        self.map_access = Some(access);
        self
    }

    /// Returns the leading declared field
    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Returns true if the index is declared over two or more fields
    pub fn is_composite(&self) -> bool {
        self.fields.len() >= 2
    }
}

/// Class definition as per SCHEMA.md §1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Unique class name
    pub name: String,
    /// Optional superclass; properties are inherited through the
    /// superclass chain, indexes are not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    /// Declared properties
    pub properties: Vec<PropertyDef>,
    /// Declared indexes, in declaration order
    pub indexes: Vec<IndexDef>,
}

impl ClassDef {
    /// Create a class with no superclass
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            properties: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Sets the superclass
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds a property
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds an index
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Looks up a property declared directly on this class
    /// (inherited properties resolve through the catalog)
    pub fn declared_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Looks up a declared index by name
    pub fn index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_class() -> ClassDef {
        ClassDef::new("Person")
            .with_property(PropertyDef::string("name").required())
            .with_property(PropertyDef::int("age"))
            .with_property(PropertyDef::link("friend", "Person"))
            .with_index(IndexDef::new("Person.name", ["name"], IndexKind::NonUnique))
    }

    #[test]
    fn test_property_type_names() {
        assert_eq!(PropertyType::String.type_name(), "string");
        assert_eq!(PropertyType::Int.type_name(), "int");
        assert_eq!(
            PropertyType::Link {
                target: "Person".into()
            }
            .type_name(),
            "link"
        );
        assert_eq!(
            PropertyType::Map {
                value: Box::new(PropertyType::String)
            }
            .type_name(),
            "map"
        );
    }

    #[test]
    fn test_link_target() {
        let link = PropertyType::Link {
            target: "Person".into(),
        };
        assert_eq!(link.link_target(), Some("Person"));
        assert_eq!(PropertyType::String.link_target(), None);
    }

    #[test]
    fn test_declared_property_lookup() {
        let class = person_class();
        assert!(class.declared_property("name").is_some());
        assert!(class.declared_property("name").unwrap().required);
        assert!(class.declared_property("surname").is_none());
    }

    #[test]
    fn test_index_shape_helpers() {
        let single = IndexDef::new("Person.name", ["name"], IndexKind::NonUnique);
        assert_eq!(single.first_field(), Some("name"));
        assert!(!single.is_composite());

        let composite = IndexDef::new("Person.name_age", ["name", "age"], IndexKind::NonUnique);
        assert!(composite.is_composite());
    }

    #[test]
    fn test_index_kind_range_support() {
        assert!(IndexKind::Unique.supports_range());
        assert!(IndexKind::NonUnique.supports_range());
        assert!(!IndexKind::Hash.supports_range());
        assert!(!IndexKind::FullText.supports_range());
    }

    #[test]
    fn test_map_access_flag() {
        let idx = IndexDef::new("Person.tags", ["tags"], IndexKind::NonUnique)
            .with_map_access(MapAccess::Key);
        assert_eq!(idx.map_access, Some(MapAccess::Key));
    }
}
