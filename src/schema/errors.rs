//! # Schema Errors
//!
//! Error types for catalog definition. Planning never raises these:
//! per QUERY.md §1, every resolution miss is "no candidate", not an
//! error. Schema errors exist only at definition time.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural schema definition errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A class with this name is already defined
    #[error("Class '{0}' is already defined")]
    DuplicateClass(String),

    /// The declared superclass is not defined (classes are defined
    /// parents-first)
    #[error("Class '{class}' extends unknown superclass '{superclass}'")]
    UnknownSuperclass { class: String, superclass: String },

    /// Two indexes of one class share a name
    #[error("Class '{class}' declares index '{index}' more than once")]
    DuplicateIndex { class: String, index: String },

    /// An index was declared with no fields
    #[error("Index '{index}' of class '{class}' has an empty field list")]
    EmptyIndexFields { class: String, index: String },

    /// An index field does not resolve to a declared or inherited
    /// property
    #[error("Index '{index}' of class '{class}' covers unknown property '{field}'")]
    UnknownIndexField {
        class: String,
        index: String,
        field: String,
    },
}
