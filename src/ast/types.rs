//! Type system definitions for the AST.
//!
//! This module defines the Lumen type model:
//!
//! - The four primitive types (`int32`, `bool`, `string`, `unit`)
//! - Nominal class types, compared by name
//! - The reserved-name lookup used when validating class declarations
//!
//! Subtyping is purely nominal and only relates class types; it is
//! resolved through the class table, never here.

use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

/// Name of the implicit root class every class ultimately inherits from.
pub const OBJECT_CLASS: &str = "Object";

lazy_static! {
    /// Surface names of the primitive types.
    ///
    /// A class declaration may not reuse any of these names (nor
    /// `Object`); the table is also used to resolve annotation names to
    /// types.
    pub static ref RESERVED_TYPE_LOOKUP: HashMap<&'static str, Type> = {
        let mut map = HashMap::new();
        map.insert("int32", Type::Int32);
        map.insert("bool", Type::Bool);
        map.insert("string", Type::String);
        map.insert("unit", Type::Unit);
        map
    };
}

/// A Lumen static type: one of the fixed primitives or a class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int32,
    Bool,
    String,
    Unit,
    Class(String),
}

impl Type {
    /// Resolves a surface name to a type: primitive names map to their
    /// primitive, anything else is a class type of that name.
    pub fn from_name(name: &str) -> Type {
        match RESERVED_TYPE_LOOKUP.get(name) {
            Some(primitive) => primitive.clone(),
            None => Type::Class(name.to_string()),
        }
    }

    pub fn class<S: Into<String>>(name: S) -> Type {
        Type::Class(name.into())
    }

    /// The type of the implicit root class.
    pub fn object() -> Type {
        Type::Class(OBJECT_CLASS.to_string())
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Class(_))
    }

    /// Returns the class name if this is a class type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Whether `name` may not be used as a class name.
    pub fn is_reserved_name(name: &str) -> bool {
        RESERVED_TYPE_LOOKUP.contains_key(name) || name == OBJECT_CLASS
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int32 => write!(f, "int32"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Unit => write!(f, "unit"),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}
