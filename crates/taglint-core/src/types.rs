//! Resolved type descriptors supplied by the front end
//!
//! The checker never type-checks source itself. The front end resolves each field's
//! declared type into a [`TypeDescriptor`]; rules only ask shape questions of it.
//! A field whose type could not be resolved carries no descriptor at all.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of predeclared basic types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    #[serde(rename = "unsafe.Pointer")]
    UnsafePointer,
}

impl BasicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a field's declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeDescriptor {
    /// Predeclared basic type
    Basic { basic: BasicKind },
    /// Pointer to `elem`
    Pointer { elem: Box<TypeDescriptor> },
    /// Declared type name with its underlying type
    Named {
        name: String,
        underlying: Box<TypeDescriptor>,
    },
    /// Struct type literal
    Struct,
    /// Interface type (including the empty interface)
    Interface,
    /// Map from `key` to `value`
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// Slice of `elem`
    Slice { elem: Box<TypeDescriptor> },
    /// Fixed-size array of `elem`
    Array { len: u64, elem: Box<TypeDescriptor> },
    /// Anything else (channels, functions, ...), kept as display text
    Other { repr: String },
}

impl TypeDescriptor {
    pub fn basic(kind: BasicKind) -> Self {
        TypeDescriptor::Basic { basic: kind }
    }

    pub fn pointer(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn named(name: impl Into<String>, underlying: TypeDescriptor) -> Self {
        TypeDescriptor::Named {
            name: name.into(),
            underlying: Box::new(underlying),
        }
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The type with every named layer removed
    pub fn underlying(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Named { underlying, .. } = current {
            current = underlying.as_ref();
        }
        current
    }

    /// The type with every pointer and named layer removed
    pub fn dereferenced(&self) -> &TypeDescriptor {
        let mut current = self;
        loop {
            match current {
                TypeDescriptor::Named { underlying, .. } => current = underlying.as_ref(),
                TypeDescriptor::Pointer { elem } => current = elem.as_ref(),
                other => return other,
            }
        }
    }

    /// Basic kind after removing pointer and named layers, if it is a basic type
    pub fn basic_kind(&self) -> Option<BasicKind> {
        match self.dereferenced() {
            TypeDescriptor::Basic { basic } => Some(*basic),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, TypeDescriptor::Interface)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, TypeDescriptor::Struct)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Basic { basic } => write!(f, "{basic}"),
            TypeDescriptor::Pointer { elem } => write!(f, "*{elem}"),
            TypeDescriptor::Named { name, .. } => f.write_str(name),
            TypeDescriptor::Struct => f.write_str("struct{...}"),
            TypeDescriptor::Interface => f.write_str("interface{...}"),
            TypeDescriptor::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeDescriptor::Slice { elem } => write!(f, "[]{elem}"),
            TypeDescriptor::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeDescriptor::Other { repr } => f.write_str(repr),
        }
    }
}
