//! Resolved value types.

use std::fmt;

/// The type tag of a declaration or expression.
///
/// Only used to pick instruction variants, descriptors and print format
/// specifiers. There is no type checking beyond literal tagging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Number,
    Boolean,
    String,
    Nil,
    Undefined,
}

impl TypeDesc {
    /// JVM type descriptor.
    pub fn descriptor(self) -> &'static str {
        match self {
            TypeDesc::Number => "I",
            TypeDesc::Boolean => "Z",
            TypeDesc::String => "Ljava/lang/String;",
            TypeDesc::Nil => "V",
            TypeDesc::Undefined => "Ljava/lang/Object;",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeDesc::Number => "number",
            TypeDesc::Boolean => "boolean",
            TypeDesc::String => "string",
            TypeDesc::Nil => "nil",
            TypeDesc::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
