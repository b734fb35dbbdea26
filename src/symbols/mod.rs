//! Symbolic type and member references parsed from JVM descriptors
//!
//! Transforms that synthesize new declarations have no loaded class to lean
//! on: every type or member they mention exists only as a descriptor string.
//! This module turns those strings into structured references. Parsing is
//! strict - a malformed descriptor is a hard error that aborts the current
//! unit's transform pass.

mod handles;

pub use handles::{HandleKind, MethodHandle};

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::consts;
use crate::error::{Error, Result};

/// JVM primitive types, including `void` for method returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn from_descriptor_char(c: char) -> Option<Self> {
        match c {
            'Z' => Some(Self::Boolean),
            'C' => Some(Self::Char),
            'B' => Some(Self::Byte),
            'S' => Some(Self::Short),
            'I' => Some(Self::Int),
            'J' => Some(Self::Long),
            'F' => Some(Self::Float),
            'D' => Some(Self::Double),
            'V' => Some(Self::Void),
            _ => None,
        }
    }

    /// Java source keyword for this primitive
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }
}

/// A symbolic reference to a Java type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    Primitive(PrimitiveType),
    /// Class or interface, by JVM internal name (`java/lang/String`)
    Class(String),
    Array(Box<TypeReference>),
}

impl TypeReference {
    pub fn class(internal_name: impl Into<String>) -> Self {
        Self::Class(internal_name.into())
    }

    pub fn array_of(element: TypeReference) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveType::Void))
    }

    /// Name as it appears in Java source, without package qualification.
    /// Nested classes use dotted form: `MethodHandles$Lookup` prints as
    /// `MethodHandles.Lookup`.
    pub fn source_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.keyword().to_string(),
            Self::Class(internal) => {
                let simple = internal.rsplit('/').next().unwrap_or(internal);
                simple.replace('$', ".")
            }
            Self::Array(element) => format!("{}[]", element.source_name()),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_name())
    }
}

/// Parameter and return types of a method, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub parameters: Vec<TypeReference>,
    pub return_type: TypeReference,
}

/// A symbolic reference to a method, with no resolved backing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReference {
    pub owner: TypeReference,
    pub name: String,
    pub signature: MethodSignature,
}

/// A symbolic reference to a field, with no resolved backing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    pub owner: TypeReference,
    pub name: String,
    pub field_type: TypeReference,
}

// Types the method-handle rewriter asks for on every run
static WELL_KNOWN_TYPES: Lazy<HashMap<&'static str, TypeReference>> = Lazy::new(|| {
    let mut types = HashMap::new();
    for name in [
        consts::T_METHOD_HANDLE,
        consts::T_METHOD_TYPE,
        consts::T_METHOD_HANDLES,
        consts::T_LOOKUP,
        consts::T_REFLECTIVE_OPERATION_EXCEPTION,
        consts::T_OBJECT,
    ] {
        types.insert(name, TypeReference::class(name));
    }
    types
});

/// Parses descriptor strings into symbolic references
///
/// Accepts both proper field descriptors (`Ljava/lang/String;`, `I`, `[[J`)
/// and bare internal names (`java/lang/String`), matching the leniency of the
/// constant-pool readers that feed the transform layer.
#[derive(Debug, Default)]
pub struct MetadataParser;

impl MetadataParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_type_descriptor(&self, descriptor: &str) -> Result<TypeReference> {
        if let Some(known) = WELL_KNOWN_TYPES.get(descriptor) {
            return Ok(known.clone());
        }

        let mut dims = 0usize;
        let mut rest = descriptor;
        while let Some(stripped) = rest.strip_prefix('[') {
            dims += 1;
            rest = stripped;
        }

        let base = if rest.len() == 1 {
            let c = rest.chars().next().ok_or_else(|| Error::type_descriptor(descriptor))?;
            TypeReference::Primitive(
                PrimitiveType::from_descriptor_char(c)
                    .ok_or_else(|| Error::type_descriptor(descriptor))?,
            )
        } else if let Some(body) = rest.strip_prefix('L') {
            let name = body
                .strip_suffix(';')
                .ok_or_else(|| Error::type_descriptor(descriptor))?;
            validate_internal_name(name, descriptor)?;
            TypeReference::class(name)
        } else {
            // Bare internal name
            validate_internal_name(rest, descriptor)?;
            TypeReference::class(rest)
        };

        if dims > 0 && base.is_void() {
            return Err(Error::type_descriptor(descriptor));
        }

        let mut result = base;
        for _ in 0..dims {
            result = TypeReference::array_of(result);
        }
        Ok(result)
    }

    pub fn parse_method_descriptor(&self, descriptor: &str) -> Result<MethodSignature> {
        let inner = descriptor
            .strip_prefix('(')
            .ok_or_else(|| Error::method_descriptor(descriptor))?;
        let (params_str, ret_str) = inner
            .split_once(')')
            .ok_or_else(|| Error::method_descriptor(descriptor))?;

        let mut parameters = Vec::new();
        let mut rest = params_str;
        while !rest.is_empty() {
            let (ty, remaining) = take_field_type(rest, descriptor)?;
            if ty.is_void() {
                return Err(Error::method_descriptor(descriptor));
            }
            parameters.push(ty);
            rest = remaining;
        }

        let (return_type, remaining) = take_field_type(ret_str, descriptor)?;
        if !remaining.is_empty() {
            return Err(Error::method_descriptor(descriptor));
        }

        Ok(MethodSignature { parameters, return_type })
    }

    pub fn parse_method(&self, owner: &str, name: &str, descriptor: &str) -> Result<MethodReference> {
        Ok(MethodReference {
            owner: self.parse_type_descriptor(owner)?,
            name: name.to_string(),
            signature: self.parse_method_descriptor(descriptor)?,
        })
    }

    pub fn parse_field(&self, owner: &str, name: &str, descriptor: &str) -> Result<FieldReference> {
        let field_type = self.parse_type_descriptor(descriptor)?;
        if field_type.is_void() {
            return Err(Error::type_descriptor(descriptor));
        }
        Ok(FieldReference {
            owner: self.parse_type_descriptor(owner)?,
            name: name.to_string(),
            field_type,
        })
    }
}

/// Consume one field descriptor from the front of `input`
fn take_field_type<'s>(input: &'s str, whole: &str) -> Result<(TypeReference, &'s str)> {
    let mut dims = 0usize;
    let mut rest = input;
    while let Some(stripped) = rest.strip_prefix('[') {
        dims += 1;
        rest = stripped;
    }

    let c = rest.chars().next().ok_or_else(|| Error::method_descriptor(whole))?;

    let (base, remaining) = if c == 'L' {
        let semi = rest.find(';').ok_or_else(|| Error::method_descriptor(whole))?;
        let name = &rest[1..semi];
        validate_internal_name(name, whole)?;
        (TypeReference::class(name), &rest[semi + 1..])
    } else if let Some(primitive) = PrimitiveType::from_descriptor_char(c) {
        (TypeReference::Primitive(primitive), &rest[1..])
    } else {
        return Err(Error::method_descriptor(whole));
    };

    if dims > 0 && base.is_void() {
        return Err(Error::method_descriptor(whole));
    }

    let mut result = base;
    for _ in 0..dims {
        result = TypeReference::array_of(result);
    }
    Ok((result, remaining))
}

fn validate_internal_name(name: &str, descriptor: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .split('/')
            .all(|segment| {
                !segment.is_empty()
                    && segment.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            });
    if valid {
        Ok(())
    } else {
        Err(Error::type_descriptor(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MetadataParser {
        MetadataParser::new()
    }

    #[test]
    fn parses_primitive_descriptors() {
        assert_eq!(
            parser().parse_type_descriptor("I").unwrap(),
            TypeReference::Primitive(PrimitiveType::Int)
        );
        assert_eq!(
            parser().parse_type_descriptor("V").unwrap(),
            TypeReference::Primitive(PrimitiveType::Void)
        );
    }

    #[test]
    fn parses_class_and_bare_internal_names() {
        let expected = TypeReference::class("java/lang/String");
        assert_eq!(parser().parse_type_descriptor("Ljava/lang/String;").unwrap(), expected);
        assert_eq!(parser().parse_type_descriptor("java/lang/String").unwrap(), expected);
    }

    #[test]
    fn parses_array_descriptors() {
        let ty = parser().parse_type_descriptor("[[I").unwrap();
        assert_eq!(ty.source_name(), "int[][]");
    }

    #[test]
    fn rejects_malformed_type_descriptors() {
        assert!(parser().parse_type_descriptor("").is_err());
        assert!(parser().parse_type_descriptor("Ljava/lang/String").is_err());
        assert!(parser().parse_type_descriptor("[V").is_err());
        assert!(parser().parse_type_descriptor("java//Broken").is_err());
    }

    #[test]
    fn parses_method_descriptors() {
        let sig = parser()
            .parse_method_descriptor("(ILjava/lang/String;[J)Ljava/lang/Object;")
            .unwrap();
        assert_eq!(sig.parameters.len(), 3);
        assert_eq!(sig.parameters[0], TypeReference::Primitive(PrimitiveType::Int));
        assert_eq!(sig.parameters[1], TypeReference::class("java/lang/String"));
        assert_eq!(sig.parameters[2].source_name(), "long[]");
        assert_eq!(sig.return_type, TypeReference::class("java/lang/Object"));
    }

    #[test]
    fn rejects_malformed_method_descriptors() {
        assert!(parser().parse_method_descriptor("()").is_err());
        assert!(parser().parse_method_descriptor("(V)V").is_err());
        assert!(parser().parse_method_descriptor("(I)VV").is_err());
        assert!(parser().parse_method_descriptor("I)V").is_err());
    }

    #[test]
    fn nested_class_source_name_is_dotted() {
        let ty = parser().parse_type_descriptor("java/lang/invoke/MethodHandles$Lookup").unwrap();
        assert_eq!(ty.source_name(), "MethodHandles.Lookup");
    }

    #[test]
    fn parse_field_rejects_void() {
        assert!(parser().parse_field("p/C", "f", "V").is_err());
    }
}
