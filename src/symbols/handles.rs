//! Method handle constants as they appear in the constant pool
//!
//! A `CONSTANT_MethodHandle_info` entry names a member plus a reference kind
//! describing how the handle targets it. Equality over the whole record is
//! what the rewriter dedups on: two occurrences of the same kind/owner/name/
//! descriptor share one synthesized helper.

use super::{MetadataParser, MethodSignature, PrimitiveType, TypeReference};
use crate::error::Result;

/// Reference kind tags from JVMS table 5.4.3.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl HandleKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::GetField),
            2 => Some(Self::GetStatic),
            3 => Some(Self::PutField),
            4 => Some(Self::PutStatic),
            5 => Some(Self::InvokeVirtual),
            6 => Some(Self::InvokeStatic),
            7 => Some(Self::InvokeSpecial),
            8 => Some(Self::NewInvokeSpecial),
            9 => Some(Self::InvokeInterface),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::GetField => 1,
            Self::GetStatic => 2,
            Self::PutField => 3,
            Self::PutStatic => 4,
            Self::InvokeVirtual => 5,
            Self::InvokeStatic => 6,
            Self::InvokeSpecial => 7,
            Self::NewInvokeSpecial => 8,
            Self::InvokeInterface => 9,
        }
    }
}

/// Identity of one method handle constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodHandle {
    pub kind: HandleKind,
    /// Internal name of the type declaring the referenced member
    pub owner: String,
    /// Name of the referenced member (`<init>` for constructor handles)
    pub name: String,
    /// Field descriptor for field kinds, method descriptor otherwise
    pub descriptor: String,
}

impl MethodHandle {
    pub fn new(
        kind: HandleKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// The type this handle presents to invokers once resolved.
    ///
    /// Method kinds use the member's own signature; constructor handles
    /// return the owner; field kinds present getter/setter shapes derived
    /// from the field descriptor.
    pub fn invocation_signature(&self, parser: &MetadataParser) -> Result<MethodSignature> {
        let owner = parser.parse_type_descriptor(&self.owner)?;
        let void = TypeReference::Primitive(PrimitiveType::Void);

        Ok(match self.kind {
            HandleKind::GetField => MethodSignature {
                parameters: vec![owner],
                return_type: self.field_type(parser)?,
            },
            HandleKind::GetStatic => MethodSignature {
                parameters: vec![],
                return_type: self.field_type(parser)?,
            },
            HandleKind::PutField => MethodSignature {
                parameters: vec![owner, self.field_type(parser)?],
                return_type: void,
            },
            HandleKind::PutStatic => MethodSignature {
                parameters: vec![self.field_type(parser)?],
                return_type: void,
            },
            HandleKind::NewInvokeSpecial => {
                // A constructor handle yields the new instance
                let method = parser.parse_method(&self.owner, &self.name, &self.descriptor)?;
                MethodSignature {
                    parameters: method.signature.parameters,
                    return_type: owner,
                }
            }
            HandleKind::InvokeVirtual
            | HandleKind::InvokeStatic
            | HandleKind::InvokeSpecial
            | HandleKind::InvokeInterface => {
                parser.parse_method(&self.owner, &self.name, &self.descriptor)?.signature
            }
        })
    }

    fn field_type(&self, parser: &MetadataParser) -> Result<TypeReference> {
        Ok(parser.parse_field(&self.owner, &self.name, &self.descriptor)?.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MetadataParser {
        MetadataParser::new()
    }

    #[test]
    fn tags_round_trip() {
        for tag in 1..=9u8 {
            let kind = HandleKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert!(HandleKind::from_tag(0).is_none());
        assert!(HandleKind::from_tag(10).is_none());
    }

    #[test]
    fn static_method_signature_is_raw_descriptor() {
        let handle = MethodHandle::new(HandleKind::InvokeStatic, "p/C", "m", "(IJ)Ljava/lang/String;");
        let sig = handle.invocation_signature(&parser()).unwrap();
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(sig.return_type, TypeReference::class("java/lang/String"));
    }

    #[test]
    fn constructor_handle_returns_owner() {
        let handle = MethodHandle::new(HandleKind::NewInvokeSpecial, "p/C", "<init>", "(I)V");
        let sig = handle.invocation_signature(&parser()).unwrap();
        assert_eq!(sig.parameters, vec![TypeReference::Primitive(PrimitiveType::Int)]);
        assert_eq!(sig.return_type, TypeReference::class("p/C"));
    }

    #[test]
    fn field_kinds_present_accessor_shapes() {
        let owner = TypeReference::class("p/C");
        let int = TypeReference::Primitive(PrimitiveType::Int);
        let void = TypeReference::Primitive(PrimitiveType::Void);

        let get_field = MethodHandle::new(HandleKind::GetField, "p/C", "f", "I");
        let sig = get_field.invocation_signature(&parser()).unwrap();
        assert_eq!(sig.parameters, vec![owner.clone()]);
        assert_eq!(sig.return_type, int);

        let get_static = MethodHandle::new(HandleKind::GetStatic, "p/C", "f", "I");
        let sig = get_static.invocation_signature(&parser()).unwrap();
        assert!(sig.parameters.is_empty());
        assert_eq!(sig.return_type, int);

        let put_field = MethodHandle::new(HandleKind::PutField, "p/C", "f", "I");
        let sig = put_field.invocation_signature(&parser()).unwrap();
        assert_eq!(sig.parameters, vec![owner, int.clone()]);
        assert_eq!(sig.return_type, void);

        let put_static = MethodHandle::new(HandleKind::PutStatic, "p/C", "f", "I");
        let sig = put_static.invocation_signature(&parser()).unwrap();
        assert_eq!(sig.parameters, vec![int]);
        assert_eq!(sig.return_type, void);
    }

    #[test]
    fn malformed_descriptor_is_hard_error() {
        let handle = MethodHandle::new(HandleKind::InvokeStatic, "p/C", "m", "(I");
        assert!(handle.invocation_signature(&parser()).is_err());
    }
}
