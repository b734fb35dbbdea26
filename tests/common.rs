// Common helpers for building decoded unit trees in tests

use decaf::ast::{
    AstArena, MethodDeclarationData, Modifier, NodeId, NodeKind, Role, TypeDeclarationData,
    VariableDeclarationData,
};
use decaf::symbols::{HandleKind, MethodHandle, PrimitiveType, TypeReference};

/// A unit holding one resolved public class, as the decoder would produce it
pub fn unit_with_class(arena: &mut AstArena, internal_name: &str) -> (NodeId, NodeId) {
    let unit = arena.add(NodeKind::CompilationUnit);
    let class = class_decl(arena, internal_name, true);
    arena.append_child(unit, class, Role::Member);
    (unit, class)
}

pub fn class_decl(arena: &mut AstArena, internal_name: &str, resolved: bool) -> NodeId {
    let simple = internal_name.rsplit('/').next().unwrap_or(internal_name).to_string();
    let reference = if resolved { Some(TypeReference::class(internal_name)) } else { None };
    arena.add(NodeKind::TypeDeclaration(TypeDeclarationData {
        modifiers: vec![Modifier::Public],
        name: simple,
        reference,
    }))
}

/// Adds `static void <name>() { MethodHandle h = <placeholder>; }` to the
/// class. Returns (variable declaration, placeholder).
pub fn add_placeholder_site(
    arena: &mut AstArena,
    class: NodeId,
    method_name: &str,
    handle: &MethodHandle,
) -> (NodeId, NodeId) {
    let method = arena.add(NodeKind::MethodDeclaration(MethodDeclarationData {
        modifiers: vec![Modifier::Static],
        return_type: Some(TypeReference::Primitive(PrimitiveType::Void)),
        name: method_name.to_string(),
        parameters: vec![],
        is_static_initializer: false,
    }));
    let body = arena.add(NodeKind::Block);
    arena.append_child(method, body, Role::Body);
    arena.append_child(class, method, Role::Member);

    let var = arena.add(NodeKind::VariableDeclaration(VariableDeclarationData {
        is_final: false,
        var_type: TypeReference::class("java/lang/invoke/MethodHandle"),
        name: "h".to_string(),
    }));
    let placeholder = arena.add(NodeKind::HandlePlaceholder(handle.clone()));
    arena.append_child(var, placeholder, Role::Initializer);
    arena.append_child(body, var, Role::Statement);
    (var, placeholder)
}

pub fn static_handle(owner: &str, name: &str, descriptor: &str) -> MethodHandle {
    MethodHandle::new(HandleKind::InvokeStatic, owner, name, descriptor)
}

/// Member children of a type declaration, in order
pub fn members(arena: &AstArena, class: NodeId) -> Vec<NodeId> {
    arena.children_with_role(class, Role::Member).collect()
}

/// Synthesized helper type declarations among a class's members, in order
pub fn helper_decls(arena: &AstArena, class: NodeId) -> Vec<NodeId> {
    members(arena, class)
        .into_iter()
        .filter(|&member| match arena.kind(member) {
            NodeKind::TypeDeclaration(data) => data.name.starts_with("DecafConstantHelper"),
            _ => false,
        })
        .collect()
}

/// Auxiliary lookup fields among a class's members, in order
pub fn lookup_fields(arena: &AstArena, class: NodeId) -> Vec<NodeId> {
    members(arena, class)
        .into_iter()
        .filter(|&member| match arena.kind(member) {
            NodeKind::FieldDeclaration(data) => data.name.starts_with("__DECAF__LOOKUP_"),
            _ => false,
        })
        .collect()
}

/// The helper type name a substituted field access points at, if the
/// variable's initializer was rewritten
pub fn substitution_target(arena: &AstArena, var: NodeId) -> Option<String> {
    let init = arena.child_with_role(var, Role::Initializer)?;
    let NodeKind::FieldAccess(field) = arena.kind(init) else {
        return None;
    };
    if field != "HANDLE" {
        return None;
    }
    let target = arena.child_with_role(init, Role::Target)?;
    match arena.kind(target) {
        NodeKind::TypeExpr(type_ref) => Some(type_ref.source_name()),
        _ => None,
    }
}
