//! Method-handle constant synthesis
//!
//! An `ldc` of a `CONSTANT_MethodHandle_info` entry has no Java source form:
//! the decoder leaves a placeholder node behind, and this transform replaces
//! it with a reference to a synthesized private helper class whose static
//! initializer reproduces the handle's resolution behavior - including its
//! failure behavior. Resolution failure of a handle constant is deferred to
//! first invocation, so the generated initializer catches
//! `ReflectiveOperationException` and installs a handle that rethrows the
//! caught exception when invoked, instead of letting class initialization
//! fail.
//!
//! One helper is emitted per distinct handle per unit; every further
//! occurrence of an equal handle reuses the same `HANDLE` field.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ast::{
    AstArena, CatchClauseData, CommentData, FieldDeclarationData, MethodDeclarationData, Modifier,
    NodeId, NodeKind, Role, TypeDeclarationData, VariableDeclarationData,
};
use crate::config::{Config, LanguageFeature};
use crate::consts;
use crate::error::Result;
use crate::symbols::{HandleKind, MetadataParser, MethodHandle, MethodSignature, TypeReference};

use super::UniqueIdGenerator;

/// Rewrites method-handle placeholders within one compilation unit
///
/// The dedup cache is owned by one run; reusing it across units would alias
/// helpers between unrelated classes. The id generator is borrowed from the
/// session so generated names never collide across units.
pub struct MethodHandleRewriter<'a> {
    config: &'a Config,
    ids: &'a mut UniqueIdGenerator,
    helpers: HashMap<MethodHandle, HelperBuilder>,
}

impl<'a> MethodHandleRewriter<'a> {
    pub fn new(config: &'a Config, ids: &'a mut UniqueIdGenerator) -> Self {
        Self { config, ids, helpers: HashMap::new() }
    }

    pub fn run(
        &mut self,
        arena: &mut AstArena,
        unit: NodeId,
        parser: Option<&MetadataParser>,
    ) -> Result<()> {
        self.helpers.clear();

        let Some(parser) = parser else {
            // No resolver for this unit: leave every placeholder for a later
            // stage to surface
            return Ok(());
        };

        // Synthesized subtrees never contain placeholders, so one up-front
        // sweep finds every site even though rewriting mutates the tree
        let sites: Vec<NodeId> = arena
            .descendants(unit)
            .into_iter()
            .filter(|&id| matches!(arena.kind(id), NodeKind::HandlePlaceholder(_)))
            .collect();

        for site in sites {
            self.rewrite_site(arena, site, parser)?;
        }
        Ok(())
    }

    fn rewrite_site(&mut self, arena: &mut AstArena, site: NodeId, parser: &MetadataParser) -> Result<()> {
        let Some(enclosing) = arena.enclosing_type(site) else {
            return Ok(());
        };
        let enclosing_reference = match arena.kind(enclosing) {
            NodeKind::TypeDeclaration(data) => match &data.reference {
                Some(reference) => reference.clone(),
                // Enclosing type could not be resolved; not an error
                None => return Ok(()),
            },
            _ => return Ok(()),
        };
        let handle = match arena.kind(site) {
            NodeKind::HandlePlaceholder(handle) => handle.clone(),
            _ => return Ok(()),
        };

        let mut needs_insertion = false;
        let builder = match self.helpers.entry(handle.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                needs_insertion = true;
                entry.insert(HelperBuilder::new(
                    handle,
                    enclosing_reference,
                    self.ids.next_id(),
                    self.config,
                ))
            }
        };

        let built = builder.build(arena, parser)?;

        // Every occurrence becomes `HelperType.HANDLE`, marked with an
        // inline comment
        let target = arena.add(NodeKind::TypeExpr(built.helper_type.clone()));
        let replacement = arena.add(NodeKind::FieldAccess(consts::HANDLE_FIELD_NAME.to_string()));
        arena.append_child(replacement, target, Role::Target);
        arena.replace(site, replacement);

        let marker = arena.add(NodeKind::Comment(CommentData {
            text: consts::SUBSTITUTION_COMMENT.to_string(),
            multiline: true,
        }));
        arena.insert_before(replacement, marker, Role::Comment);

        if needs_insertion {
            // Helper goes after the last existing member; its auxiliary
            // lookup field, when present, goes immediately before it
            arena.append_child(enclosing, built.declaration, Role::Member);
            if let Some(field) = built.extra_lookup_field {
                arena.insert_before(built.declaration, field, Role::Member);
            }

            let first_line = arena.add(NodeKind::Comment(CommentData {
                text: consts::HELPER_COMMENT_LINE_1.to_string(),
                multiline: false,
            }));
            let second_line = arena.add(NodeKind::Comment(CommentData {
                text: consts::HELPER_COMMENT_LINE_2.to_string(),
                multiline: false,
            }));
            arena.insert_first_child(built.declaration, second_line, Role::Comment);
            arena.insert_first_child(built.declaration, first_line, Role::Comment);
        }

        Ok(())
    }
}

/// Everything later occurrences of a handle need from the first build
#[derive(Debug, Clone)]
struct BuiltHelper {
    declaration: NodeId,
    extra_lookup_field: Option<NodeId>,
    helper_type: TypeReference,
}

/// Synthesizes the helper class for one distinct handle
///
/// `build` is idempotent: the first call creates the declaration subtree
/// (detached - the rewriter splices it in), repeat calls return the cached
/// result without touching the arena.
struct HelperBuilder {
    handle: MethodHandle,
    enclosing_reference: TypeReference,
    generated_id: u32,
    use_private_lookup: bool,
    built: Option<BuiltHelper>,
}

impl HelperBuilder {
    fn new(
        handle: MethodHandle,
        enclosing_reference: TypeReference,
        generated_id: u32,
        config: &Config,
    ) -> Self {
        Self {
            handle,
            enclosing_reference,
            generated_id,
            use_private_lookup: config.is_supported(LanguageFeature::PrivateLookup),
            built: None,
        }
    }

    fn build(&mut self, arena: &mut AstArena, parser: &MetadataParser) -> Result<BuiltHelper> {
        if let Some(built) = &self.built {
            return Ok(built.clone());
        }

        let method_handle_type = parser.parse_type_descriptor(consts::T_METHOD_HANDLE)?;
        let method_type_type = parser.parse_type_descriptor(consts::T_METHOD_TYPE)?;
        let method_handles_type = parser.parse_type_descriptor(consts::T_METHOD_HANDLES)?;
        let lookup_type = parser.parse_type_descriptor(consts::T_LOOKUP)?;
        let exception_type = parser.parse_type_descriptor(consts::T_REFLECTIVE_OPERATION_EXCEPTION)?;
        let owner_type = parser.parse_type_descriptor(&self.handle.owner)?;
        let helper_type = parser.parse_type_descriptor(&format!(
            "{}_{:x}",
            consts::HELPER_TYPE_PREFIX,
            self.generated_id
        ))?;

        let signature = self.handle.invocation_signature(parser)?;

        let declaration = arena.add(NodeKind::TypeDeclaration(TypeDeclarationData {
            modifiers: vec![Modifier::Private, Modifier::Static, Modifier::Final],
            name: helper_type.source_name(),
            reference: Some(helper_type.clone()),
        }));

        // static final MethodHandle HANDLE;
        let handle_field = arena.add(NodeKind::FieldDeclaration(FieldDeclarationData {
            modifiers: vec![Modifier::Static, Modifier::Final],
            field_type: method_handle_type.clone(),
            name: consts::HANDLE_FIELD_NAME.to_string(),
        }));
        arena.append_child(declaration, handle_field, Role::Member);

        let initializer = arena.add(NodeKind::MethodDeclaration(MethodDeclarationData {
            modifiers: vec![Modifier::Static],
            return_type: None,
            name: "<clinit>".to_string(),
            parameters: vec![],
            is_static_initializer: true,
        }));
        let body = arena.add(NodeKind::Block);
        arena.append_child(initializer, body, Role::Body);
        arena.append_child(declaration, initializer, Role::Member);

        // final MethodType type = MethodType.methodType(Ret.class, ...);
        let type_var = arena.add(NodeKind::VariableDeclaration(VariableDeclarationData {
            is_final: true,
            var_type: method_type_type.clone(),
            name: "type".to_string(),
        }));
        let type_expr = method_type_expression(arena, &signature, &method_type_type);
        arena.append_child(type_var, type_expr, Role::Initializer);
        arena.append_child(body, type_var, Role::Statement);

        // MethodHandle handle;
        let handle_var = arena.add(NodeKind::VariableDeclaration(VariableDeclarationData {
            is_final: false,
            var_type: method_handle_type,
            name: "handle".to_string(),
        }));
        arena.append_child(body, handle_var, Role::Statement);

        let mut extra_lookup_field = None;
        let lookup_expr = if self.use_private_lookup {
            // MethodHandles.privateLookupIn(Enclosing.class, MethodHandles.lookup())
            let enclosing_literal =
                arena.add(NodeKind::ClassLiteral(self.enclosing_reference.clone()));
            let global_lookup = static_call(arena, &method_handles_type, "lookup", vec![]);
            static_call(
                arena,
                &method_handles_type,
                "privateLookupIn",
                vec![enclosing_literal, global_lookup],
            )
        } else {
            // No scoped lookup on this runtime; fall back to a lookup field
            // captured next to the helper in the enclosing class
            let field_name = format!("__DECAF__LOOKUP_{:x}__", self.generated_id);
            let field = arena.add(NodeKind::FieldDeclaration(FieldDeclarationData {
                modifiers: vec![Modifier::Private, Modifier::Static, Modifier::Final],
                field_type: lookup_type,
                name: field_name.clone(),
            }));
            let field_init = static_call(arena, &method_handles_type, "lookup", vec![]);
            arena.append_child(field, field_init, Role::Initializer);
            extra_lookup_field = Some(field);
            arena.add(NodeKind::Identifier(field_name))
        };

        // try { handle = lookup.findXxx(...); }
        let factory_call = self.lookup_factory_call(arena, parser, lookup_expr, &owner_type)?;
        let handle_target = arena.add(NodeKind::Identifier("handle".to_string()));
        let try_assign = assignment(arena, handle_target, factory_call);

        let try_catch = arena.add(NodeKind::TryCatch);
        let try_block = arena.add(NodeKind::Block);
        let try_stmt = expression_statement(arena, try_assign);
        arena.append_child(try_block, try_stmt, Role::Statement);
        arena.append_child(try_catch, try_block, Role::TryBlock);

        // catch (final ReflectiveOperationException e): install a handle
        // that rethrows `e` on first invocation, matching deferred
        // constant-resolution failure
        let clause = arena.add(NodeKind::CatchClause(CatchClauseData {
            is_final: true,
            exception_type,
            variable: "e".to_string(),
        }));
        let clause_body = arena.add(NodeKind::Block);

        let type_ref = arena.add(NodeKind::Identifier("type".to_string()));
        let return_type_call = instance_call(arena, type_ref, "returnType", vec![]);
        let e_ref = arena.add(NodeKind::Identifier("e".to_string()));
        let get_class_call = instance_call(arena, e_ref, "getClass", vec![]);
        let throw_adapter = static_call(
            arena,
            &method_handles_type,
            "throwException",
            vec![return_type_call, get_class_call],
        );
        let zero = arena.add(NodeKind::IntegerLiteral(0));
        let e_bound = arena.add(NodeKind::Identifier("e".to_string()));
        let bound_adapter = static_call(
            arena,
            &method_handles_type,
            "insertArguments",
            vec![throw_adapter, zero, e_bound],
        );
        let type_again = arena.add(NodeKind::Identifier("type".to_string()));
        let fallback = static_call(
            arena,
            &method_handles_type,
            "permuteArguments",
            vec![bound_adapter, type_again],
        );
        let fallback_target = arena.add(NodeKind::Identifier("handle".to_string()));
        let fallback_assign = assignment(arena, fallback_target, fallback);
        let fallback_stmt = expression_statement(arena, fallback_assign);
        arena.append_child(clause_body, fallback_stmt, Role::Statement);
        arena.append_child(clause, clause_body, Role::Body);
        arena.append_child(try_catch, clause, Role::CatchClause);
        arena.append_child(body, try_catch, Role::Statement);

        // HelperType.HANDLE = handle;
        let field_target = arena.add(NodeKind::TypeExpr(helper_type.clone()));
        let field_access = arena.add(NodeKind::FieldAccess(consts::HANDLE_FIELD_NAME.to_string()));
        arena.append_child(field_access, field_target, Role::Target);
        let handle_value = arena.add(NodeKind::Identifier("handle".to_string()));
        let final_assign = assignment(arena, field_access, handle_value);
        let final_stmt = expression_statement(arena, final_assign);
        arena.append_child(body, final_stmt, Role::Statement);

        let built = BuiltHelper { declaration, extra_lookup_field, helper_type };
        self.built = Some(built.clone());
        Ok(built)
    }

    /// The lookup factory call for this handle's reference kind. The mapping
    /// is total over all nine kinds.
    fn lookup_factory_call(
        &self,
        arena: &mut AstArena,
        parser: &MetadataParser,
        lookup_expr: NodeId,
        owner_type: &TypeReference,
    ) -> Result<NodeId> {
        let owner_literal = arena.add(NodeKind::ClassLiteral(owner_type.clone()));

        Ok(match self.handle.kind {
            HandleKind::InvokeStatic => {
                let name = arena.add(NodeKind::StringLiteral(self.handle.name.clone()));
                let type_ref = arena.add(NodeKind::Identifier("type".to_string()));
                instance_call(arena, lookup_expr, "findStatic", vec![owner_literal, name, type_ref])
            }
            HandleKind::InvokeVirtual | HandleKind::InvokeInterface => {
                let name = arena.add(NodeKind::StringLiteral(self.handle.name.clone()));
                let type_ref = arena.add(NodeKind::Identifier("type".to_string()));
                instance_call(arena, lookup_expr, "findVirtual", vec![owner_literal, name, type_ref])
            }
            HandleKind::InvokeSpecial => {
                let name = arena.add(NodeKind::StringLiteral(self.handle.name.clone()));
                let type_ref = arena.add(NodeKind::Identifier("type".to_string()));
                let special_caller = arena.add(NodeKind::ClassLiteral(owner_type.clone()));
                instance_call(
                    arena,
                    lookup_expr,
                    "findSpecial",
                    vec![owner_literal, name, type_ref, special_caller],
                )
            }
            HandleKind::NewInvokeSpecial => {
                // findConstructor takes the raw (params)V constructor type,
                // not the handle's invocation type
                let constructor_signature = parser.parse_method_descriptor(&self.handle.descriptor)?;
                let method_type_type = parser.parse_type_descriptor(consts::T_METHOD_TYPE)?;
                let constructor_type =
                    method_type_expression(arena, &constructor_signature, &method_type_type);
                instance_call(
                    arena,
                    lookup_expr,
                    "findConstructor",
                    vec![owner_literal, constructor_type],
                )
            }
            HandleKind::GetField
            | HandleKind::GetStatic
            | HandleKind::PutField
            | HandleKind::PutStatic => {
                let factory = match self.handle.kind {
                    HandleKind::GetField => "findGetter",
                    HandleKind::GetStatic => "findStaticGetter",
                    HandleKind::PutField => "findSetter",
                    _ => "findStaticSetter",
                };
                let field =
                    parser.parse_field(&self.handle.owner, &self.handle.name, &self.handle.descriptor)?;
                let name = arena.add(NodeKind::StringLiteral(self.handle.name.clone()));
                let field_class = arena.add(NodeKind::ClassLiteral(field.field_type));
                instance_call(arena, lookup_expr, factory, vec![owner_literal, name, field_class])
            }
        })
    }
}

/// `MethodType.methodType(Return.class, P0.class, P1.class, ...)`
fn method_type_expression(
    arena: &mut AstArena,
    signature: &MethodSignature,
    method_type_type: &TypeReference,
) -> NodeId {
    let mut arguments = Vec::with_capacity(signature.parameters.len() + 1);
    arguments.push(arena.add(NodeKind::ClassLiteral(signature.return_type.clone())));
    for parameter in &signature.parameters {
        arguments.push(arena.add(NodeKind::ClassLiteral(parameter.clone())));
    }
    static_call(arena, method_type_type, "methodType", arguments)
}

/// Call with a type as receiver: `Receiver.name(args)`
fn static_call(
    arena: &mut AstArena,
    receiver: &TypeReference,
    name: &str,
    arguments: Vec<NodeId>,
) -> NodeId {
    let target = arena.add(NodeKind::TypeExpr(receiver.clone()));
    let call = arena.add(NodeKind::MethodCall(name.to_string()));
    arena.append_child(call, target, Role::Target);
    for argument in arguments {
        arena.append_child(call, argument, Role::Argument);
    }
    call
}

/// Call with an expression receiver: `target.name(args)`
fn instance_call(
    arena: &mut AstArena,
    target: NodeId,
    name: &str,
    arguments: Vec<NodeId>,
) -> NodeId {
    let call = arena.add(NodeKind::MethodCall(name.to_string()));
    arena.append_child(call, target, Role::Target);
    for argument in arguments {
        arena.append_child(call, argument, Role::Argument);
    }
    call
}

fn assignment(arena: &mut AstArena, target: NodeId, value: NodeId) -> NodeId {
    let assign = arena.add(NodeKind::Assignment);
    arena.append_child(assign, target, Role::Target);
    arena.append_child(assign, value, Role::Value);
    assign
}

fn expression_statement(arena: &mut AstArena, expression: NodeId) -> NodeId {
    let statement = arena.add(NodeKind::ExpressionStatement);
    arena.append_child(statement, expression, Role::Value);
    statement
}
