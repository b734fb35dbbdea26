//! Java source rendering for the output tree
//!
//! Walks the arena and prints declarations, statements, and expressions as
//! readable Java. Comment children are rendered where they sit: line position
//! for members, `/* ... */` inline for expression positions. Placeholder
//! nodes that no transform rewrote degrade to `null`.

use super::arena::{AstArena, NodeId};
use super::nodes::{NodeKind, Role};

pub struct AstPrinter<'a> {
    arena: &'a AstArena,
    indent_level: usize,
    output: String,
}

impl<'a> AstPrinter<'a> {
    pub fn new(arena: &'a AstArena) -> Self {
        Self { arena, indent_level: 0, output: String::new() }
    }

    pub fn print(&mut self, root: NodeId) -> String {
        self.output.clear();
        self.indent_level = 0;
        self.print_node(root);
        self.output.clone()
    }

    fn indent(&mut self) {
        self.indent_level += 2;
    }

    fn dedent(&mut self) {
        if self.indent_level >= 2 {
            self.indent_level -= 2;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn push(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Print a declaration or statement, including trailing newline
    fn print_node(&mut self, id: NodeId) {
        let kind = self.arena.kind(id).clone();
        match kind {
            NodeKind::CompilationUnit => {
                let members: Vec<NodeId> = self.arena.children(id).collect();
                for member in members {
                    self.print_node(member);
                }
            }
            NodeKind::TypeDeclaration(data) => {
                self.write_indent();
                for modifier in &data.modifiers {
                    self.push(&modifier.to_string());
                    self.push(" ");
                }
                self.push("class ");
                self.push(&data.name);
                self.push(" {\n");
                self.indent();
                let members: Vec<NodeId> = self.arena.children(id).collect();
                for member in members {
                    self.print_node(member);
                }
                self.dedent();
                self.write_indent();
                self.push("}\n");
            }
            NodeKind::FieldDeclaration(data) => {
                self.write_indent();
                for modifier in &data.modifiers {
                    self.push(&modifier.to_string());
                    self.push(" ");
                }
                self.push(&data.field_type.source_name());
                self.push(" ");
                self.push(&data.name);
                if self.arena.child_with_role(id, Role::Initializer).is_some() {
                    self.push(" = ");
                    self.print_role_with_comments(id, Role::Initializer);
                }
                self.push(";\n");
            }
            NodeKind::MethodDeclaration(data) => {
                self.write_indent();
                if data.is_static_initializer {
                    self.push("static");
                } else {
                    for modifier in &data.modifiers {
                        self.push(&modifier.to_string());
                        self.push(" ");
                    }
                    if let Some(return_type) = &data.return_type {
                        self.push(&return_type.source_name());
                        self.push(" ");
                    }
                    self.push(&data.name);
                    self.push("(");
                    for (i, parameter) in data.parameters.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.push(&parameter.param_type.source_name());
                        self.push(" ");
                        self.push(&parameter.name);
                    }
                    self.push(")");
                }
                match self.arena.child_with_role(id, Role::Body) {
                    Some(body) => {
                        self.push(" ");
                        self.print_block(body);
                        self.push("\n");
                    }
                    None => self.push(";\n"),
                }
            }
            NodeKind::Block => {
                self.write_indent();
                self.print_block(id);
                self.push("\n");
            }
            NodeKind::VariableDeclaration(data) => {
                self.write_indent();
                if data.is_final {
                    self.push("final ");
                }
                self.push(&data.var_type.source_name());
                self.push(" ");
                self.push(&data.name);
                if self.arena.child_with_role(id, Role::Initializer).is_some() {
                    self.push(" = ");
                    self.print_role_with_comments(id, Role::Initializer);
                }
                self.push(";\n");
            }
            NodeKind::ExpressionStatement => {
                self.write_indent();
                self.print_role_with_comments(id, Role::Value);
                self.push(";\n");
            }
            NodeKind::TryCatch => {
                self.write_indent();
                self.push("try ");
                if let Some(try_block) = self.arena.child_with_role(id, Role::TryBlock) {
                    self.print_block(try_block);
                }
                self.push("\n");
                let clauses: Vec<NodeId> =
                    self.arena.children_with_role(id, Role::CatchClause).collect();
                for clause in clauses {
                    self.print_node(clause);
                }
            }
            NodeKind::CatchClause(data) => {
                self.write_indent();
                self.push("catch (");
                if data.is_final {
                    self.push("final ");
                }
                self.push(&data.exception_type.source_name());
                self.push(" ");
                self.push(&data.variable);
                self.push(") ");
                if let Some(body) = self.arena.child_with_role(id, Role::Body) {
                    self.print_block(body);
                }
                self.push("\n");
            }
            NodeKind::Comment(data) => {
                self.write_indent();
                if data.multiline {
                    self.push("/*");
                    self.push(&data.text);
                    self.push("*/\n");
                } else {
                    self.push("//");
                    self.push(&data.text);
                    self.push("\n");
                }
            }
            _ => {
                // Bare expression in statement position
                self.write_indent();
                self.print_expr(id);
                self.push("\n");
            }
        }
    }

    fn print_block(&mut self, block: NodeId) {
        self.push("{\n");
        self.indent();
        let statements: Vec<NodeId> = self.arena.children(block).collect();
        for statement in statements {
            self.print_node(statement);
        }
        self.dedent();
        self.write_indent();
        self.push("}");
    }

    /// Print every child of `role` in sibling order, rendering comment
    /// children inline as they are encountered
    fn print_role_with_comments(&mut self, parent: NodeId, role: Role) {
        let children: Vec<NodeId> = self.arena.children(parent).collect();
        for child in children {
            let child_role = self.arena.role(child);
            if child_role == Role::Comment {
                self.print_inline_comment(child);
            } else if child_role == role {
                self.print_expr(child);
            }
        }
    }

    fn print_expr(&mut self, id: NodeId) {
        let kind = self.arena.kind(id).clone();
        match kind {
            NodeKind::Identifier(name) => self.push(&name),
            NodeKind::TypeExpr(type_ref) => self.push(&type_ref.source_name()),
            NodeKind::FieldAccess(name) => {
                if let Some(target) = self.arena.child_with_role(id, Role::Target) {
                    self.print_expr(target);
                    self.push(".");
                }
                self.push(&name);
            }
            NodeKind::MethodCall(name) => {
                if let Some(target) = self.arena.child_with_role(id, Role::Target) {
                    self.print_expr(target);
                    self.push(".");
                }
                self.push(&name);
                self.push("(");
                let children: Vec<NodeId> = self.arena.children(id).collect();
                let mut first = true;
                let mut pending_comments: Vec<NodeId> = Vec::new();
                for child in children {
                    match self.arena.role(child) {
                        Role::Comment => pending_comments.push(child),
                        Role::Argument => {
                            if !first {
                                self.push(", ");
                            }
                            first = false;
                            for comment in pending_comments.drain(..) {
                                self.print_inline_comment(comment);
                            }
                            self.print_expr(child);
                        }
                        _ => {}
                    }
                }
                self.push(")");
            }
            NodeKind::ClassLiteral(type_ref) => {
                self.push(&type_ref.source_name());
                self.push(".class");
            }
            NodeKind::StringLiteral(value) => {
                self.push("\"");
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                self.push(&escaped);
                self.push("\"");
            }
            NodeKind::IntegerLiteral(value) => self.push(&value.to_string()),
            NodeKind::NullLiteral => self.push("null"),
            NodeKind::Assignment => {
                if let Some(target) = self.arena.child_with_role(id, Role::Target) {
                    self.print_expr(target);
                }
                self.push(" = ");
                self.print_role_with_comments(id, Role::Value);
            }
            NodeKind::Comment(_) => self.print_inline_comment(id),
            NodeKind::HandlePlaceholder(_) => self.push("null"),
            _ => {}
        }
    }

    fn print_inline_comment(&mut self, id: NodeId) {
        if let NodeKind::Comment(data) = self.arena.kind(id).clone() {
            self.push("/*");
            self.push(&data.text);
            self.push("*/ ");
        }
    }
}
