//! Output tree for decompiled Java source
//!
//! Unlike a parser's AST, this tree is *produced* rather than read: the
//! decoder builds it from bytecode and transforms rewrite it in place before
//! printing. Nodes live in an arena and are addressed by stable ids, so the
//! structural surgery transforms perform (replace a node, splice a generated
//! declaration into a member list) is cheap and cycle-free.

mod arena;
mod nodes;
mod printer;

pub use arena::{AstArena, Children, NodeId};
pub use nodes::*;
pub use printer::AstPrinter;
