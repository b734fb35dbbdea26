//! Arena storage for the output tree
//!
//! Nodes live in one flat vector and are addressed by stable [`NodeId`]
//! indices. Each node carries explicit parent / sibling / child links, so
//! replacement and insertion are local link updates and the tree never holds
//! reference cycles. Nodes are built detached and acquire a parent only when
//! spliced in.

use super::nodes::{NodeKind, Role};

/// Stable index of a node within its [`AstArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    role: Role,
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

/// The output tree of one decompiled compilation unit
#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Vec<Node>,
}

impl AstArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a detached node
    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            role: Role::Detached,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn role(&self, id: NodeId) -> Role {
        self.nodes[id.index()].role
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].prev_sibling
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { arena: self, cursor: self.first_child(id) }
    }

    pub fn children_with_role(&self, id: NodeId, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&child| self.role(child) == role)
    }

    pub fn child_with_role(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.children_with_role(id, role).next()
    }

    /// Append `child` after the current last child of `container`
    pub fn append_child(&mut self, container: NodeId, child: NodeId, role: Role) {
        self.detach(child);
        let last = self.nodes[container.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(container);
            node.role = role;
            node.prev_sibling = last;
            node.next_sibling = None;
        }
        match last {
            Some(prev) => self.nodes[prev.index()].next_sibling = Some(child),
            None => self.nodes[container.index()].first_child = Some(child),
        }
        self.nodes[container.index()].last_child = Some(child);
    }

    /// Insert `new` as the sibling immediately before `anchor`. No-op when
    /// `anchor` is detached.
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId, role: Role) {
        let (parent, prev) = {
            let node = &self.nodes[anchor.index()];
            (node.parent, node.prev_sibling)
        };
        let Some(parent) = parent else {
            return;
        };

        self.detach(new);
        {
            let node = &mut self.nodes[new.index()];
            node.parent = Some(parent);
            node.role = role;
            node.prev_sibling = prev;
            node.next_sibling = Some(anchor);
        }
        self.nodes[anchor.index()].prev_sibling = Some(new);
        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = Some(new),
            None => self.nodes[parent.index()].first_child = Some(new),
        }
    }

    /// Insert `new` as the first child of `container`
    pub fn insert_first_child(&mut self, container: NodeId, new: NodeId, role: Role) {
        match self.nodes[container.index()].first_child {
            Some(head) => self.insert_before(head, new, role),
            None => self.append_child(container, new, role),
        }
    }

    /// Replace `old` with `new`, which takes over `old`'s parent, position,
    /// and role. `old` ends up detached. No-op when `old` is detached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let (parent, prev, next, role) = {
            let node = &self.nodes[old.index()];
            (node.parent, node.prev_sibling, node.next_sibling, node.role)
        };
        let Some(parent) = parent else {
            return;
        };

        self.detach(new);
        {
            let node = &mut self.nodes[new.index()];
            node.parent = Some(parent);
            node.role = role;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = Some(new),
            None => self.nodes[parent.index()].first_child = Some(new),
        }
        match next {
            Some(next) => self.nodes[next.index()].prev_sibling = Some(new),
            None => self.nodes[parent.index()].last_child = Some(new),
        }

        let node = &mut self.nodes[old.index()];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        node.role = Role::Detached;
    }

    /// Unlink a node from its parent, leaving its own subtree intact
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.index()].prev_sibling = prev,
            None => self.nodes[parent.index()].last_child = prev,
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        node.role = Role::Detached;
    }

    /// Nearest strict ancestor that is a type declaration
    pub fn enclosing_type(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if matches!(self.kind(node), NodeKind::TypeDeclaration(_)) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Pre-order listing of `root` and every node below it
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children: Vec<NodeId> = self.children(id).collect();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over the ordered children of one node
pub struct Children<'a> {
    arena: &'a AstArena,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.cursor?;
        self.cursor = self.arena.next_sibling(current);
        Some(current)
    }
}
