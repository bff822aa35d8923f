use std::ops::{Index, IndexMut};

use crate::syntax::SyntaxKind;

// Pooled tree storage: one vector of nodes linked by index using a
// first-child/next-sibling layout. Freed indices are recycled.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
    alive: Vec<bool>,
    free: Vec<NodeId>,
    pub head: Option<NodeId>,
}

/// Stable handle of a node in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A place holding a link: the tree root, a node's child head, or a node's
/// next-sibling link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Root,
    Child(NodeId),
    Next(NodeId),
}

#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: SyntaxKind,
    pub text: String,
    pub line: u32,
    pub child: Option<NodeId>, // head of the nested sequence (groups only)
    pub next: Option<NodeId>,
}

impl AstNode {
    pub fn new(kind: SyntaxKind, line: u32) -> Self {
        Self {
            kind,
            text: String::new(),
            line,
            child: None,
            next: None,
        }
    }
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh node, reusing a returned slot when one is available.
    pub fn take(&mut self, kind: SyntaxKind, line: u32) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = AstNode::new(kind, line);
            self.alive[id.index()] = true;
            return id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode::new(kind, line));
        self.alive.push(true);
        id
    }

    /// Like [`Ast::take`] with the node text filled in.
    pub fn take_text(&mut self, kind: SyntaxKind, line: u32, text: &str) -> NodeId {
        let id = self.take(kind, line);
        self.nodes[id.index()].text.push_str(text);
        id
    }

    /// Return a node to the pool. Its links are cleared; anything it linked to
    /// must already be owned elsewhere or freed separately.
    pub fn give(&mut self, id: NodeId) {
        debug_assert!(self.alive[id.index()], "node {:?} returned twice", id);
        let node = &mut self.nodes[id.index()];
        node.text = String::new();
        node.child = None;
        node.next = None;
        self.alive[id.index()] = false;
        self.free.push(id);
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: SyntaxKind) {
        self.nodes[id.index()].kind = kind;
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.index()].text = text.into();
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].text
    }

    pub fn line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].line
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }

    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].child
    }

    pub fn get(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root => self.head,
            Slot::Child(id) => self.child(id),
            Slot::Next(id) => self.next(id),
        }
    }

    pub fn set(&mut self, slot: Slot, value: Option<NodeId>) {
        match slot {
            Slot::Root => self.head = value,
            Slot::Child(id) => self.nodes[id.index()].child = value,
            Slot::Next(id) => self.nodes[id.index()].next = value,
        }
    }

    /// Insert a new node right after `prev` in its sequence.
    pub fn insert_after(&mut self, prev: NodeId, kind: SyntaxKind) -> NodeId {
        let line = self.line(prev);
        let id = self.take(kind, line);
        self.nodes[id.index()].next = self.next(prev);
        self.nodes[prev.index()].next = Some(id);
        id
    }

    /// Insert a new node at the head of `parent`'s child sequence.
    pub fn insert_first_child(&mut self, parent: NodeId, kind: SyntaxKind) -> NodeId {
        debug_assert!(self.kind(parent).is_group());
        let line = self.line(parent);
        let id = self.take(kind, line);
        self.nodes[id.index()].next = self.child(parent);
        self.nodes[parent.index()].child = Some(id);
        id
    }

    /// Iterate a sequence starting at `start`.
    pub fn siblings(&self, start: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            ast: self,
            current: start,
        }
    }

    pub fn children(&self, parent: NodeId) -> Siblings<'_> {
        self.siblings(self.child(parent))
    }

    /// Number of nodes currently handed out by the pool.
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    /// Number of nodes reachable from the root.
    pub fn reachable_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.head.into_iter().collect();
        while let Some(id) = stack.pop() {
            count += 1;
            let node = &self.nodes[id.index()];
            stack.extend(node.next);
            stack.extend(node.child);
        }
        count
    }

    /// Return every node reachable from the root to the pool.
    pub fn clear(&mut self) {
        let mut stack: Vec<NodeId> = self.head.take().into_iter().collect();
        while let Some(id) = stack.pop() {
            stack.extend(self.next(id));
            stack.extend(self.child(id));
            self.give(id);
        }
    }
}

impl Index<NodeId> for Ast {
    type Output = AstNode;

    fn index(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for Ast {
    fn index_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }
}

pub struct Siblings<'a> {
    ast: &'a Ast,
    current: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.ast.next(id);
        Some(id)
    }
}
