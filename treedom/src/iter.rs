use crate::tree::{NodeId, Tree};

/// Pre-order traversal over node ids.
#[derive(Debug)]
pub struct Preorder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, start: Vec<NodeId>) -> Self {
        let mut stack = start;
        stack.reverse();
        Self { tree, stack }
    }

    pub(crate) fn from_stack(tree: &'a Tree<T>, stack: Vec<NodeId>) -> Self {
        Self { tree, stack }
    }
}

impl<T> Iterator for Preorder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.iter().rev().copied());
        Some(id)
    }
}

/// Walks the parent chain, nearest ancestor first.
#[derive(Debug)]
pub struct Ancestors<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<'a, T> Ancestors<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, next: Option<NodeId>) -> Self {
        Self { tree, next }
    }
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}
