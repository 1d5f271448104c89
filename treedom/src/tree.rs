use crate::iter::{Ancestors, Preorder};

/// Handle to a node inside a [`Tree`].
///
/// Ids are stable for the lifetime of the tree: moving or detaching a node
/// never invalidates its id. An id taken from one tree must not be used
/// with another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rejected relocation attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cannot move a node into itself")]
    IntoSelf,
    #[error("cannot move a node into its own descendant")]
    IntoDescendant,
}

/// An owned subtree, detached from any arena.
///
/// Produced by [`Tree::remove_subtree`] and consumed by [`Tree::graft`];
/// the bridge for moving a subtree between two independent trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<T> {
    pub data: T,
    pub children: Vec<Branch<T>>,
}

impl<T> Branch<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(data: T, children: Vec<Branch<T>>) -> Self {
        Self { data, children }
    }

    /// Total number of nodes in the branch, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Branch::count).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    data: Option<T>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Ordered tree arena.
///
/// The tree owns a list of top-level roots; every node owns the ordered
/// list of its children. Sibling order is insertion order and is
/// significant. All traversal is pre-order.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
    roots: Vec<NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn alloc(&mut self, data: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.slots.len());
        self.slots.push(Slot {
            data: Some(data),
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Returns `true` if `id` names a live node of this tree (reachable or
    /// detached, but not extracted).
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.data.is_some())
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Appends a new top-level root.
    pub fn push_root(&mut self, data: T) -> NodeId {
        let id = self.alloc(data, None);
        self.roots.push(id);
        id
    }

    /// Inserts a new top-level root at `index`, clamped to the root count.
    pub fn insert_root(&mut self, index: usize, data: T) -> NodeId {
        let id = self.alloc(data, None);
        let at = index.min(self.roots.len());
        self.roots.insert(at, id);
        id
    }

    /// Appends a new child under `parent`.
    pub fn append(&mut self, parent: NodeId, data: T) -> NodeId {
        debug_assert!(self.contains(parent), "append under extracted node");
        let id = self.alloc(data, Some(parent));
        self.slots[parent.index()].children.push(id);
        id
    }

    /// Inserts a new child under `parent` at `index`, clamped to the child
    /// count.
    pub fn insert(&mut self, parent: NodeId, index: usize, data: T) -> NodeId {
        debug_assert!(self.contains(parent), "insert under extracted node");
        let id = self.alloc(data, Some(parent));
        let children = &mut self.slots[parent.index()].children;
        let at = index.min(children.len());
        children.insert(at, id);
        id
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index()).and_then(|slot| slot.data.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.data.as_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.index()).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.index())
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Index of `id` within its sibling list (the root list for top-level
    /// nodes). `None` for detached nodes.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        match self.parent(id) {
            Some(parent) => self.children(parent).iter().position(|&c| c == id),
            None => self.roots.iter().position(|&c| c == id),
        }
    }

    /// Number of strict ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors::new(self, self.parent(id))
    }

    /// `id` and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Preorder<'_, T> {
        Preorder::new(self, vec![id])
    }

    /// Every reachable node in pre-order, roots first in order.
    pub fn iter(&self) -> Preorder<'_, T> {
        let mut stack: Vec<NodeId> = self.roots.clone();
        stack.reverse();
        Preorder::from_stack(self, stack)
    }

    /// Pre-order depth-first search over reachable nodes.
    pub fn find<P>(&self, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .find(|&id| self.get(id).is_some_and(|data| predicate(data)))
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Number of reachable nodes.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Detaches `id` from its owning collection. The subtree below it
    /// travels with it and simply stops being reachable; identity is
    /// preserved and the node can be re-attached with [`Tree::move_to`].
    pub fn detach(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        match self.slots[id.index()].parent.take() {
            Some(parent) => {
                self.slots[parent.index()].children.retain(|&c| c != id);
            }
            None => {
                self.roots.retain(|&c| c != id);
            }
        }
        log::trace!("detached node {:?}", id);
    }

    fn attach_at(&mut self, id: NodeId, new_parent: Option<NodeId>, index: usize) {
        match new_parent {
            Some(parent) => {
                let children = &mut self.slots[parent.index()].children;
                let at = index.min(children.len());
                children.insert(at, id);
            }
            None => {
                let at = index.min(self.roots.len());
                self.roots.insert(at, id);
            }
        }
        self.slots[id.index()].parent = new_parent;
    }

    /// Relocates `id` under `new_parent` (`None` for the root list) at
    /// `index`, clamped to the destination length after detachment. Both
    /// link directions are updated before returning; there is no
    /// observable intermediate state.
    ///
    /// Moving a node into itself or into its own descendant is rejected
    /// and leaves the tree unchanged.
    pub fn move_to(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
        index: usize,
    ) -> Result<(), MoveError> {
        if !self.contains(id) {
            return Ok(());
        }
        if let Some(parent) = new_parent {
            if parent == id {
                return Err(MoveError::IntoSelf);
            }
            if self.is_ancestor(id, parent) {
                return Err(MoveError::IntoDescendant);
            }
        }
        self.detach(id);
        self.attach_at(id, new_parent, index);
        log::debug!("moved node {:?} under {:?} at {}", id, new_parent, index);
        Ok(())
    }

    /// Discards the children of `id`: every child subtree is detached and
    /// becomes unreachable. The node itself stays in place.
    pub fn clear_children(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        let children = std::mem::take(&mut self.slots[id.index()].children);
        for child in children {
            self.slots[child.index()].parent = None;
        }
    }

    /// Detaches `id` and extracts its whole subtree into an owned
    /// [`Branch`], vacating the arena slots. The branch can be grafted
    /// into any tree, including a different one.
    pub fn remove_subtree(&mut self, id: NodeId) -> Option<Branch<T>> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id);
        self.take_branch(id)
    }

    fn take_branch(&mut self, id: NodeId) -> Option<Branch<T>> {
        let slot = self.slots.get_mut(id.index())?;
        let data = slot.data.take()?;
        let child_ids = std::mem::take(&mut slot.children);
        let children = child_ids
            .into_iter()
            .filter_map(|child| self.take_branch(child))
            .collect();
        Some(Branch { data, children })
    }

    /// Inserts `branch` under `parent` (`None` for the root list) at
    /// `index`, clamped. Returns the id of the branch's top node.
    pub fn graft(&mut self, parent: Option<NodeId>, index: usize, branch: Branch<T>) -> NodeId {
        let id = match parent {
            Some(parent) => self.insert(parent, index, branch.data),
            None => self.insert_root(index, branch.data),
        };
        for child in branch.children {
            self.graft_under(id, child);
        }
        id
    }

    fn graft_under(&mut self, parent: NodeId, branch: Branch<T>) -> NodeId {
        let id = self.append(parent, branch.data);
        for child in branch.children {
            self.graft_under(id, child);
        }
        id
    }
}
