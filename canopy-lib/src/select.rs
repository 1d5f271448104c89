//! Selection, check, and expansion state over a node tree.

use treedom::{NodeId, Tree};

use crate::model::NodeData;

/// Tracks the single selection of one control.
///
/// The selection survives requests as a persisted postback id; each
/// request re-resolves it against the freshly built tree. Multi-selection
/// and the checked set are membership flags on the nodes themselves, with
/// helpers below to query and bulk-edit them.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: Option<NodeId>,
    persisted: Option<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected node, if resolved this request.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The postback id the selection is persisted under.
    pub fn persisted_postback_id(&self) -> Option<&str> {
        self.persisted.as_deref()
    }

    /// Seeds the persisted id before [`SelectionTracker::resolve`] runs.
    pub fn set_persisted(&mut self, postback_id: Option<String>) {
        self.persisted = postback_id;
        self.selected = None;
    }

    /// Re-resolves the persisted postback id against a freshly built tree.
    /// A stale id clears the selection; that is not an error.
    pub fn resolve(&mut self, tree: &mut Tree<NodeData>) {
        let found = self
            .persisted
            .as_deref()
            .and_then(|persisted| tree.find(|data| data.postback_id() == persisted));
        match found {
            Some(id) => self.apply(tree, id),
            None => {
                log::debug!("persisted selection {:?} not found; cleared", self.persisted);
                self.clear(tree);
            }
        }
    }

    /// Makes `id` the selection and recomputes the derived ancestor state.
    pub fn select(&mut self, tree: &mut Tree<NodeData>, id: NodeId) {
        self.apply(tree, id);
    }

    fn apply(&mut self, tree: &mut Tree<NodeData>, id: NodeId) {
        if let Some(old) = self.selected.take() {
            if let Some(data) = tree.get_mut(old) {
                data.selected = false;
            }
        }
        if let Some(data) = tree.get_mut(id) {
            data.selected = true;
            self.persisted = Some(data.postback_id().to_string());
            self.selected = Some(id);
        }
        recompute_child_selected(tree, self.selected);
    }

    /// Drops the selection, persisted id included.
    pub fn clear(&mut self, tree: &mut Tree<NodeData>) {
        if let Some(old) = self.selected.take() {
            if let Some(data) = tree.get_mut(old) {
                data.selected = false;
            }
        }
        self.persisted = None;
        recompute_child_selected(tree, None);
    }
}

/// Clears `child_selected` on every reachable node, then sets it on each
/// strict ancestor of `selected`. Returns the ancestor chain of postback
/// ids in root-first order. Rebuilt from scratch on every call — there is
/// no cached chain to invalidate.
pub fn recompute_child_selected(
    tree: &mut Tree<NodeData>,
    selected: Option<NodeId>,
) -> Vec<String> {
    let reachable: Vec<NodeId> = tree.iter().collect();
    for id in reachable {
        if let Some(data) = tree.get_mut(id) {
            data.child_selected = false;
        }
    }

    let mut chain = Vec::new();
    if let Some(selected) = selected {
        let mut ancestors: Vec<NodeId> = tree.ancestors(selected).collect();
        ancestors.reverse();
        for id in ancestors {
            if let Some(data) = tree.get_mut(id) {
                data.child_selected = true;
                chain.push(data.postback_id().to_string());
            }
        }
    }
    chain
}

// =============================================================================
// Membership flags
// =============================================================================

pub fn set_checked(tree: &mut Tree<NodeData>, id: NodeId, checked: bool) {
    if let Some(data) = tree.get_mut(id) {
        data.checked = checked;
    }
}

pub fn checked_nodes(tree: &Tree<NodeData>) -> Vec<NodeId> {
    tree.iter()
        .filter(|&id| tree.get(id).is_some_and(|data| data.checked))
        .collect()
}

pub fn set_multi_selected(tree: &mut Tree<NodeData>, id: NodeId, selected: bool) {
    if let Some(data) = tree.get_mut(id) {
        data.multiple_selected = selected;
    }
}

pub fn multi_selected_nodes(tree: &Tree<NodeData>) -> Vec<NodeId> {
    tree.iter()
        .filter(|&id| tree.get(id).is_some_and(|data| data.multiple_selected))
        .collect()
}

// =============================================================================
// Bulk subtree operations (idempotent)
// =============================================================================

fn for_each_in_scope<F>(tree: &mut Tree<NodeData>, within: Option<NodeId>, mut apply: F)
where
    F: FnMut(&mut NodeData),
{
    let targets: Vec<NodeId> = match within {
        Some(top) => tree.descendants(top).collect(),
        None => tree.iter().collect(),
    };
    for id in targets {
        if let Some(data) = tree.get_mut(id) {
            apply(data);
        }
    }
}

/// Checks every node of the subtree (the whole tree for `None`).
pub fn check_all(tree: &mut Tree<NodeData>, within: Option<NodeId>) {
    for_each_in_scope(tree, within, |data| data.checked = true);
}

pub fn uncheck_all(tree: &mut Tree<NodeData>, within: Option<NodeId>) {
    for_each_in_scope(tree, within, |data| data.checked = false);
}

pub fn expand_all(tree: &mut Tree<NodeData>, within: Option<NodeId>) {
    for_each_in_scope(tree, within, |data| data.expanded = true);
}

pub fn collapse_all(tree: &mut Tree<NodeData>, within: Option<NodeId>) {
    for_each_in_scope(tree, within, |data| data.expanded = false);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Tree<NodeData>, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let mut a = NodeData::new("a");
        a.set_postback_id("a");
        let root = tree.push_root(a);
        let mut b = NodeData::new("b");
        b.set_postback_id("b");
        let mid = tree.append(root, b);
        let mut c = NodeData::new("c");
        c.set_postback_id("c");
        let leaf = tree.append(mid, c);
        (tree, root, mid, leaf)
    }

    #[test]
    fn test_select_marks_ancestor_chain() {
        let (mut tree, root, mid, leaf) = tree();
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut tree, leaf);

        assert!(tree.get(leaf).unwrap().selected);
        assert!(tree.get(mid).unwrap().child_selected);
        assert!(tree.get(root).unwrap().child_selected);
        assert!(!tree.get(leaf).unwrap().child_selected);
        assert_eq!(tracker.persisted_postback_id(), Some("c"));
    }

    #[test]
    fn test_reselect_clears_old_chain() {
        let (mut tree, root, mid, leaf) = tree();
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut tree, leaf);
        tracker.select(&mut tree, root);

        assert!(!tree.get(leaf).unwrap().selected);
        assert!(tree.get(root).unwrap().selected);
        assert!(!tree.get(mid).unwrap().child_selected);
        assert!(!tree.get(root).unwrap().child_selected);
    }

    #[test]
    fn test_resolve_with_stale_id_clears_selection() {
        let (mut tree, _, _, _) = tree();
        let mut tracker = SelectionTracker::new();
        tracker.set_persisted(Some("missing".to_string()));
        tracker.resolve(&mut tree);
        assert_eq!(tracker.selected(), None);
        assert_eq!(tracker.persisted_postback_id(), None);
    }

    #[test]
    fn test_bulk_ops_are_idempotent_and_scoped() {
        let (mut tree, root, mid, leaf) = tree();
        check_all(&mut tree, Some(mid));
        check_all(&mut tree, Some(mid));

        assert!(!tree.get(root).unwrap().checked);
        assert!(tree.get(mid).unwrap().checked);
        assert!(tree.get(leaf).unwrap().checked);
        assert_eq!(checked_nodes(&tree), vec![mid, leaf]);

        uncheck_all(&mut tree, None);
        assert!(checked_nodes(&tree).is_empty());
    }
}
