//! Control instances.

use treedom::{MoveError, NodeId, Tree};

use crate::error::DispatchError;
use crate::model::{NodeData, PropertyBag};
use crate::schema::{ControlKind, PropValue, names};
use crate::select::SelectionTracker;
use crate::wire::{
    self, Look, LookTables, PersistedState, Scope, Storage, StorageOptions, build_storage,
};

/// How SELECT affects the selected node's expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectExpandMode {
    /// Selection leaves expansion alone.
    #[default]
    None,
    /// Selecting a node expands it.
    Expand,
    /// Selecting a node toggles it.
    Toggle,
}

/// One server-side control instance — a TreeView or a TabStrip.
///
/// The control exclusively owns its node tree for the duration of a
/// request. It assigns wire identity at attach time: a node with an
/// author id keeps it as its postback id; anonymous nodes draw from a
/// per-control counter, so identical declarative reconstruction replays
/// produce identical ids across requests.
///
/// # Example
///
/// ```
/// use canopy_lib::{Control, NodeData};
///
/// let mut control = Control::tree_view("menu");
/// let reports = control.add_root(NodeData::with_id("reports", "Reports"));
/// control.add_child(reports, NodeData::new("Quarterly"));
///
/// assert_eq!(control.find_by_postback_id("reports"), Some(reports));
/// let storage = control.client_storage(0);
/// assert_eq!(storage.records.len(), 2);
/// ```
#[derive(Debug)]
pub struct Control {
    id: String,
    kind: ControlKind,
    tree: Tree<NodeData>,
    selection: SelectionTracker,
    defaults: PropertyBag,
    looks: Vec<Look>,
    output_custom_attributes: bool,
    select_expand: SelectExpandMode,
    causes_validation: bool,
    validation_group: Option<String>,
    next_auto_id: u64,
}

impl Control {
    pub fn new(id: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            kind,
            tree: Tree::new(),
            selection: SelectionTracker::new(),
            defaults: PropertyBag::new(),
            looks: Vec::new(),
            output_custom_attributes: false,
            select_expand: SelectExpandMode::None,
            causes_validation: false,
            validation_group: None,
            next_auto_id: 0,
        }
    }

    pub fn tree_view(id: impl Into<String>) -> Self {
        Self::new(id, ControlKind::TreeView)
    }

    pub fn tab_strip(id: impl Into<String>) -> Self {
        Self::new(id, ControlKind::TabStrip)
    }

    // =========================================================================
    // Accessors & configuration
    // =========================================================================

    /// The page-scoped unique id of this control.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn tree(&self) -> &Tree<NodeData> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree<NodeData> {
        &mut self.tree
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Control-level default property values, consulted when a node has
    /// not explicitly set a property.
    pub fn defaults(&self) -> &PropertyBag {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut PropertyBag {
        &mut self.defaults
    }

    pub fn looks(&self) -> &[Look] {
        &self.looks
    }

    pub fn add_look(&mut self, look: Look) {
        self.looks.push(look);
    }

    pub fn output_custom_attributes(&self) -> bool {
        self.output_custom_attributes
    }

    /// Emit custom attributes into the client payload. Off by default:
    /// unknown property names are dropped from the wire unless this is
    /// set.
    pub fn set_output_custom_attributes(&mut self, output: bool) {
        self.output_custom_attributes = output;
    }

    pub fn set_select_expand(&mut self, mode: SelectExpandMode) {
        self.select_expand = mode;
    }

    /// Control-wide default for nodes without a `CausesValidation`
    /// property of their own.
    pub fn set_causes_validation(&mut self, causes: bool) {
        self.causes_validation = causes;
    }

    pub fn set_validation_group(&mut self, group: impl Into<String>) {
        self.validation_group = Some(group.into());
    }

    // =========================================================================
    // Node lifecycle
    // =========================================================================

    fn assign_postback_id(&mut self, id: NodeId) {
        if let Some(data) = self.tree.get_mut(id) {
            if !data.postback_id().is_empty() {
                return;
            }
            let postback_id = match data.id() {
                Some(author) => author.to_string(),
                None => {
                    let counter = self.next_auto_id;
                    self.next_auto_id += 1;
                    format!("n{counter}")
                }
            };
            data.set_postback_id(postback_id);
        }
    }

    /// Appends a top-level node and assigns its wire identity.
    pub fn add_root(&mut self, data: NodeData) -> NodeId {
        let id = self.tree.push_root(data);
        self.assign_postback_id(id);
        id
    }

    pub fn insert_root(&mut self, index: usize, data: NodeData) -> NodeId {
        let id = self.tree.insert_root(index, data);
        self.assign_postback_id(id);
        id
    }

    /// Appends a child node and assigns its wire identity.
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.tree.append(parent, data);
        self.assign_postback_id(id);
        id
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, data: NodeData) -> NodeId {
        let id = self.tree.insert(parent, index, data);
        self.assign_postback_id(id);
        id
    }

    /// Detaches a node; its subtree travels with it and becomes
    /// unreachable. Clears the selection first when it points into the
    /// removed branch.
    pub fn remove_node(&mut self, id: NodeId) {
        if self
            .selection
            .selected()
            .is_some_and(|selected| selected == id || self.tree.is_ancestor(id, selected))
        {
            self.clear_selection();
        }
        self.tree.detach(id);
    }

    /// Relocates a node within this control's tree.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
        index: usize,
    ) -> Result<(), MoveError> {
        self.tree.move_to(id, new_parent, index)
    }

    /// Shallow-copies `source` and appends the copy under `dest`. The copy
    /// gets the source's property bag, an `_copy`-suffixed author id when
    /// one exists, and a fresh wire identity. Children are not copied.
    pub fn copy_node(&mut self, source: NodeId, dest: NodeId) -> Option<NodeId> {
        let data = self.tree.get(source)?.copy_of();
        let id = self.tree.append(dest, data);
        self.assign_postback_id(id);
        Some(id)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Pre-order depth-first search by author-assigned id.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find(|data| data.id() == Some(id))
    }

    /// Pre-order depth-first search by wire identity.
    pub fn find_by_postback_id(&self, postback_id: &str) -> Option<NodeId> {
        self.tree.find(|data| data.postback_id() == postback_id)
    }

    /// Effective property lookup: the node's own bag first, then the
    /// control-level defaults. `None` means unset on both levels.
    pub fn effective_prop(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        self.tree
            .get(id)
            .and_then(|data| data.props().get(name))
            .or_else(|| self.defaults.get(name))
    }

    pub(crate) fn node_causes_validation(&self, id: NodeId) -> bool {
        match self.effective_prop(id, names::CAUSES_VALIDATION) {
            Some(PropValue::Bool(flag)) => *flag,
            _ => self.causes_validation,
        }
    }

    pub(crate) fn node_validation_group(&self, id: NodeId) -> Option<String> {
        match self.effective_prop(id, names::VALIDATION_GROUP) {
            Some(PropValue::Text(group)) => Some(group.clone()),
            _ => self.validation_group.clone(),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select(&mut self, id: NodeId) {
        let Self {
            tree, selection, ..
        } = self;
        selection.select(tree, id);
    }

    pub fn clear_selection(&mut self) {
        let Self {
            tree, selection, ..
        } = self;
        selection.clear(tree);
    }

    /// Re-resolves the persisted selection against the current tree.
    pub fn resolve_selection(&mut self) {
        let Self {
            tree, selection, ..
        } = self;
        selection.resolve(tree);
    }

    pub(crate) fn apply_select_expand(&mut self, id: NodeId) {
        let mode = self.select_expand;
        if let Some(data) = self.tree.get_mut(id) {
            match mode {
                SelectExpandMode::None => {}
                SelectExpandMode::Expand => data.expanded = true,
                SelectExpandMode::Toggle => data.expanded = !data.expanded,
            }
        }
    }

    // =========================================================================
    // Client payload
    // =========================================================================

    /// Flattens the whole tree into the client payload, honoring the
    /// control's custom-attribute flag. `drill_down_depth` of 0 means
    /// unlimited.
    pub fn client_storage(&mut self, drill_down_depth: usize) -> Storage {
        let options = StorageOptions {
            drill_down_depth,
            output_custom_attributes: self.output_custom_attributes,
        };
        let kind = self.kind;
        let Self {
            tree, selection, ..
        } = self;
        build_storage(tree, selection.selected(), kind, Scope::Roots, &options)
    }

    /// Flattens one node's children (a render-scoped subtree view). The
    /// root of the view must exist; a dangling id is a fatal error.
    pub fn client_storage_under(
        &mut self,
        root: NodeId,
        drill_down_depth: usize,
    ) -> Result<Storage, DispatchError> {
        if self.tree.get(root).is_none() {
            return Err(DispatchError::NodeNotFound(format!("{root:?}")));
        }
        let options = StorageOptions {
            drill_down_depth,
            output_custom_attributes: self.output_custom_attributes,
        };
        let kind = self.kind;
        let Self {
            tree, selection, ..
        } = self;
        Ok(build_storage(
            tree,
            selection.selected(),
            kind,
            Scope::Children(root),
            &options,
        ))
    }

    /// The parallel look tables a TabStrip emits next to its node table.
    pub fn client_tables(&self) -> LookTables {
        LookTables::new(&self.looks)
    }

    // =========================================================================
    // Round-trip state
    // =========================================================================

    /// Captures the three persisted slots after dispatch.
    pub fn save_state(&self) -> PersistedState {
        PersistedState {
            selected: self
                .selection
                .persisted_postback_id()
                .map(str::to_string),
            properties: wire::capture_properties(&self.tree),
            data: wire::capture_data(&self.tree),
        }
    }

    /// Merges persisted slots into the freshly built tree, then resolves
    /// the selection. Call after declarative construction and before
    /// dispatch.
    pub fn restore_state(&mut self, state: &PersistedState) -> Result<(), DispatchError> {
        wire::apply_properties(&mut self.tree, self.kind, &state.properties)?;
        wire::apply_data(&mut self.tree, &state.data)?;
        let Self {
            tree, selection, ..
        } = self;
        selection.set_persisted(state.selected.clone());
        selection.resolve(tree);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_id_becomes_postback_id() {
        let mut control = Control::tree_view("tv");
        let a = control.add_root(NodeData::with_id("reports", "Reports"));
        assert_eq!(control.tree().get(a).unwrap().postback_id(), "reports");
        assert_eq!(control.find_by_postback_id("reports"), Some(a));
        assert_eq!(control.find_by_id("reports"), Some(a));
    }

    #[test]
    fn test_anonymous_ids_are_replay_stable() {
        let build = || {
            let mut control = Control::tree_view("tv");
            let root = control.add_root(NodeData::new("a"));
            control.add_child(root, NodeData::new("b"));
            control.add_child(root, NodeData::new("c"));
            control
        };
        let first = build();
        let second = build();
        let ids = |control: &Control| -> Vec<String> {
            control
                .tree()
                .iter()
                .map(|id| control.tree().get(id).unwrap().postback_id().to_string())
                .collect()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_copy_node_gets_fresh_identity() {
        let mut control = Control::tree_view("tv");
        let root = control.add_root(NodeData::with_id("x", "Source"));
        let dest = control.add_root(NodeData::new("Dest"));
        control.add_child(root, NodeData::new("child"));

        let copy = control.copy_node(root, dest).unwrap();
        let data = control.tree().get(copy).unwrap();
        assert_eq!(data.id(), Some("x_copy"));
        assert_eq!(data.postback_id(), "x_copy");
        // Shallow: the source's children stay behind.
        assert!(control.tree().children(copy).is_empty());
    }

    #[test]
    fn test_effective_prop_falls_back_to_defaults() {
        let mut control = Control::tree_view("tv");
        let schema = control.kind().schema();
        control.defaults_mut().set(schema, "ShowLines", "1").unwrap();
        let a = control.add_root(NodeData::new("a"));

        assert_eq!(
            control.effective_prop(a, "ShowLines"),
            Some(&PropValue::Bool(true))
        );
        control
            .tree_mut()
            .get_mut(a)
            .unwrap()
            .props_mut()
            .set(schema, "ShowLines", "0")
            .unwrap();
        assert_eq!(
            control.effective_prop(a, "ShowLines"),
            Some(&PropValue::Bool(false))
        );
        assert_eq!(control.effective_prop(a, "ShowPlus"), None);
    }

    #[test]
    fn test_save_and_restore_state() {
        let mut control = Control::tree_view("tv");
        let root = control.add_root(NodeData::with_id("a", "A"));
        let child = control.add_child(root, NodeData::with_id("b", "B"));
        control.tree_mut().get_mut(child).unwrap().checked = true;
        control.tree_mut().get_mut(root).unwrap().expanded = true;
        control.select(child);

        let state = control.save_state();

        // Next request: the tree is rebuilt declaratively, then merged.
        let mut fresh = Control::tree_view("tv");
        let root = fresh.add_root(NodeData::with_id("a", "A"));
        let child = fresh.add_child(root, NodeData::with_id("b", "B"));
        fresh.restore_state(&state).unwrap();

        assert!(fresh.tree().get(child).unwrap().checked);
        assert!(fresh.tree().get(root).unwrap().expanded);
        assert_eq!(fresh.selection().selected(), Some(child));
        assert!(fresh.tree().get(root).unwrap().child_selected);
    }
}
