//! Tree flattening and reconstruction.

use treedom::{NodeId, Tree};

use super::{NodeRecord, PropEntry, TOP_LEVEL};
use crate::error::ValueError;
use crate::model::NodeData;
use crate::schema::{ControlKind, encode_value, parse_value};
use crate::select::recompute_child_selected;

/// Where flattening starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The control's whole root collection.
    Roots,
    /// The children of one node (a render-scoped subtree view).
    Children(NodeId),
}

/// Flattening options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageOptions {
    /// How many levels to flatten into the payload; 0 means unlimited.
    /// Nodes at the bound are recorded with empty child lists even when
    /// they have real children — "not yet expanded into the payload", not
    /// "leaf".
    pub drill_down_depth: usize,
    /// Emit custom attributes as `[name, value]` entries. When unset,
    /// custom attributes are dropped from the payload.
    pub output_custom_attributes: bool,
}

/// The flattened client state of one control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Storage {
    /// Pre-order node records.
    pub records: Vec<NodeRecord>,
    /// Postback ids of every strict ancestor of the selection, root first.
    pub child_selected: Vec<String>,
}

impl Storage {
    /// The node table as the literal JSON array the response embeds.
    pub fn records_json(&self) -> String {
        serde_json::to_string(&self.records).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rebuilds a tree from the records by the same single forward pass
    /// the client runtime performs: every `parent_index` refers to an
    /// already-materialized record, so one loop suffices.
    pub fn reconstruct(&self, kind: ControlKind) -> Result<Tree<NodeData>, ValueError> {
        let schema = kind.schema();
        let mut tree = Tree::new();
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.records.len());

        for record in &self.records {
            let mut data = NodeData::default();
            data.set_postback_id(&record.postback_id);
            for entry in &record.props {
                match entry {
                    PropEntry::Known { code, value } => {
                        let field = schema
                            .by_code(*code)
                            .ok_or_else(|| ValueError::new("property code", code.to_string()))?;
                        let parsed = parse_value(value, field.encoding)?;
                        data.props_mut().set_known(field.name, parsed);
                    }
                    PropEntry::Custom { name, value } => {
                        data.props_mut().set_custom(name, value);
                    }
                }
            }

            let id = if record.parent_index == TOP_LEVEL {
                tree.push_root(data)
            } else {
                let parent = usize::try_from(record.parent_index)
                    .ok()
                    .and_then(|index| ids.get(index).copied())
                    .ok_or_else(|| {
                        ValueError::new("parent index", record.parent_index.to_string())
                    })?;
                tree.append(parent, data)
            };
            ids.push(id);
        }

        Ok(tree)
    }
}

/// Flattens a tree into pre-order [`NodeRecord`]s.
///
/// A record is appended before its children are visited, so every child's
/// `parent_index` points strictly backwards. As a side effect the
/// child-selected ancestor chain is recomputed from scratch — the chain
/// returned inside [`Storage`] reflects the tree exactly as of this call.
pub fn build_storage(
    tree: &mut Tree<NodeData>,
    selected: Option<NodeId>,
    kind: ControlKind,
    scope: Scope,
    options: &StorageOptions,
) -> Storage {
    let child_selected = recompute_child_selected(tree, selected);

    let start: Vec<NodeId> = match scope {
        Scope::Roots => tree.roots().to_vec(),
        Scope::Children(id) => tree.children(id).to_vec(),
    };

    let mut records = Vec::new();
    for id in start {
        flatten(tree, kind, options, id, TOP_LEVEL, 1, &mut records);
    }
    log::trace!("flattened {} records for {:?}", records.len(), kind);

    Storage {
        records,
        child_selected,
    }
}

fn flatten(
    tree: &Tree<NodeData>,
    kind: ControlKind,
    options: &StorageOptions,
    id: NodeId,
    parent_index: i32,
    level: usize,
    out: &mut Vec<NodeRecord>,
) {
    let Some(data) = tree.get(id) else { return };
    let index = out.len();
    out.push(NodeRecord {
        postback_id: data.postback_id().to_string(),
        parent_index,
        child_indices: Vec::new(),
        props: property_diff(data, kind, options),
    });

    if options.drill_down_depth != 0 && level >= options.drill_down_depth {
        return;
    }
    for &child in tree.children(id) {
        let child_index = out.len();
        out[index].child_indices.push(child_index);
        flatten(tree, kind, options, child, index as i32, level + 1, out);
    }
}

/// The schema-coded diff of one node's explicitly-set properties. Unset
/// properties are omitted entirely; control-level defaults never appear
/// here.
fn property_diff(data: &NodeData, kind: ControlKind, options: &StorageOptions) -> Vec<PropEntry> {
    let schema = kind.schema();

    let mut known: Vec<(u16, String)> = data
        .props()
        .iter_known()
        .filter_map(|(name, value)| match schema.field(name) {
            Some(field) => Some((field.code, encode_value(value))),
            None => {
                log::debug!("property {name:?} is not in the {kind:?} table; skipped");
                None
            }
        })
        .collect();
    known.sort_by_key(|(code, _)| *code);

    let mut props: Vec<PropEntry> = known
        .into_iter()
        .map(|(code, value)| PropEntry::Known { code, value })
        .collect();

    if options.output_custom_attributes {
        props.extend(data.props().iter_custom().map(|(name, value)| {
            PropEntry::Custom {
                name: name.to_string(),
                value: value.to_string(),
            }
        }));
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(pb: &str, text: &str) -> NodeData {
        let mut data = NodeData::new(text);
        data.set_postback_id(pb);
        data
    }

    fn sample() -> Tree<NodeData> {
        // a (a1 (a1x), a2), b
        let mut tree = Tree::new();
        let a = tree.push_root(node("a", "A"));
        let a1 = tree.append(a, node("a1", "A1"));
        tree.append(a1, node("a1x", "A1X"));
        tree.append(a, node("a2", "A2"));
        tree.push_root(node("b", "B"));
        tree
    }

    #[test]
    fn test_preorder_parent_indices() {
        let mut tree = sample();
        let storage = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );

        let ids: Vec<&str> = storage
            .records
            .iter()
            .map(|r| r.postback_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "a1", "a1x", "a2", "b"]);

        for (index, record) in storage.records.iter().enumerate() {
            assert!(record.parent_index == TOP_LEVEL || (record.parent_index as usize) < index);
        }
        assert_eq!(storage.records[0].child_indices, vec![1, 3]);
        assert_eq!(storage.records[1].child_indices, vec![2]);
    }

    #[test]
    fn test_drill_down_truncates_child_lists() {
        let mut tree = sample();
        let storage = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions {
                drill_down_depth: 1,
                ..Default::default()
            },
        );

        // Only the two roots make it into the payload, with empty child
        // lists despite their real children.
        let ids: Vec<&str> = storage
            .records
            .iter()
            .map(|r| r.postback_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(storage.records.iter().all(|r| r.child_indices.is_empty()));
    }

    #[test]
    fn test_scope_children_flattens_a_subtree_view() {
        let mut tree = sample();
        let a = tree.roots()[0];
        let storage = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Children(a),
            &StorageOptions::default(),
        );
        let ids: Vec<&str> = storage
            .records
            .iter()
            .map(|r| r.postback_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1", "a1x", "a2"]);
        assert_eq!(storage.records[0].parent_index, TOP_LEVEL);
    }

    #[test]
    fn test_diff_minimality() {
        let mut tree = Tree::new();
        let mut bare = NodeData::default();
        bare.set_postback_id("bare");
        tree.push_root(bare);

        let storage = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );
        assert!(storage.records[0].props.is_empty());
    }

    #[test]
    fn test_custom_attributes_are_flag_gated() {
        let schema = ControlKind::TreeView.schema();
        let mut tree = Tree::new();
        let mut data = node("n", "N");
        data.props_mut().set(schema, "data-badge", "7").unwrap();
        tree.push_root(data);

        let without = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );
        // Text is a known property; the custom attribute is dropped.
        assert_eq!(without.records[0].props.len(), 1);

        let with = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions {
                output_custom_attributes: true,
                ..Default::default()
            },
        );
        assert!(with.records[0].props.contains(&PropEntry::Custom {
            name: "data-badge".to_string(),
            value: "7".to_string()
        }));
    }

    #[test]
    fn test_child_selected_chain_reflects_call_time_state() {
        let mut tree = sample();
        let a = tree.roots()[0];
        let a1 = tree.children(a)[0];
        let a1x = tree.children(a1)[0];

        let storage = build_storage(
            &mut tree,
            Some(a1x),
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );
        assert_eq!(storage.child_selected, vec!["a", "a1"]);
        assert!(tree.get(a).unwrap().child_selected);

        // Selection moved: the chain is rebuilt, not appended to.
        let storage = build_storage(
            &mut tree,
            Some(a1),
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );
        assert_eq!(storage.child_selected, vec!["a"]);
        assert!(!tree.get(a1).unwrap().child_selected);
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let mut tree = sample();
        let storage = build_storage(
            &mut tree,
            None,
            ControlKind::TreeView,
            Scope::Roots,
            &StorageOptions::default(),
        );

        let rebuilt = storage.reconstruct(ControlKind::TreeView).unwrap();
        assert_eq!(rebuilt.node_count(), tree.node_count());

        let originals: Vec<_> = tree.iter().collect();
        let copies: Vec<_> = rebuilt.iter().collect();
        for (&original, &copy) in originals.iter().zip(&copies) {
            let lhs = tree.get(original).unwrap();
            let rhs = rebuilt.get(copy).unwrap();
            assert_eq!(lhs.postback_id(), rhs.postback_id());
            assert_eq!(lhs.text(), rhs.text());
            // Sibling order and parentage survive: parents map to parents.
            let lhs_parent = tree.parent(original).map(|p| tree.get(p).unwrap().postback_id());
            let rhs_parent = rebuilt.parent(copy).map(|p| rebuilt.get(p).unwrap().postback_id());
            assert_eq!(lhs_parent, rhs_parent);
        }
    }
}
