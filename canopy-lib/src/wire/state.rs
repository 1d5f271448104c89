//! Persisted round-trip state.
//!
//! Three logical slots travel between requests: the selected node's
//! postback id, the in-session property overrides ("Properties"), and the
//! in-session node data overrides ("Data"). The strings are opaque to the
//! hosting page; it stores them verbatim and hands them back before the
//! next dispatch, where they are merged into the freshly built tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use treedom::Tree;

use crate::error::DispatchError;
use crate::model::NodeData;
use crate::schema::{ControlKind, encode_value};

/// The three opaque round-trip values of one control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Selected node's postback id.
    pub selected: Option<String>,
    /// Per-node explicitly-set property diffs, keyed by postback id.
    pub properties: String,
    /// Per-node checked/expanded overrides, keyed by postback id.
    pub data: String,
}

pub(crate) fn capture_properties(tree: &Tree<NodeData>) -> String {
    let mut all = Map::new();
    for id in tree.iter() {
        let Some(node) = tree.get(id) else { continue };
        if node.props().is_empty() || node.postback_id().is_empty() {
            continue;
        }
        let mut entry = Map::new();
        for (name, value) in node.props().iter_known() {
            entry.insert(name.to_string(), Value::String(encode_value(value)));
        }
        for (name, value) in node.props().iter_custom() {
            entry.insert(name.to_string(), Value::String(value.to_string()));
        }
        all.insert(node.postback_id().to_string(), Value::Object(entry));
    }
    Value::Object(all).to_string()
}

pub(crate) fn capture_data(tree: &Tree<NodeData>) -> String {
    let mut all = Map::new();
    for id in tree.iter() {
        let Some(node) = tree.get(id) else { continue };
        if node.postback_id().is_empty() || (!node.checked && !node.expanded) {
            continue;
        }
        let mut entry = Map::new();
        if node.checked {
            entry.insert("checked".to_string(), Value::Bool(true));
        }
        if node.expanded {
            entry.insert("expanded".to_string(), Value::Bool(true));
        }
        all.insert(node.postback_id().to_string(), Value::Object(entry));
    }
    Value::Object(all).to_string()
}

fn parse_slot(raw: &str) -> Result<Map<String, Value>, DispatchError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| DispatchError::State(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DispatchError::State(
            "expected an object keyed by postback id".to_string(),
        )),
    }
}

pub(crate) fn apply_properties(
    tree: &mut Tree<NodeData>,
    kind: ControlKind,
    raw: &str,
) -> Result<(), DispatchError> {
    if raw.is_empty() {
        return Ok(());
    }
    let schema = kind.schema();
    for (postback_id, entries) in parse_slot(raw)? {
        let Some(id) = tree.find(|data| data.postback_id() == postback_id) else {
            // The declarative tree may have changed shape since the slot
            // was captured; stale entries are skipped.
            log::debug!("persisted properties for unknown node {postback_id:?}; skipped");
            continue;
        };
        let Value::Object(entries) = entries else {
            return Err(DispatchError::State(format!(
                "properties of {postback_id:?} are not an object"
            )));
        };
        for (name, value) in entries {
            let Value::String(literal) = value else {
                return Err(DispatchError::State(format!(
                    "property {name:?} of {postback_id:?} is not a string"
                )));
            };
            if let Some(data) = tree.get_mut(id) {
                data.props_mut().set(schema, &name, &literal)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn apply_data(tree: &mut Tree<NodeData>, raw: &str) -> Result<(), DispatchError> {
    if raw.is_empty() {
        return Ok(());
    }
    for (postback_id, entry) in parse_slot(raw)? {
        let Some(id) = tree.find(|data| data.postback_id() == postback_id) else {
            log::debug!("persisted data for unknown node {postback_id:?}; skipped");
            continue;
        };
        let Value::Object(entry) = entry else {
            return Err(DispatchError::State(format!(
                "data of {postback_id:?} is not an object"
            )));
        };
        if let Some(data) = tree.get_mut(id) {
            if let Some(checked) = entry.get("checked").and_then(Value::as_bool) {
                data.checked = checked;
            }
            if let Some(expanded) = entry.get("expanded").and_then(Value::as_bool) {
                data.expanded = expanded;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(pb: &str, text: &str) -> NodeData {
        let mut data = NodeData::new(text);
        data.set_postback_id(pb);
        data
    }

    #[test]
    fn test_properties_slot_round_trips() {
        let mut tree = Tree::new();
        let mut data = node("n0", "Inbox");
        data.set_navigate_url("/inbox");
        tree.push_root(data);

        let slot = capture_properties(&tree);

        let mut fresh = Tree::new();
        fresh.push_root(node("n0", ""));
        apply_properties(&mut fresh, ControlKind::TreeView, &slot).unwrap();

        let restored = fresh.get(fresh.roots()[0]).unwrap();
        assert_eq!(restored.text(), "Inbox");
        assert_eq!(restored.navigate_url(), Some("/inbox"));
    }

    #[test]
    fn test_data_slot_restores_flags() {
        let mut tree = Tree::new();
        let mut data = node("n0", "a");
        data.checked = true;
        data.expanded = true;
        tree.push_root(data);
        tree.push_root(node("n1", "b"));

        let slot = capture_data(&tree);

        let mut fresh = Tree::new();
        fresh.push_root(node("n0", "a"));
        fresh.push_root(node("n1", "b"));
        apply_data(&mut fresh, &slot).unwrap();

        assert!(fresh.get(fresh.roots()[0]).unwrap().checked);
        assert!(fresh.get(fresh.roots()[0]).unwrap().expanded);
        assert!(!fresh.get(fresh.roots()[1]).unwrap().checked);
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        let mut fresh = Tree::new();
        fresh.push_root(node("n0", "a"));
        apply_data(&mut fresh, r#"{"gone":{"checked":true}}"#).unwrap();
        assert!(!fresh.get(fresh.roots()[0]).unwrap().checked);
    }

    #[test]
    fn test_malformed_slot_is_fatal() {
        let mut fresh = Tree::new();
        assert!(apply_data(&mut fresh, "not json").is_err());
        assert!(apply_properties(&mut fresh, ControlKind::TreeView, "[1,2]").is_err());
    }
}
