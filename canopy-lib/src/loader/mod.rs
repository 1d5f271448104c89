//! On-demand subtree loading.
//!
//! A node whose `ChildrenSource` property is set is an *on-demand* node:
//! its children are absent until explicitly loaded from the external XML
//! source. Loading is fatal-on-failure — a missing file, network error or
//! parse error aborts the whole request; there is no retry and no partial
//! merge.
//!
//! Within one request the calling order is fixed: [`preload_all_paths`]
//! (so a selection persisted inside not-yet-loaded content can be
//! resolved), then selection resolution, then [`prune_non_current_paths`]
//! to return the tree to its minimal-payload state.

mod source;
mod xml;

pub use source::ContentSource;
pub use xml::parse_children;

use std::collections::HashSet;

use treedom::NodeId;

use crate::control::Control;
use crate::error::LoadError;

/// Fetches and merges the on-demand children of `node` from the source
/// its `ChildrenSource` property declares. Returns the number of nodes
/// merged.
pub fn load(control: &mut Control, node: NodeId) -> Result<usize, LoadError> {
    let Some(raw_source) = control
        .tree()
        .get(node)
        .and_then(|data| data.children_source().map(str::to_string))
    else {
        return Err(LoadError::MissingSource);
    };
    load_from(control, node, &raw_source)
}

/// Fetches and merges on-demand children from an explicit source,
/// replacing any children already present. Every loaded descendant is
/// assigned a fresh postback id prefixed with the owning node's id, so
/// subsequent postbacks can address it. Returns the number of nodes
/// merged.
pub fn load_from(control: &mut Control, node: NodeId, raw_source: &str) -> Result<usize, LoadError> {
    let owner_postback_id = control
        .tree()
        .get(node)
        .map(|data| data.postback_id().to_string())
        .unwrap_or_default();

    let source = ContentSource::classify(raw_source)?;
    let body = source.fetch()?;
    let branches = parse_children(&body, raw_source, control.kind().schema())?;

    let tree = control.tree_mut();
    tree.clear_children(node);

    let mut merged = 0;
    let mut positional = 0usize;
    for branch in branches {
        merged += branch.count();
        let top = tree.graft(Some(node), usize::MAX, branch);
        let loaded: Vec<NodeId> = tree.descendants(top).collect();
        for id in loaded {
            positional += 1;
            if let Some(data) = tree.get_mut(id) {
                let postback_id = match data.id() {
                    Some(author) => format!("{owner_postback_id}.{author}"),
                    None => format!("{owner_postback_id}.{positional}"),
                };
                data.set_postback_id(postback_id);
            }
        }
    }

    if let Some(data) = tree.get_mut(node) {
        data.loaded = true;
    }
    log::debug!("loaded {merged} nodes from {raw_source} under {owner_postback_id}");
    Ok(merged)
}

/// Loads every reachable on-demand node that has not been loaded yet,
/// expansion state notwithstanding — including nodes that only became
/// reachable through an earlier load in the same pass. Used when the
/// persisted selection must be located inside not-yet-loaded content.
pub fn preload_all_paths(control: &mut Control) -> Result<usize, LoadError> {
    let mut merged = 0;
    loop {
        let next = control.tree().iter().find(|&id| {
            control
                .tree()
                .get(id)
                .is_some_and(|data| data.children_source().is_some() && !data.loaded)
        });
        match next {
            Some(id) => merged += load(control, id)?,
            None => break,
        }
    }
    Ok(merged)
}

/// Discards the loaded children of every reachable on-demand node that is
/// not a strict ancestor of the current selection (all of them when there
/// is no selection), and marks those nodes as unloaded so the branch can
/// be fetched again later. Strict ancestors of the selection keep their
/// children.
pub fn prune_non_current_paths(control: &mut Control) {
    let keep: HashSet<NodeId> = match control.selection().selected() {
        Some(selected) => control.tree().ancestors(selected).collect(),
        None => HashSet::new(),
    };
    let on_demand: Vec<NodeId> = control
        .tree()
        .iter()
        .filter(|&id| {
            control
                .tree()
                .get(id)
                .is_some_and(|data| data.children_source().is_some())
        })
        .collect();

    for id in on_demand {
        if keep.contains(&id) {
            continue;
        }
        let tree = control.tree_mut();
        tree.clear_children(id);
        if let Some(data) = tree.get_mut(id) {
            data.loaded = false;
        }
    }
}
