//! Postback command dispatch.
//!
//! One HTTP request maps to one dispatch call: parse the opaque command
//! token, resolve every referenced node and control, mutate, and return
//! the domain events the mutation raised. Resolution happens in full
//! before the first mutation, so a failed dispatch provably leaves every
//! tree unchanged.

mod command;
mod events;

pub use command::Command;
pub use events::Event;

use crate::control::Control;
use crate::error::DispatchError;
use crate::schema::ControlKind;

/// Page-level input validation, owned by the hosting page.
///
/// Dispatch consults the validator when the target node (or the control
/// default) requires it. A failed validation suppresses navigation; the
/// rest of the command still executes.
pub trait PageValidator {
    /// Returns `true` when the page's input is valid for the given
    /// validation group.
    fn validate(&mut self, group: Option<&str>) -> bool;
}

/// The validator used when the hosting page wires none up.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysValid;

impl PageValidator for AlwaysValid {
    fn validate(&mut self, _group: Option<&str>) -> bool {
        true
    }
}

/// Page-scoped control registry.
///
/// Controls are addressed by their page-unique id; MOVE resolves its
/// destination control here, which may be the dispatching control itself
/// or another instance of the same family.
#[derive(Debug, Default)]
pub struct Page {
    controls: Vec<Control>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a control. Ids must be page-unique.
    pub fn add(&mut self, control: Control) {
        debug_assert!(
            self.index_of(control.id()).is_none(),
            "duplicate control id {:?}",
            control.id()
        );
        self.controls.push(control);
    }

    pub fn control(&self, id: &str) -> Option<&Control> {
        self.index_of(id).map(|index| &self.controls[index])
    }

    pub fn control_mut(&mut self, id: &str) -> Option<&mut Control> {
        self.index_of(id).map(|index| &mut self.controls[index])
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|control| control.id() == id)
    }

    /// Parses and executes one postback command against the named control,
    /// without page validation.
    pub fn dispatch(&mut self, control_id: &str, raw: &str) -> Result<Vec<Event>, DispatchError> {
        self.dispatch_validated(control_id, raw, &mut AlwaysValid)
    }

    /// Parses and executes one postback command against the named control.
    pub fn dispatch_validated(
        &mut self,
        control_id: &str,
        raw: &str,
        validator: &mut dyn PageValidator,
    ) -> Result<Vec<Event>, DispatchError> {
        let command = Command::parse(raw)?;
        log::debug!("dispatching {command:?} on {control_id}");

        let source = self
            .index_of(control_id)
            .ok_or_else(|| DispatchError::ControlNotFound(control_id.to_string()))?;

        // TabStrip supports SELECT only.
        if self.controls[source].kind() != ControlKind::TreeView
            && !matches!(command, Command::Select { .. })
        {
            let name = raw.split(' ').next().unwrap_or("");
            return Err(DispatchError::UnknownCommand(name.to_string()));
        }

        match command {
            Command::Select { node } => self.do_select(source, &node, validator),
            Command::Move {
                node,
                dest_tree,
                dest_parent,
                index,
            } => self.do_move(source, &node, &dest_tree, &dest_parent, index),
            Command::Copy { dest, sources } => self.do_copy(source, &dest, &sources),
            Command::Label { node, text } => self.do_label(source, &node, text),
            Command::Check { node, checked } => self.do_check(source, &node, checked),
            Command::Expand { node } => self.do_expand(source, &node, true),
            Command::Collapse { node } => self.do_expand(source, &node, false),
        }
    }

    fn do_select(
        &mut self,
        source: usize,
        postback_id: &str,
        validator: &mut dyn PageValidator,
    ) -> Result<Vec<Event>, DispatchError> {
        let control = &mut self.controls[source];
        let node = control
            .find_by_postback_id(postback_id)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;

        let valid = !control.node_causes_validation(node)
            || validator.validate(control.node_validation_group(node).as_deref());

        control.select(node);
        control.apply_select_expand(node);

        let mut events = vec![Event::Selected {
            node: postback_id.to_string(),
        }];
        if valid {
            if let Some(url) = control.tree().get(node).and_then(|data| data.navigate_url()) {
                events.push(Event::Navigate {
                    node: postback_id.to_string(),
                    url: url.to_string(),
                });
            }
        } else {
            log::debug!("validation failed; navigation suppressed for {postback_id}");
        }
        Ok(events)
    }

    fn do_move(
        &mut self,
        source: usize,
        postback_id: &str,
        dest_tree: &str,
        dest_parent_id: &str,
        index: usize,
    ) -> Result<Vec<Event>, DispatchError> {
        let node = self.controls[source]
            .find_by_postback_id(postback_id)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;

        // Capture the old owner state before anything is detached.
        let old_tree = self.controls[source].id().to_string();
        let old_parent = {
            let tree = self.controls[source].tree();
            tree.parent(node)
                .and_then(|parent| tree.get(parent))
                .map(|data| data.postback_id().to_string())
        };
        let old_index = self.controls[source].tree().position(node).unwrap_or(0);

        let dest = self
            .index_of(dest_tree)
            .ok_or_else(|| DispatchError::ControlNotFound(dest_tree.to_string()))?;
        if self.controls[dest].kind() != self.controls[source].kind() {
            return Err(DispatchError::invalid_argument(
                "MOVE",
                "destTreeId",
                "destination is not a control of the same family",
            ));
        }
        let dest_parent = if dest_parent_id.is_empty() {
            None
        } else {
            Some(
                self.controls[dest]
                    .find_by_postback_id(dest_parent_id)
                    .ok_or_else(|| DispatchError::NodeNotFound(dest_parent_id.to_string()))?,
            )
        };

        if dest == source {
            let control = &mut self.controls[source];
            control.tree_mut().move_to(node, dest_parent, index)?;
        } else {
            // Two independent trees mutate within the same request. The
            // detached branch takes its postback ids with it.
            let control = &mut self.controls[source];
            if control
                .selection()
                .selected()
                .is_some_and(|selected| selected == node || control.tree().is_ancestor(node, selected))
            {
                control.clear_selection();
            }
            let branch = control
                .tree_mut()
                .remove_subtree(node)
                .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
            self.controls[dest].tree_mut().graft(dest_parent, index, branch);
        }

        if let Some(parent) = dest_parent {
            if let Some(data) = self.controls[dest].tree_mut().get_mut(parent) {
                data.expanded = true;
            }
        }

        Ok(vec![Event::Moved {
            node: postback_id.to_string(),
            old_tree,
            old_parent,
            old_index,
        }])
    }

    fn do_copy(
        &mut self,
        source: usize,
        dest_id: &str,
        sources: &[String],
    ) -> Result<Vec<Event>, DispatchError> {
        let control = &mut self.controls[source];
        let dest = control
            .find_by_postback_id(dest_id)
            .ok_or_else(|| DispatchError::NodeNotFound(dest_id.to_string()))?;

        let mut resolved = Vec::with_capacity(sources.len());
        for postback_id in sources {
            let node = control
                .find_by_postback_id(postback_id)
                .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
            resolved.push((postback_id, node));
        }

        let mut events = Vec::with_capacity(resolved.len());
        for (postback_id, node) in resolved {
            let copy = control
                .copy_node(node, dest)
                .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
            let copy_id = control
                .tree()
                .get(copy)
                .map(|data| data.postback_id().to_string())
                .unwrap_or_default();
            events.push(Event::Copied {
                source: postback_id.to_string(),
                copy: copy_id,
            });
        }

        if let Some(data) = control.tree_mut().get_mut(dest) {
            data.expanded = true;
        }
        Ok(events)
    }

    fn do_label(
        &mut self,
        source: usize,
        postback_id: &str,
        text: String,
    ) -> Result<Vec<Event>, DispatchError> {
        let control = &mut self.controls[source];
        let node = control
            .find_by_postback_id(postback_id)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;

        let data = control
            .tree_mut()
            .get_mut(node)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
        let old_text = data.text().to_string();
        data.set_text(text);

        Ok(vec![Event::Renamed {
            node: postback_id.to_string(),
            old_text,
        }])
    }

    fn do_check(
        &mut self,
        source: usize,
        postback_id: &str,
        checked: bool,
    ) -> Result<Vec<Event>, DispatchError> {
        let control = &mut self.controls[source];
        let node = control
            .find_by_postback_id(postback_id)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
        if let Some(data) = control.tree_mut().get_mut(node) {
            data.checked = checked;
        }
        Ok(vec![Event::CheckChanged {
            node: postback_id.to_string(),
            checked,
        }])
    }

    fn do_expand(
        &mut self,
        source: usize,
        postback_id: &str,
        expanded: bool,
    ) -> Result<Vec<Event>, DispatchError> {
        let control = &mut self.controls[source];
        let node = control
            .find_by_postback_id(postback_id)
            .ok_or_else(|| DispatchError::NodeNotFound(postback_id.to_string()))?;
        if let Some(data) = control.tree_mut().get_mut(node) {
            data.expanded = expanded;
        }
        Ok(vec![if expanded {
            Event::Expanded {
                node: postback_id.to_string(),
            }
        } else {
            Event::Collapsed {
                node: postback_id.to_string(),
            }
        }])
    }
}
