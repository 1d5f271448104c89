//! Node payload

use super::PropertyBag;
use crate::schema::{PropValue, names};

/// Payload of one item in a control's hierarchy — a tree node or a tab.
///
/// Identity is two-layered: `id` is the optional author-assigned name,
/// stable across requests; `postback_id` is the wire identity every
/// protocol message addresses the node by. The control assigns the
/// postback id when the node is attached (derived from `id` when present,
/// counter-generated otherwise), so it is empty on a freshly built value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    id: Option<String>,
    postback_id: String,

    /// Children are rendered.
    pub expanded: bool,
    /// Check mark, independent of selection.
    pub checked: bool,
    /// This node is the single selection.
    pub selected: bool,
    /// Member of the multi-selection set.
    pub multiple_selected: bool,
    /// A strict descendant is the single selection (derived, recomputed).
    pub child_selected: bool,
    /// On-demand children are present (reset when the branch is pruned).
    pub(crate) loaded: bool,

    props: PropertyBag,
}

impl NodeData {
    /// Creates a node with the given display text.
    pub fn new(text: impl Into<String>) -> Self {
        let mut node = Self::default();
        node.set_text(text);
        node
    }

    /// Creates a node with an author-assigned id and display text.
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(text);
        node.id = Some(id.into());
        node
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// The wire identity. Empty until the node is attached to a control.
    pub fn postback_id(&self) -> &str {
        &self.postback_id
    }

    pub(crate) fn set_postback_id(&mut self, postback_id: impl Into<String>) {
        self.postback_id = postback_id.into();
    }

    // =========================================================================
    // Well-known accessors (all backed by the property bag)
    // =========================================================================

    pub fn text(&self) -> &str {
        self.props.get_str(names::TEXT).unwrap_or("")
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.props
            .set_known(names::TEXT, PropValue::Text(text.into()));
    }

    pub fn navigate_url(&self) -> Option<&str> {
        self.props.get_str(names::NAVIGATE_URL)
    }

    pub fn set_navigate_url(&mut self, url: impl Into<String>) {
        self.props
            .set_known(names::NAVIGATE_URL, PropValue::Text(url.into()));
    }

    pub fn tool_tip(&self) -> Option<&str> {
        self.props.get_str(names::TOOL_TIP)
    }

    pub fn set_tool_tip(&mut self, tip: impl Into<String>) {
        self.props
            .set_known(names::TOOL_TIP, PropValue::Text(tip.into()));
    }

    /// The on-demand content source, when this is an on-demand node.
    pub fn children_source(&self) -> Option<&str> {
        self.props.get_str(names::CHILDREN_SOURCE)
    }

    pub fn set_children_source(&mut self, source: impl Into<String>) {
        self.props
            .set_known(names::CHILDREN_SOURCE, PropValue::Text(source.into()));
    }

    /// `true` while this on-demand node's children are present.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn props(&self) -> &PropertyBag {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut PropertyBag {
        &mut self.props
    }

    // =========================================================================
    // Copying
    // =========================================================================

    /// Shallow copy for the COPY command: clones the property bag, maps the
    /// author id to `<id>_copy` when present, and resets wire identity and
    /// derived state. Children are not copied.
    pub fn copy_of(&self) -> Self {
        Self {
            id: self.id.as_ref().map(|id| format!("{id}_copy")),
            postback_id: String::new(),
            expanded: false,
            checked: false,
            selected: false,
            multiple_selected: false,
            child_selected: false,
            loaded: false,
            props: self.props.clone(),
        }
    }
}
