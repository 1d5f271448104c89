//! Domain events raised by postback dispatch.

/// One domain event produced while executing a postback command.
///
/// Nodes are identified by postback id. `Moved` carries the owner state
/// captured *before* the node was detached — by the time the event is
/// observable the node already lives under its new parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A node became the single selection.
    Selected { node: String },
    /// The selected node's `NavigateUrl` should be followed.
    Navigate { node: String, url: String },
    /// A node was relocated, possibly across control instances.
    Moved {
        node: String,
        /// Page id of the control the node was detached from.
        old_tree: String,
        /// Postback id of the old parent; `None` for a former root.
        old_parent: Option<String>,
        /// Index the node had among its old siblings.
        old_index: usize,
    },
    /// A node was shallow-copied under a new parent.
    Copied { source: String, copy: String },
    /// A node's display text was replaced.
    Renamed { node: String, old_text: String },
    /// A node's check mark was toggled.
    CheckChanged { node: String, checked: bool },
    Expanded { node: String },
    Collapsed { node: String },
}
