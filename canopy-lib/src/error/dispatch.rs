//! Postback dispatch errors

use super::{LoadError, ValueError};

/// Errors raised while parsing or executing a postback command.
///
/// Dispatch is all-or-nothing: every variant is fatal for the current
/// request, and a failed dispatch leaves every tree structurally
/// unchanged. There is no catch-and-continue and no partial application
/// of a mutation.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No node with the given postback id is reachable.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No control with the given page-scoped id is registered.
    #[error("control not found: {0}")]
    ControlNotFound(String),

    /// The command token is not in the dispatch table.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// A positional argument is absent.
    #[error("{command} is missing argument {index} ({name})")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Human name of the argument.
        name: &'static str,
        /// Zero-based argument position.
        index: usize,
    },

    /// A positional argument is present but unusable.
    #[error("invalid {name} argument for {command}: {message}")]
    InvalidArgument {
        /// Command being parsed.
        command: &'static str,
        /// Human name of the argument.
        name: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A MOVE tried to relocate a node into its own subtree.
    #[error("invalid move: {0}")]
    InvalidMove(#[from] treedom::MoveError),

    /// Page-level input validation rejected the request.
    #[error("page validation failed")]
    Validation,

    /// A persisted round-trip slot could not be read back.
    #[error("malformed persisted state: {0}")]
    State(String),

    /// A property literal did not match its encoding rule.
    #[error("invalid property value")]
    Value(#[from] ValueError),

    /// On-demand content could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl DispatchError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(
        command: &'static str,
        name: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            command,
            name,
            message: message.into(),
        }
    }
}
