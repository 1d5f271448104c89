//! Server-side engine for postback-driven tree and tab controls.
//!
//! One HTTP request maps to one pass over a control's node tree: the
//! persisted round-trip state is merged into the freshly built tree, the
//! incoming postback command is dispatched (select, move, copy, rename,
//! check, expand/collapse), on-demand content is loaded and pruned around
//! the selection, and the result is flattened into the compact client
//! payload the browser runtime reconstructs in a single forward pass.

pub mod control;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod select;
pub mod wire;

pub use control::{Control, SelectExpandMode};
pub use dispatch::{AlwaysValid, Command, Event, Page, PageValidator};
pub use error::{DispatchError, LoadError, ValueError};
pub use model::{NodeData, PropertyBag};
pub use schema::ControlKind;
pub use select::SelectionTracker;
pub use wire::{Look, LookTables, NodeRecord, PersistedState, Storage, StorageOptions};
