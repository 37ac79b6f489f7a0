//! Task tree core.
//!
//! Pipeline: flat task records -> [`forest`] -> [`layout`] -> [`render`].
//! The `wasm` module exposes the pipeline to a JavaScript host as
//! JSON-in/JSON-out functions and a stateful view handle.

pub mod api;
pub mod error;
pub mod forest;
pub mod label;
pub mod layout;
pub mod output;
pub mod render;
mod wasm;

pub use error::TreeError;
pub use forest::{build_flat_list, build_forest, build_tree, StatusEntry, TaskId, TaskRecord, TreeNode};
pub use label::wrap_label;
pub use layout::{layout_forest, layout_tree, ForestLayout, LaidOutNode, LayoutConfig, NodeIx, PointF, RectF};
pub use render::{
    Curve, DragSession, NodeDecorator, PlainNodes, RenderConfig, ReparentProposal, Scene, TreeView,
    UrlTemplates, ZoomTransform,
};
