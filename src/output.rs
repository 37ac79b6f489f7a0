//! Output types for the JavaScript host.
//!
//! These structs are serialized to JSON and handed to the front end, which
//! draws the scene and persists re-parent decisions.

use serde::Serialize;

use crate::error::TreeError;
use crate::forest::TreeNode;
use crate::render::Scene;

/// Error information shown by the host.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Stable code, e.g. `unsupported_curve`.
    pub code: &'static str,
    pub message: String,
}

impl From<&TreeError> for ErrorInfo {
    fn from(e: &TreeError) -> Self {
        Self { code: e.code(), message: e.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForestOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forest: Option<Vec<TreeNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ForestOutput {
    pub fn ok(forest: Vec<TreeNode>) -> Self {
        Self { forest: Some(forest), error: None }
    }

    pub fn err(e: &TreeError) -> Self {
        Self { forest: None, error: Some(e.into()) }
    }
}

/// A scene, or the error that prevented drawing it. Never both.
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutput {
    #[serde(flatten)]
    pub scene: Option<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl SceneOutput {
    pub fn ok(scene: Scene) -> Self {
        Self { scene: Some(scene), error: None }
    }

    pub fn err(e: &TreeError) -> Self {
        Self { scene: None, error: Some(e.into()) }
    }
}
