use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task identifier as it arrives from the task API: numeric primary keys for
/// SQL-backed projects, strings for object ids. Serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Int(n)
    }
}

impl From<i32> for TaskId {
    fn from(n: i32) -> Self {
        TaskId::Int(n.into())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Text(s)
    }
}

/// A flat task row as returned by the tasks endpoint.
///
/// Only the fields the tree needs are kept; anything else in the JSON object
/// (description, dates, assignees, ...) is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub name: String,
    /// `None` => root task.
    #[serde(rename = "parentTaskID", default)]
    pub parent_task_id: Option<TaskId>,
    #[serde(rename = "statusId", alias = "statusID", default)]
    pub status_id: Option<TaskId>,
    /// Precomputed status attribute, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Precomputed fill color. Overridden when a status catalog is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TaskRecord {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>, parent: Option<TaskId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_task_id: parent,
            status_id: None,
            status: None,
            color: None,
        }
    }

    pub fn with_status(mut self, status_id: impl Into<TaskId>) -> Self {
        self.status_id = Some(status_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// One entry of a project's ordered status catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: TaskId,
    /// Hex color code, e.g. `#3b82f6`.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StatusEntry {
    pub fn new(id: impl Into<TaskId>, color: impl Into<String>) -> Self {
        Self { id: id.into(), color: color.into(), name: None }
    }
}

/// A built tree node: the public nested shape handed to the layout engine
/// and serialized for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Source order of the records.
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            status: None,
            color: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        self.preorder().len()
    }

    /// Pre-order traversal: parent before children, children in order.
    pub fn preorder(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

// Task chains can be thousands of levels deep; the derived drop glue would
// recurse once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
