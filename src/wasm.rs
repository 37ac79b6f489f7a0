//! WASM bindings for the tasktree-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Free functions answer with JSON bodies carrying either data or an
//! `error` object; failures are also reported on the browser console.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::api::{forest_from_json, view_from_json};
use crate::error::TreeError;
use crate::label::wrap_label;
use crate::layout::PointF;
use crate::output::{ForestOutput, SceneOutput};
use crate::render::TreeView;

fn console_error(context: &str, e: &TreeError) {
    console::error_1(&JsValue::from_str(&format!("{context}: {e}")));
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Build the task forest from the tasks endpoint body and an optional
/// status catalog body.
#[wasm_bindgen]
pub fn build_task_forest(records: &str, statuses: &str) -> String {
    match forest_from_json(records, statuses, false) {
        Ok(forest) => to_json(&ForestOutput::ok(forest)),
        Err(e) => {
            console_error("Error building task forest", &e);
            to_json(&ForestOutput::err(&e))
        }
    }
}

/// Wrap a label; returns a JSON array of lines.
#[wasm_bindgen]
pub fn wrap_task_label(text: &str, max_line_length: usize, max_lines: usize) -> String {
    to_json(&wrap_label(text, max_line_length, max_lines))
}

/// Lay out and build the scene in one call.
#[wasm_bindgen]
pub fn render_task_forest(records: &str, statuses: &str, options: &str) -> String {
    match view_from_json(records, statuses, options) {
        Ok(view) => to_json(&SceneOutput::ok(view.scene().clone())),
        Err(e) => {
            console_error("Error rendering task forest", &e);
            to_json(&SceneOutput::err(&e))
        }
    }
}

/// Lay out and serialize straight to an SVG document. Returns an empty
/// string on error.
#[wasm_bindgen]
pub fn render_task_svg(records: &str, statuses: &str, options: &str) -> String {
    match view_from_json(records, statuses, options) {
        Ok(view) => view.to_svg(),
        Err(e) => {
            console_error("Error rendering task forest", &e);
            String::new()
        }
    }
}

/// Interactive handle: keeps the layout, zoom and drag state between
/// pointer events.
#[wasm_bindgen]
pub struct TaskTreeView {
    inner: TreeView,
}

#[wasm_bindgen]
impl TaskTreeView {
    #[wasm_bindgen(constructor)]
    pub fn new(records: &str, statuses: &str, options: &str) -> Result<TaskTreeView, JsValue> {
        match view_from_json(records, statuses, options) {
            Ok(inner) => Ok(TaskTreeView { inner }),
            Err(e) => {
                console_error("Error creating task tree view", &e);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    /// Scene JSON.
    pub fn scene(&self) -> String {
        to_json(self.inner.scene())
    }

    pub fn svg(&self) -> String {
        self.inner.to_svg()
    }

    /// Pointer down on the node with this task id (string form). Screen
    /// coordinates.
    pub fn pointer_down(&mut self, task_id: &str, x: f64, y: f64) -> bool {
        self.inner.pointer_down_key(task_id, PointF::new(x, y))
    }

    /// Returns the drag frame JSON, or `null` when no drag is active.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> String {
        to_json(&self.inner.pointer_move(PointF::new(x, y)))
    }

    /// Returns `{"task", "newParent", "isDescendant"}` or `null`.
    pub fn pointer_up(&mut self) -> String {
        to_json(&self.inner.pointer_up())
    }

    /// JSON array of task ids, back to front.
    pub fn draw_order(&self) -> String {
        to_json(&self.inner.draw_order())
    }

    pub fn pointer_cancel(&mut self) {
        self.inner.pointer_cancel();
    }

    /// Zoom around a screen point; returns the transform JSON.
    pub fn zoom_by(&mut self, factor: f64, x: f64, y: f64) -> String {
        to_json(&self.inner.zoom_by(factor, PointF::new(x, y)))
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> String {
        to_json(&self.inner.pan_by(dx, dy))
    }

    pub fn transform(&self) -> String {
        to_json(&self.inner.transform())
    }
}
