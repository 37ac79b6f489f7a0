//! JSON entry points shared by the wasm bindings and native callers.
//!
//! Inputs are the raw bodies the host fetched: the task array, the optional
//! status catalog and a view options object. Blank strings and `null` stand
//! for "not supplied".

use serde::Deserialize;

use crate::error::Result;
use crate::forest::{build_flat_list, build_forest, StatusEntry, TaskRecord, TreeNode};
use crate::render::{RenderConfig, TreeView, UrlTemplates};

/// Everything a host can configure for one view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    #[serde(flatten)]
    pub render: RenderConfig,
    #[serde(flatten)]
    pub urls: UrlTemplates,
    /// Ignore parent links and stack every task on its own.
    pub flat_list: bool,
}

fn is_absent(json: &str) -> bool {
    let trimmed = json.trim();
    trimmed.is_empty() || trimmed == "null"
}

pub fn parse_records(json: &str) -> Result<Vec<TaskRecord>> {
    if is_absent(json) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

pub fn parse_catalog(json: &str) -> Result<Option<Vec<StatusEntry>>> {
    if is_absent(json) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(json)?))
}

pub fn parse_options(json: &str) -> Result<ViewOptions> {
    if is_absent(json) {
        return Ok(ViewOptions::default());
    }
    Ok(serde_json::from_str(json)?)
}

pub fn forest_from_json(records: &str, statuses: &str, flat_list: bool) -> Result<Vec<TreeNode>> {
    let records = parse_records(records)?;
    let catalog = parse_catalog(statuses)?;
    let forest = if flat_list {
        build_flat_list(&records, catalog.as_deref())
    } else {
        build_forest(&records, catalog.as_deref())
    };
    Ok(forest)
}

pub fn view_from_json(records: &str, statuses: &str, options: &str) -> Result<TreeView> {
    let options = parse_options(options)?;
    let forest = forest_from_json(records, statuses, options.flat_list)?;
    TreeView::new(&forest, &options.render, &options.urls)
}
