//
// Build step: [TaskRecord] (flat rows) -> [TreeNode] (nested trees)
//
// What this does:
// - Resolves a display color per record from the ordered status catalog
// - Indexes records by id (first occurrence wins)
// - Attaches each record to its parent in source order
// - Projects every root into the public nested shape
//
// Records whose parent id resolves to nothing are dropped, not promoted to
// roots. Records on a parent cycle are never reachable from a root.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{StatusEntry, TaskId, TaskRecord, TreeNode};
use crate::error::{Result, TreeError};

/// Build every tree found in `records`, in the source order of their roots.
///
/// Never fails: a record set without any root yields an empty forest.
pub fn build_forest(records: &[TaskRecord], catalog: Option<&[StatusEntry]>) -> Vec<TreeNode> {
    let colors = resolve_colors(records, catalog);
    let live = first_occurrences(records);

    let mut index: HashMap<&TaskId, usize> = HashMap::with_capacity(records.len());
    for &i in &live {
        index.insert(&records[i].id, i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();

    for &i in &live {
        let record = &records[i];
        match &record.parent_task_id {
            None => roots.push(i),
            Some(parent) => match index.get(parent) {
                Some(&p) => children[p].push(i),
                None => debug!(task = %record.id, parent = %parent, "orphaned task dropped"),
            },
        }
    }

    debug!(records = records.len(), roots = roots.len(), "built task forest");

    roots
        .into_iter()
        .filter_map(|i| project(i, records, &colors, &children))
        .collect()
}

/// Build a single tree: the first root of the forest.
pub fn build_tree(records: &[TaskRecord], catalog: Option<&[StatusEntry]>) -> Result<TreeNode> {
    build_forest(records, catalog)
        .into_iter()
        .next()
        .ok_or(TreeError::NoRootFound)
}

/// Every record as its own childless root, ignoring parent references.
/// Used for the stacked flat-list view.
pub fn build_flat_list(records: &[TaskRecord], catalog: Option<&[StatusEntry]>) -> Vec<TreeNode> {
    let colors = resolve_colors(records, catalog);
    first_occurrences(records)
        .into_iter()
        .map(|i| shell(&records[i], colors[i].clone()))
        .collect()
}

/// Indices of the records that own their id (duplicates after the first are skipped).
fn first_occurrences(records: &[TaskRecord]) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if !seen.insert(&record.id) {
            warn!(task = %record.id, "duplicate task id, keeping first record");
            continue;
        }
        out.push(i);
    }
    out
}

/// One color per record. Without a catalog (or with an empty one) the
/// record keeps its precomputed color.
fn resolve_colors(records: &[TaskRecord], catalog: Option<&[StatusEntry]>) -> Vec<Option<String>> {
    records
        .iter()
        .map(|record| match catalog.and_then(|c| catalog_color(record, c)) {
            Some(color) => Some(color.to_string()),
            None => record.color.clone(),
        })
        .collect()
}

/// First entry matching `statusId`; the catalog's first entry when the
/// status is unset or unknown.
fn catalog_color<'a>(record: &TaskRecord, catalog: &'a [StatusEntry]) -> Option<&'a str> {
    let fallback = catalog.first()?;
    let hit = record
        .status_id
        .as_ref()
        .and_then(|sid| catalog.iter().find(|entry| &entry.id == sid));
    Some(hit.unwrap_or(fallback).color.as_str())
}

fn shell(record: &TaskRecord, color: Option<String>) -> TreeNode {
    TreeNode {
        name: record.name.clone(),
        id: record.id.clone(),
        status: record.status.clone(),
        color,
        children: Vec::new(),
    }
}

/// Assemble the nested tree below `root` bottom-up with an explicit stack,
/// so depth is bounded by the heap rather than the call stack.
fn project(
    root: usize,
    records: &[TaskRecord],
    colors: &[Option<String>],
    children: &[Vec<usize>],
) -> Option<TreeNode> {
    // Finished subtrees; the children of a node are always its topmost
    // `children[i].len()` entries, in source order.
    let mut done: Vec<TreeNode> = Vec::new();
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    while let Some((i, next)) = stack.pop() {
        if let Some(&c) = children[i].get(next) {
            stack.push((i, next + 1));
            stack.push((c, 0));
        } else {
            let mut node = shell(&records[i], colors[i].clone());
            node.children = done.split_off(done.len() - children[i].len());
            done.push(node);
        }
    }
    done.pop()
}
