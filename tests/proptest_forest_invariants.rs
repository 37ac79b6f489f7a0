//! Property-based invariant tests for the forest builder and layout.
//!
//! 1. Reachable node count equals the number of non-orphaned records.
//! 2. No node is its own descendant.
//! 3. `build_tree` fails exactly when `build_forest` is empty.
//! 4. Layout is bit-for-bit deterministic.
//! 5. Depth axis is `depth * depth_spacing`.
//! 6. Adjacent nodes at one depth never sit closer than the spacing.
//! 7. Stacked trees occupy disjoint bands; the viewport covers them.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use tasktree_core::{
    build_forest, build_tree, layout_forest, LayoutConfig, TaskId, TaskRecord, TreeError, TreeNode,
};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Acyclic records: record i may only point at an earlier id, or at an id
/// that does not exist (orphan), or at nothing (root). Shuffled so that
/// children can precede their parents in the array.
fn records_strategy() -> impl Strategy<Value = Vec<TaskRecord>> {
    (1usize..40)
        .prop_flat_map(|n| {
            let parents = proptest::collection::vec((0u8..10, any::<prop::sample::Index>()), n);
            (Just(n), parents)
        })
        .prop_map(|(n, parents)| {
            (0..n)
                .map(|i| {
                    let (kind, pick) = parents[i];
                    let parent = match kind {
                        0..=1 => None,
                        2 => Some(TaskId::Int(10_000 + i as i64)),
                        _ if i == 0 => None,
                        _ => Some(TaskId::Int(pick.index(i) as i64)),
                    };
                    TaskRecord::new(i as i64, format!("task {i}"), parent)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// Records whose parent chain ends at a root (not at a missing id).
fn reachable_count(records: &[TaskRecord]) -> usize {
    let by_id: HashMap<&TaskId, &TaskRecord> = records.iter().map(|r| (&r.id, r)).collect();
    records
        .iter()
        .filter(|r| {
            let mut cur = *r;
            loop {
                match &cur.parent_task_id {
                    None => return true,
                    Some(p) => match by_id.get(p) {
                        Some(next) => cur = next,
                        None => return false,
                    },
                }
            }
        })
        .count()
}

fn collect_ids(node: &TreeNode, path: &mut Vec<TaskId>, seen: &mut HashSet<TaskId>) -> bool {
    if path.contains(&node.id) || !seen.insert(node.id.clone()) {
        return false;
    }
    path.push(node.id.clone());
    let ok = node.children.iter().all(|c| collect_ids(c, path, seen));
    path.pop();
    ok
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reachable_nodes_match_non_orphans(records in records_strategy()) {
        let forest = build_forest(&records, None);
        let total: usize = forest.iter().map(TreeNode::count).sum();
        prop_assert_eq!(total, reachable_count(&records));
    }

    #[test]
    fn forest_is_acyclic(records in records_strategy()) {
        let forest = build_forest(&records, None);
        let mut seen = HashSet::new();
        for tree in &forest {
            prop_assert!(collect_ids(tree, &mut Vec::new(), &mut seen));
        }
    }

    #[test]
    fn build_tree_fails_iff_forest_empty(records in records_strategy()) {
        let forest = build_forest(&records, None);
        match build_tree(&records, None) {
            Ok(tree) => prop_assert_eq!(&tree, &forest[0]),
            Err(TreeError::NoRootFound) => prop_assert!(forest.is_empty()),
            Err(e) => prop_assert!(false, "unexpected error {e}"),
        }
    }

    #[test]
    fn layout_is_deterministic(records in records_strategy()) {
        let forest = build_forest(&records, None);
        let cfg = LayoutConfig::default();
        let a = layout_forest(&forest, &cfg);
        let b = layout_forest(&forest, &cfg);
        prop_assert_eq!(a.nodes.len(), b.nodes.len());
        for (x, y) in a.nodes.iter().zip(&b.nodes) {
            prop_assert_eq!(x.x.to_bits(), y.x.to_bits());
            prop_assert_eq!(x.y.to_bits(), y.y.to_bits());
        }
    }

    #[test]
    fn depth_axis_is_depth_times_spacing(records in records_strategy()) {
        let forest = build_forest(&records, None);
        let cfg = LayoutConfig::default();
        let layout = layout_forest(&forest, &cfg);
        for node in &layout.nodes {
            prop_assert_eq!(node.y, node.depth as f64 * cfg.depth_spacing);
            if let Some(p) = node.parent {
                prop_assert_eq!(layout.node(p).depth + 1, node.depth);
            }
        }
    }

    #[test]
    fn same_depth_nodes_keep_their_distance(records in records_strategy(), sep in 1.0f64..3.0) {
        let forest = build_forest(&records, None);
        let cfg = LayoutConfig { separation: sep, ..LayoutConfig::default() };
        let layout = layout_forest(&forest, &cfg);
        let mut rows: HashMap<(usize, usize), Vec<f64>> = HashMap::new();
        for node in &layout.nodes {
            rows.entry((node.tree, node.depth)).or_default().push(node.x);
        }
        for xs in rows.values() {
            for pair in xs.windows(2) {
                prop_assert!(pair[1] - pair[0] >= cfg.breadth_spacing - 1e-6,
                    "nodes {} and {} too close", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn stacked_bands_are_disjoint(records in records_strategy()) {
        let forest = build_forest(&records, None);
        let cfg = LayoutConfig::default();
        let layout = layout_forest(&forest, &cfg);
        for pair in layout.bands.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
        for node in &layout.nodes {
            let band = &layout.bands[node.tree];
            prop_assert!(band.contains(node.x));
        }
        let spans: f64 = layout.bands.iter().map(|b| b.span).sum();
        prop_assert!(layout.total_height >= spans - 1e-6);
        prop_assert!(layout.viewport_height >= layout.total_height);
    }
}
