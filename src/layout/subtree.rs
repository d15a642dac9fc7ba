use std::collections::{BTreeMap, HashSet};

use crate::config::LayoutConfig;
use crate::item::{Bug, LayoutState, Position, Story, Task};

use super::grid;
use super::relations::ItemIndex;

/// Places the descendants of one story: its tasks below the story anchor
/// and each task's bugs below that task. Small task sets stay in a
/// single centered row; larger sets wrap into a fixed-column grid with a
/// dodge applied to the center task of the first row so the connector
/// feeding the next row stays clear.
pub(crate) fn place_story_subtree(
    story: &Story,
    index: &ItemIndex<'_>,
    anchor: Position,
    base_y: f32,
    collapsed: &HashSet<String>,
    state: &LayoutState,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
) {
    let sub = &config.subtree;
    let tasks = index.story_tasks(story);
    let count = tasks.len();
    let per_row = sub.tasks_per_row.max(1);
    let rows = grid::task_rows(count, config);

    for (i, task) in tasks.iter().enumerate() {
        let mut computed = if count <= sub.grid_threshold {
            let start_x = anchor.x - (count.saturating_sub(1)) as f32 * sub.task_spacing / 2.0;
            Position::new(start_x + i as f32 * sub.task_spacing, base_y)
        } else {
            let (row, col) = grid::row_col(i, per_row);
            let start_x = anchor.x - (per_row - 1) as f32 * sub.task_spacing / 2.0;
            Position::new(
                start_x + col as f32 * sub.task_spacing,
                base_y + row as f32 * sub.row_spacing,
            )
        };

        if blocks_next_row_connector(i, count, rows, per_row, sub.grid_threshold) {
            computed.x += sub.dodge_x;
            computed.y += sub.dodge_y;
        }

        let effective = state.effective_position(task.pinned, &task.id, computed);
        positions.insert(task.id.clone(), effective);

        place_bug_row(
            index.task_bugs(&task.id),
            index,
            effective.x,
            effective.y + config.bug.offset_y,
            collapsed,
            state,
            config,
            positions,
        );
    }

    // Direct bugs hang off the story itself, in their own centered row
    // below the last task row.
    let direct_y = if rows == 0 {
        base_y
    } else {
        base_y + (rows - 1) as f32 * sub.row_spacing + config.bug.offset_y
    };
    place_bug_row(
        index.story_direct_bugs(&story.id),
        index,
        anchor.x,
        direct_y,
        collapsed,
        state,
        config,
        positions,
    );
}

/// True for the single task whose naive grid slot sits exactly on the
/// vertical connector line into row 1: center column of row 0, odd
/// column count, more than one row.
fn blocks_next_row_connector(
    task_index: usize,
    task_count: usize,
    rows: usize,
    per_row: usize,
    grid_threshold: usize,
) -> bool {
    if task_count <= grid_threshold || rows <= 1 || per_row % 2 == 0 {
        return false;
    }
    task_index == per_row / 2
}

/// Centers a run of bugs on `center_x` at the given row Y. Invisible
/// bugs (hidden through some collapsed story) are skipped before
/// centering.
pub(crate) fn place_bug_row(
    bugs: &[&Bug],
    index: &ItemIndex<'_>,
    center_x: f32,
    row_y: f32,
    collapsed: &HashSet<String>,
    state: &LayoutState,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
) {
    let visible: Vec<&Bug> = bugs
        .iter()
        .copied()
        .filter(|bug| index.bug_visible(bug, collapsed))
        .collect();
    if visible.is_empty() {
        return;
    }

    let start_x = center_x - (visible.len() - 1) as f32 * config.bug.spacing / 2.0;
    for (i, bug) in visible.iter().enumerate() {
        let computed = Position::new(start_x + i as f32 * config.bug.spacing, row_y);
        let effective = state.effective_position(bug.pinned, &bug.id, computed);
        positions.insert(bug.id.clone(), effective);
    }
}

/// Same placement rule for a task stranded in the overflow lane: its
/// bugs still line up beneath it.
pub(crate) fn place_orphan_task_bugs(
    task: &Task,
    index: &ItemIndex<'_>,
    task_pos: Position,
    collapsed: &HashSet<String>,
    state: &LayoutState,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
) {
    place_bug_row(
        index.task_bugs(&task.id),
        index,
        task_pos.x,
        task_pos.y + config.bug.offset_y,
        collapsed,
        state,
        config,
        positions,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::WorkItem;

    fn story_with_task_items(count: usize) -> Vec<WorkItem> {
        let mut story = Story::new("US-1");
        let mut items = Vec::new();
        for i in 1..=count {
            let id = format!("T{i}");
            story.task_list.push(id.clone());
            items.push(WorkItem::Task(Task::new(id, Some("US-1"))));
        }
        items.insert(0, WorkItem::Story(story));
        items
    }

    fn run_subtree(items: &[WorkItem], config: &LayoutConfig) -> BTreeMap<String, Position> {
        let index = ItemIndex::build(items);
        let state = LayoutState::default();
        let mut positions = BTreeMap::new();
        let story = items[0].as_story().unwrap();
        place_story_subtree(
            story,
            &index,
            Position::new(0.0, 0.0),
            100.0,
            &HashSet::new(),
            &state,
            config,
            &mut positions,
        );
        positions
    }

    #[test]
    fn four_tasks_share_one_centered_row() {
        let config = LayoutConfig::default();
        let items = story_with_task_items(4);
        let positions = run_subtree(&items, &config);

        for i in 1..=4 {
            assert_eq!(positions[&format!("T{i}")].y, 100.0);
        }
        // Centered on the anchor: T1..T4 straddle x = 0.
        let spread: f32 = (1..=4).map(|i| positions[&format!("T{i}")].x).sum();
        assert!(spread.abs() < 1e-3);
    }

    #[test]
    fn five_tasks_wrap_into_three_plus_two() {
        let config = LayoutConfig::default();
        let items = story_with_task_items(5);
        let positions = run_subtree(&items, &config);

        // Row 0 holds T1..T3 (T2 dodged), row 1 holds T4..T5.
        assert_eq!(positions["T1"].y, 100.0);
        assert_eq!(positions["T3"].y, 100.0);
        assert_eq!(positions["T2"].y, 100.0 + config.subtree.dodge_y);
        assert_eq!(positions["T4"].y, 100.0 + config.subtree.row_spacing);
        assert_eq!(positions["T5"].y, 100.0 + config.subtree.row_spacing);
    }

    #[test]
    fn dodge_only_moves_the_center_task_of_row_zero() {
        let config = LayoutConfig::default();
        let items = story_with_task_items(7);
        let positions = run_subtree(&items, &config);

        let naive_center_x = 0.0;
        assert_eq!(positions["T2"].x, naive_center_x + config.subtree.dodge_x);
        // T5 sits in the center column of row 1 and keeps its naive slot.
        assert_eq!(positions["T5"].x, naive_center_x);
        assert_eq!(positions["T5"].y, 100.0 + config.subtree.row_spacing);
    }

    #[test]
    fn no_dodge_for_single_row_or_even_columns() {
        let mut config = LayoutConfig::default();
        let items = story_with_task_items(3);
        let positions = run_subtree(&items, &config);
        assert_eq!(positions["T2"].y, 100.0);

        config.subtree.tasks_per_row = 2;
        let items = story_with_task_items(6);
        let positions = run_subtree(&items, &config);
        for pos in positions.values() {
            assert!(pos.x.abs() <= config.subtree.task_spacing);
        }
        assert_eq!(positions["T1"].y, 100.0);
        assert_eq!(positions["T2"].y, 100.0);
    }

    #[test]
    fn sibling_tasks_keep_at_least_task_spacing() {
        let config = LayoutConfig::default();
        let items = story_with_task_items(4);
        let positions = run_subtree(&items, &config);
        let mut xs: Vec<f32> = (1..=4).map(|i| positions[&format!("T{i}")].x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= config.subtree.task_spacing - 1e-3);
        }
    }

    #[test]
    fn bugs_center_under_their_task() {
        let config = LayoutConfig::default();
        let mut items = story_with_task_items(1);
        items.push(WorkItem::Bug(Bug::new("B1", Some("T1"), None)));
        items.push(WorkItem::Bug(Bug::new("B2", Some("T1"), None)));
        let positions = run_subtree(&items, &config);

        let task = positions["T1"];
        let b1 = positions["B1"];
        let b2 = positions["B2"];
        assert_eq!(b1.y, task.y + config.bug.offset_y);
        assert_eq!(b2.y, b1.y);
        assert!(((b1.x + b2.x) / 2.0 - task.x).abs() < 1e-3);
        assert_eq!(b2.x - b1.x, config.bug.spacing);
    }

    #[test]
    fn direct_story_bugs_get_their_own_row() {
        let config = LayoutConfig::default();
        let mut items = story_with_task_items(2);
        items.push(WorkItem::Bug(Bug::new("B-direct", None, Some("US-1"))));
        let positions = run_subtree(&items, &config);
        assert_eq!(positions["B-direct"].y, 100.0 + config.bug.offset_y);
        assert_eq!(positions["B-direct"].x, 0.0);
    }

    #[test]
    fn pinned_task_keeps_stored_position_without_reflow() {
        let config = LayoutConfig::default();
        let mut items = story_with_task_items(3);
        if let WorkItem::Task(task) = &mut items[2] {
            task.pinned = true;
        }
        let index = ItemIndex::build(&items);
        let mut state = LayoutState::default();
        state
            .custom_positions
            .insert("T2".to_string(), Position::new(999.0, -50.0));
        let mut positions = BTreeMap::new();
        place_story_subtree(
            items[0].as_story().unwrap(),
            &index,
            Position::new(0.0, 0.0),
            100.0,
            &HashSet::new(),
            &state,
            &config,
            &mut positions,
        );

        assert_eq!(positions["T2"], Position::new(999.0, -50.0));
        // Siblings keep their computed slots.
        assert_eq!(positions["T1"].x, -config.subtree.task_spacing);
        assert_eq!(positions["T3"].x, config.subtree.task_spacing);
    }
}
