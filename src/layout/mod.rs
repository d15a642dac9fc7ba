mod connections;
mod grid;
mod relations;
mod subtree;
pub(crate) mod types;

pub use types::{Connection, ConnectionKind, RoadmapLayout};

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::config::LayoutConfig;
use crate::item::{LayoutState, PhaseScope, Position, Story, WorkItem};

use relations::ItemIndex;

struct StorySlot<'a> {
    story: &'a Story,
    width: f32,
    height: f32,
}

/// Lays out the whole item set as one roadmap: priority-sorted stories
/// packed into rows, each story's subtree below it, orphans in an
/// overflow lane to the right of the packed region.
///
/// Pure over its inputs; two calls with the same items, collapse set and
/// custom positions produce identical output.
pub fn compute_layout(
    items: &[WorkItem],
    state: &LayoutState,
    config: &LayoutConfig,
) -> RoadmapLayout {
    let index = ItemIndex::build(items);
    let mut layout = RoadmapLayout::default();

    let mut stories: Vec<&Story> = index.stories().collect();
    grid::sort_by_priority(&mut stories);

    // Footprint of every story: task rows plus a bug row when the story
    // has any children at all. The estimate ignores the collapse set so
    // toggling a story does not repack its neighbors.
    let slots: Vec<StorySlot> = stories
        .iter()
        .map(|story| {
            let task_count = index.story_tasks(story).len();
            let has_children = task_count > 0 || !index.story_direct_bugs(&story.id).is_empty();
            let rows = grid::task_rows(task_count, config);
            let height = rows as f32 * config.grid.task_row_height
                + if has_children { config.bug.row_height } else { 0.0 };
            StorySlot {
                story,
                width: grid::estimated_width(task_count, config),
                height,
            }
        })
        .collect();

    let per_row = config.grid.items_per_row.max(1);
    let mut row_base_y = config.grid.origin_y;
    let mut max_packed_x = config.grid.origin_x;

    for chunk in slots.chunks(per_row) {
        let widest = chunk.iter().map(|slot| slot.width).fold(0.0_f32, f32::max);
        let pitch = if config.grid.adaptive_spacing {
            config
                .grid
                .root_spacing
                .max(widest + config.grid.adaptive_padding)
        } else {
            config.grid.root_spacing
        };
        let row_height = chunk.iter().map(|slot| slot.height).fold(0.0_f32, f32::max);

        for (col, slot) in chunk.iter().enumerate() {
            let computed = Position::new(
                config.grid.origin_x + col as f32 * pitch,
                row_base_y,
            );
            max_packed_x = max_packed_x.max(computed.x + slot.width / 2.0);

            let effective = state.effective_position(slot.story.pinned, &slot.story.id, computed);
            layout.positions.insert(slot.story.id.clone(), effective);

            if !state.collapsed.contains(&slot.story.id) {
                subtree::place_story_subtree(
                    slot.story,
                    &index,
                    effective,
                    effective.y + config.grid.task_row_height,
                    &state.collapsed,
                    state,
                    config,
                    &mut layout.positions,
                );
            }
        }

        row_base_y += row_height.max(config.grid.min_row_height) + config.grid.row_padding;
    }

    // Width estimates ignore bug fans and the dodge nudge, so also fold
    // in the rightmost position actually emitted before starting the
    // overflow lane.
    let max_packed_x = layout
        .positions
        .values()
        .map(|pos| pos.x)
        .fold(max_packed_x, f32::max);
    place_orphans(&index, &stories, max_packed_x, state, config, &mut layout);

    layout.connections = connections::build_connections(&index, items, &state.collapsed);
    layout.update_bounds();
    layout
}

/// Items whose declared parent cannot be resolved get stacked in a lane
/// past the packed region instead of being dropped.
fn place_orphans(
    index: &ItemIndex<'_>,
    stories: &[&Story],
    max_packed_x: f32,
    state: &LayoutState,
    config: &LayoutConfig,
    layout: &mut RoadmapLayout,
) {
    let used: HashSet<&str> = stories.iter().map(|story| story.id.as_str()).collect();
    let lane_x = max_packed_x + config.orphan.lane_gap;
    let mut lane_y = config.grid.origin_y;

    for task in index.orphan_tasks(&used) {
        if !index.task_visible(task, &state.collapsed) {
            continue;
        }
        let computed = Position::new(lane_x, lane_y);
        let effective = state.effective_position(task.pinned, &task.id, computed);
        layout.positions.insert(task.id.clone(), effective);
        subtree::place_orphan_task_bugs(
            task,
            index,
            effective,
            &state.collapsed,
            state,
            config,
            &mut layout.positions,
        );
        lane_y += config.orphan.spacing;
    }

    for bug in index.orphan_bugs(&used) {
        if !index.bug_visible(bug, &state.collapsed) {
            continue;
        }
        let computed = Position::new(lane_x, lane_y);
        let effective = state.effective_position(bug.pinned, &bug.id, computed);
        layout.positions.insert(bug.id.clone(), effective);
        lane_y += config.orphan.spacing;
    }
}

/// Lays out one named phase, restricted to that phase's membership list.
/// An unknown phase id is non-fatal: it logs a warning and yields an
/// empty layout so sibling phases can still render.
pub fn compute_phase_layout(
    items: &[WorkItem],
    phases: &[PhaseScope],
    phase_id: &str,
    state: &LayoutState,
    config: &LayoutConfig,
) -> RoadmapLayout {
    let Some(phase) = phases.iter().find(|phase| phase.id == phase_id) else {
        warn!(phase_id, "layout scope not found, returning empty layout");
        return RoadmapLayout::default();
    };
    let members: HashSet<&str> = phase.item_ids.iter().map(String::as_str).collect();
    let scoped: Vec<WorkItem> = items
        .iter()
        .filter(|item| members.contains(item.id()))
        .cloned()
        .collect();
    compute_layout(&scoped, state, config)
}

/// Every phase laid out independently, keyed by phase id.
pub fn compute_phase_layouts(
    items: &[WorkItem],
    phases: &[PhaseScope],
    state: &LayoutState,
    config: &LayoutConfig,
) -> BTreeMap<String, RoadmapLayout> {
    phases
        .iter()
        .map(|phase| {
            (
                phase.id.clone(),
                compute_phase_layout(items, phases, &phase.id, state, config),
            )
        })
        .collect()
}
