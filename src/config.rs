use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Packing of top-level stories into rows and columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Stories per packed row.
    pub items_per_row: usize,
    /// Fixed horizontal pitch between story columns.
    pub root_spacing: f32,
    /// Widen a row's pitch to its widest member instead of using the
    /// fixed pitch.
    pub adaptive_spacing: bool,
    /// Extra clearance added to the widest item when adaptive spacing
    /// recomputes a row's pitch.
    pub adaptive_padding: f32,
    /// Vertical padding inserted between story rows.
    pub row_padding: f32,
    /// Floor for a story row's height contribution.
    pub min_row_height: f32,
    /// Height contributed by each row of tasks in a story's footprint.
    pub task_row_height: f32,
    /// Estimated width of a story with no task children.
    pub default_item_width: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            items_per_row: 3,
            root_spacing: 450.0,
            adaptive_spacing: true,
            adaptive_padding: 80.0,
            row_padding: 120.0,
            min_row_height: 260.0,
            task_row_height: 160.0,
            default_item_width: 300.0,
            origin_x: 100.0,
            origin_y: 80.0,
        }
    }
}

/// Placement of one story's tasks below the story node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtreeConfig {
    /// Task counts up to this stay in a single horizontal row; above it
    /// the tasks wrap into a grid.
    pub grid_threshold: usize,
    /// Columns of the wrapped task grid.
    pub tasks_per_row: usize,
    /// Horizontal pitch between sibling tasks.
    pub task_spacing: f32,
    /// Vertical pitch between task grid rows.
    pub row_spacing: f32,
    /// Sideways nudge applied to the center-column task of grid row 0 so
    /// the connector feeding row 1 stays clear.
    pub dodge_x: f32,
    /// Downward nudge paired with `dodge_x`.
    pub dodge_y: f32,
}

impl Default for SubtreeConfig {
    fn default() -> Self {
        Self {
            grid_threshold: 4,
            tasks_per_row: 3,
            task_spacing: 180.0,
            row_spacing: 140.0,
            dodge_x: 40.0,
            dodge_y: 60.0,
        }
    }
}

/// Placement of bugs beneath their parent task or story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugConfig {
    /// Horizontal pitch between sibling bugs.
    pub spacing: f32,
    /// Vertical drop from the parent's row to the bug row.
    pub offset_y: f32,
    /// Height the bug row reserves in a story's footprint.
    pub row_height: f32,
}

impl Default for BugConfig {
    fn default() -> Self {
        Self {
            spacing: 130.0,
            offset_y: 110.0,
            row_height: 120.0,
        }
    }
}

/// Overflow lane for items with no resolvable parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanConfig {
    /// Clearance between the packed region and the lane start.
    pub lane_gap: f32,
    /// Vertical pitch between stacked orphans.
    pub spacing: f32,
}

impl Default for OrphanConfig {
    fn default() -> Self {
        Self {
            lane_gap: 200.0,
            spacing: 150.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub grid: GridConfig,
    pub subtree: SubtreeConfig,
    pub bug: BugConfig,
    pub orphan: OrphanConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] json5::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    items_per_row: Option<usize>,
    root_spacing: Option<f32>,
    adaptive_spacing: Option<bool>,
    adaptive_padding: Option<f32>,
    row_padding: Option<f32>,
    min_row_height: Option<f32>,
    task_row_height: Option<f32>,
    default_item_width: Option<f32>,
    origin_x: Option<f32>,
    origin_y: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubtreeConfigFile {
    grid_threshold: Option<usize>,
    tasks_per_row: Option<usize>,
    task_spacing: Option<f32>,
    row_spacing: Option<f32>,
    dodge_x: Option<f32>,
    dodge_y: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BugConfigFile {
    spacing: Option<f32>,
    offset_y: Option<f32>,
    row_height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrphanConfigFile {
    lane_gap: Option<f32>,
    spacing: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    grid: Option<GridConfigFile>,
    subtree: Option<SubtreeConfigFile>,
    bug: Option<BugConfigFile>,
    orphan: Option<OrphanConfigFile>,
}

fn apply_config_file(config: &mut LayoutConfig, parsed: ConfigFile) {
    if let Some(grid) = parsed.grid {
        if let Some(v) = grid.items_per_row {
            config.grid.items_per_row = v;
        }
        if let Some(v) = grid.root_spacing {
            config.grid.root_spacing = v;
        }
        if let Some(v) = grid.adaptive_spacing {
            config.grid.adaptive_spacing = v;
        }
        if let Some(v) = grid.adaptive_padding {
            config.grid.adaptive_padding = v;
        }
        if let Some(v) = grid.row_padding {
            config.grid.row_padding = v;
        }
        if let Some(v) = grid.min_row_height {
            config.grid.min_row_height = v;
        }
        if let Some(v) = grid.task_row_height {
            config.grid.task_row_height = v;
        }
        if let Some(v) = grid.default_item_width {
            config.grid.default_item_width = v;
        }
        if let Some(v) = grid.origin_x {
            config.grid.origin_x = v;
        }
        if let Some(v) = grid.origin_y {
            config.grid.origin_y = v;
        }
    }

    if let Some(subtree) = parsed.subtree {
        if let Some(v) = subtree.grid_threshold {
            config.subtree.grid_threshold = v;
        }
        if let Some(v) = subtree.tasks_per_row {
            config.subtree.tasks_per_row = v;
        }
        if let Some(v) = subtree.task_spacing {
            config.subtree.task_spacing = v;
        }
        if let Some(v) = subtree.row_spacing {
            config.subtree.row_spacing = v;
        }
        if let Some(v) = subtree.dodge_x {
            config.subtree.dodge_x = v;
        }
        if let Some(v) = subtree.dodge_y {
            config.subtree.dodge_y = v;
        }
    }

    if let Some(bug) = parsed.bug {
        if let Some(v) = bug.spacing {
            config.bug.spacing = v;
        }
        if let Some(v) = bug.offset_y {
            config.bug.offset_y = v;
        }
        if let Some(v) = bug.row_height {
            config.bug.row_height = v;
        }
    }

    if let Some(orphan) = parsed.orphan {
        if let Some(v) = orphan.lane_gap {
            config.orphan.lane_gap = v;
        }
        if let Some(v) = orphan.spacing {
            config.orphan.spacing = v;
        }
    }
}

/// Loads layout tunables from a JSON5 file of partial overrides. A `None`
/// path or an absent section keeps the defaults.
pub fn load_config(path: Option<&Path>) -> Result<LayoutConfig, ConfigError> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_horizontal_row_at_or_above_grid_width() {
        let config = LayoutConfig::default();
        assert!(config.subtree.grid_threshold >= config.subtree.tasks_per_row);
        assert!(config.grid.items_per_row > 0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let parsed: ConfigFile =
            json5::from_str("{ subtree: { tasksPerRow: 4, taskSpacing: 200 } }").unwrap();
        let mut config = LayoutConfig::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.subtree.tasks_per_row, 4);
        assert_eq!(config.subtree.task_spacing, 200.0);
        assert_eq!(config.subtree.grid_threshold, 4);
        assert_eq!(config.bug.spacing, BugConfig::default().spacing);
    }

    #[test]
    fn camel_case_grid_overrides_apply() {
        let parsed: ConfigFile = json5::from_str(
            "{ grid: { itemsPerRow: 2, adaptiveSpacing: false }, orphan: { laneGap: 50 } }",
        )
        .unwrap();
        let mut config = LayoutConfig::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.grid.items_per_row, 2);
        assert!(!config.grid.adaptive_spacing);
        assert_eq!(config.orphan.lane_gap, 50.0);
    }
}
