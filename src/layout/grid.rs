use crate::config::LayoutConfig;
use crate::item::Story;

/// Stable descending sort by priority rank; equal priorities keep their
/// input order.
pub(crate) fn sort_by_priority(stories: &mut [&Story]) {
    stories.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
}

/// Estimated horizontal footprint of a story from its task child count.
/// Wide stories wrap into a fixed-column grid, so their width is capped
/// at the grid width instead of growing linearly.
pub(crate) fn estimated_width(task_count: usize, config: &LayoutConfig) -> f32 {
    if task_count == 0 {
        config.grid.default_item_width
    } else if task_count <= config.subtree.grid_threshold {
        task_count as f32 * config.subtree.task_spacing
    } else {
        config.subtree.tasks_per_row as f32 * config.subtree.task_spacing
    }
}

/// Row/column slot for the n-th item of a flat collection.
pub(crate) fn row_col(index: usize, items_per_row: usize) -> (usize, usize) {
    let per_row = items_per_row.max(1);
    (index / per_row, index % per_row)
}

/// Rows the task block of a story occupies: one horizontal row up to the
/// grid threshold, then a `tasks_per_row`-column grid.
pub(crate) fn task_rows(task_count: usize, config: &LayoutConfig) -> usize {
    if task_count == 0 {
        0
    } else if task_count <= config.subtree.grid_threshold {
        1
    } else {
        task_count.div_ceil(config.subtree.tasks_per_row.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Priority;

    #[test]
    fn priority_sort_is_stable_descending() {
        let mut a = Story::new("a");
        a.priority = Priority::Low;
        let mut b = Story::new("b");
        b.priority = Priority::High;
        let mut c = Story::new("c");
        c.priority = Priority::Medium;
        let mut d = Story::new("d");
        d.priority = Priority::High;

        let mut stories = vec![&a, &b, &c, &d];
        sort_by_priority(&mut stories);
        let ids: Vec<&str> = stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn width_estimate_caps_at_grid_columns() {
        let config = LayoutConfig::default();
        assert_eq!(estimated_width(0, &config), config.grid.default_item_width);
        assert_eq!(estimated_width(3, &config), 3.0 * config.subtree.task_spacing);
        assert_eq!(
            estimated_width(9, &config),
            config.subtree.tasks_per_row as f32 * config.subtree.task_spacing
        );
    }

    #[test]
    fn row_col_wraps_at_items_per_row() {
        assert_eq!(row_col(0, 3), (0, 0));
        assert_eq!(row_col(2, 3), (0, 2));
        assert_eq!(row_col(3, 3), (1, 0));
        assert_eq!(row_col(7, 3), (2, 1));
    }

    #[test]
    fn task_rows_switch_at_threshold() {
        let config = LayoutConfig::default();
        assert_eq!(task_rows(0, &config), 0);
        assert_eq!(task_rows(4, &config), 1);
        assert_eq!(task_rows(5, &config), 2);
        assert_eq!(task_rows(7, &config), 3);
    }
}
