use std::collections::HashSet;

use crate::item::WorkItem;

use super::relations::ItemIndex;
use super::types::{Connection, ConnectionKind};

/// Derives the structural edge list from the relation fields: one edge
/// per resolved child, in item traversal order, restricted to visible
/// endpoints. Story edges point parent to child; bug-to-task edges are
/// reversed so the line runs from the bug drawn below up to its task.
pub(crate) fn build_connections(
    index: &ItemIndex<'_>,
    items: &[WorkItem],
    collapsed: &HashSet<String>,
) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for item in items {
        if !index.is_visible(item, collapsed) {
            continue;
        }
        for child in index.direct_children(item) {
            if !index.is_visible(child, collapsed) {
                continue;
            }
            let connection = match (item, child) {
                (WorkItem::Task(task), WorkItem::Bug(bug)) => {
                    Connection::new(bug.id.clone(), task.id.clone(), ConnectionKind::Relation)
                }
                _ => Connection::new(
                    item.id().to_string(),
                    child.id().to_string(),
                    ConnectionKind::ParentChild,
                ),
            };
            if seen.insert((connection.source.clone(), connection.target.clone())) {
                connections.push(connection);
            }
        }
    }

    connections
}
