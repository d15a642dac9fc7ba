use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    /// Structural parent-to-child edge, drawn bottom of parent to top of
    /// child.
    ParentChild,
    /// Bug-to-task edge, emitted with the direction reversed since bugs
    /// sit below their task. Still a structural edge derived from the
    /// relation fields, not a user-authored cross-reference.
    Relation,
}

/// A directed edge between two visible items, referenced by id only.
/// Recomputed from the relation fields every pass, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: ConnectionKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// The result of one layout pass: a position for every visible item plus
/// the visible connections, with the bounding box of the emitted
/// positions for the renderer's viewport.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoadmapLayout {
    pub positions: BTreeMap<String, Position>,
    pub connections: Vec<Connection>,
    pub width: f32,
    pub height: f32,
}

impl RoadmapLayout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.connections.is_empty()
    }

    /// Recomputes `width`/`height` from the current position set.
    pub(super) fn update_bounds(&mut self) {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for pos in self.positions.values() {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }
        if min_x == f32::MAX {
            self.width = 0.0;
            self.height = 0.0;
        } else {
            self.width = max_x - min_x;
            self.height = max_y - min_y;
        }
    }
}
