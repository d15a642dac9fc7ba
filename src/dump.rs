use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::layout::{ConnectionKind, RoadmapLayout};

/// Flat, serializable snapshot of a computed layout for debugging and
/// golden tests.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub connections: Vec<ConnectionDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectionDump {
    pub source: String,
    pub target: String,
    pub kind: ConnectionKind,
}

impl LayoutDump {
    pub fn from_layout(layout: &RoadmapLayout) -> Self {
        let nodes = layout
            .positions
            .iter()
            .map(|(id, pos)| NodeDump {
                id: id.clone(),
                x: pos.x,
                y: pos.y,
            })
            .collect();

        let connections = layout
            .connections
            .iter()
            .map(|connection| ConnectionDump {
                source: connection.source.clone(),
                target: connection.target.clone(),
                kind: connection.kind,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            connections,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &RoadmapLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
