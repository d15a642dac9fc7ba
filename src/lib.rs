pub mod config;
pub mod dump;
pub mod item;
pub mod layout;

pub use config::{ConfigError, LayoutConfig, load_config};
pub use item::{Bug, LayoutState, PhaseScope, Position, Priority, Story, Task, WorkItem};
pub use layout::{
    Connection, ConnectionKind, RoadmapLayout, compute_layout, compute_phase_layout,
    compute_phase_layouts,
};
