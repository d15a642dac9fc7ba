use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Ordering weight for top-level packing. Items without an explicit
/// priority are treated as `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A point in the abstract layout plane. Units are arbitrary; only
/// relative spacing matters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    /// Ordered child task ids. May reference tasks absent from the item
    /// set; dangling ids are skipped during resolution.
    pub task_list: Vec<String>,
    pub priority: Priority,
    pub pinned: bool,
}

impl Story {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            task_list: Vec::new(),
            priority: Priority::default(),
            pinned: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub user_story_id: Option<String>,
    pub priority: Priority,
    pub pinned: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, user_story_id: Option<&str>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            user_story_id: user_story_id.map(str::to_string),
            priority: Priority::default(),
            pinned: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: String,
    pub title: String,
    /// Parent task, when the bug was filed against a specific task.
    pub task_related: Option<String>,
    /// Parent story. A bug with a story but no task hangs directly off
    /// the story.
    pub user_story_related: Option<String>,
    pub priority: Priority,
    pub pinned: bool,
}

impl Bug {
    pub fn new(
        id: impl Into<String>,
        task_related: Option<&str>,
        user_story_related: Option<&str>,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            task_related: task_related.map(str::to_string),
            user_story_related: user_story_related.map(str::to_string),
            priority: Priority::default(),
            pinned: false,
        }
    }
}

/// A roadmap node. Stories are the only top-level items; tasks hang off
/// stories and bugs hang off tasks or directly off stories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkItem {
    Story(Story),
    Task(Task),
    Bug(Bug),
}

impl WorkItem {
    pub fn id(&self) -> &str {
        match self {
            WorkItem::Story(story) => &story.id,
            WorkItem::Task(task) => &task.id,
            WorkItem::Bug(bug) => &bug.id,
        }
    }

    pub fn as_story(&self) -> Option<&Story> {
        match self {
            WorkItem::Story(story) => Some(story),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            WorkItem::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn as_bug(&self) -> Option<&Bug> {
        match self {
            WorkItem::Bug(bug) => Some(bug),
            _ => None,
        }
    }
}

/// Caller-owned view state. The engine only reads it; collapse and drag
/// state never live on the items themselves.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    /// Story ids whose descendants are hidden.
    pub collapsed: HashSet<String>,
    /// Previously dragged positions, keyed by item id. Honored only for
    /// items flagged as pinned.
    pub custom_positions: HashMap<String, Position>,
}

impl LayoutState {
    /// The position an item actually takes: the stored drag position when
    /// the item is pinned and one was recorded, otherwise the computed
    /// slot. Stored coordinates pass through unvalidated. Every placement
    /// path goes through here so the override rule has one definition.
    pub fn effective_position(&self, pinned: bool, id: &str, computed: Position) -> Position {
        if pinned {
            self.custom_positions.get(id).copied().unwrap_or(computed)
        } else {
            computed
        }
    }
}

/// A named partition of the item set for scoped layout. Membership lists
/// come from the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseScope {
    pub id: String,
    pub item_ids: Vec<String>,
}

impl PhaseScope {
    pub fn new(id: impl Into<String>, item_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            item_ids,
        }
    }
}
