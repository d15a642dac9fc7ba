use std::collections::{HashMap, HashSet};

use crate::item::{Bug, Story, Task, WorkItem};

/// Per-call adjacency index over one item snapshot. Built once at the
/// start of a layout pass so child lookups are map hits instead of
/// repeated scans of the full item list; nothing here outlives the pass.
pub(crate) struct ItemIndex<'a> {
    items: &'a [WorkItem],
    by_id: HashMap<&'a str, &'a WorkItem>,
    tasks_by_story: HashMap<&'a str, Vec<&'a Task>>,
    bugs_by_task: HashMap<&'a str, Vec<&'a Bug>>,
    direct_bugs_by_story: HashMap<&'a str, Vec<&'a Bug>>,
}

impl<'a> ItemIndex<'a> {
    pub(crate) fn build(items: &'a [WorkItem]) -> Self {
        let mut by_id: HashMap<&str, &WorkItem> = HashMap::with_capacity(items.len());
        for item in items {
            // Ids are unique by contract; keep the first occurrence if not.
            by_id.entry(item.id()).or_insert(item);
        }

        let is_task = |id: &str| by_id.get(id).copied().and_then(WorkItem::as_task).is_some();

        let mut tasks_by_story: HashMap<&str, Vec<&Task>> = HashMap::new();
        let mut bugs_by_task: HashMap<&str, Vec<&Bug>> = HashMap::new();
        let mut direct_bugs_by_story: HashMap<&str, Vec<&Bug>> = HashMap::new();

        for item in items {
            match item {
                WorkItem::Task(task) => {
                    if let Some(story_id) = task.user_story_id.as_deref() {
                        tasks_by_story.entry(story_id).or_default().push(task);
                    }
                }
                WorkItem::Bug(bug) => {
                    // A dangling task reference counts as no relation, so
                    // the bug can still attach directly to its story.
                    match bug.task_related.as_deref().filter(|id| is_task(id)) {
                        Some(task_id) => bugs_by_task.entry(task_id).or_default().push(bug),
                        None => {
                            if let Some(story_id) = bug.user_story_related.as_deref() {
                                direct_bugs_by_story.entry(story_id).or_default().push(bug);
                            }
                        }
                    }
                }
                WorkItem::Story(_) => {}
            }
        }

        Self {
            items,
            by_id,
            tasks_by_story,
            bugs_by_task,
            direct_bugs_by_story,
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&'a WorkItem> {
        self.by_id.get(id).copied()
    }

    /// Stories in input order.
    pub(crate) fn stories(&self) -> impl Iterator<Item = &'a Story> {
        self.items.iter().filter_map(WorkItem::as_story)
    }

    /// A story's task children: the ordered `task_list`, skipping
    /// dangling ids. Only when that yields nothing do we fall back to
    /// scanning for tasks that point back at the story.
    pub(crate) fn story_tasks(&self, story: &Story) -> Vec<&'a Task> {
        let listed: Vec<&Task> = story
            .task_list
            .iter()
            .filter_map(|id| self.get(id).and_then(WorkItem::as_task))
            .collect();
        if !listed.is_empty() {
            return listed;
        }
        self.tasks_by_story
            .get(story.id.as_str())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn task_bugs(&self, task_id: &str) -> &[&'a Bug] {
        self.bugs_by_task
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn story_direct_bugs(&self, story_id: &str) -> &[&'a Bug] {
        self.direct_bugs_by_story
            .get(story_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Direct children of an item: for a story, tasks first then direct
    /// bugs; for a task, its bugs; bugs are leaves.
    pub(crate) fn direct_children(&self, item: &WorkItem) -> Vec<&'a WorkItem> {
        match item {
            WorkItem::Story(story) => {
                let mut children: Vec<&WorkItem> = self
                    .story_tasks(story)
                    .iter()
                    .filter_map(|task| self.get(&task.id))
                    .collect();
                children.extend(
                    self.story_direct_bugs(&story.id)
                        .iter()
                        .filter_map(|bug| self.get(&bug.id)),
                );
                children
            }
            WorkItem::Task(task) => self
                .task_bugs(&task.id)
                .iter()
                .filter_map(|bug| self.get(&bug.id))
                .collect(),
            WorkItem::Bug(_) => Vec::new(),
        }
    }

    /// Whether an item survives the collapse set. Stories are always
    /// visible; collapsing a story hides its tasks and every bug hanging
    /// off those tasks or off the story itself.
    pub(crate) fn is_visible(&self, item: &WorkItem, collapsed: &HashSet<String>) -> bool {
        match item {
            WorkItem::Story(_) => true,
            WorkItem::Task(task) => self.task_visible(task, collapsed),
            WorkItem::Bug(bug) => self.bug_visible(bug, collapsed),
        }
    }

    pub(crate) fn task_visible(&self, task: &Task, collapsed: &HashSet<String>) -> bool {
        match task.user_story_id.as_deref() {
            Some(story_id) => !collapsed.contains(story_id),
            None => true,
        }
    }

    pub(crate) fn bug_visible(&self, bug: &Bug, collapsed: &HashSet<String>) -> bool {
        if let Some(task_id) = bug.task_related.as_deref() {
            if collapsed.contains(task_id) {
                return false;
            }
            if let Some(task) = self.get(task_id).and_then(WorkItem::as_task)
                && let Some(story_id) = task.user_story_id.as_deref()
                && collapsed.contains(story_id)
            {
                return false;
            }
        }
        if let Some(story_id) = bug.user_story_related.as_deref()
            && collapsed.contains(story_id)
        {
            return false;
        }
        true
    }

    /// Tasks with no resolvable story parent, in input order.
    pub(crate) fn orphan_tasks(&self, used_story_ids: &HashSet<&str>) -> Vec<&'a Task> {
        self.items
            .iter()
            .filter_map(WorkItem::as_task)
            .filter(|task| match task.user_story_id.as_deref() {
                Some(story_id) => !used_story_ids.contains(story_id),
                None => true,
            })
            .collect()
    }

    /// Bugs with neither a resolvable story parent nor a resolvable task
    /// parent, in input order.
    pub(crate) fn orphan_bugs(&self, used_story_ids: &HashSet<&str>) -> Vec<&'a Bug> {
        self.items
            .iter()
            .filter_map(WorkItem::as_bug)
            .filter(|bug| {
                let story_resolved = bug
                    .user_story_related
                    .as_deref()
                    .is_some_and(|id| used_story_ids.contains(id));
                let task_resolved = bug
                    .task_related
                    .as_deref()
                    .is_some_and(|id| self.get(id).and_then(WorkItem::as_task).is_some());
                !story_resolved && !task_resolved
            })
            .collect()
    }
}
