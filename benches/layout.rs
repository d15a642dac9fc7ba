use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use roadmap_layout::{
    Bug, LayoutConfig, LayoutState, Priority, Story, Task, WorkItem, compute_layout,
};

fn synthetic_roadmap(stories: usize, tasks_per_story: usize, bugs_per_task: usize) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for s in 0..stories {
        let story_id = format!("US-{s}");
        let mut story = Story::new(story_id.clone());
        story.priority = match s % 3 {
            0 => Priority::High,
            1 => Priority::Medium,
            _ => Priority::Low,
        };
        for t in 0..tasks_per_story {
            let task_id = format!("US-{s}/T{t}");
            story.task_list.push(task_id.clone());
            items.push(WorkItem::Task(Task::new(task_id.clone(), Some(&story_id))));
            for b in 0..bugs_per_task {
                items.push(WorkItem::Bug(Bug::new(
                    format!("US-{s}/T{t}/B{b}"),
                    Some(&task_id),
                    None,
                )));
            }
        }
        items.push(WorkItem::Story(story));
    }
    items
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let state = LayoutState::default();

    let mut group = c.benchmark_group("compute_layout");
    for &stories in &[10usize, 50, 200] {
        let items = synthetic_roadmap(stories, 6, 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(stories),
            &items,
            |b, items| {
                b.iter(|| compute_layout(black_box(items), black_box(&state), black_box(&config)));
            },
        );
    }
    group.finish();
}

fn bench_collapsed_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let items = synthetic_roadmap(50, 6, 1);
    let mut state = LayoutState::default();
    for s in 0..25 {
        state.collapsed.insert(format!("US-{s}"));
    }

    c.bench_function("compute_layout/half_collapsed", |b| {
        b.iter(|| compute_layout(black_box(&items), black_box(&state), black_box(&config)));
    });
}

criterion_group!(benches, bench_layout, bench_collapsed_layout);
criterion_main!(benches);
