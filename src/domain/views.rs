use super::map::{Edge, MapLayout, Point};
use super::store::TaskStore;
use super::task::{Task, TaskId};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Title and hint shown on the map when there are no tasks
pub const PLACEHOLDER_TITLE: &str = "Start adding tasks";
pub const PLACEHOLDER_HINT: &str = "Pick a date in the calendar and add your first task";

/// One row of the day task list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub badge: &'static str,
    /// A request for this task is still in flight
    pub pending: bool,
}

impl TaskRow {
    fn from_task(task: &Task, pending: &HashSet<TaskId>) -> Self {
        Self {
            id: task.id,
            title: task.display_title().to_string(),
            description: task.description.clone(),
            completed: task.completed,
            badge: task.status_badge(),
            pending: pending.contains(&task.id),
        }
    }
}

/// View model for the task list of a single day
#[derive(Debug, Clone, PartialEq)]
pub struct DayListView {
    pub date: NaiveDate,
    pub heading: String,
    pub rows: Vec<TaskRow>,
}

impl DayListView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A task card on the node map
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCard {
    pub id: TaskId,
    pub title: String,
    pub date_label: String,
    pub description: String,
    pub badge: &'static str,
    pub completed: bool,
    pub selected: bool,
    /// Top-left corner in world units
    pub position: Point,
}

/// View model for the node map
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub nodes: Vec<NodeCard>,
    pub edges: Vec<Edge>,
    /// Set when there is nothing to show
    pub placeholder: bool,
}

/// Side panel contents for the selected node
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub created: String,
    pub badge: &'static str,
    pub completed: bool,
}

/// Long date label, e.g. "15 March 2024"
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Short date label, e.g. "15 Mar 2024"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Build the task list for one day, in store order
pub fn build_day_list(store: &TaskStore, date: NaiveDate, pending: &HashSet<TaskId>) -> DayListView {
    DayListView {
        date,
        heading: format_day_label(date),
        rows: store
            .by_date(date)
            .into_iter()
            .map(|task| TaskRow::from_task(task, pending))
            .collect(),
    }
}

/// Build node cards and edges for the map.
///
/// Expects `layout` to have been synced with `store`.
pub fn build_map_view(store: &TaskStore, layout: &MapLayout, selected: Option<TaskId>) -> MapView {
    let nodes: Vec<NodeCard> = layout
        .order()
        .iter()
        .filter_map(|id| {
            let task = store.get(*id)?;
            let position = layout.position(*id)?;
            Some(NodeCard {
                id: task.id,
                title: task.display_title().to_string(),
                date_label: task
                    .created_on()
                    .map(format_short_date)
                    .unwrap_or_default(),
                description: task.description.clone(),
                badge: task.status_badge(),
                completed: task.completed,
                selected: selected == Some(task.id),
                position,
            })
        })
        .collect();

    MapView {
        placeholder: nodes.is_empty(),
        edges: layout.edges(),
        nodes,
    }
}

/// Details for the selected task, None if it no longer exists
pub fn build_details(store: &TaskStore, id: TaskId) -> Option<DetailsView> {
    let task = store.get(id)?;
    Some(DetailsView {
        id: task.id,
        title: task.display_title().to_string(),
        description: task.description.clone(),
        created: task
            .created_at
            .map(|dt| dt.format("%-d %B %Y, %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        badge: task.status_badge(),
        completed: task.completed,
    })
}
