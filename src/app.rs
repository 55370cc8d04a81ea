use crate::api::{ApiError, ApiReply, ApiRequest, Completion};
use crate::domain::{
    build_day_list, build_details, build_map_view, build_month_grid, CalendarCell, CalendarMonth,
    DayListView, DetailsView, Focus, FormMode, LayoutConfig, MapState, MapView, Point, TaskDraft, TaskForm, TaskId,
    TaskStore, UiMode,
};
use crate::notifications::Notices;
use chrono::{Duration as DateDuration, NaiveDate};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Map pan step for arrow keys, in screen cells
const PAN_STEP: f64 = 4.0;

/// A mutation the user asked for on one task.
///
/// Intents are turned into requests only when no other request for the same
/// task is in flight, so they always see the latest confirmed state.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskIntent {
    ToggleCompleted,
    /// New title and description; `completed` comes from the store
    Update { title: String, description: String },
    Delete,
}

/// Per-task request serialization
#[derive(Debug, Clone, Default)]
pub struct PendingRequests {
    in_flight: HashSet<TaskId>,
    queued: HashMap<TaskId, VecDeque<TaskIntent>>,
    listing: bool,
}

impl PendingRequests {
    pub fn is_in_flight(&self, id: TaskId) -> bool {
        self.in_flight.contains(&id)
    }

    pub fn in_flight(&self) -> &HashSet<TaskId> {
        &self.in_flight
    }

    pub fn queued_for(&self, id: TaskId) -> usize {
        self.queued.get(&id).map_or(0, VecDeque::len)
    }

    pub fn is_listing(&self) -> bool {
        self.listing
    }

    fn enqueue(&mut self, id: TaskId, intent: TaskIntent) {
        self.queued.entry(id).or_default().push_back(intent);
    }

    fn next_queued(&mut self, id: TaskId) -> Option<TaskIntent> {
        let queue = self.queued.get_mut(&id)?;
        let next = queue.pop_front();
        if queue.is_empty() {
            self.queued.remove(&id);
        }
        next
    }
}

/// Main application state.
///
/// Owns the task store and all view state. Controller methods turn user
/// actions into queued API requests; `apply_completion` folds confirmed
/// results back into the store and refreshes every view.
pub struct AppState {
    pub store: TaskStore,
    pub today: NaiveDate,
    pub ui_mode: UiMode,
    pub focus: Focus,

    // Calendar and day list
    pub month: CalendarMonth,
    pub calendar_cursor: NaiveDate,
    pub selected_date: Option<NaiveDate>,
    pub list_index: usize,

    // Node map
    pub map: MapState,
    pub selected_node: Option<TaskId>,

    pub form: TaskForm,
    pub notices: Notices,
    pub pending: PendingRequests,
    outbox: VecDeque<ApiRequest>,

    // Derived views, rebuilt by refresh_views
    pub calendar: Vec<CalendarCell>,
    pub day_list: Option<DayListView>,
    pub map_view: MapView,
    synced_revision: Option<u64>,
}

impl AppState {
    pub fn new(layout: LayoutConfig, notice_ttl: Duration, today: NaiveDate) -> Self {
        let mut app = Self {
            store: TaskStore::new(),
            today,
            ui_mode: UiMode::Normal,
            focus: Focus::Left,
            month: CalendarMonth::from_date(today),
            calendar_cursor: today,
            selected_date: None,
            list_index: 0,
            map: MapState::new(layout),
            selected_node: None,
            form: TaskForm::default(),
            notices: Notices::new(notice_ttl),
            pending: PendingRequests::default(),
            outbox: VecDeque::new(),
            calendar: Vec::new(),
            day_list: None,
            map_view: MapView {
                nodes: Vec::new(),
                edges: Vec::new(),
                placeholder: true,
            },
            synced_revision: None,
        };
        app.refresh_views();
        app
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Re-derive every mounted view from the store and view state
    pub fn refresh_views(&mut self) {
        if self.synced_revision != Some(self.store.revision()) {
            self.map.layout.sync(&self.store);
            self.synced_revision = Some(self.store.revision());
            if let Some(id) = self.selected_node {
                if self.store.get(id).is_none() {
                    self.selected_node = None;
                }
            }
            if let FormMode::Edit(id) = self.form.mode {
                if self.store.get(id).is_none() {
                    debug!(id, "edit target left the store, resetting form");
                    self.close_edit_form();
                }
            }
        }

        self.calendar = build_month_grid(self.month, &self.store, self.today);
        self.day_list = self
            .selected_date
            .map(|date| build_day_list(&self.store, date, self.pending.in_flight()));
        if let Some(list) = &self.day_list {
            if self.list_index >= list.rows.len() {
                self.list_index = list.rows.len().saturating_sub(1);
            }
        }
        self.map_view = build_map_view(&self.store, &self.map.layout, self.selected_node);
    }

    /// Side panel contents for the selected map node
    pub fn details(&self) -> Option<DetailsView> {
        self.selected_node.and_then(|id| build_details(&self.store, id))
    }

    /// Advance clocks: expire notices and follow the date across midnight
    pub fn tick(&mut self, now: Instant, today: NaiveDate) {
        self.notices.expire(now);
        if today != self.today {
            self.today = today;
            self.refresh_views();
        }
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    /// Requests waiting to be handed to the network worker
    pub fn take_requests(&mut self) -> Vec<ApiRequest> {
        self.outbox.drain(..).collect()
    }

    /// Reload the whole task list from the server
    pub fn refresh(&mut self) {
        if self.pending.listing {
            return;
        }
        self.pending.listing = true;
        self.outbox.push_back(ApiRequest::List);
    }

    /// Queue a mutation for a task, serialized behind any in-flight request
    pub fn request_for(&mut self, id: TaskId, intent: TaskIntent) {
        if self.pending.is_in_flight(id) {
            self.pending.enqueue(id, intent);
            debug!(id, queued = self.pending.queued_for(id), "task busy, intent queued");
        } else {
            self.dispatch(id, intent);
        }
        self.refresh_views();
    }

    fn dispatch(&mut self, id: TaskId, intent: TaskIntent) {
        let Some(task) = self.store.get(id) else {
            // Task vanished (deleted elsewhere or never existed): nothing to do
            debug!(id, ?intent, "dropping intent for unknown task");
            if matches!(intent, TaskIntent::Update { .. }) && self.form.mode == FormMode::Edit(id) {
                self.close_edit_form();
            }
            return;
        };

        let request = match intent {
            TaskIntent::ToggleCompleted => {
                let draft = task.to_draft();
                let completed = !draft.completed;
                ApiRequest::Update(id, draft.with_completed(completed))
            }
            TaskIntent::Update { title, description } => {
                ApiRequest::Update(id, TaskDraft::new(title, description).with_completed(task.completed))
            }
            TaskIntent::Delete => ApiRequest::Delete(id),
        };

        self.pending.in_flight.insert(id);
        self.outbox.push_back(request);
    }

    /// Fold a finished request into the store.
    ///
    /// The store is only touched on success; failures become notices.
    pub fn apply_completion(&mut self, completion: Completion) {
        let Completion { request, outcome } = completion;

        match (&request, outcome) {
            (ApiRequest::List, Ok(ApiReply::Tasks(tasks))) => {
                info!(count = tasks.len(), "tasks loaded");
                self.store.replace_all(tasks);
            }
            (ApiRequest::List, Err(err)) => {
                self.report_failure("Could not load tasks", &err);
            }
            (ApiRequest::Create(_), Ok(ApiReply::Task(task))) => {
                info!(id = task.id, "task created");
                self.store.upsert(task);
                if self.ui_mode != UiMode::EditingForm && self.form.mode == FormMode::Create {
                    self.form.reset();
                }
                self.notices.success("Task created");
            }
            (ApiRequest::Create(_), Err(err)) => {
                self.report_failure("Could not create task", &err);
            }
            (ApiRequest::Update(id, _), Ok(ApiReply::Task(task))) => {
                info!(id, "task updated");
                // A late reply for a task deleted meanwhile is discarded
                if self.store.get(*id).is_some() {
                    self.store.upsert(task);
                }
                if self.ui_mode != UiMode::EditingForm && self.form.mode == FormMode::Edit(*id) {
                    self.form.reset();
                }
                self.notices.success("Task updated");
            }
            (ApiRequest::Update(_, _), Err(err)) => {
                self.report_failure("Could not update task", &err);
            }
            (ApiRequest::Delete(id), Ok(ApiReply::Deleted)) => {
                info!(id, "task deleted");
                self.store.remove(*id);
                if self.form.mode == FormMode::Edit(*id) {
                    self.close_edit_form();
                }
                self.notices.success("Task deleted");
            }
            (ApiRequest::Delete(_), Err(err)) => {
                self.report_failure("Could not delete task", &err);
            }
            (request, Ok(reply)) => {
                warn!(?request, ?reply, "unexpected reply shape");
            }
        }

        if let ApiRequest::List = request {
            self.pending.listing = false;
        }
        if let Some(id) = request.task_id() {
            self.pending.in_flight.remove(&id);
            if let Some(next) = self.pending.next_queued(id) {
                self.dispatch(id, next);
            }
        }

        self.refresh_views();
    }

    fn report_failure(&mut self, what: &str, err: &ApiError) {
        warn!(error = %err, status = ?err.status(), "{what}");
        self.notices.error(format!("{what}: {err}"));
    }

    // ------------------------------------------------------------------
    // Calendar and day list
    // ------------------------------------------------------------------

    pub fn prev_month(&mut self) {
        self.month = self.month.prev();
        self.calendar_cursor = self.month.first_day();
        self.refresh_views();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
        self.calendar_cursor = self.month.first_day();
        self.refresh_views();
    }

    /// Move the calendar cursor by a number of days; the month follows it
    pub fn move_calendar_cursor(&mut self, days: i64) {
        self.calendar_cursor += DateDuration::days(days);
        if !self.month.contains(self.calendar_cursor) {
            self.month = CalendarMonth::from_date(self.calendar_cursor);
            self.refresh_views();
        }
    }

    /// Open the day list for the date under the calendar cursor
    pub fn activate_calendar_cursor(&mut self) {
        if self.month.contains(self.calendar_cursor) {
            self.select_date(self.calendar_cursor);
        }
    }

    /// Select a date: the left pane switches to that day's task list
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.calendar_cursor = date;
        self.month = CalendarMonth::from_date(date);
        self.focus = Focus::Left;
        self.list_index = 0;
        self.refresh_views();
    }

    /// Leave the day list and show the calendar again
    pub fn back_to_calendar(&mut self) {
        self.selected_date = None;
        self.list_index = 0;
        self.refresh_views();
    }

    pub fn list_up(&mut self) {
        self.list_index = self.list_index.saturating_sub(1);
    }

    pub fn list_down(&mut self) {
        let len = self.day_list.as_ref().map_or(0, |l| l.rows.len());
        if self.list_index + 1 < len {
            self.list_index += 1;
        }
    }

    /// Task under the list cursor, if the day list is showing
    pub fn selected_row(&self) -> Option<TaskId> {
        self.day_list
            .as_ref()
            .and_then(|list| list.rows.get(self.list_index))
            .map(|row| row.id)
    }

    /// The task the current focus points at
    pub fn focused_task(&self) -> Option<TaskId> {
        match self.focus {
            Focus::Left => self.selected_row(),
            Focus::Map => self.selected_node,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    // ------------------------------------------------------------------
    // Task actions
    // ------------------------------------------------------------------

    /// Flip `completed` on a task, keeping its other fields
    pub fn toggle_completed(&mut self, id: TaskId) {
        if self.store.get(id).is_some() {
            self.request_for(id, TaskIntent::ToggleCompleted);
        }
    }

    pub fn toggle_focused(&mut self) {
        if let Some(id) = self.focused_task() {
            self.toggle_completed(id);
        }
    }

    /// Ask for confirmation before deleting. Unknown ids are ignored.
    pub fn request_delete(&mut self, id: TaskId) {
        if self.store.get(id).is_some() {
            self.ui_mode = UiMode::ConfirmDelete(id);
        }
    }

    pub fn request_delete_focused(&mut self) {
        if let Some(id) = self.focused_task() {
            self.request_delete(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        if let UiMode::ConfirmDelete(id) = self.ui_mode {
            self.ui_mode = UiMode::Normal;
            self.request_for(id, TaskIntent::Delete);
        }
    }

    pub fn cancel_delete(&mut self) {
        if let UiMode::ConfirmDelete(_) = self.ui_mode {
            self.ui_mode = UiMode::Normal;
        }
    }

    // ------------------------------------------------------------------
    // Task form
    // ------------------------------------------------------------------

    /// Open the form in whatever mode it is in (create by default)
    pub fn open_form(&mut self) {
        self.ui_mode = UiMode::EditingForm;
    }

    /// Open the form pre-filled for editing a task
    pub fn start_edit(&mut self, id: TaskId) {
        if let Some(task) = self.store.get(id) {
            self.form = TaskForm::edit(task);
            self.ui_mode = UiMode::EditingForm;
        }
    }

    pub fn start_edit_focused(&mut self) {
        if let Some(id) = self.focused_task() {
            self.start_edit(id);
        }
    }

    pub fn form_char(&mut self, c: char) {
        self.form.push_char(c);
    }

    pub fn form_backspace(&mut self) {
        self.form.backspace();
    }

    pub fn form_toggle_field(&mut self) {
        self.form.toggle_field();
    }

    /// Validate and send the form as a create or update
    pub fn submit_form(&mut self) {
        let draft = match self.form.validate(self.selected_date) {
            Ok(draft) => draft,
            Err(err) => {
                debug!(field = err.field(), "form rejected");
                self.notices.error(err.to_string());
                return;
            }
        };

        self.ui_mode = UiMode::Normal;
        match self.form.mode {
            FormMode::Create => self.outbox.push_back(ApiRequest::Create(draft)),
            FormMode::Edit(id) => self.request_for(
                id,
                TaskIntent::Update {
                    title: draft.title,
                    description: draft.description,
                },
            ),
        }
    }

    /// Close the form and return it to create mode
    pub fn cancel_form(&mut self) {
        self.form.reset();
        self.ui_mode = UiMode::Normal;
    }

    /// Drop an edit whose task is gone, closing the form if it is open
    fn close_edit_form(&mut self) {
        self.form.reset();
        if self.ui_mode == UiMode::EditingForm {
            self.ui_mode = UiMode::Normal;
        }
    }

    // ------------------------------------------------------------------
    // Node map
    // ------------------------------------------------------------------

    pub fn select_node(&mut self, id: Option<TaskId>) {
        self.selected_node = id.filter(|id| self.store.get(*id).is_some());
        self.refresh_views();
    }

    /// Pointer coordinates are relative to the map pane center
    pub fn map_pointer_down(&mut self, screen: Point) {
        self.focus = Focus::Map;
        self.map.pointer_down(screen);
    }

    pub fn map_pointer_move(&mut self, screen: Point) {
        if self.map.pointer_move(screen) {
            self.refresh_views();
        }
    }

    pub fn map_pointer_up(&mut self) {
        if let Some(id) = self.map.pointer_up() {
            self.select_node(Some(id));
        }
    }

    pub fn map_wheel(&mut self, cursor: Point, zoom_in: bool) {
        self.map.wheel(cursor, zoom_in);
    }

    pub fn map_zoom_in(&mut self) {
        self.map.zoom_in();
    }

    pub fn map_zoom_out(&mut self) {
        self.map.zoom_out();
    }

    pub fn map_reset_view(&mut self) {
        self.map.reset_view();
    }

    pub fn map_pan(&mut self, dx: f64, dy: f64) {
        self.map.transform.pan_by(dx * PAN_STEP, dy * PAN_STEP);
    }

    pub fn map_relayout(&mut self) {
        self.map.layout.reseed();
        self.refresh_views();
    }

    /// Cycle node selection through the map in store order
    pub fn select_next_node(&mut self) {
        let order = self.map.layout.order();
        if order.is_empty() {
            return;
        }
        let next = match self.selected_node.and_then(|id| order.iter().position(|o| *o == id)) {
            Some(i) => order[(i + 1) % order.len()],
            None => order[0],
        };
        self.select_node(Some(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TaskApi;
    use crate::domain::Task;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    /// In-memory server standing in for the REST API
    struct FakeApi {
        tasks: RefCell<Vec<Task>>,
        next_id: Cell<TaskId>,
        created_on: NaiveDate,
        fail_with: Cell<Option<u16>>,
    }

    impl FakeApi {
        fn new(created_on: NaiveDate) -> Self {
            Self {
                tasks: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                created_on,
                fail_with: Cell::new(None),
            }
        }

        fn check(&self) -> Result<(), ApiError> {
            match self.fail_with.get() {
                Some(status) => Err(ApiError::RequestFailed {
                    status: Some(status),
                    body: "server error".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    impl TaskApi for FakeApi {
        fn list(&self) -> Result<Vec<Task>, ApiError> {
            self.check()?;
            Ok(self.tasks.borrow().clone())
        }

        fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
            self.check()?;
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let task = Task {
                id,
                title: draft.title.clone(),
                description: draft.description.clone(),
                completed: draft.completed,
                created_at: self.created_on.and_hms_opt(9, 0, 0),
            };
            self.tasks.borrow_mut().push(task.clone());
            Ok(task)
        }

        fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, ApiError> {
            self.check()?;
            let mut tasks = self.tasks.borrow_mut();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ApiError::RequestFailed {
                    status: Some(404),
                    body: "not found".to_string(),
                })?;
            task.title = draft.title.clone();
            task.description = draft.description.clone();
            task.completed = draft.completed;
            Ok(task.clone())
        }

        fn delete(&self, id: TaskId) -> Result<(), ApiError> {
            self.check()?;
            self.tasks.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_app() -> AppState {
        AppState::new(LayoutConfig::default(), Duration::from_secs(3), ymd(2024, 3, 15))
    }

    /// Execute every queued request against the fake, like the worker would
    fn run(app: &mut AppState, api: &FakeApi) {
        loop {
            let requests = app.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                app.apply_completion(request.execute(api));
            }
        }
    }

    fn add_task(app: &mut AppState, api: &FakeApi, title: &str) {
        app.open_form();
        for c in title.chars() {
            app.form_char(c);
        }
        app.submit_form();
        run(app, api);
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.calendar.len(), 42);
        assert!(app.day_list.is_none());
        assert!(app.map_view.placeholder);
        assert_eq!(app.month, CalendarMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn test_create_buy_milk_on_date() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));

        add_task(&mut app, &api, "Buy milk");

        let tasks = app.store.by_date(ymd(2024, 3, 15));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert!(!tasks[0].completed);

        // Every view follows the store
        let list = app.day_list.as_ref().unwrap();
        assert_eq!(list.rows.len(), 1);
        assert_eq!(app.map_view.nodes.len(), 1);
        assert!(app.calendar.iter().any(|c| c.date == ymd(2024, 3, 15) && c.has_tasks));
        assert_eq!(app.form, TaskForm::default());
        assert_eq!(app.notices.latest().unwrap().message, "Task created");
    }

    #[test]
    fn test_submit_requires_title_and_date() {
        let mut app = create_test_app();
        app.open_form();
        app.submit_form();
        assert_eq!(app.ui_mode, UiMode::EditingForm);
        assert_eq!(app.notices.latest().unwrap().message, "Title must not be empty");

        app.form_char('x');
        app.submit_form();
        assert_eq!(app.notices.latest().unwrap().message, "Select a date in the calendar first");
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_round_trip_matches_server_after_refresh() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));

        add_task(&mut app, &api, "one");
        add_task(&mut app, &api, "two");
        add_task(&mut app, &api, "three");
        app.toggle_completed(2);
        run(&mut app, &api);
        app.start_edit(3);
        app.form_char('!');
        app.submit_form();
        run(&mut app, &api);
        app.request_delete(1);
        app.confirm_delete();
        run(&mut app, &api);

        let local: Vec<Task> = app.store.tasks().to_vec();
        app.refresh();
        run(&mut app, &api);

        assert_eq!(app.store.tasks(), api.tasks.borrow().as_slice());
        assert_eq!(app.store.tasks(), local.as_slice());
        assert_eq!(app.store.get(3).unwrap().title, "three!");
        assert!(app.store.get(2).unwrap().completed);
    }

    #[test]
    fn test_failed_update_leaves_view_unchanged() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "Buy milk");

        api.fail_with.set(Some(500));
        app.toggle_completed(1);
        run(&mut app, &api);

        assert!(!app.store.get(1).unwrap().completed);
        assert!(!app.day_list.as_ref().unwrap().rows[0].completed);
        assert!(app.notices.latest().unwrap().message.starts_with("Could not update task"));
        assert!(!app.pending.is_in_flight(1));
    }

    #[test]
    fn test_delete_absent_task_is_silent() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();

        app.request_delete(99);
        assert_eq!(app.ui_mode, UiMode::Normal);
        app.request_for(99, TaskIntent::Delete);
        run(&mut app, &api);

        assert!(app.notices.is_empty());
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");
        app.select_node(Some(1));

        app.request_delete(1);
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete(1));
        app.cancel_delete();
        run(&mut app, &api);
        assert_eq!(app.store.len(), 1);

        app.request_delete(1);
        app.confirm_delete();
        run(&mut app, &api);
        assert!(app.store.is_empty());
        assert_eq!(app.selected_node, None);
        assert!(app.map_view.placeholder);
    }

    #[test]
    fn test_mutations_serialized_per_task() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        // Two rapid toggles: the second waits for the first
        app.toggle_completed(1);
        app.toggle_completed(1);
        let first = app.take_requests();
        assert_eq!(first.len(), 1);
        assert!(app.pending.is_in_flight(1));
        assert_eq!(app.pending.queued_for(1), 1);
        assert!(app.day_list.as_ref().unwrap().rows[0].pending);

        for request in first {
            app.apply_completion(request.execute(&api));
        }
        assert!(app.store.get(1).unwrap().completed);

        // The queued toggle is built from the confirmed state
        let second = app.take_requests();
        assert_eq!(
            second,
            vec![ApiRequest::Update(1, TaskDraft::new("a", "").with_completed(false))]
        );
        for request in second {
            app.apply_completion(request.execute(&api));
        }
        assert!(!app.store.get(1).unwrap().completed);
        assert!(!app.pending.is_in_flight(1));
    }

    #[test]
    fn test_edit_queued_behind_toggle_keeps_completed() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        app.toggle_completed(1);
        let toggle = app.take_requests();
        assert_eq!(toggle.len(), 1);

        // Edit opened and submitted while the toggle is still in flight
        app.start_edit(1);
        app.form_char('!');
        app.submit_form();
        assert!(app.take_requests().is_empty());
        assert_eq!(app.pending.queued_for(1), 1);

        for request in toggle {
            app.apply_completion(request.execute(&api));
        }
        assert!(app.store.get(1).unwrap().completed);

        let edit = app.take_requests();
        assert_eq!(
            edit,
            vec![ApiRequest::Update(1, TaskDraft::new("a!", "").with_completed(true))]
        );
        for request in edit {
            app.apply_completion(request.execute(&api));
        }

        let task = app.store.get(1).unwrap();
        assert_eq!(task.title, "a!");
        assert!(task.completed);
        assert_eq!(app.form.mode, FormMode::Create);
    }

    #[test]
    fn test_edit_target_removed_by_refresh_resets_form() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        app.start_edit(1);
        assert_eq!(app.ui_mode, UiMode::EditingForm);

        // Someone else deleted the task on the server
        api.tasks.borrow_mut().clear();
        app.refresh();
        run(&mut app, &api);

        assert!(app.store.is_empty());
        assert_eq!(app.form, TaskForm::default());
        assert_eq!(app.ui_mode, UiMode::Normal);

        app.open_form();
        assert_eq!(app.form.mode, FormMode::Create);
    }

    #[test]
    fn test_dropped_update_resets_form() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        app.start_edit(1);
        app.form_char('!');
        assert!(app.store.remove(1));
        app.submit_form();

        assert!(app.take_requests().is_empty());
        assert_eq!(app.form.mode, FormMode::Create);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_intent_after_delete_is_dropped() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        app.request_for(1, TaskIntent::Delete);
        app.toggle_completed(1);
        run(&mut app, &api);

        assert!(app.store.is_empty());
        assert_eq!(app.notices.latest().unwrap().message, "Task deleted");
    }

    #[test]
    fn test_edit_form_state_machine() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        app.start_edit(1);
        assert_eq!(app.form.mode, FormMode::Edit(1));
        assert_eq!(app.form.title, "a");
        app.cancel_form();
        assert_eq!(app.form.mode, FormMode::Create);

        app.start_edit(1);
        app.form_toggle_field();
        app.form_char('d');
        app.submit_form();
        run(&mut app, &api);

        assert_eq!(app.store.get(1).unwrap().description, "d");
        assert_eq!(app.form.mode, FormMode::Create);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_failed_create_keeps_form() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        api.fail_with.set(Some(503));

        add_task(&mut app, &api, "keep me");

        assert!(app.store.is_empty());
        assert_eq!(app.form.title, "keep me");
        assert!(app.notices.latest().unwrap().message.contains("HTTP 503"));
    }

    #[test]
    fn test_failed_list_keeps_store() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        api.fail_with.set(Some(500));
        app.refresh();
        app.refresh();
        assert_eq!(app.take_requests(), vec![ApiRequest::List]);
        app.apply_completion(ApiRequest::List.execute(&api));

        assert_eq!(app.store.len(), 1);
        assert!(!app.pending.is_listing());
    }

    #[test]
    fn test_month_navigation() {
        let mut app = create_test_app();
        app.month = CalendarMonth::new(2024, 1).unwrap();
        app.prev_month();
        assert_eq!(app.month, CalendarMonth::new(2023, 12).unwrap());
        app.next_month();
        app.next_month();
        assert_eq!(app.month, CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(app.calendar[0].date, ymd(2024, 1, 29));
    }

    #[test]
    fn test_calendar_cursor_and_date_selection() {
        let mut app = create_test_app();
        app.move_calendar_cursor(17);
        assert_eq!(app.calendar_cursor, ymd(2024, 4, 1));
        assert_eq!(app.month, CalendarMonth::new(2024, 4).unwrap());

        app.activate_calendar_cursor();
        assert_eq!(app.selected_date, Some(ymd(2024, 4, 1)));
        assert!(app.day_list.as_ref().unwrap().is_empty());

        app.back_to_calendar();
        assert_eq!(app.selected_date, None);
        assert!(app.day_list.is_none());
    }

    #[test]
    fn test_map_click_selects_node() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");
        add_task(&mut app, &api, "b");

        let center = app.map.layout.center_of(2).unwrap();
        let screen = app.map.transform.to_screen(center);
        app.map_pointer_down(screen);
        app.map_pointer_up();

        assert_eq!(app.selected_node, Some(2));
        assert_eq!(app.focus, Focus::Map);
        assert!(app.map_view.nodes[1].selected);

        app.select_next_node();
        assert_eq!(app.selected_node, Some(1));
    }

    #[test]
    fn test_map_drag_survives_store_updates() {
        let api = FakeApi::new(ymd(2024, 3, 15));
        let mut app = create_test_app();
        app.select_date(ymd(2024, 3, 15));
        add_task(&mut app, &api, "a");

        let start = app.map.layout.position(1).unwrap();
        let screen = app.map.transform.to_screen(app.map.layout.center_of(1).unwrap());
        app.map_pointer_down(screen);
        app.map_pointer_move(Point::new(screen.x + 3.0, screen.y));
        app.map_pointer_up();
        assert_eq!(app.map_view.nodes[0].position.x, start.x + 3.0);

        app.toggle_completed(1);
        run(&mut app, &api);
        assert_eq!(app.map.layout.position(1).unwrap().x, start.x + 3.0);

        app.map_relayout();
        assert_eq!(app.map.layout.position(1), Some(start));
    }
}
