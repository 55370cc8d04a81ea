pub mod calendar;
pub mod enums;
pub mod form;
pub mod map;
pub mod store;
pub mod task;
pub mod views;

pub use calendar::{build_month_grid, CalendarCell, CalendarMonth, WEEKDAY_HEADERS};
pub use enums::{Focus, FormField, FormMode, UiMode};
pub use form::TaskForm;
pub use map::{LayoutConfig, MapState, Point};
pub use store::TaskStore;
pub use task::{Task, TaskDraft, TaskId};
pub use views::{build_day_list, build_details, build_map_view, DayListView, DetailsView, MapView};
