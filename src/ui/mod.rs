pub mod calendar_pane;
pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod map_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use calendar_pane::render_calendar_pane;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use map_pane::render_map_pane;
use modal::render_delete_modal;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let details = app.details();
    let layout = create_layout(size, details.is_some());

    render_keybindings(f, app, layout.keybindings_area);

    // Left pane shows the day list once a date is picked
    match &app.day_list {
        Some(list) => render_list_pane(f, app, list, layout.left_area),
        None => render_calendar_pane(f, app, layout.left_area),
    }

    render_map_pane(f, app, layout.map_area);

    if let Some(details_area) = layout.details_area {
        render_details_pane(f, details.as_ref(), details_area);
    }

    render_status_line(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::EditingForm => render_input_form(f, app, size),
        UiMode::ConfirmDelete(_) => render_delete_modal(f, app, size),
        UiMode::Normal => {}
    }
}
