use crate::app::AppState;
use crate::domain::{Focus, Point, UiMode};
use crate::ui::calendar_pane::cell_at;
use crate::ui::layout::{canvas_center, canvas_point, create_layout, inner_area};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Rows per task in the day list
const LIST_ROW_HEIGHT: u16 = 2;

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EditingForm => handle_input_form_mode(app, key),
        UiMode::ConfirmDelete(_) => handle_confirm_delete_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.refresh(),

        // Task actions work on whatever the focus points at
        KeyCode::Char('a') | KeyCode::Char('A') => app.open_form(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_focused(),
        KeyCode::Char(' ') => app.toggle_focused(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => app.request_delete_focused(),

        _ => match app.focus {
            Focus::Left if app.day_list.is_some() => handle_list_keys(app, key),
            Focus::Left => handle_calendar_keys(app, key),
            Focus::Map => handle_map_keys(app, key),
        },
    }
    Ok(false)
}

fn handle_calendar_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.move_calendar_cursor(-1),
        KeyCode::Right => app.move_calendar_cursor(1),
        KeyCode::Up => app.move_calendar_cursor(-7),
        KeyCode::Down => app.move_calendar_cursor(7),
        KeyCode::Char('[') | KeyCode::PageUp => app.prev_month(),
        KeyCode::Char(']') | KeyCode::PageDown => app.next_month(),
        KeyCode::Enter => app.activate_calendar_cursor(),
        _ => {}
    }
}

fn handle_list_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.list_up(),
        KeyCode::Down => app.list_down(),
        KeyCode::Enter => app.start_edit_focused(),
        KeyCode::Esc | KeyCode::Backspace => app.back_to_calendar(),
        _ => {}
    }
}

fn handle_map_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.map_pan(1.0, 0.0),
        KeyCode::Right => app.map_pan(-1.0, 0.0),
        KeyCode::Up => app.map_pan(0.0, 1.0),
        KeyCode::Down => app.map_pan(0.0, -1.0),
        KeyCode::Char('+') | KeyCode::Char('=') => app.map_zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.map_zoom_out(),
        KeyCode::Char('0') => app.map_reset_view(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.select_next_node(),
        KeyCode::Char('l') | KeyCode::Char('L') => app.map_relayout(),
        KeyCode::Enter => app.start_edit_focused(),
        KeyCode::Esc => app.select_node(None),
        _ => {}
    }
}

/// Handle keys in input form mode
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => app.submit_form(),

        // Cancel form
        KeyCode::Esc => app.cancel_form(),

        // Switch between title and description
        KeyCode::Tab | KeyCode::BackTab => app.form_toggle_field(),

        KeyCode::Backspace => app.form_backspace(),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.form_char(c),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the delete confirmation is open
fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

/// Handle mouse input. `screen` is the full terminal area used for layout.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent, screen: Rect) {
    if app.ui_mode != UiMode::Normal {
        return;
    }

    let layout = create_layout(screen, app.details().is_some());
    let canvas = inner_area(layout.map_area);
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(point) = canvas_point(canvas, column, row) {
                app.map_pointer_down(point);
            } else if layout.left_area.intersects(Rect::new(column, row, 1, 1)) {
                click_left_pane(app, layout.left_area, column, row);
            }
        }
        // Drags keep tracking outside the canvas
        MouseEventKind::Drag(MouseButton::Left) => {
            let (cx, cy) = canvas_center(canvas);
            app.map_pointer_move(Point::new(column as f64 - cx, row as f64 - cy));
        }
        MouseEventKind::Up(MouseButton::Left) => app.map_pointer_up(),
        MouseEventKind::ScrollUp => {
            if let Some(point) = canvas_point(canvas, column, row) {
                app.map_wheel(point, true);
            }
        }
        MouseEventKind::ScrollDown => {
            if let Some(point) = canvas_point(canvas, column, row) {
                app.map_wheel(point, false);
            }
        }
        _ => {}
    }
}

fn click_left_pane(app: &mut AppState, area: Rect, column: u16, row: u16) {
    app.focus = Focus::Left;
    if app.day_list.is_some() {
        let inner = inner_area(area);
        if row >= inner.y {
            let index = ((row - inner.y) / LIST_ROW_HEIGHT) as usize;
            let len = app.day_list.as_ref().map_or(0, |l| l.rows.len());
            if index < len {
                app.list_index = index;
            }
        }
        return;
    }

    let Some(cell) = cell_at(area, column, row).and_then(|i| app.calendar.get(i).copied()) else {
        return;
    };
    // Days outside the displayed month are not selectable
    if cell.in_month {
        app.select_date(cell.date);
    }
}
