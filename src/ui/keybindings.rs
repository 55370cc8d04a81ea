use crate::app::AppState;
use crate::domain::{Focus, UiMode};
use crate::notifications::NoticeKind;
use crate::ui::styles::{error_style, hint_style, success_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current mode and focus
fn hints(app: &AppState) -> &'static str {
    match (app.ui_mode, app.focus, app.selected_date.is_some()) {
        (UiMode::EditingForm, _, _) => " Tab field   Enter save   Esc cancel",
        (UiMode::ConfirmDelete(_), _, _) => " y delete   n cancel",
        (UiMode::Normal, Focus::Left, false) => {
            " ←↑↓→ day   [ ] month   Enter open   Tab map   r refresh   q quit"
        }
        (UiMode::Normal, Focus::Left, true) => {
            " ↑/↓ select   a add   e edit   space toggle   d delete   Esc calendar   Tab map   q quit"
        }
        (UiMode::Normal, Focus::Map, _) => {
            " ←↑↓→ pan   +/- zoom   0 reset   n next   l relayout   e edit   space toggle   d delete   Tab list   q quit"
        }
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints(app))).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status line: latest notice, or a short summary
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match app.notices.latest() {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Success => success_style(),
                NoticeKind::Error => error_style(),
            };
            Line::from(Span::styled(format!(" {}", notice.message), style))
        }
        None if app.pending.is_listing() => Line::styled(" Loading tasks…", hint_style()),
        None if app.store.is_empty() => Line::styled(" No tasks", hint_style()),
        None => Line::styled(format!(" {} tasks", app.store.len()), hint_style()),
    };
    f.render_widget(Paragraph::new(line), area);
}
