use crate::app::AppState;
use crate::domain::views::TaskRow;
use crate::domain::{DayListView, Focus};
use crate::ui::styles::{
    border_style, default_style, done_style, focused_border_style, hint_style, in_progress_style,
    pending_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the task list for the selected day
pub fn render_list_pane(f: &mut Frame, app: &AppState, list: &DayListView, area: Rect) {
    let focused = app.focus == Focus::Left;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border_style()
        } else {
            border_style()
        })
        .title(Span::styled(format!(" {} ", list.heading), title_style()));

    if list.is_empty() {
        let empty = Paragraph::new(vec![
            Line::raw(""),
            Line::raw("No tasks for this day"),
            Line::raw(""),
            Line::styled("a add · Esc calendar", hint_style()),
        ])
        .block(block)
        .wrap(Wrap { trim: false });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = list
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if focused && idx == app.list_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(create_row_lines(row)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Two lines per task: checkbox and title, then the status badge
fn create_row_lines(row: &TaskRow) -> Vec<Line<'static>> {
    let check = if row.completed { "[x] " } else { "[ ] " };
    let mut title = vec![Span::raw(check), Span::raw(row.title.clone())];
    if row.pending {
        title.push(Span::styled(" …", pending_style()));
    }

    let badge_style = if row.completed {
        done_style()
    } else {
        in_progress_style()
    };
    let mut detail = vec![Span::raw("    "), Span::styled(row.badge, badge_style)];
    if !row.description.is_empty() {
        detail.push(Span::styled(format!("  {}", row.description), hint_style()));
    }

    vec![Line::from(title), Line::from(detail)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(completed: bool, pending: bool) -> TaskRow {
        TaskRow {
            id: 1,
            title: "Buy milk".to_string(),
            description: String::new(),
            completed,
            badge: if completed { "✔ Done" } else { "● In progress" },
            pending,
        }
    }

    #[test]
    fn test_row_lines() {
        let lines = create_row_lines(&row(false, false));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "[ ] ");
        assert_eq!(lines[1].spans[1].content, "● In progress");

        let pending = create_row_lines(&row(true, true));
        assert_eq!(pending[0].spans[0].content, "[x] ");
        assert_eq!(pending[0].spans.len(), 3);
    }
}
