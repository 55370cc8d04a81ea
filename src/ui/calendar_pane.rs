use crate::app::AppState;
use crate::domain::{Focus, WEEKDAY_HEADERS};
use crate::ui::layout::inner_area;
use crate::ui::styles::{
    border_style, default_style, focused_border_style, has_tasks_style, outside_month_style,
    selected_style, title_style, today_style,
};
use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Terminal columns per calendar cell
const CELL_WIDTH: u16 = 4;

/// Rows above the grid: month label and weekday headers
const HEADER_ROWS: u16 = 2;

/// Index into the 42-cell grid for a terminal position inside the pane
pub fn cell_at(area: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = inner_area(area);
    if column < inner.x || row < inner.y + HEADER_ROWS {
        return None;
    }
    let col = (column - inner.x) / CELL_WIDTH;
    let line = row - inner.y - HEADER_ROWS;
    if col >= 7 || line >= 6 {
        return None;
    }
    Some((line * 7 + col) as usize)
}

/// Render the month grid
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Left;

    let mut lines = vec![
        Line::from(Span::styled(
            format!("‹ {} ›", app.month.label()),
            title_style(),
        ))
        .alignment(Alignment::Center),
        Line::from(
            WEEKDAY_HEADERS
                .iter()
                .map(|d| Span::styled(format!("{:>3} ", &d[..2]), title_style()))
                .collect::<Vec<_>>(),
        ),
    ];

    for week in app.calendar.chunks(7) {
        let spans: Vec<Span> = week
            .iter()
            .map(|cell| {
                let style = if focused && cell.date == app.calendar_cursor {
                    selected_style()
                } else if cell.is_today {
                    today_style()
                } else if !cell.in_month {
                    outside_month_style()
                } else {
                    default_style()
                };
                let marker = if cell.has_tasks { "•" } else { " " };
                Span::styled(format!("{:>3}{}", cell.date.day(), marker), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("•", has_tasks_style()),
        Span::styled(" has tasks", outside_month_style()),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                focused_border_style()
            } else {
                border_style()
            })
            .title(Span::styled(" Calendar ", title_style())),
    );

    f.render_widget(paragraph, area);
}
