use crate::domain::DetailsView;
use crate::ui::styles::{border_style, default_style, done_style, hint_style, in_progress_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the side panel for the selected map node
pub fn render_details_pane(f: &mut Frame, details: Option<&DetailsView>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(details) = details else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Title: ", title_style()),
        Span::raw(details.title.clone()),
    ]));
    lines.push(Line::raw(""));

    let badge_style = if details.completed {
        done_style()
    } else {
        in_progress_style()
    };
    lines.push(Line::from(vec![
        Span::styled("Status:  ", title_style()),
        Span::styled(details.badge, badge_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Created: ", title_style()),
        Span::raw(details.created.clone()),
    ]));
    lines.push(Line::raw(""));

    if !details.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("Description:", title_style())));
        for text in details.description.lines() {
            lines.push(Line::raw(format!("  {}", text)));
        }
    } else {
        lines.push(Line::from(Span::styled("Description: (empty)", default_style())));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("e edit · space toggle · d delete", hint_style()));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
