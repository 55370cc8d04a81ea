use crate::app::AppState;
use crate::domain::views::format_day_label;
use crate::domain::{FormField, FormMode};
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the create/edit task form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let form = &app.form;
    let modal_area = create_modal_area(area, 14);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = match form.mode {
        FormMode::Create => " Add Task ".to_string(),
        FormMode::Edit(id) => format!(" Edit Task #{} ", id),
    };

    let mut lines = vec![Line::raw("")];

    let date = match app.selected_date {
        Some(date) => format_day_label(date),
        None => "no date selected".to_string(),
    };
    if form.mode == FormMode::Create {
        lines.push(Line::from(vec![
            Span::raw("Date: "),
            Span::styled(date, modal_title_style()),
        ]));
        lines.push(Line::raw(""));
    }

    for (field, label, value) in [
        (FormField::Title, "Title:", &form.title),
        (FormField::Description, "Description:", &form.description),
    ] {
        let editing = form.field == field;
        lines.push(Line::raw(if editing {
            format!("{} (editing)", label)
        } else {
            label.to_string()
        }));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(value.clone(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]));
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        format!(
            "Tab switch field  ·  Enter {}  ·  Esc cancel",
            form.mode.submit_label()
        ),
        hint_style(),
    ));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
