use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the pane that has keyboard focus
pub fn focused_border_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Success notice style
pub fn success_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default().fg(Color::Green)
}

/// In-progress badge style
pub fn in_progress_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Task with a request in flight
pub fn pending_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Calendar: today's cell
pub fn today_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Calendar: day outside the displayed month
pub fn outside_month_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Calendar: marker for days with tasks
pub fn has_tasks_style() -> Style {
    Style::default().fg(Color::Magenta)
}

/// Map: connecting lines
pub fn edge_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Map: node card border
pub fn node_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Map: border of the selected node
pub fn selected_node_style() -> Style {
    Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}
