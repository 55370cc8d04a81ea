use crate::app::AppState;
use crate::domain::map::{Transform, NODE_HEIGHT, NODE_WIDTH};
use crate::domain::views::{NodeCard, PLACEHOLDER_HINT, PLACEHOLDER_TITLE};
use crate::domain::{Focus, Point};
use crate::ui::layout::{canvas_center, inner_area};
use crate::ui::styles::{
    border_style, done_style, edge_style, focused_border_style, hint_style, in_progress_style,
    node_style, selected_node_style, title_style,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Smallest card drawn when zoomed out
const MIN_CARD_WIDTH: i32 = 8;
const MIN_CARD_HEIGHT: i32 = 3;

/// A card rectangle in terminal cells; may extend past the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Terminal cell for a world point
fn to_cell(canvas: Rect, transform: &Transform, world: Point) -> (i32, i32) {
    let (cx, cy) = canvas_center(canvas);
    let screen = transform.to_screen(world);
    ((cx + screen.x).round() as i32, (cy + screen.y).round() as i32)
}

/// Where a node card lands on screen at the current pan and zoom
pub fn card_rect(canvas: Rect, transform: &Transform, position: Point) -> CardRect {
    let (x, y) = to_cell(canvas, transform, position);
    CardRect {
        x,
        y,
        width: ((NODE_WIDTH * transform.scale).round() as i32).max(MIN_CARD_WIDTH),
        height: ((NODE_HEIGHT * transform.scale).round() as i32).max(MIN_CARD_HEIGHT),
    }
}

fn visible(canvas: Rect, x: i32, y: i32) -> bool {
    x >= canvas.x as i32
        && y >= canvas.y as i32
        && x < (canvas.x + canvas.width) as i32
        && y < (canvas.y + canvas.height) as i32
}

fn put(buf: &mut Buffer, canvas: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    if visible(canvas, x, y) {
        buf.get_mut(x as u16, y as u16)
            .set_symbol(symbol)
            .set_style(style);
    }
}

/// Write text starting at (x, y), at most `max` cells wide, clipped to the canvas
fn put_str(buf: &mut Buffer, canvas: Rect, x: i32, y: i32, text: &str, max: i32, style: Style) {
    let mut tmp = [0u8; 4];
    for (i, ch) in text.chars().take(max.max(0) as usize).enumerate() {
        put(buf, canvas, x + i as i32, y, ch.encode_utf8(&mut tmp), style);
    }
}

/// Straight line between two cells
fn draw_edge(buf: &mut Buffer, canvas: Rect, from: (i32, i32), to: (i32, i32)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return;
    }
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = from.0 as f64 + dx as f64 * t;
        let y = from.1 as f64 + dy as f64 * t;
        put(buf, canvas, x.round() as i32, y.round() as i32, "·", edge_style());
    }
}

fn draw_card(buf: &mut Buffer, canvas: Rect, rect: CardRect, node: &NodeCard) {
    let border = if node.selected {
        selected_node_style()
    } else {
        node_style()
    };
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;

    for y in rect.y..=bottom {
        for x in rect.x..=right {
            let symbol = match (x == rect.x, x == right, y == rect.y, y == bottom) {
                (true, _, true, _) => "╭",
                (_, true, true, _) => "╮",
                (true, _, _, true) => "╰",
                (_, true, _, true) => "╯",
                (_, _, true, _) | (_, _, _, true) => "─",
                (true, _, _, _) | (_, true, _, _) => "│",
                _ => " ",
            };
            put(buf, canvas, x, y, symbol, border);
        }
    }

    let badge_style = if node.completed {
        done_style()
    } else {
        in_progress_style()
    };
    let lines: [(&str, Style); 4] = [
        (node.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        (node.badge, badge_style),
        (node.date_label.as_str(), hint_style()),
        (node.description.as_str(), Style::default()),
    ];
    let text_width = rect.width - 2;
    for (row, (text, style)) in lines
        .iter()
        .filter(|(text, _)| !text.is_empty())
        .take((rect.height - 2).max(0) as usize)
        .enumerate()
    {
        put_str(buf, canvas, rect.x + 1, rect.y + 1 + row as i32, text, text_width, *style);
    }
}

/// Render the node map: edges first, then cards in store order
pub fn render_map_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Map;
    let title = format!(" Map · {:.0}% ", app.map.transform.scale * 100.0);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border_style()
        } else {
            border_style()
        })
        .title(Span::styled(title, title_style()));

    let view = &app.map_view;
    if view.placeholder {
        let placeholder = Paragraph::new(vec![
            Line::raw(""),
            Line::raw(""),
            Line::styled(PLACEHOLDER_TITLE, title_style()),
            Line::raw(""),
            Line::styled(PLACEHOLDER_HINT, hint_style()),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    f.render_widget(block, area);
    let canvas = inner_area(area);
    let transform = app.map.transform;
    let buf = f.buffer_mut();

    for edge in &view.edges {
        let from = to_cell(canvas, &transform, edge.start);
        let to = to_cell(canvas, &transform, edge.end);
        draw_edge(buf, canvas, from, to);
    }
    for node in &view.nodes {
        let rect = card_rect(canvas, &transform, node.position);
        draw_card(buf, canvas, rect, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(selected: bool) -> NodeCard {
        NodeCard {
            id: 1,
            title: "Buy milk".to_string(),
            date_label: "15 Mar 2024".to_string(),
            description: String::new(),
            badge: "● In progress",
            completed: false,
            selected,
            position: Point::new(0.0, 0.0),
        }
    }

    #[test]
    fn test_card_rect_follows_transform() {
        let canvas = Rect::new(0, 0, 80, 20);
        let mut transform = Transform::default();

        let rect = card_rect(canvas, &transform, Point::new(-11.0, -2.0));
        assert_eq!(
            rect,
            CardRect {
                x: 29,
                y: 8,
                width: 22,
                height: 4
            }
        );

        transform.scale = 0.5;
        transform.x = 3.0;
        let small = card_rect(canvas, &transform, Point::new(0.0, 0.0));
        assert_eq!(small.x, 43);
        assert_eq!(small.width, 11);
        assert_eq!(small.height, MIN_CARD_HEIGHT);
    }

    #[test]
    fn test_draw_card_clips_to_canvas() {
        let canvas = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(canvas);
        let rect = CardRect {
            x: 4,
            y: 1,
            width: 22,
            height: 4,
        };
        draw_card(&mut buf, canvas, rect, &card(true));

        assert_eq!(buf.get(4, 1).symbol(), "╭");
        assert_eq!(buf.get(5, 2).symbol(), "B");
        assert_eq!(buf.get(4, 4).symbol(), "╰");
        assert_eq!(buf.get(3, 1).symbol(), " ");
    }

    #[test]
    fn test_draw_edge_marks_cells() {
        let canvas = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(canvas);
        draw_edge(&mut buf, canvas, (0, 0), (4, 2));

        assert_eq!(buf.get(0, 0).symbol(), "·");
        assert_eq!(buf.get(4, 2).symbol(), "·");
        assert_eq!(buf.get(0, 4).symbol(), " ");
    }
}
