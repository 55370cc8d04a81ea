use crate::domain::Point;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Width of the calendar / day list pane (7 columns of 4 cells plus borders)
pub const LEFT_PANE_WIDTH: u16 = 32;

/// Width of the details panel shown next to the map
pub const DETAILS_WIDTH: u16 = 34;

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub left_area: Rect,
    pub map_area: Rect,
    pub details_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Left pane (calendar or day list) | Map | Details (when a node is selected)
/// - Bottom bar: status notices (1 row)
pub fn create_layout(area: Rect, show_details: bool) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let content_area = main_chunks[1];

    let (left_area, map_area, details_area) = if show_details {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(LEFT_PANE_WIDTH),
                Constraint::Min(0),
                Constraint::Length(DETAILS_WIDTH),
            ])
            .split(content_area);
        (horizontal[0], horizontal[1], Some(horizontal[2]))
    } else {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LEFT_PANE_WIDTH), Constraint::Min(0)])
            .split(content_area);
        (horizontal[0], horizontal[1], None)
    };

    MainLayout {
        keybindings_area: main_chunks[0],
        left_area,
        map_area,
        details_area,
        status_area: main_chunks[2],
    }
}

/// Drawable part of a bordered pane
pub fn inner_area(area: Rect) -> Rect {
    area.inner(&Margin {
        horizontal: 1,
        vertical: 1,
    })
}

/// Map-pane coordinates of a terminal cell, relative to the canvas center.
///
/// Returns None when the cell is outside the canvas.
pub fn canvas_point(canvas: Rect, column: u16, row: u16) -> Option<Point> {
    let inside = column >= canvas.x
        && column < canvas.x + canvas.width
        && row >= canvas.y
        && row < canvas.y + canvas.height;
    if !inside {
        return None;
    }
    let (cx, cy) = canvas_center(canvas);
    Some(Point::new(column as f64 - cx, row as f64 - cy))
}

/// Center of the canvas in terminal cells
pub fn canvas_center(canvas: Rect) -> (f64, f64) {
    (
        canvas.x as f64 + (canvas.width / 2) as f64,
        canvas.y as f64 + (canvas.height / 2) as f64,
    )
}

/// Create centered modal area
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = create_layout(area, false);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.left_area.width, LEFT_PANE_WIDTH);
        assert_eq!(layout.map_area.width, 120 - LEFT_PANE_WIDTH);
        assert!(layout.details_area.is_none());

        let with_details = create_layout(area, true);
        assert_eq!(with_details.details_area.map(|r| r.width), Some(DETAILS_WIDTH));
        assert_eq!(with_details.map_area.width, 120 - LEFT_PANE_WIDTH - DETAILS_WIDTH);
    }

    #[test]
    fn test_canvas_point() {
        let canvas = Rect::new(10, 5, 40, 20);
        assert_eq!(canvas_point(canvas, 30, 15), Some(Point::new(0.0, 0.0)));
        assert_eq!(canvas_point(canvas, 10, 5), Some(Point::new(-20.0, -10.0)));
        assert_eq!(canvas_point(canvas, 9, 5), None);
        assert_eq!(canvas_point(canvas, 50, 5), None);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
