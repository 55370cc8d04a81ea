use super::store::TaskStore;
use super::task::TaskId;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Zoom bounds for the node map
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;

/// Multiplicative zoom steps (wheel ticks and zoom keys)
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const KEY_ZOOM_IN: f64 = 1.2;
pub const KEY_ZOOM_OUT: f64 = 0.8;

/// Nodes per ring before the layout moves outward
pub const SLOTS_PER_RING: usize = 12;

/// Node card size in world units (one unit = one terminal cell at scale 1)
pub const NODE_WIDTH: f64 = 22.0;
pub const NODE_HEIGHT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan/zoom state of the map canvas.
///
/// Screen coordinates are relative to the center of the map pane, so the
/// default transform puts the world origin in the middle of the pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.x) / self.scale, (screen.y - self.y) / self.scale)
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.scale + self.x, world.y * self.scale + self.y)
    }

    /// Zoom by `factor` keeping the point under `cursor` fixed
    pub fn zoom_at(&mut self, cursor: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.x = cursor.x - (cursor.x - self.x) * ratio;
        self.y = cursor.y - (cursor.y - self.y) * ratio;
        self.scale = new_scale;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ring layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub base_radius: f64,
    pub ring_spacing: f64,
    /// Vertical squash applied to ring points (terminal cells are taller than wide)
    pub aspect: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 30.0,
            ring_spacing: 14.0,
            aspect: 0.5,
        }
    }
}

/// Initial node position (top-left corner) for the task at `seq` in store order.
///
/// Ring `seq / 12`, slot `seq % 12`, nodes centered on the ring point around
/// the world origin.
pub fn seed_position(seq: usize, config: &LayoutConfig) -> Point {
    let ring = (seq / SLOTS_PER_RING) as f64;
    let slot = (seq % SLOTS_PER_RING) as f64;
    let angle = slot * (2.0 * PI / SLOTS_PER_RING as f64);
    let radius = config.base_radius + ring * config.ring_spacing;
    Point::new(
        angle.cos() * radius - NODE_WIDTH / 2.0,
        angle.sin() * radius * config.aspect - NODE_HEIGHT / 2.0,
    )
}

/// A connecting line between two node centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: TaskId,
    pub to: TaskId,
    pub start: Point,
    pub end: Point,
}

/// Node positions and chain edges for the map view
#[derive(Debug, Clone, Default)]
pub struct MapLayout {
    config: LayoutConfig,
    order: Vec<TaskId>,
    positions: HashMap<TaskId, Point>,
}

impl MapLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            order: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Follow the store: keep known positions, seed new tasks, drop removed ones
    pub fn sync(&mut self, store: &TaskStore) {
        self.order = store.iter().map(|t| t.id).collect();
        self.positions.retain(|id, _| store.get(*id).is_some());
        for (seq, id) in self.order.iter().enumerate() {
            let config = self.config;
            self.positions
                .entry(*id)
                .or_insert_with(|| seed_position(seq, &config));
        }
    }

    /// Forget dragged positions and re-seed every node
    pub fn reseed(&mut self) {
        self.positions = self
            .order
            .iter()
            .enumerate()
            .map(|(seq, id)| (*id, seed_position(seq, &self.config)))
            .collect();
    }

    pub fn order(&self) -> &[TaskId] {
        &self.order
    }

    pub fn position(&self, id: TaskId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn center_of(&self, id: TaskId) -> Option<Point> {
        self.position(id)
            .map(|p| Point::new(p.x + NODE_WIDTH / 2.0, p.y + NODE_HEIGHT / 2.0))
    }

    pub fn move_node(&mut self, id: TaskId, dx: f64, dy: f64) {
        if let Some(p) = self.positions.get_mut(&id) {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Topmost node under a world point (later nodes draw on top)
    pub fn node_at(&self, world: Point) -> Option<TaskId> {
        self.order.iter().rev().copied().find(|id| {
            self.position(*id).is_some_and(|p| {
                world.x >= p.x
                    && world.x < p.x + NODE_WIDTH
                    && world.y >= p.y
                    && world.y < p.y + NODE_HEIGHT
            })
        })
    }

    /// Chain edges: node i to node i+1 in store order
    pub fn edges(&self) -> Vec<Edge> {
        self.order
            .windows(2)
            .filter_map(|pair| {
                let start = self.center_of(pair[0])?;
                let end = self.center_of(pair[1])?;
                Some(Edge {
                    from: pair[0],
                    to: pair[1],
                    start,
                    end,
                })
            })
            .collect()
    }
}

/// The gesture currently owned by the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    DraggingNode { id: TaskId, last: Point, moved: bool },
    Panning { last: Point },
}

/// Single dispatcher for pointer events on the map.
///
/// A press on a node starts a drag, a press on empty canvas starts a pan.
/// Only one gesture exists at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDispatcher {
    gesture: Gesture,
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }
}

impl PointerDispatcher {
    #[cfg(test)]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[cfg(test)]
    pub fn dragging(&self) -> Option<TaskId> {
        match self.gesture {
            Gesture::DraggingNode { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, screen: Point, layout: &MapLayout, transform: &Transform) {
        let world = transform.to_world(screen);
        self.gesture = match layout.node_at(world) {
            Some(id) => Gesture::DraggingNode {
                id,
                last: screen,
                moved: false,
            },
            None => Gesture::Panning { last: screen },
        };
    }

    /// Returns true when the move changed a node position or the transform
    pub fn pointer_move(&mut self, screen: Point, layout: &mut MapLayout, transform: &mut Transform) -> bool {
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::DraggingNode { id, last, moved } => {
                let dx = (screen.x - last.x) / transform.scale;
                let dy = (screen.y - last.y) / transform.scale;
                layout.move_node(*id, dx, dy);
                *last = screen;
                *moved = true;
                true
            }
            Gesture::Panning { last } => {
                transform.pan_by(screen.x - last.x, screen.y - last.y);
                *last = screen;
                true
            }
        }
    }

    /// Ends the gesture. Returns the node id if it was a click (press and
    /// release on a node without moving).
    pub fn pointer_up(&mut self) -> Option<TaskId> {
        let clicked = match self.gesture {
            Gesture::DraggingNode { id, moved: false, .. } => Some(id),
            _ => None,
        };
        self.gesture = Gesture::Idle;
        clicked
    }
}

/// Everything the map view owns: layout, transform and the active gesture
#[derive(Debug, Clone, Default)]
pub struct MapState {
    pub layout: MapLayout,
    pub transform: Transform,
    pub pointer: PointerDispatcher,
}

impl MapState {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            layout: MapLayout::new(config),
            transform: Transform::default(),
            pointer: PointerDispatcher::default(),
        }
    }

    pub fn wheel(&mut self, cursor: Point, zoom_in: bool) {
        let factor = if zoom_in { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.transform.zoom_at(cursor, factor);
    }

    /// Key zoom around the pane center
    pub fn zoom_in(&mut self) {
        self.transform.zoom_at(Point::default(), KEY_ZOOM_IN);
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_at(Point::default(), KEY_ZOOM_OUT);
    }

    pub fn reset_view(&mut self) {
        self.transform.reset();
    }

    pub fn pointer_down(&mut self, screen: Point) {
        self.pointer.pointer_down(screen, &self.layout, &self.transform);
    }

    pub fn pointer_move(&mut self, screen: Point) -> bool {
        self.pointer
            .pointer_move(screen, &mut self.layout, &mut self.transform)
    }

    pub fn pointer_up(&mut self) -> Option<TaskId> {
        self.pointer.pointer_up()
    }
}
