use glam::Vec2;

/// Axis-aligned rectangle in pixel space, with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Rect { origin, size }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn top_left(&self) -> Vec2 {
        self.origin
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.origin + self.size
    }
}
