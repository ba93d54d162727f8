use glam::Vec2;

use crate::math::rectangle::Rect;

/// Stable index of a sprite slot inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(usize);

impl SpriteId {
    pub fn new(index: usize) -> Self {
        SpriteId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A pooled sprite. The payload fields are plain data: the pool and the renderer only read
/// `position` and `size`, everything else belongs to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    id: SpriteId,
    pub(crate) allocated: bool,

    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub size: Vec2,
    pub life: f32,
}

impl Sprite {
    pub(crate) fn new(id: SpriteId) -> Self {
        Sprite {
            id,
            allocated: false,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            size: Vec2::ZERO,
            life: 0.0,
        }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn initialize(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.position = Vec2::new(x, y);
        self.size = Vec2::new(width, height);
        self
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    pub fn set_life(&mut self, life: f32) -> &mut Self {
        self.life = life;
        self
    }

    /// Zeroes the payload. The id and allocation flag are left alone.
    pub fn reset(&mut self) -> &mut Self {
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.size = Vec2::ZERO;
        self.life = 0.0;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn has_default_payload(&self) -> bool {
        self.position == Vec2::ZERO
            && self.velocity == Vec2::ZERO
            && self.acceleration == Vec2::ZERO
            && self.size == Vec2::ZERO
            && self.life == 0.0
    }
}
