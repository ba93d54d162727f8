use winit::dpi::PhysicalSize;

pub type Resolution = PhysicalSize<u32>;

pub trait PhysicalSizeExt {
    fn to_vec2(&self) -> glam::Vec2;
    fn is_empty(&self) -> bool;
}

impl PhysicalSizeExt for Resolution {
    fn to_vec2(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
