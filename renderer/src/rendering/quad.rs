use glam::Vec2;
use sprite_engine::math::rectangle::Rect;

use crate::rendering::{limits::VERTICES_PER_QUAD, vertex::SpriteVertex};

/// Texture coordinates for the six quad vertices, in emission order.
pub const QUAD_TEX_COORDS: [Vec2; VERTICES_PER_QUAD] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

/// Builds the two triangles covering `bounds`:
/// top-left, top-right, bottom-left, then bottom-left, top-right, bottom-right.
pub fn sprite_quad(bounds: Rect) -> [SpriteVertex; VERTICES_PER_QUAD] {
    let Vec2 { x, y } = bounds.top_left();
    let Vec2 { x: xx, y: yy } = bounds.bottom_right();

    let corners = [
        Vec2::new(x, y),
        Vec2::new(xx, y),
        Vec2::new(x, yy),
        Vec2::new(x, yy),
        Vec2::new(xx, y),
        Vec2::new(xx, yy),
    ];

    std::array::from_fn(|i| SpriteVertex::new(corners[i], QUAD_TEX_COORDS[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_layout() {
        let quad = sprite_quad(Rect::from_xywh(20.0, 0.0, 5.0, 5.0));
        let floats: &[f32] = bytemuck::cast_slice(&quad);

        #[rustfmt::skip]
        let expected = [
            20.0, 0.0, 0.0, 0.0, 0.0,
            25.0, 0.0, 0.0, 1.0, 0.0,
            20.0, 5.0, 0.0, 0.0, 1.0,
            20.0, 5.0, 0.0, 0.0, 1.0,
            25.0, 0.0, 0.0, 1.0, 0.0,
            25.0, 5.0, 0.0, 1.0, 1.0,
        ];
        assert_eq!(floats, &expected[..]);
    }

    #[test]
    fn test_tex_coords_match_corners() {
        let quad = sprite_quad(Rect::from_xywh(0.0, 0.0, 1.0, 1.0));
        // Unit quad at the origin, so positions equal texture coordinates
        for vertex in &quad {
            assert_eq!(vertex.position[0], vertex.tex_coord[0]);
            assert_eq!(vertex.position[1], vertex.tex_coord[1]);
            assert_eq!(vertex.position[2], 0.0);
        }
    }
}
