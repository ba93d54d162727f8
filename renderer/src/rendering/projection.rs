use glam::{Mat4, Vec4};

use crate::rendering::resolution::Resolution;

/// Orthographic projection from pixel coordinates to clip space.
///
/// Pixel (0, 0) is the top-left corner and maps to (-1, 1); (width, height) maps to (1, -1).
/// Row-major this is `[[2/w, 0, 0, -1], [0, -2/h, 0, 1], [0, 0, 1, 0], [0, 0, 0, 1]]`.
pub fn pixel_projection(resolution: Resolution) -> Mat4 {
    let width = resolution.width.max(1) as f32;
    let height = resolution.height.max(1) as f32;

    Mat4::from_cols(
        Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -2.0 / height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(-1.0, 1.0, 0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_corners_map_to_clip_space() {
        let projection = pixel_projection(Resolution::new(800, 600));

        let top_left = projection.project_point3(Vec3::new(0.0, 0.0, 0.0));
        let bottom_right = projection.project_point3(Vec3::new(800.0, 600.0, 0.0));
        let center = projection.project_point3(Vec3::new(400.0, 300.0, 0.0));

        assert!(top_left.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-6));
        assert!(bottom_right.abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-6));
        assert!(center.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_row_major_layout() {
        let projection = pixel_projection(Resolution::new(4, 2));
        let rows = projection.transpose().to_cols_array_2d();

        assert_eq!(
            rows,
            [
                [0.5, 0.0, 0.0, -1.0],
                [0.0, -1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }
}
