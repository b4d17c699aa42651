use glam::{Quat, Vec2, Vec4Swizzles};
use shared_structs::Camera;

use crate::intersect::Ray;

/// Generate the primary ray for a pixel. Pure function of camera state,
/// pixel coordinates and the sub-pixel jitter in `[0, 1)^2`.
///
/// Both modes anchor their angular/planar offsets at `extent as f32 / 2.0`,
/// identically for rows and columns. In panoramic mode this keeps columns
/// `x` and `width - x` symmetric about the view axis, so a full 360 degree
/// sweep meets itself without a seam.
pub fn primary_ray(camera: &Camera, x: u32, y: u32, jitter: Vec2) -> Ray {
    if camera.is_panoramic() {
        panoramic_ray(camera, x, y, jitter)
    } else {
        perspective_ray(camera, x, y, jitter)
    }
}

fn perspective_ray(camera: &Camera, x: u32, y: u32, jitter: Vec2) -> Ray {
    let u = ((x as f32 + jitter.x) / camera.width as f32) * 2.0 - 1.0;
    let v = ((y as f32 + jitter.y) / camera.height as f32) * 2.0 - 1.0;
    let direction = -u * camera.aspect * camera.basis_x.xyz() - v * camera.basis_y.xyz()
        + camera.plane_dist * camera.basis_z.xyz();
    Ray::new(camera.origin.xyz(), direction)
}

// The view axis is rotated vertically first (half-height anchored), then
// horizontally per pixel, each time about an axis re-derived perpendicular
// to the current direction. No projection plane, so a 360x180 sweep has no
// singularity at the poles of the view.
fn panoramic_ray(camera: &Camera, x: u32, y: u32, jitter: Vec2) -> Ray {
    let vert_deg = (y as f32 + jitter.y - camera.height as f32 / 2.0) * camera.angle_step;
    let horiz_deg = (x as f32 + jitter.x - camera.width as f32 / 2.0) * camera.angle_step;

    let right = camera.basis_x.xyz();
    // Rows below the center row tilt the axis toward negative elevation.
    let tilted = Quat::from_axis_angle(right, -vert_deg.to_radians()) * camera.basis_z.xyz();
    let local_up = right.cross(tilted).normalize();
    let direction = Quat::from_axis_angle(local_up, horiz_deg.to_radians()) * tilted;

    Ray {
        origin: camera.origin.xyz(),
        direction: direction.normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn forward_camera(width: u32, height: u32, fov: f32, step: f32) -> Camera {
        Camera::look_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::Y,
            width,
            height,
            fov,
            step,
        )
    }

    #[test]
    fn perspective_center_pixel_looks_forward() {
        let camera = forward_camera(64, 64, 90.0, 0.0);
        let ray = primary_ray(&camera, 32, 32, Vec2::ZERO);
        assert!(ray.direction.dot(Vec3::new(0.0, 0.0, 1.0)) > 0.9999);
    }

    #[test]
    fn perspective_directions_are_normalized() {
        let camera = forward_camera(64, 48, 60.0, 0.0);
        for &(x, y) in &[(0, 0), (63, 0), (0, 47), (63, 47), (20, 30)] {
            let ray = primary_ray(&camera, x, y, Vec2::ZERO);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn panoramic_center_pixel_looks_forward() {
        let camera = forward_camera(360, 180, 180.0, 1.0);
        let ray = primary_ray(&camera, 180, 90, Vec2::ZERO);
        assert!(ray.direction.dot(Vec3::new(0.0, 0.0, 1.0)) > 0.9999);
    }

    // Columns x and width - x mirror about the vertical plane through the
    // view axis. This pins the seam behavior of the offset rounding rule.
    #[test]
    fn panoramic_columns_mirror_about_view_axis() {
        let width = 360;
        let camera = forward_camera(width, 180, 180.0, 1.0);
        let forward = Vec3::new(0.0, 0.0, 1.0);
        let right = camera.basis_x.truncate();
        for k in [1u32, 45, 90, 179] {
            let a = primary_ray(&camera, width / 2 - k, 60, Vec2::ZERO).direction;
            let b = primary_ray(&camera, width / 2 + k, 60, Vec2::ZERO).direction;
            assert!((a.y - b.y).abs() < 1e-5);
            assert!((a.dot(forward) - b.dot(forward)).abs() < 1e-5);
            assert!((a.dot(right) + b.dot(right)).abs() < 1e-5);
        }
    }

    #[test]
    fn panoramic_full_sweep_covers_the_back() {
        let camera = forward_camera(360, 180, 180.0, 1.0);
        // 180 degrees away from the center column.
        let ray = primary_ray(&camera, 0, 90, Vec2::ZERO);
        assert!(ray.direction.dot(Vec3::new(0.0, 0.0, 1.0)) < -0.9999);
    }
}
