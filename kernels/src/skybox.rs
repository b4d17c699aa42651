use glam::Vec3;

const HORIZON_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const ZENITH_COLOR: Vec3 = Vec3::new(0.5, 0.7, 1.0);

/// Sky color for an escaped ray. The vertical direction component is the
/// interpolation factor between horizon and zenith.
pub fn scatter(direction: Vec3) -> Vec3 {
    let t = 0.5 * (direction.y + 1.0);
    HORIZON_COLOR.lerp(ZENITH_COLOR, t)
}
