use glam::{Vec3, Vec4Swizzles};
use shared_structs::{
    Material, MATERIAL_DIFFUSE, MATERIAL_GLAZING, MATERIAL_MIRROR,
};

use crate::intersect::{HitRecord, Ray};
use crate::rng::RngState;
use crate::util;

/// Continuation of a path after a surface interaction.
pub struct ScatterSample {
    pub direction: Vec3,
    /// Color throughput multiplier for this bounce.
    pub attenuation: Vec3,
}

/// Sample the outgoing direction for a surface interaction. `None` means the
/// path terminates here: emitters and unknown material kinds absorb.
pub fn scatter(
    material: &Material,
    ray: &Ray,
    hit: &HitRecord,
    rng: &mut RngState,
) -> Option<ScatterSample> {
    let tint = material.color.xyz() * material.attenuation;
    match material.kind {
        MATERIAL_DIFFUSE => {
            let r = rng.gen_r2();
            let sample = util::cosine_sample_hemisphere(r.x, r.y);
            let (up, nt, nb) = util::create_cartesian(hit.normal);
            let direction = (nt * sample.x + up * sample.y + nb * sample.z).normalize();
            Some(ScatterSample {
                direction,
                attenuation: tint,
            })
        }
        MATERIAL_MIRROR => Some(ScatterSample {
            direction: util::reflect(ray.direction, hit.normal).normalize(),
            attenuation: tint,
        }),
        MATERIAL_GLAZING => {
            let (in_ior, out_ior) = if hit.from_inside {
                (material.ior, 1.0)
            } else {
                (1.0, material.ior)
            };
            let cos_theta = (-ray.direction).dot(hit.normal).clamp(0.0, 1.0);
            let reflect_prob = util::fresnel_schlick_scalar(in_ior, out_ior, cos_theta);
            let direction = if rng.gen_r1() < reflect_prob {
                util::reflect(ray.direction, hit.normal)
            } else {
                let refracted = util::refract(ray.direction, hit.normal, in_ior, out_ior);
                if refracted == Vec3::ZERO {
                    // Total internal reflection.
                    util::reflect(ray.direction, hit.normal)
                } else {
                    refracted
                }
            };
            Some(ScatterSample {
                direction: direction.normalize(),
                attenuation: tint,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(normal: Vec3, from_inside: bool) -> HitRecord {
        HitRecord {
            t: 1.0,
            point: Vec3::ZERO,
            normal,
            from_inside,
            material: 0,
        }
    }

    #[test]
    fn diffuse_samples_stay_in_the_normal_hemisphere() {
        let material = Material::diffuse(Vec3::ONE);
        let hit = hit_at(Vec3::Y, false);
        let ray = Ray::new(Vec3::new(0.0, 2.0, -2.0), Vec3::new(0.0, -1.0, 1.0));
        let mut rng = RngState::from_pixel(0, 0);
        for _ in 0..128 {
            let sample = scatter(&material, &ray, &hit, &mut rng).unwrap();
            assert!(sample.direction.dot(hit.normal) >= 0.0);
            assert!((sample.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn mirror_reflects_about_the_normal() {
        let material = Material::mirror(Vec3::ONE);
        let hit = hit_at(Vec3::Y, false);
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);
        let mut rng = RngState::from_pixel(0, 0);
        let sample = scatter(&material, &ray, &hit, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(sample.direction.dot(expected) > 0.9999);
    }

    #[test]
    fn glazing_total_internal_reflection_stays_inside() {
        let material = Material::glazing(Vec3::ONE, 1.5);
        // Grazing exit attempt from inside the dense medium, well past the
        // critical angle.
        let hit = hit_at(Vec3::Y, true);
        let incoming = Vec3::new(0.95, -0.05, 0.0).normalize();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), incoming);
        let mut rng = RngState::from_pixel(0, 0);
        let sample = scatter(&material, &ray, &hit, &mut rng).unwrap();
        assert!(sample.direction.y > 0.0);
    }

    #[test]
    fn emitters_absorb() {
        let material = Material::emitter(Vec3::ONE);
        let hit = hit_at(Vec3::Y, false);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        let mut rng = RngState::from_pixel(0, 0);
        assert!(scatter(&material, &ray, &hit, &mut rng).is_none());
    }
}
