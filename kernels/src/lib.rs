//! Per-pixel kernels. Every public function here is a pure map from one
//! pixel's inputs to that pixel's outputs, with no shared mutable state, so
//! the host may dispatch them over pixel indices in any order or in parallel.

use glam::{Vec2, Vec3, Vec4Swizzles};
use shared_structs::{
    Camera, RenderConfig, ResolvePolicy, LABEL_ABSORBED, LABEL_BACKGROUND, MATERIAL_EMITTER,
};

pub mod camera;
pub mod filter;
pub mod intersect;
pub mod rng;
pub mod scatter;
pub mod skybox;
pub mod util;

use intersect::{Ray, SceneView};
use rng::RngState;

/// Everything the shading loop produces for one pixel in one frame.
#[derive(Copy, Clone, Debug)]
pub struct PixelSample {
    /// Accumulated attenuation, the ray-color channel.
    pub color: Vec3,
    /// Accumulated direct lighting and emission.
    pub light: Vec3,
    /// First-bounce hit distance in world units, infinite on miss.
    pub depth: f32,
    /// First-hit material id, or a sentinel label.
    pub label: i32,
}

/// Seeded random stream for one pixel of one frame. Ray generation and
/// shading both derive their streams from this, so a frame re-rendered at the
/// same tick reproduces identical noise.
pub fn pixel_rng(camera: &Camera, tick: u32, x: u32, y: u32) -> RngState {
    RngState::from_pixel(tick, y * camera.width + x)
}

/// Primary-ray kernel: one jittered camera ray per pixel.
pub fn raygen_pixel(camera: &Camera, tick: u32, x: u32, y: u32) -> Ray {
    let mut rng = pixel_rng(camera, tick, x, y);
    let jitter: Vec2 = rng.gen_r2();
    camera::primary_ray(camera, x, y, jitter)
}

/// Intersection + shading kernel. Walks up to `max_bounces` path segments,
/// multiplying attenuation per surface and gathering direct light with one
/// shadow ray per registered emitter per bounce.
pub fn trace_pixel(
    config: &RenderConfig,
    scene: &SceneView,
    mut ray: Ray,
    rng: &mut RngState,
) -> PixelSample {
    let policy = ResolvePolicy::from_u32(config.resolve_policy);
    let mut attenuation = Vec3::ONE;
    let mut light = Vec3::ZERO;
    let mut depth = f32::INFINITY;
    let mut label = LABEL_BACKGROUND;

    for bounce in 0..config.max_bounces {
        let hit = scene.resolve_hit(&ray, util::EPS, policy);
        if !hit.is_hit() {
            attenuation *= skybox::scatter(ray.direction);
            break;
        }

        if bounce == 0 {
            depth = hit.t;
            label = hit.material;
        }

        let Some(material) = scene.material(hit.material) else {
            // Scene handed the kernel a dangling material id; terminate the
            // path rather than index out of bounds.
            if bounce == 0 {
                label = LABEL_ABSORBED;
            }
            break;
        };

        if material.kind == MATERIAL_EMITTER {
            light += attenuation * material.color.xyz();
            break;
        }

        let Some(sample) = scatter::scatter(material, &ray, &hit, rng) else {
            if bounce == 0 {
                label = LABEL_ABSORBED;
            }
            break;
        };

        for &light_index in scene.lights {
            let emitter_sphere = &scene.spheres[light_index as usize];
            let Some(emitter) = scene.material(emitter_sphere.material) else {
                continue;
            };
            let to_light = emitter_sphere.center() - hit.point;
            let distance = to_light.length();
            let direction = to_light / distance;
            let lambert = hit.normal.dot(direction);
            if lambert <= 0.0 {
                continue;
            }
            // Stop the occlusion segment at the emitter's surface, not its
            // center, so the emitter itself never shadows the sample.
            let max_t = distance - emitter_sphere.radius - util::EPS;
            if max_t <= util::EPS {
                continue;
            }
            let shadow = Ray {
                origin: hit.point + hit.normal * util::EPS,
                direction,
            };
            if scene.occluded(&shadow, util::EPS, max_t) {
                continue;
            }
            let alignment = util::reflect(ray.direction, hit.normal)
                .dot(direction)
                .max(0.0);
            let specular = alignment.powf(material.reflectivity);
            let contribution =
                emitter.color.xyz() * lambert * (material.color.xyz() + Vec3::splat(specular));
            light += attenuation * contribution;
        }

        attenuation *= sample.attenuation;
        ray = Ray {
            origin: hit.point + sample.direction * util::EPS,
            direction: sample.direction,
        };
    }

    PixelSample {
        color: util::mask_nan(attenuation),
        light: util::mask_nan(light),
        depth,
        label,
    }
}
