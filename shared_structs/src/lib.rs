//! Plain-old-data types shared between the host side and the per-pixel
//! kernels. Everything here is `#[repr(C)]` and `bytemuck::Pod` so the same
//! layouts work as flat device buffers.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

/// Diffuse surface, cosine-weighted scattering.
pub const MATERIAL_DIFFUSE: u32 = 0;
/// Perfect mirror, reflects about the surface normal.
pub const MATERIAL_MIRROR: u32 = 1;
/// Semi-transparent glazing, pass-through or refraction.
pub const MATERIAL_GLAZING: u32 = 2;
/// Light emitter, absorbs incoming rays and feeds shadow-ray lighting.
pub const MATERIAL_EMITTER: u32 = 3;

/// Sentinel material id meaning "no material".
pub const MATERIAL_NONE: i32 = -1;
/// Label written when the primary ray escapes into the sky.
pub const LABEL_BACKGROUND: i32 = -1;
/// Label written when the first surface absorbs the ray without scattering.
pub const LABEL_ABSORBED: i32 = -2;

/// Hit-resolution policy, selected once per render session.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[repr(u32)]
pub enum ResolvePolicy {
    /// Plain nearest hit across all primitive families.
    #[default]
    ClosestOpaque = 0,
    /// Two-hit mode: a nearest glazing surface is seen through to the
    /// non-glazing surface behind it when one exists.
    ClosestWithTransparencySkip = 1,
}

impl ResolvePolicy {
    pub fn from_u32(val: u32) -> Self {
        match val {
            1 => Self::ClosestWithTransparencySkip,
            _ => Self::ClosestOpaque,
        }
    }

    pub fn to_u32(self) -> u32 {
        self as u32
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub max_bounces: u32,
    /// Frame counter. Seeds the per-pixel random streams and drives the
    /// temporal filter weights.
    pub tick: u32,
    /// `ResolvePolicy` as u32.
    pub resolve_policy: u32,
    /// Side length of the spatial box filter window. 0 disables the pass.
    pub spatial_window: u32,
    /// Steady-state weight of the temporal exponential moving average.
    pub filter_exponent: f32,
    pub _pad: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_bounces: 4,
            tick: 0,
            resolve_policy: ResolvePolicy::ClosestOpaque.to_u32(),
            spatial_window: 0,
            filter_exponent: 0.2,
            _pad: 0,
        }
    }
}

/// Camera state with a precomputed orthonormal basis. Immutable per frame;
/// build a new value whenever viewpoint or resolution changes.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Camera {
    pub origin: Vec4,
    pub basis_x: Vec4,
    pub basis_y: Vec4,
    pub basis_z: Vec4,
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees. Exactly 180 selects the panoramic
    /// ray path, which has no projection-plane singularity.
    pub vertical_fov: f32,
    /// Per-pixel angular step in degrees, panoramic mode only.
    pub angle_step: f32,
    /// 1 / tan(fov / 2). Unused (zero) in panoramic mode.
    pub plane_dist: f32,
    pub aspect: f32,
    pub _pad: [u32; 2],
}

impl Camera {
    /// Derive the camera basis from origin / look-at / up. The caller is
    /// responsible for supplying finite, non-degenerate parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        origin: Vec3,
        target: Vec3,
        up: Vec3,
        width: u32,
        height: u32,
        vertical_fov: f32,
        angle_step: f32,
    ) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(up.normalize()).normalize();
        let true_up = right.cross(forward);
        let plane_dist = if vertical_fov >= 180.0 {
            // Degenerate projection plane; routed to the panoramic path.
            0.0
        } else {
            1.0 / (vertical_fov.to_radians() * 0.5).tan()
        };
        Self {
            origin: origin.extend(0.0),
            basis_x: right.extend(0.0),
            basis_y: true_up.extend(0.0),
            basis_z: forward.extend(0.0),
            width,
            height,
            vertical_fov,
            angle_step,
            plane_dist,
            aspect: width as f32 / height as f32,
            _pad: [0; 2],
        }
    }

    pub fn is_panoramic(&self) -> bool {
        self.vertical_fov >= 180.0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Default)]
pub struct Material {
    /// Base color, w unused.
    pub color: Vec4,
    /// One of the `MATERIAL_*` tags.
    pub kind: u32,
    /// Specular exponent used by the shadow-ray lighting term.
    pub reflectivity: f32,
    /// Multiplicative color falloff applied per bounce.
    pub attenuation: f32,
    /// Index of refraction, glazing only.
    pub ior: f32,
}

impl Material {
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            color: color.extend(0.0),
            kind: MATERIAL_DIFFUSE,
            reflectivity: 8.0,
            attenuation: 0.8,
            ior: 1.0,
        }
    }

    pub fn mirror(color: Vec3) -> Self {
        Self {
            color: color.extend(0.0),
            kind: MATERIAL_MIRROR,
            reflectivity: 64.0,
            attenuation: 0.95,
            ior: 1.0,
        }
    }

    pub fn glazing(color: Vec3, ior: f32) -> Self {
        Self {
            color: color.extend(0.0),
            kind: MATERIAL_GLAZING,
            reflectivity: 32.0,
            attenuation: 0.98,
            ior,
        }
    }

    pub fn emitter(color: Vec3) -> Self {
        Self {
            color: color.extend(0.0),
            kind: MATERIAL_EMITTER,
            reflectivity: 1.0,
            attenuation: 1.0,
            ior: 1.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Default)]
pub struct Sphere {
    /// Center, w unused.
    pub center: Vec4,
    pub radius: f32,
    /// Precomputed radius squared.
    pub radius_sq: f32,
    pub material: i32,
    pub _pad: u32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: i32) -> Self {
        Self {
            center: center.extend(0.0),
            radius,
            radius_sq: radius * radius,
            material,
            _pad: 0,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center.xyz()
    }
}

/// A mesh owns a contiguous triangle range in the shared index table plus a
/// bounding box used to cull whole meshes per ray.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Default)]
pub struct MeshInfo {
    pub aabb_min: Vec4,
    pub aabb_max: Vec4,
    pub first_triangle: u32,
    pub triangle_count: u32,
    pub _pad: [u32; 2],
}

impl MeshInfo {
    pub fn aabb_min(&self) -> Vec3 {
        self.aabb_min.xyz()
    }

    pub fn aabb_max(&self) -> Vec3 {
        self.aabb_max.xyz()
    }
}

/// Descriptor of an axis-aligned voxel grid. Cell material ids live in a
/// separate flat array, `-1` meaning empty.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Default)]
pub struct VoxelChunk {
    /// Minimum corner of the chunk, w unused.
    pub origin: Vec4,
    pub dims: [u32; 3],
    /// Edge length of one cubic cell.
    pub voxel_size: f32,
}

impl VoxelChunk {
    pub fn new(origin: Vec3, dims: [u32; 3], voxel_size: f32) -> Self {
        Self {
            origin: origin.extend(0.0),
            dims,
            voxel_size,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.dims[0] as usize * self.dims[1] as usize * self.dims[2] as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    pub fn aabb_min(&self) -> Vec3 {
        self.origin.xyz()
    }

    pub fn aabb_max(&self) -> Vec3 {
        self.origin.xyz()
            + Vec3::new(
                self.dims[0] as f32,
                self.dims[1] as f32,
                self.dims[2] as f32,
            ) * self.voxel_size
    }
}
