use glam::{IVec3, UVec4, Vec3, Vec4, Vec4Swizzles};
use shared_structs::{
    Material, MeshInfo, ResolvePolicy, Sphere, VoxelChunk, MATERIAL_GLAZING, MATERIAL_NONE,
};

/// Discriminant floor below which a sphere intersection is discarded as
/// grazing noise.
pub const SPHERE_DISCRIMINANT_MIN: f32 = 0.1;

/// Determinant floor for the parallel-ray rejection in Moller-Trumbore.
const TRIANGLE_DET_EPS: f32 = 1e-7;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// Always unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One intersection candidate. Produced fresh per test and never mutated;
/// callers compare candidates and keep the nearest.
#[derive(Copy, Clone, Debug)]
pub struct HitRecord {
    pub t: f32,
    pub point: Vec3,
    /// Faces against the incoming ray.
    pub normal: Vec3,
    pub from_inside: bool,
    pub material: i32,
}

impl HitRecord {
    pub const MISS: HitRecord = HitRecord {
        t: f32::INFINITY,
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        from_inside: false,
        material: MATERIAL_NONE,
    };

    pub fn is_hit(&self) -> bool {
        self.t.is_finite()
    }
}

fn intersect_sphere(sphere: &Sphere, ray: &Ray, min_t: f32) -> HitRecord {
    let oc = ray.origin - sphere.center();
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - sphere.radius_sq;
    let discriminant = b * b - c;
    // Near-zero discriminants are silhouette-grazing noise.
    if discriminant < SPHERE_DISCRIMINANT_MIN {
        return HitRecord::MISS;
    }

    let sqrt_d = discriminant.sqrt();
    let t_near = -b - sqrt_d;
    let t = if t_near >= min_t { t_near } else { -b + sqrt_d };
    if t < min_t {
        return HitRecord::MISS;
    }

    let point = ray.at(t);
    let outward = (point - sphere.center()) / sphere.radius;
    let from_inside = c < 0.0;
    HitRecord {
        t,
        point,
        normal: if from_inside { -outward } else { outward },
        from_inside,
        material: sphere.material,
    }
}

// Adapted from raytri.c
fn moller_trumbore(
    ro: Vec3,
    rd: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
    out_t: &mut f32,
    out_backface: &mut bool,
) -> bool {
    *out_t = 0.0;

    let edge1 = b - a;
    let edge2 = c - a;

    let pv = rd.cross(edge2);

    // If the determinant is near zero, the ray lies in the triangle plane.
    let det = edge1.dot(pv);
    *out_backface = det < 0.0;
    if det.abs() < TRIANGLE_DET_EPS {
        return false;
    }

    let inv_det = 1.0 / det;
    let tv = ro - a;

    let u = tv.dot(pv) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let qv = tv.cross(edge1);
    let v = rd.dot(qv) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = edge2.dot(qv) * inv_det;
    if t < 0.0 {
        return false;
    }
    *out_t = t;

    true
}

/// Slab test. Returns the entry distance, or infinity when the box is
/// missed entirely or lies beyond `prev_min_t`.
pub fn intersect_aabb(aabb_min: Vec3, aabb_max: Vec3, ro: Vec3, rd: Vec3, prev_min_t: f32) -> f32 {
    let tx1 = (aabb_min.x - ro.x) / rd.x;
    let tx2 = (aabb_max.x - ro.x) / rd.x;
    let mut tmin = tx1.min(tx2);
    let mut tmax = tx1.max(tx2);
    let ty1 = (aabb_min.y - ro.y) / rd.y;
    let ty2 = (aabb_max.y - ro.y) / rd.y;
    tmin = tmin.max(ty1.min(ty2));
    tmax = tmax.min(ty1.max(ty2));
    let tz1 = (aabb_min.z - ro.z) / rd.z;
    let tz2 = (aabb_max.z - ro.z) / rd.z;
    tmin = tmin.max(tz1.min(tz2));
    tmax = tmax.min(tz1.max(tz2));
    if tmax >= tmin && tmax > 0.0 && tmin < prev_min_t {
        tmin
    } else {
        f32::INFINITY
    }
}

// Slab test that also reports which axis the entry crossed, for the voxel
// entry normal.
fn chunk_entry(chunk: &VoxelChunk, ray: &Ray) -> Option<(f32, f32, usize)> {
    let aabb_min = chunk.aabb_min();
    let aabb_max = chunk.aabb_max();
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let mut axis = 0;
    for i in 0..3 {
        let t1 = (aabb_min[i] - ray.origin[i]) / ray.direction[i];
        let t2 = (aabb_max[i] - ray.origin[i]) / ray.direction[i];
        let near = t1.min(t2);
        if near > tmin {
            tmin = near;
            axis = i;
        }
        tmax = tmax.min(t1.max(t2));
    }
    if tmax >= tmin && tmax > 0.0 {
        Some((tmin, tmax, axis))
    } else {
        None
    }
}

// Amanatides-Woo grid walk. One more candidate hit, compared by distance
// against the sphere and mesh candidates.
fn intersect_voxels(
    chunk: &VoxelChunk,
    cells: &[i32],
    ray: &Ray,
    min_t: f32,
    prev_min_t: f32,
) -> HitRecord {
    if chunk.is_empty() || cells.is_empty() {
        return HitRecord::MISS;
    }
    let Some((entry, exit, entry_axis)) = chunk_entry(chunk, ray) else {
        return HitRecord::MISS;
    };
    let mut t = entry.max(min_t);
    if t >= prev_min_t || t > exit {
        return HitRecord::MISS;
    }

    let dims = IVec3::new(
        chunk.dims[0] as i32,
        chunk.dims[1] as i32,
        chunk.dims[2] as i32,
    );
    let size = chunk.voxel_size;
    let rel = (ray.at(t + 1e-4 * size) - chunk.aabb_min()) / size;
    let mut cell = rel.floor().as_ivec3().clamp(IVec3::ZERO, dims - IVec3::ONE);

    let mut step = IVec3::ZERO;
    let mut t_max = Vec3::INFINITY;
    let mut t_delta = Vec3::INFINITY;
    for i in 0..3 {
        let d = ray.direction[i];
        if d.abs() < 1e-12 {
            continue;
        }
        step[i] = if d > 0.0 { 1 } else { -1 };
        let next_boundary =
            chunk.aabb_min()[i] + (cell[i] + i32::from(d > 0.0)) as f32 * size;
        t_max[i] = (next_boundary - ray.origin[i]) / d;
        t_delta[i] = size / d.abs();
    }

    let mut last_axis = entry_axis;
    loop {
        let idx = ((cell.z * dims.y + cell.y) * dims.x + cell.x) as usize;
        let material = cells[idx];
        if material != MATERIAL_NONE && t >= min_t {
            let mut normal = Vec3::ZERO;
            normal[last_axis] = -ray.direction[last_axis].signum();
            return HitRecord {
                t,
                point: ray.at(t),
                normal,
                from_inside: false,
                material,
            };
        }

        // Advance to the next cell boundary.
        let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            0
        } else if t_max.y <= t_max.z {
            1
        } else {
            2
        };
        t = t_max[axis];
        if t >= prev_min_t {
            return HitRecord::MISS;
        }
        cell[axis] += step[axis];
        if cell[axis] < 0 || cell[axis] >= dims[axis] {
            return HitRecord::MISS;
        }
        t_max[axis] += t_delta[axis];
        last_axis = axis;
    }
}

/// Borrowed, read-only view of the scene buffers, safe to share across
/// concurrently executing pixel tasks.
#[derive(Copy, Clone)]
pub struct SceneView<'a> {
    pub vertices: &'a [Vec4],
    /// xyz = vertex indices, w = material id.
    pub indices: &'a [UVec4],
    pub meshes: &'a [MeshInfo],
    pub spheres: &'a [Sphere],
    pub materials: &'a [Material],
    pub voxels: VoxelChunk,
    pub voxel_cells: &'a [i32],
    /// Indices into `spheres` of the light emitters.
    pub lights: &'a [u32],
}

struct Candidates {
    closest: HitRecord,
    /// Closest hit whose material is not glazing.
    opaque: HitRecord,
}

impl<'a> SceneView<'a> {
    pub fn material(&self, id: i32) -> Option<&Material> {
        usize::try_from(id).ok().and_then(|i| self.materials.get(i))
    }

    fn is_glazing(&self, id: i32) -> bool {
        self.material(id)
            .map_or(false, |m| m.kind == MATERIAL_GLAZING)
    }

    /// Nearest valid hit with `t > min_t`, under the session's resolve
    /// policy. Candidates are evaluated sphere, then voxel, then mesh, and
    /// a later candidate must be strictly nearer to win.
    pub fn resolve_hit(&self, ray: &Ray, min_t: f32, policy: ResolvePolicy) -> HitRecord {
        let candidates = self.gather(ray, min_t);
        match policy {
            ResolvePolicy::ClosestOpaque => candidates.closest,
            ResolvePolicy::ClosestWithTransparencySkip => {
                let closest = candidates.closest;
                if closest.is_hit() && self.is_glazing(closest.material) {
                    // Material id 0 is interior glazing and is reported
                    // as-is rather than seen through.
                    if closest.material != 0 && candidates.opaque.is_hit() {
                        return candidates.opaque;
                    }
                }
                closest
            }
        }
    }

    fn gather(&self, ray: &Ray, min_t: f32) -> Candidates {
        let mut out = Candidates {
            closest: HitRecord::MISS,
            opaque: HitRecord::MISS,
        };

        for sphere in self.spheres {
            let candidate = intersect_sphere(sphere, ray, min_t);
            self.consider(candidate, &mut out);
        }

        let candidate = intersect_voxels(&self.voxels, self.voxel_cells, ray, min_t, out.opaque.t);
        self.consider(candidate, &mut out);

        for mesh in self.meshes {
            // Whole-mesh cull against the farthest distance still relevant.
            if intersect_aabb(
                mesh.aabb_min(),
                mesh.aabb_max(),
                ray.origin,
                ray.direction,
                out.opaque.t,
            )
            .is_infinite()
            {
                continue;
            }
            let first = mesh.first_triangle as usize;
            let count = mesh.triangle_count as usize;
            for triangle in &self.indices[first..first + count] {
                let a = self.vertices[triangle.x as usize].xyz();
                let b = self.vertices[triangle.y as usize].xyz();
                let c = self.vertices[triangle.z as usize].xyz();

                let mut t = 0.0;
                let mut backface = false;
                if moller_trumbore(ray.origin, ray.direction, a, b, c, &mut t, &mut backface)
                    && t > min_t
                    && t < out.opaque.t
                {
                    let winding_normal = (b - a).cross(c - a).normalize();
                    let candidate = HitRecord {
                        t,
                        point: ray.at(t),
                        normal: if backface {
                            -winding_normal
                        } else {
                            winding_normal
                        },
                        from_inside: backface,
                        material: triangle.w as i32,
                    };
                    self.consider(candidate, &mut out);
                }
            }
        }

        out
    }

    fn consider(&self, candidate: HitRecord, out: &mut Candidates) {
        if !candidate.is_hit() {
            return;
        }
        if candidate.t < out.closest.t {
            out.closest = candidate;
        }
        if candidate.t < out.opaque.t && !self.is_glazing(candidate.material) {
            out.opaque = candidate;
        }
    }

    /// Any-hit occlusion test for shadow rays, limited to `(min_t, max_t)`.
    pub fn occluded(&self, ray: &Ray, min_t: f32, max_t: f32) -> bool {
        for sphere in self.spheres {
            let candidate = intersect_sphere(sphere, ray, min_t);
            if candidate.t < max_t {
                return true;
            }
        }

        if intersect_voxels(&self.voxels, self.voxel_cells, ray, min_t, max_t).is_hit() {
            return true;
        }

        for mesh in self.meshes {
            if intersect_aabb(
                mesh.aabb_min(),
                mesh.aabb_max(),
                ray.origin,
                ray.direction,
                max_t,
            )
            .is_infinite()
            {
                continue;
            }
            let first = mesh.first_triangle as usize;
            let count = mesh.triangle_count as usize;
            for triangle in &self.indices[first..first + count] {
                let a = self.vertices[triangle.x as usize].xyz();
                let b = self.vertices[triangle.y as usize].xyz();
                let c = self.vertices[triangle.z as usize].xyz();

                let mut t = 0.0;
                let mut backface = false;
                if moller_trumbore(ray.origin, ray.direction, a, b, c, &mut t, &mut backface)
                    && t > min_t
                    && t < max_t
                {
                    return true;
                }
            }
        }

        false
    }
}
