//! Ray queries against the walkable surfaces of a scene.
//!
//! Surfaces are anything implementing [`RayTarget`]. The controller only ever
//! asks one question: where does a ray first touch the ground?

use glam::Vec3;
use ordered_float::OrderedFloat;

/// Parallel rays closer than this to a surface's plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalising `direction`.
    ///
    /// Returns `None` when the direction is zero or not finite.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point reached after travelling `distance` along the ray.
    #[must_use]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Geometry a pointer ray can land on.
pub trait RayTarget {
    /// Returns the ray parameter of the nearest intersection, if any.
    ///
    /// Only strictly positive parameters count as hits.
    fn intersect(&self, ray: &Ray) -> Option<f32>;
}

/// Infinite plane through `point` with the given `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3,
    /// Plane normal; need not be unit length.
    pub normal: Vec3,
}

impl Plane {
    /// Horizontal plane at height `y`.
    #[must_use]
    pub const fn horizontal(y: f32) -> Self {
        Self {
            point: Vec3::new(0.0, y, 0.0),
            normal: Vec3::Y,
        }
    }
}

impl RayTarget for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        (t > 0.0).then_some(t)
    }
}

/// Finite rectangle, the usual shape of a ground mesh.
///
/// The rectangle is centred on `centre` and spans `half_extents.x` along
/// `axis_u` and `half_extents.y` along `axis_v`. Both faces can be hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Centre of the rectangle.
    pub centre: Vec3,
    /// First in-plane unit axis.
    pub axis_u: Vec3,
    /// Second in-plane unit axis, perpendicular to `axis_u`.
    pub axis_v: Vec3,
    /// Half width along `axis_u` and half depth along `axis_v`.
    pub half_extents: glam::Vec2,
}

impl Quad {
    /// Horizontal ground rectangle of `width` by `depth` centred on `centre`.
    #[must_use]
    pub fn ground(centre: Vec3, width: f32, depth: f32) -> Self {
        Self {
            centre,
            axis_u: Vec3::X,
            axis_v: Vec3::Z,
            half_extents: glam::Vec2::new(width / 2.0, depth / 2.0),
        }
    }
}

impl RayTarget for Quad {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let plane = Plane {
            point: self.centre,
            normal: self.axis_u.cross(self.axis_v),
        };
        let t = plane.intersect(ray)?;
        let local = ray.at(t) - self.centre;
        let inside = local.dot(self.axis_u).abs() <= self.half_extents.x
            && local.dot(self.axis_v).abs() <= self.half_extents.y;
        inside.then_some(t)
    }
}

/// Triangle soup, hit with the Möller–Trumbore test.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    triangles: Vec<[Vec3; 3]>,
}

impl TriangleMesh {
    /// Builds a mesh from explicit triangles.
    #[must_use]
    pub const fn new(triangles: Vec<[Vec3; 3]>) -> Self {
        Self { triangles }
    }

    /// Builds a mesh from a vertex list and triangle indices.
    ///
    /// Triangles that reference a missing vertex are skipped.
    #[must_use]
    pub fn from_indexed(vertices: &[Vec3], indices: &[[usize; 3]]) -> Self {
        let triangles = indices
            .iter()
            .filter_map(|&[a, b, c]| {
                Some([*vertices.get(a)?, *vertices.get(b)?, *vertices.get(c)?])
            })
            .collect();
        Self { triangles }
    }

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns `true` when the mesh holds no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

fn intersect_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = det.recip();
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > 0.0).then_some(t)
}

impl RayTarget for TriangleMesh {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.triangles
            .iter()
            .filter_map(|&tri| intersect_triangle(ray, tri))
            .min_by_key(|&t| OrderedFloat(t))
    }
}

/// Nearest intersection found by [`WalkableSurfaces::nearest_hit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Index of the surface in registration order.
    pub surface: usize,
    /// Ray parameter of the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Ordered set of surfaces the actor may walk on.
#[derive(Default)]
pub struct WalkableSurfaces {
    surfaces: Vec<Box<dyn RayTarget + Send + Sync>>,
}

impl std::fmt::Debug for WalkableSurfaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkableSurfaces")
            .field("len", &self.surfaces.len())
            .finish()
    }
}

impl WalkableSurfaces {
    /// Creates an empty surface set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            surfaces: Vec::new(),
        }
    }

    /// Appends a surface and returns its index.
    pub fn push(&mut self, surface: impl RayTarget + Send + Sync + 'static) -> usize {
        self.surfaces.push(Box::new(surface));
        self.surfaces.len() - 1
    }

    /// Builder-style variant of [`Self::push`].
    #[must_use]
    pub fn with(mut self, surface: impl RayTarget + Send + Sync + 'static) -> Self {
        self.push(surface);
        self
    }

    /// Number of registered surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns `true` when no surface is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Returns the nearest hit across all surfaces.
    ///
    /// Ties resolve to the surface registered first.
    #[must_use]
    pub fn nearest_hit(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(surface, target)| {
                target.intersect(ray).map(|distance| SurfaceHit {
                    surface,
                    distance,
                    point: ray.at(distance),
                })
            })
            .min_by_key(|hit| OrderedFloat(hit.distance))
    }
}
