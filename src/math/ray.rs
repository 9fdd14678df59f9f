use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::render::Viewport;

/// Radius of the pick sphere around every bird
pub const HIT_RADIUS: f32 = 0.1;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
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

/// Map window pixel coordinates to normalized device coordinates
///
/// Pixel (0, 0) is the top-left corner, NDC (-1, 1).
pub fn click_to_ndc(x: f32, y: f32, viewport: Viewport) -> Vec2 {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    Vec2::new(2.0 * x / width - 1.0, 1.0 - (2.0 * y) / height)
}

/// Turn an NDC point into a world-space direction leaving the camera
///
/// The clip point sits on the far side of the frustum; after undoing the
/// projection it is forced onto the z = -1 plane with w = 0 so only the
/// rotation part of the camera's world transform applies.
pub fn unproject_direction(ndc: Vec2, projection: Mat4, world_to_local: Mat4) -> Vec3 {
    let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);

    let eye = projection.inverse() * clip;
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);

    let world = world_to_local.inverse() * eye;
    world.truncate().normalize()
}

/// Discriminant test of a ray against a sphere
///
/// Only checks that the infinite line through the ray comes within `radius`
/// of `center`; spheres behind the origin can register as hits.
pub fn hits_sphere(ray: &Ray, center: Vec3, radius: f32) -> bool {
    let oc = ray.origin - center;
    let b = ray.direction.dot(oc);
    let c = oc.dot(oc) - radius * radius;

    b * b - c >= 0.0
}
