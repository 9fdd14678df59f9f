pub mod demo;
pub mod loader;

use glam::{Mat4, Quat, Vec3};

use crate::math::Color;

/// Index of a transform inside its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformId(pub usize);

/// Index of a camera inside its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub usize);

/// Named node of the scene hierarchy
#[derive(Debug, Clone)]
pub struct Transform {
    pub name: String,
    pub parent: Option<TransformId>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_parent(mut self, parent: TransformId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Local space to parent space
    pub fn make_local_to_parent(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Parent space to local space
    pub fn make_parent_to_local(&self) -> Mat4 {
        let inv_scale = Vec3::ONE / self.scale;
        Mat4::from_scale(inv_scale)
            * Mat4::from_quat(self.rotation.inverse())
            * Mat4::from_translation(-self.position)
    }
}

/// Perspective camera attached to a transform
///
/// The far plane is at infinity.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub transform: TransformId,
    /// Vertical field of view in radians
    pub fovy: f32,
    /// Width over height, refreshed from the drawable every frame
    pub aspect: f32,
    pub near: f32,
}

impl Camera {
    pub fn new(transform: TransformId) -> Self {
        Self {
            transform,
            fovy: 60f32.to_radians(),
            aspect: 1.0,
            near: 0.01,
        }
    }

    pub fn make_projection(&self) -> Mat4 {
        Mat4::perspective_infinite_rh(self.fovy, self.aspect, self.near)
    }
}

/// Something the scene draw call renders
#[derive(Debug, Clone, Copy)]
pub struct Drawable {
    pub transform: TransformId,
    pub color: Color,
    /// Edge length in world units
    pub size: f32,
}

/// Flat storage for transforms, cameras and drawables
///
/// Handles are plain indices; nothing is ever removed, so a handle stays
/// valid for the life of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    transforms: Vec<Transform>,
    cameras: Vec<Camera>,
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transform(&mut self, transform: Transform) -> TransformId {
        if let Some(parent) = transform.parent {
            assert!(parent.0 < self.transforms.len(), "parent must be added first");
        }
        self.transforms.push(transform);
        TransformId(self.transforms.len() - 1)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn add_drawable(&mut self, transform: TransformId, color: Color, size: f32) {
        self.drawables.push(Drawable {
            transform,
            color,
            size,
        });
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn transform(&self, id: TransformId) -> &Transform {
        &self.transforms[id.0]
    }

    pub fn transform_mut(&mut self, id: TransformId) -> &mut Transform {
        &mut self.transforms[id.0]
    }

    pub fn camera(&self, id: CameraId) -> &Camera {
        &self.cameras[id.0]
    }

    pub fn camera_mut(&mut self, id: CameraId) -> &mut Camera {
        &mut self.cameras[id.0]
    }

    /// Every transform whose name starts with `prefix`, in scene order
    pub fn find_prefixed(&self, prefix: &str) -> Vec<TransformId> {
        self.transforms
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.starts_with(prefix))
            .map(|(i, _)| TransformId(i))
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms
            .iter()
            .position(|t| t.name == name)
            .map(TransformId)
    }

    /// Local space of `id` to world space, parents applied outermost
    pub fn local_to_world(&self, id: TransformId) -> Mat4 {
        let transform = self.transform(id);
        let local = transform.make_local_to_parent();
        match transform.parent {
            Some(parent) => self.local_to_world(parent) * local,
            None => local,
        }
    }

    /// World space to the local space of `id`
    pub fn world_to_local(&self, id: TransformId) -> Mat4 {
        let transform = self.transform(id);
        let local = transform.make_parent_to_local();
        match transform.parent {
            Some(parent) => local * self.world_to_local(parent),
            None => local,
        }
    }

    pub fn world_position(&self, id: TransformId) -> Vec3 {
        self.local_to_world(id).w_axis.truncate()
    }

    /// Move a transform by a world-space offset, whatever its parents are
    pub fn translate_world(&mut self, id: TransformId, delta: Vec3) {
        let local_delta = match self.transform(id).parent {
            Some(parent) => self.world_to_local(parent).transform_vector3(delta),
            None => delta,
        };
        self.transform_mut(id).position += local_delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn test_find_prefixed_keeps_scene_order() {
        let mut scene = Scene::new();
        scene.add_transform(Transform::new("BIRD.001"));
        scene.add_transform(Transform::new("Tree"));
        scene.add_transform(Transform::new("BIRD.000"));
        scene.add_transform(Transform::new("bird.lowercase"));
        scene.add_transform(Transform::new("BIR"));

        let birds = scene.find_prefixed("BIRD");
        assert_eq!(birds, vec![TransformId(0), TransformId(2)]);
    }

    #[test]
    fn test_world_to_local_inverts_local_to_world() {
        let mut scene = Scene::new();
        let root = scene.add_transform(
            Transform::new("root")
                .with_position(Vec3::new(1.0, 2.0, 3.0))
                .with_rotation(Quat::from_rotation_z(0.7))
                .with_scale(Vec3::new(2.0, 2.0, 2.0)),
        );
        let child = scene.add_transform(
            Transform::new("child")
                .with_parent(root)
                .with_position(Vec3::new(0.0, 1.0, 0.0))
                .with_rotation(Quat::from_rotation_x(-0.3)),
        );

        let product = scene.local_to_world(child) * scene.world_to_local(child);
        assert!(approx_eq(product, Mat4::IDENTITY));
    }

    #[test]
    fn test_parent_chain_moves_children() {
        let mut scene = Scene::new();
        let root = scene.add_transform(Transform::new("root").with_position(Vec3::new(10.0, 0.0, 0.0)));
        let child = scene.add_transform(
            Transform::new("child")
                .with_parent(root)
                .with_position(Vec3::new(0.0, 0.0, 1.0)),
        );

        assert_eq!(scene.world_position(child), Vec3::new(10.0, 0.0, 1.0));

        scene.transform_mut(root).position.x = -4.0;
        assert_eq!(scene.world_position(child), Vec3::new(-4.0, 0.0, 1.0));
    }

    #[test]
    fn test_translate_world_under_rotated_parent() {
        let mut scene = Scene::new();
        let root = scene.add_transform(
            Transform::new("root").with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        );
        let child = scene.add_transform(Transform::new("child").with_parent(root));

        scene.translate_world(child, Vec3::new(0.0, 0.0, 0.5));
        assert!((scene.world_position(child) - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_camera_projection_uses_aspect() {
        let mut scene = Scene::new();
        let t = scene.add_transform(Transform::new("Camera"));
        let id = scene.add_camera(Camera::new(t));

        let narrow = scene.camera(id).make_projection();
        scene.camera_mut(id).aspect = 2.0;
        let wide = scene.camera(id).make_projection();

        assert!((narrow.x_axis.x - 2.0 * wide.x_axis.x).abs() < 1e-4);
        assert_eq!(narrow.y_axis.y, wide.y_axis.y);
    }

    #[test]
    fn test_find_by_exact_name() {
        let mut scene = Scene::new();
        scene.add_transform(Transform::new("Ground"));
        let cam = scene.add_transform(Transform::new("Camera"));
        assert_eq!(scene.find("Camera"), Some(cam));
        assert_eq!(scene.find("Cam"), None);
    }
}
