use bird_watch::math::{click_to_ndc, hits_sphere, unproject_direction, Ray, HIT_RADIUS};
use bird_watch::render::Viewport;
use bird_watch::scene::{Camera, Scene, Transform};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_4;

/// Camera under a rotated, translated parent, as loaded scenes nest them
fn nested_camera_scene() -> (Scene, Camera) {
    let mut scene = Scene::new();
    let rig = scene.add_transform(
        Transform::new("Rig")
            .with_position(Vec3::new(4.0, -2.0, 1.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_4)),
    );
    let eye = scene.add_transform(
        Transform::new("Camera")
            .with_parent(rig)
            .with_position(Vec3::new(0.0, 0.0, 2.0))
            .with_rotation(Quat::from_rotation_x(0.3)),
    );
    let mut camera = Camera::new(eye);
    camera.aspect = 16.0 / 9.0;
    scene.add_camera(camera);
    (scene, camera)
}

#[cfg(test)]
mod unprojection_tests {
    use super::*;

    #[test]
    fn test_pixel_ray_passes_through_projected_point() {
        let (scene, camera) = nested_camera_scene();
        let viewport = Viewport::new(1280, 720);
        let projection = camera.make_projection();
        let world_to_local = scene.world_to_local(camera.transform);
        let origin = scene.world_position(camera.transform);

        // Points given in the camera's own frame, inside the frustum
        let local_to_world = scene.local_to_world(camera.transform);
        let targets = [
            Vec3::new(0.5, 0.25, -3.0),
            Vec3::new(-2.0, 1.0, -6.0),
            Vec3::new(4.0, -2.5, -12.0),
        ]
        .map(|p| local_to_world.transform_point3(p));

        for target in targets {
            let clip = projection * world_to_local * target.extend(1.0);
            assert!(clip.w > 0.0, "target {:?} should be in front", target);
            let ndc = clip.truncate() / clip.w;
            let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
            let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;

            let direction = unproject_direction(click_to_ndc(x, y, viewport), projection, world_to_local);
            let expected = (target - origin).normalize();

            assert!(
                direction.abs_diff_eq(expected, 1e-4),
                "direction {:?} expected {:?}",
                direction,
                expected
            );
            assert!(hits_sphere(&Ray::new(origin, direction), target, HIT_RADIUS));
        }
    }

    #[test]
    fn test_center_pixel_is_camera_forward() {
        let (scene, camera) = nested_camera_scene();
        let viewport = Viewport::new(800, 450);
        let direction = unproject_direction(
            click_to_ndc(400.0, 225.0, viewport),
            camera.make_projection(),
            scene.world_to_local(camera.transform),
        );

        let forward = -scene.local_to_world(camera.transform).z_axis.truncate().normalize();
        assert!(direction.abs_diff_eq(forward, 1e-5));
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }
}

#[cfg(test)]
mod sphere_hit_tests {
    use super::*;

    #[test]
    fn test_radius_boundary() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(hits_sphere(&ray, Vec3::new(10.0, 0.09, 0.0), HIT_RADIUS));
        assert!(!hits_sphere(&ray, Vec3::new(10.0, 0.11, 0.0), HIT_RADIUS));
    }

    #[test]
    fn test_origin_inside_sphere_hits() {
        let ray = Ray::new(Vec3::new(0.0, 0.05, 0.0), Vec3::Y);
        assert!(hits_sphere(&ray, Vec3::ZERO, HIT_RADIUS));
    }

    #[test]
    fn test_direction_sign_is_ignored() {
        let center = Vec3::new(0.0, 0.0, 7.0);
        assert!(hits_sphere(&Ray::new(Vec3::ZERO, Vec3::Z), center, HIT_RADIUS));
        assert!(hits_sphere(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), center, HIT_RADIUS));
    }
}
