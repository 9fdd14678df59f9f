use glam::{Mat4, Quat, Vec3};

use super::{Camera, Scene, Transform};
use crate::math::color::hsv;

/// Side length of the square city block
const BLOCK: i32 = 6;
const SPACING: f32 = 2.0;
const BIRD_COUNT: usize = 8;

/// Rotation that points a camera's -Z at `target` with +Z up
pub fn look_at(eye: Vec3, target: Vec3) -> Quat {
    let view = Mat4::look_at_rh(eye, target, Vec3::Z);
    let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
    rotation
}

/// Small z-up city: ground tiles, towers, birds perched on some roofs and
/// three cameras looking in from the corners
pub fn create_city_scene() -> Scene {
    let mut scene = Scene::new();
    let half = BLOCK as f32 * SPACING * 0.5;

    let ground_color = [0.35, 0.4, 0.35, 1.0];
    for x in 0..BLOCK {
        for y in 0..BLOCK {
            let position = Vec3::new(
                x as f32 * SPACING - half + 1.0,
                y as f32 * SPACING - half + 1.0,
                0.0,
            );
            let tile = scene.add_transform(
                Transform::new(format!("Ground.{:02}{:02}", x, y)).with_position(position),
            );
            scene.add_drawable(tile, ground_color, SPACING * 0.9);
        }
    }

    let mut roofs = Vec::new();
    for (i, (x, y)) in (0..BLOCK).step_by(2).flat_map(|x| (0..BLOCK).step_by(2).map(move |y| (x, y))).enumerate() {
        let height = 1 + ((x * 7 + y * 3) % 4);
        let base = Vec3::new(
            x as f32 * SPACING - half + 1.0,
            y as f32 * SPACING - half + 1.0,
            0.0,
        );
        let color = hsv(i as f32 * 0.618_034 % 1.0, 0.35, 0.85);

        for level in 0..height {
            let floor = scene.add_transform(
                Transform::new(format!("Tower.{}.{}", i, level))
                    .with_position(base + Vec3::Z * (level as f32 + 0.5)),
            );
            scene.add_drawable(floor, color, 1.0);
        }
        roofs.push(base + Vec3::Z * (height as f32 + 0.1));
    }

    for (n, roof) in roofs.iter().take(BIRD_COUNT).enumerate() {
        let bird = scene.add_transform(Transform::new(format!("BIRD.{:03}", n)).with_position(*roof));
        scene.add_drawable(bird, [0.1, 0.1, 0.12, 1.0], 0.2);
    }

    let corners = [
        Vec3::new(-half - 4.0, -half - 4.0, 5.0),
        Vec3::new(half + 4.0, -half - 2.0, 3.0),
        Vec3::new(0.0, half + 6.0, 8.0),
    ];
    for (n, eye) in corners.into_iter().enumerate() {
        let transform = scene.add_transform(
            Transform::new(format!("Camera.{}", n))
                .with_position(eye)
                .with_rotation(look_at(eye, Vec3::new(0.0, 0.0, 1.5))),
        );
        scene.add_camera(Camera::new(transform));
    }

    log::info!(
        "City scene created: {} transforms, {} drawables, {} cameras",
        scene.transforms().len(),
        scene.drawables().len(),
        scene.cameras().len()
    );

    scene
}
