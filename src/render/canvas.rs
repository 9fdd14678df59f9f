use glam::Vec4;

use super::{DepthTest, FrameTarget, PassState, TextCommand, Viewport};
use crate::math::color::{blend_over, to_rgba8, Color};
use crate::scene::{CameraId, Scene};

/// Software render target: RGBA8 color, f32 depth, recorded overlay text
///
/// Drawables are splatted as screen-aligned squares sized by perspective.
/// Text is not rasterized here; it is kept for the presenter.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<[u8; 4]>,
    depth: Vec<f32>,
    text: Vec<TextCommand>,
    pass: PassState,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        Self {
            pixels: vec![[0; 4]; count],
            depth: vec![f32::INFINITY; count],
            text: Vec::new(),
            pass: PassState::OPAQUE,
            width,
            height,
        }
    }

    /// Reallocate for a new size; contents are discarded
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Color buffer as tightly packed RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth[(y * self.width + x) as usize]
    }

    pub fn text(&self) -> &[TextCommand] {
        &self.text
    }

    pub fn pass(&self) -> PassState {
        self.pass
    }

    /// Fill an axis-aligned pixel rectangle at `depth`, honoring the pass state
    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, depth: f32, color: [u8; 4]) {
        let x0 = x0.clamp(0, self.width as i64) as u32;
        let x1 = x1.clamp(0, self.width as i64) as u32;
        let y0 = y0.clamp(0, self.height as i64) as u32;
        let y1 = y1.clamp(0, self.height as i64) as u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y * self.width + x) as usize;
                if self.pass.depth_test == DepthTest::LessEqual {
                    if depth > self.depth[idx] {
                        continue;
                    }
                    self.depth[idx] = depth;
                }
                self.pixels[idx] = if self.pass.blend {
                    blend_over(self.pixels[idx], color)
                } else {
                    color
                };
            }
        }
    }
}

impl FrameTarget for Canvas {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(to_rgba8(color));
        self.depth.fill(f32::INFINITY);
        self.text.clear();
    }

    fn set_pass(&mut self, pass: PassState) {
        self.pass = pass;
    }

    fn draw_scene(&mut self, scene: &Scene, camera: CameraId) {
        let camera = scene.camera(camera);
        let projection = camera.make_projection();
        let world_to_clip = projection * scene.world_to_local(camera.transform);
        let (width, height) = (self.width as f32, self.height as f32);

        for drawable in scene.drawables() {
            let world = scene.world_position(drawable.transform);
            let clip = world_to_clip * Vec4::new(world.x, world.y, world.z, 1.0);
            // w is the distance along the view axis
            if clip.w <= camera.near {
                continue;
            }

            let ndc = clip.truncate() / clip.w;
            let sx = (ndc.x + 1.0) * 0.5 * width;
            let sy = (1.0 - ndc.y) * 0.5 * height;
            let half = (drawable.size * projection.y_axis.y * height * 0.25 / clip.w).max(0.5);

            self.fill_rect(
                (sx - half).floor() as i64,
                (sy - half).floor() as i64,
                (sx + half).ceil() as i64,
                (sy + half).ceil() as i64,
                clip.w,
                to_rgba8(drawable.color),
            );
        }
    }

    fn draw_text(&mut self, command: TextCommand) {
        self.text.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Camera, Transform};
    use glam::Vec3;

    /// Camera at the origin looking down -Z, one drawable per entry
    fn scene_with(drawables: &[(Vec3, Color, f32)]) -> (Scene, CameraId) {
        let mut scene = Scene::new();
        let eye = scene.add_transform(Transform::new("Camera"));
        let camera = scene.add_camera(Camera::new(eye));
        for (i, (position, color, size)) in drawables.iter().enumerate() {
            let t = scene.add_transform(Transform::new(format!("Box.{}", i)).with_position(*position));
            scene.add_drawable(t, *color, *size);
        }
        (scene, camera)
    }

    #[test]
    fn test_clear_fills_color_and_resets_depth() {
        let mut canvas = Canvas::new(4, 4);
        canvas.clear([1.0, 0.0, 0.0, 1.0]);
        assert!(canvas.pixels().iter().all(|p| *p == [255, 0, 0, 255]));
        assert_eq!(canvas.depth_at(2, 2), f32::INFINITY);
        assert_eq!(canvas.as_bytes().len(), 4 * 4 * 4);
    }

    #[test]
    fn test_drawable_in_front_lands_in_center() {
        let (scene, camera) = scene_with(&[(Vec3::new(0.0, 0.0, -5.0), [0.0, 1.0, 0.0, 1.0], 1.0)]);
        let mut canvas = Canvas::new(64, 64);
        canvas.clear([0.0, 0.0, 0.0, 1.0]);
        canvas.set_pass(PassState::OPAQUE);
        canvas.draw_scene(&scene, camera);

        assert_eq!(canvas.pixel(32, 32), [0, 255, 0, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 255]);
        assert!((canvas.depth_at(32, 32) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_drawable_behind_camera_is_skipped() {
        let (scene, camera) = scene_with(&[(Vec3::new(0.0, 0.0, 5.0), [0.0, 1.0, 0.0, 1.0], 1.0)]);
        let mut canvas = Canvas::new(16, 16);
        canvas.clear([0.0, 0.0, 0.0, 1.0]);
        canvas.draw_scene(&scene, camera);
        assert!(canvas.pixels().iter().all(|p| *p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        // Far drawable is listed last; the near one must survive
        let (scene, camera) = scene_with(&[
            (Vec3::new(0.0, 0.0, -2.0), [1.0, 0.0, 0.0, 1.0], 0.5),
            (Vec3::new(0.0, 0.0, -8.0), [0.0, 0.0, 1.0, 1.0], 4.0),
        ]);
        let mut canvas = Canvas::new(32, 32);
        canvas.clear([0.0, 0.0, 0.0, 1.0]);
        canvas.set_pass(PassState::OPAQUE);
        canvas.draw_scene(&scene, camera);
        assert_eq!(canvas.pixel(16, 16), [255, 0, 0, 255]);
    }

    #[test]
    fn test_without_depth_test_last_draw_wins() {
        let (scene, camera) = scene_with(&[
            (Vec3::new(0.0, 0.0, -2.0), [1.0, 0.0, 0.0, 1.0], 0.5),
            (Vec3::new(0.0, 0.0, -8.0), [0.0, 0.0, 1.0, 1.0], 4.0),
        ]);
        let mut canvas = Canvas::new(32, 32);
        canvas.clear([0.0, 0.0, 0.0, 1.0]);
        canvas.set_pass(PassState::OVERLAY);
        canvas.draw_scene(&scene, camera);
        assert_eq!(canvas.pixel(16, 16), [0, 0, 255, 255]);
    }

    #[test]
    fn test_clear_drops_recorded_text() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_text(TextCommand {
            text: "X".into(),
            baseline: glam::Vec2::ZERO,
            size: 7.0,
            color: [255; 4],
        });
        assert_eq!(canvas.text().len(), 1);
        canvas.clear([0.0; 4]);
        assert!(canvas.text().is_empty());
    }

    #[test]
    fn test_resize_reallocates() {
        let mut canvas = Canvas::new(2, 2);
        canvas.resize(3, 5);
        assert_eq!(canvas.dimensions(), (3, 5));
        assert_eq!(canvas.pixels().len(), 15);
    }
}
