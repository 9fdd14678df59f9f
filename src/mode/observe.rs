//! Camera observation screen
//!
//! The player flips between the scene's fixed cameras and clicks to spot
//! birds. Every spotted bird floats upward from then on, while a looping
//! ambient sound circles the block.

use glam::{UVec2, Vec2, Vec3};
use std::sync::Arc;
use thiserror::Error;

use super::Mode;
use crate::audio::{AudioEngine, LoopHandle, Sample};
use crate::input::{InputEvent, Key, PointerButton};
use crate::math::color::{BLACK, WHITE};
use crate::math::{click_to_ndc, hits_sphere, unproject_direction, Ray};
use crate::render::{FrameTarget, PassState, TextOverlay, Viewport};
use crate::scene::{CameraId, Scene, TransformId};
use crate::settings::Settings;

/// One full turn of the orbit angle
#[allow(clippy::approx_constant)]
pub const FULL_TURN: f32 = 2.0 * 3.1415926;

/// Virtual overlay rectangle text is laid out in
const OVERLAY_MIN: Vec2 = Vec2::ZERO;
const OVERLAY_MAX: Vec2 = Vec2::new(320.0, 200.0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObserveError {
    #[error("observe mode requires at least one camera in the scene")]
    NoCameras,
}

pub struct ObserveMode<'s> {
    scene: &'s mut Scene,
    /// Index into the scene's camera list, always in range
    current_camera: usize,
    birds: Vec<TransformId>,
    /// Append-only; the same bird may appear more than once
    found_birds: Vec<TransformId>,
    noise_loop: LoopHandle,
    noise_angle: f32,
    audio: AudioEngine,
    settings: Settings,
}

impl<'s> ObserveMode<'s> {
    pub fn new(
        scene: &'s mut Scene,
        audio: AudioEngine,
        noise: &Arc<Sample>,
        settings: Settings,
    ) -> Result<Self, ObserveError> {
        if scene.cameras().is_empty() {
            return Err(ObserveError::NoCameras);
        }

        let birds = scene.find_prefixed(&settings.birds.name_prefix);
        log::info!("Found {} birds.", birds.len());

        let noise_loop = audio.loop_3d(
            noise,
            settings.sound.volume,
            Vec3::ZERO,
            settings.sound.half_volume_radius,
        );

        Ok(Self {
            scene,
            current_camera: 0,
            birds,
            found_birds: Vec::new(),
            noise_loop,
            noise_angle: 0.0,
            audio,
            settings,
        })
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn current_camera(&self) -> CameraId {
        CameraId(self.current_camera)
    }

    pub fn birds(&self) -> &[TransformId] {
        &self.birds
    }

    pub fn found_birds(&self) -> &[TransformId] {
        &self.found_birds
    }

    pub fn noise_angle(&self) -> f32 {
        self.noise_angle
    }

    pub fn noise_loop(&self) -> &LoopHandle {
        &self.noise_loop
    }

    /// Step the current camera by one, wrapping at either end
    pub fn switch_camera(&mut self, key: Key) {
        let count = self.scene.cameras().len();
        self.current_camera = match key {
            Key::Left => (self.current_camera + count - 1) % count,
            Key::Right => (self.current_camera + 1) % count,
            _ => return,
        };
        log::debug!("Switched to camera {}", self.current_camera);
    }

    /// World-space ray through a window pixel of the current camera
    pub fn click_ray(&self, x: f32, y: f32, viewport: Viewport) -> Ray {
        let camera = self.scene.camera(self.current_camera());
        let ndc = click_to_ndc(x, y, viewport);
        let direction = unproject_direction(
            ndc,
            camera.make_projection(),
            self.scene.world_to_local(camera.transform),
        );
        Ray::new(self.scene.world_position(camera.transform), direction)
    }

    /// Cast from the clicked pixel and record every bird the ray touches
    ///
    /// Returns how many entries were appended to the found list.
    pub fn raycast_click(&mut self, x: f32, y: f32, viewport: Viewport) -> usize {
        if viewport.width == 0 || viewport.height == 0 {
            return 0;
        }

        let ray = self.click_ray(x, y, viewport);
        log::debug!("Click ({}, {}) -> ray {:?}", x, y, ray);

        let hits: Vec<TransformId> = self
            .birds
            .iter()
            .copied()
            .filter(|bird| self.check_ray_bird(&ray, *bird))
            .collect();

        let count = hits.len();
        self.found_birds.extend(hits);
        count
    }

    pub fn check_ray_bird(&self, ray: &Ray, bird: TransformId) -> bool {
        hits_sphere(ray, self.scene.world_position(bird), self.settings.birds.hit_radius)
    }

    /// Where the orbiting sound sits for a given angle
    pub fn orbit_position(&self, angle: f32) -> Vec3 {
        let sound = &self.settings.sound;
        sound.orbit_center + sound.orbit_radius * Vec3::new(angle.cos(), angle.sin(), 0.0)
    }

    pub fn found_text(&self) -> String {
        format!("FOUND {}/{} BIRDS", self.found_birds.len(), self.birds.len())
    }
}

impl Mode for ObserveMode<'_> {
    fn name(&self) -> &str {
        "observe"
    }

    fn handle_event(&mut self, event: &InputEvent, window_size: UVec2) -> bool {
        match *event {
            InputEvent::KeyDown(key @ (Key::Left | Key::Right)) => {
                self.switch_camera(key);
                true
            }
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                self.raycast_click(x, y, Viewport::new(window_size.x, window_size.y));
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, elapsed: f32) {
        self.noise_angle = (self.noise_angle + elapsed) % FULL_TURN;
        self.noise_loop
            .set_position(self.orbit_position(self.noise_angle));

        let camera = self.scene.camera(self.current_camera());
        let frame = self.scene.local_to_world(camera.transform);
        {
            let mut state = self.audio.lock();
            state.listener.set_position(frame.w_axis.truncate());
            state.listener.set_right(frame.x_axis.truncate());
        }

        let drift = Vec3::Z * self.settings.birds.drift_per_update;
        for bird in &self.found_birds {
            self.scene.translate_world(*bird, drift);
        }
    }

    fn draw(&mut self, drawable_size: UVec2, target: &mut dyn FrameTarget) {
        target.clear(self.settings.overlay.clear_color);
        target.set_pass(PassState::OPAQUE);

        let camera = self.current_camera();
        // A minimized window keeps the last usable aspect
        if drawable_size.x > 0 && drawable_size.y > 0 {
            self.scene.camera_mut(camera).aspect = Viewport::new(drawable_size.x, drawable_size.y).aspect();
        }
        target.draw_scene(self.scene, camera);

        target.set_pass(PassState::OVERLAY);
        let mut overlay = TextOverlay::new(OVERLAY_MIN, OVERLAY_MAX, drawable_size);

        let center = 0.5 * (OVERLAY_MIN.x + OVERLAY_MAX.x);
        let lines = [
            (self.settings.overlay.help_text.clone(), 1.0, 2.0),
            (self.found_text(), -10.0, -12.0),
        ];
        for (text, shadow_y, y) in lines {
            let (min, max) = overlay.text_extents(&text, Vec2::ZERO, 1.0);
            let x = (center - 0.5 * (max.x + min.x)).round();
            overlay.draw_text(&text, Vec2::new(x, shadow_y), 1.0, BLACK);
            overlay.draw_text(&text, Vec2::new(x, y), 1.0, WHITE);
        }

        overlay.finish(target);
    }
}
