//! Drawing seam between game modes and whatever shows the frame.
//!
//! Modes talk to a [`FrameTarget`]: clear, pick a pass state, draw the scene
//! from a camera, and emit overlay text. [`Canvas`] implements it in
//! software; [`SurfacePresenter`] puts a finished canvas on a window.

mod canvas;
mod gpu_context;
mod overlay;
mod presenter;

pub use canvas::Canvas;
pub use gpu_context::GpuContext;
pub use overlay::{GlyphMetrics, TextOverlay};
pub use presenter::SurfacePresenter;

use glam::Vec2;

use crate::math::Color;
use crate::scene::{CameraId, Scene};

/// Size of the render target in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Depth comparison for scene drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    Disabled,
    /// Pass when the incoming depth is less than or equal to the stored one
    LessEqual,
}

/// Fixed-function state for the draws that follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassState {
    pub blend: bool,
    pub depth_test: DepthTest,
}

impl PassState {
    /// Scene geometry: no blending, depth tested
    pub const OPAQUE: Self = Self {
        blend: false,
        depth_test: DepthTest::LessEqual,
    };

    /// HUD: alpha blended, always on top
    pub const OVERLAY: Self = Self {
        blend: true,
        depth_test: DepthTest::Disabled,
    };
}

/// One run of overlay text in target pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    /// Left end of the baseline, origin top-left
    pub baseline: Vec2,
    /// Cap height in pixels
    pub size: f32,
    pub color: [u8; 4],
}

/// Where a mode draws its frame
pub trait FrameTarget {
    fn viewport(&self) -> Viewport;

    /// Clear color and depth; starts a new frame
    fn clear(&mut self, color: Color);

    fn set_pass(&mut self, pass: PassState);

    /// Draw every drawable of `scene` as seen from `camera`
    fn draw_scene(&mut self, scene: &Scene, camera: CameraId);

    fn draw_text(&mut self, command: TextCommand);
}
