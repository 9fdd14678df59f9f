pub mod observe;

pub use observe::{ObserveError, ObserveMode};

use glam::UVec2;

use crate::input::InputEvent;
use crate::render::FrameTarget;

/// One screen of the game driven by the host loop
///
/// Per frame the host delivers input, then calls `update`, then `draw`.
pub trait Mode {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns true when the event was consumed
    fn handle_event(&mut self, event: &InputEvent, window_size: UVec2) -> bool;

    fn update(&mut self, elapsed: f32);

    fn draw(&mut self, drawable_size: UVec2, target: &mut dyn FrameTarget);
}
