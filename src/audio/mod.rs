//! Software spatial audio: a shared engine state, looping 3D sources and a
//! mixer that runs on its own thread.
//!
//! Everything the mixer reads lives behind one mutex. Game code that needs
//! several listener fields to change together takes [`AudioEngine::lock`]
//! and writes them inside the guard's scope.

mod mixer;
mod sample;

pub use mixer::{spatialize, AudioSink, LevelMeter, Mixer, MixerThread, NullSink};
pub use sample::{LoopHandle, PlayingSample, Sample, SAMPLE_RATE};

use glam::Vec3;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Point of audition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: Vec3,
    /// Unit vector pointing out of the listener's right ear
    pub right: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            right: Vec3::X,
        }
    }
}

impl Listener {
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Zero-length input keeps the previous direction
    pub fn set_right(&mut self, right: Vec3) {
        if let Some(right) = right.try_normalize() {
            self.right = right;
        }
    }
}

/// State shared between the game thread and the mixer
#[derive(Debug, Default)]
pub struct AudioState {
    pub listener: Listener,
    playing: Vec<Arc<PlayingSample>>,
}

impl AudioState {
    pub fn playing(&self) -> &[Arc<PlayingSample>] {
        &self.playing
    }
}

/// Handle to the audio engine; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct AudioEngine {
    state: Arc<Mutex<AudioState>>,
}

impl AudioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the engine state for the lifetime of the returned guard
    ///
    /// The mixer takes the same lock once per block, so writes made through
    /// one guard are observed together.
    pub fn lock(&self) -> MutexGuard<'_, AudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the listener
    pub fn listener(&self) -> Listener {
        self.lock().listener
    }

    /// Start a sample looping at a world position
    ///
    /// The source is audible until the returned handle is stopped or dropped.
    pub fn loop_3d(
        &self,
        sample: &Arc<Sample>,
        volume: f32,
        position: Vec3,
        half_volume_radius: f32,
    ) -> LoopHandle {
        let playing = Arc::new(PlayingSample::new(
            Arc::clone(sample),
            volume,
            position,
            half_volume_radius,
            true,
        ));
        self.lock().playing.push(Arc::clone(&playing));
        log::debug!("Looping {:.1}s sample at {:?}", sample.duration(), position);
        LoopHandle::new(playing)
    }

    /// Number of sources the mixer still holds
    pub fn active_sources(&self) -> usize {
        self.lock().playing.iter().filter(|p| !p.is_stopped()).count()
    }
}
