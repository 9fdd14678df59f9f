use glam::Vec3;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const SAMPLE_RATE: u32 = 48_000;

/// Mono PCM at [`SAMPLE_RATE`]
#[derive(Debug, Clone)]
pub struct Sample {
    pub data: Vec<f32>,
}

impl Sample {
    pub fn from_frames(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Seamless ambient wind bed
    ///
    /// A few detuned low partials under a slow swell. Every partial completes
    /// a whole number of cycles over the clip so the loop point is inaudible.
    pub fn wind(seconds: u32) -> Self {
        let frames = (SAMPLE_RATE * seconds.max(1)) as usize;
        let length = frames as f32;
        let partials: [(f32, f32); 4] = [(55.0, 0.4), (82.0, 0.25), (110.5, 0.2), (164.0, 0.1)];

        let data = (0..frames)
            .map(|i| {
                let phase = i as f32 / length;
                let seconds = seconds.max(1) as f32;
                let swell = 0.6 + 0.4 * (TAU * phase).sin();
                let tone: f32 = partials
                    .iter()
                    .map(|&(hz, amp)| amp * (TAU * (hz * seconds).round() * phase).sin())
                    .sum();
                0.5 * swell * tone
            })
            .collect();

        Self { data }
    }

    pub fn duration(&self) -> f32 {
        self.data.len() as f32 / SAMPLE_RATE as f32
    }
}

/// A sample being played by the mixer
///
/// Shared between the mixer and whoever started it; position and the stop
/// flag may be changed from the game thread at any time.
#[derive(Debug)]
pub struct PlayingSample {
    sample: Arc<Sample>,
    pub volume: f32,
    pub half_volume_radius: f32,
    pub looping: bool,
    position: Mutex<Vec3>,
    cursor: AtomicUsize,
    stopped: AtomicBool,
}

impl PlayingSample {
    pub fn new(
        sample: Arc<Sample>,
        volume: f32,
        position: Vec3,
        half_volume_radius: f32,
        looping: bool,
    ) -> Self {
        Self {
            sample,
            volume,
            half_volume_radius,
            looping,
            position: Mutex::new(position),
            cursor: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn position(&self) -> Vec3 {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_position(&self, position: Vec3) {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// Returns true only for the call that actually stopped the sample
    pub fn stop(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Mixer read position in frames
    pub(crate) fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    pub(crate) fn set_cursor(&self, cursor: usize) {
        self.cursor.store(cursor, Ordering::Relaxed);
    }
}

/// Owned handle to a looping source; stops it when dropped
#[derive(Debug)]
pub struct LoopHandle {
    playing: Arc<PlayingSample>,
}

impl LoopHandle {
    pub(crate) fn new(playing: Arc<PlayingSample>) -> Self {
        Self { playing }
    }

    pub fn set_position(&self, position: Vec3) {
        self.playing.set_position(position);
    }

    pub fn position(&self) -> Vec3 {
        self.playing.position()
    }

    pub fn is_stopped(&self) -> bool {
        self.playing.is_stopped()
    }

    /// The shared source this handle stops on drop
    pub fn playing(&self) -> &Arc<PlayingSample> {
        &self.playing
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if self.playing.stop() {
            log::debug!("Looping source stopped");
        }
    }
}
