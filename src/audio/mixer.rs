use glam::Vec3;
use std::f32::consts::FRAC_PI_4;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{AudioEngine, AudioState, Listener, SAMPLE_RATE};

/// Left/right gains for a source heard by `listener`
///
/// Distance attenuation halves the level at `half_volume_radius`; panning is
/// constant-power over the angle between the source and the listener's
/// right axis.
pub fn spatialize(listener: &Listener, source: Vec3, half_volume_radius: f32) -> [f32; 2] {
    let offset = source - listener.position;
    let distance = offset.length();
    let attenuation = half_volume_radius / (half_volume_radius + distance);

    let pan = match offset.try_normalize() {
        Some(dir) => listener.right.dot(dir).clamp(-1.0, 1.0),
        None => 0.0,
    };
    let angle = (pan + 1.0) * FRAC_PI_4;

    [attenuation * angle.cos(), attenuation * angle.sin()]
}

/// Sums all playing sources into stereo blocks
#[derive(Debug, Default)]
pub struct Mixer;

impl Mixer {
    /// Mix `frames` stereo frames from the current state
    ///
    /// Gains are computed once per block. One-shot sources that run out are
    /// stopped; stopped sources are released from the state.
    pub fn mix(state: &mut AudioState, frames: usize) -> Vec<[f32; 2]> {
        let mut out = vec![[0.0f32; 2]; frames];
        state.playing.retain(|p| !p.is_stopped());

        for playing in &state.playing {
            let data = &playing.sample().data;
            if data.is_empty() {
                playing.stop();
                continue;
            }

            let [left, right] = spatialize(&state.listener, playing.position(), playing.half_volume_radius);
            let (left, right) = (left * playing.volume, right * playing.volume);

            let mut cursor = playing.cursor();
            for frame in out.iter_mut() {
                if cursor >= data.len() {
                    if !playing.looping {
                        playing.stop();
                        break;
                    }
                    cursor = 0;
                }
                let value = data[cursor];
                frame[0] += value * left;
                frame[1] += value * right;
                cursor += 1;
            }
            playing.set_cursor(cursor);
        }

        out
    }
}

/// Destination for mixed blocks
pub trait AudioSink: Send {
    fn consume(&mut self, block: &[[f32; 2]]);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn consume(&mut self, _block: &[[f32; 2]]) {}
}

/// Tracks peak levels and logs them about once a second
#[derive(Debug, Default)]
pub struct LevelMeter {
    peak: [f32; 2],
    frames: usize,
}

impl LevelMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peak(&self) -> [f32; 2] {
        self.peak
    }
}

impl AudioSink for LevelMeter {
    fn consume(&mut self, block: &[[f32; 2]]) {
        for frame in block {
            self.peak[0] = self.peak[0].max(frame[0].abs());
            self.peak[1] = self.peak[1].max(frame[1].abs());
        }
        self.frames += block.len();

        if self.frames >= SAMPLE_RATE as usize {
            log::debug!("Mixer peak L {:.3} R {:.3}", self.peak[0], self.peak[1]);
            self.frames = 0;
            self.peak = [0.0; 2];
        }
    }
}

/// Background thread that mixes one block at a time
///
/// The engine lock is held only while a block is mixed. Dropping the
/// handle stops and joins the thread.
pub struct MixerThread {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MixerThread {
    pub fn spawn(engine: AudioEngine, mut sink: Box<dyn AudioSink>, block_frames: usize) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let block_time = Duration::from_secs_f64(block_frames as f64 / SAMPLE_RATE as f64);

        let handle = thread::Builder::new()
            .name("audio-mixer".into())
            .spawn(move || {
                log::info!("Mixer thread started ({} frames per block)", block_frames);
                while flag.load(Ordering::Acquire) {
                    let block = {
                        let mut state = engine.lock();
                        Mixer::mix(&mut state, block_frames)
                    };
                    sink.consume(&block);
                    thread::sleep(block_time);
                }
                log::info!("Mixer thread stopped");
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for MixerThread {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Mixer thread panicked");
            }
        }
    }
}
