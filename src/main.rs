use anyhow::Context;
use clap::Parser;
use glam::UVec2;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use bird_watch::audio::{AudioEngine, AudioSink, LevelMeter, MixerThread, NullSink, Sample};
use bird_watch::cli::Cli;
use bird_watch::clock::{Clock, FpsCounter};
use bird_watch::input::{InputAdapter, InputEvent, Key};
use bird_watch::render::{Canvas, SurfacePresenter};
use bird_watch::{create_city_scene, load_gltf_scene, Mode, ObserveMode, Settings};

const INITIAL_WINDOW_WIDTH: u32 = 960;
const INITIAL_WINDOW_HEIGHT: u32 = 600;
const MIXER_BLOCK_FRAMES: usize = 1024;

struct App<'s> {
    mode: ObserveMode<'s>,
    input: InputAdapter,
    canvas: Canvas,
    clock: Clock,
    fps: FpsCounter,
    window: Option<Arc<Window>>,
    presenter: Option<SurfacePresenter>,
}

impl<'s> App<'s> {
    fn new(mode: ObserveMode<'s>) -> Self {
        Self {
            mode,
            input: InputAdapter::new(),
            canvas: Canvas::new(1, 1),
            clock: Clock::new(),
            fps: FpsCounter::default(),
            window: None,
            presenter: None,
        }
    }

    fn window_size(&self) -> UVec2 {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                UVec2::new(size.width, size.height)
            }
            None => UVec2::ONE,
        }
    }

    fn redraw(&mut self) {
        let delta = self.clock.tick();
        if let Some(fps) = self.fps.frame(delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        self.mode.update(delta);

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        let (width, height) = presenter.dimensions();
        self.canvas.resize(width, height);
        self.mode.draw(UVec2::new(width, height), &mut self.canvas);

        if let Err(e) = presenter.present(&self.canvas) {
            log::warn!("Present failed: {}", e);
            if let Some(window) = &self.window {
                let size = window.inner_size();
                presenter.resize(size.width, size.height);
            }
        }
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Bird Watch")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let presenter = match pollster::block_on(SurfacePresenter::new(Arc::clone(&window))) {
            Ok(p) => p,
            Err(e) => {
                log::error!("Failed to initialize presenter: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.clock.reset();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(input) = self.input.process_event(&event) {
            let window_size = self.window_size();
            if !self.mode.handle_event(&input, window_size) && input == InputEvent::KeyDown(Key::Escape) {
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::load_optional(cli.settings.as_deref())?;
    let mut scene = match &cli.scene {
        Some(path) => load_gltf_scene(path)?,
        None => create_city_scene(),
    };

    let audio = AudioEngine::new();
    let sink: Box<dyn AudioSink> = if cli.mute {
        Box::new(NullSink)
    } else {
        Box::new(LevelMeter::new())
    };
    let _mixer = MixerThread::spawn(audio.clone(), sink, MIXER_BLOCK_FRAMES)
        .context("Failed to start audio mixer")?;

    let noise = Arc::new(Sample::wind(settings.sound.loop_seconds));
    let mode = ObserveMode::new(&mut scene, audio, &noise, settings)?;
    log::info!("Starting {} mode", mode.name());

    let event_loop = EventLoop::new()?;
    let mut app = App::new(mode);

    println!("Bird Watch - Controls: Left/Right to switch cameras, click to spot birds, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
