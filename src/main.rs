//! Stringsynth - tune an idealized vibrating string and watch it ring.
//!
//! Keyboard edits the physical parameters, P plays the resulting clip, and
//! the window shows the whole waveform plus the part currently audible.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use stringsynth::audio::{AudioPlayer, CpalPlayer, SilentPlayer};
use stringsynth::cli::Args;
use stringsynth::error::AppError;
use stringsynth::input::{Action, Controls, HeldKeys};
use stringsynth::params::{InputConfig, RenderConfig};
use stringsynth::rendering::{RenderSystem, WaveMesh};
use stringsynth::voice::StringVoice;
use stringsynth::waveform::Viewport;

type Voice = StringVoice<Box<dyn AudioPlayer>>;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Synthesis
    voice: Voice,
    rng: StdRng,

    // Input
    controls: Controls,
    held: HeldKeys,

    // Configuration
    render_config: RenderConfig,

    // Frame timing
    last_frame: Instant,

    /// First fatal error; the event loop exits when set
    error: Option<AppError>,
}

impl App {
    fn new(voice: Voice, rng: StdRng, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            render_system: None,
            voice,
            rng,
            controls: Controls::new(&InputConfig::default()),
            held: HeldKeys::default(),
            render_config,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Stringsynth")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window)))?;

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    /// Apply one control action
    fn dispatch(&mut self, action: Action, now: Instant) {
        match action {
            Action::Play => {
                if let Err(e) = self.voice.play(now) {
                    log::error!("Playback failed: {}", e);
                }
            }
            Action::CycleDrawMode => {
                self.render_config.draw_mode = self.render_config.draw_mode.next();
                log::info!("Draw mode: {}", self.render_config.draw_mode);
            }
            Action::Reroll => {
                match self.voice.regenerate_harmonics(&mut self.rng) {
                    Ok(()) => log::info!("New harmonics: {:.3?}", self.voice.harmonics()),
                    Err(e) => log::warn!("Could not resynthesize: {}", e),
                }
            }
            Action::Edit(param, op) => match self.voice.apply_edit(param, op) {
                Ok(value) => {
                    log::info!("{} = {}", param, value);
                    log::debug!("\n{}", self.voice.stats());
                }
                Err(e) => log::warn!("Rejected {} edit: {}", param, e),
            },
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_s = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        if let Some(action) = self.controls.update(&self.held, delta_s) {
            self.dispatch(action, now);
        }

        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let (width, height) = render_system.size();
        let viewport = Viewport::new(width as f32, height as f32);

        let full = self.voice.draw_full_wave(viewport);
        let moving = self.voice.draw_moving_wave(viewport, now);

        let mode = self.render_config.draw_mode;
        let palette = &self.render_config.palette;
        let radius = self.render_config.circle_radius_px;
        let mut mesh = WaveMesh::new();
        mesh.extend(&full.primitives(mode), palette, radius);
        mesh.extend(&moving.primitives(mode), palette, radius);

        match render_system.render(&mesh, self.render_config.background) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => render_system.resize(width, height),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        log::info!("Stringsynth is running!");
        log::info!("P play | M draw mode | R new harmonics | Esc quit");
        log::info!("Up/Down length | Left/Right n | W/S tension | E/D density | Q/A strength | T/G duration");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.held.press(code),
                ElementState::Released => self.held.release(code),
            },
            WindowEvent::Focused(false) => self.held.clear(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Open the default sound device, or fall back to silence
fn open_player(mute: bool) -> Box<dyn AudioPlayer> {
    if mute {
        return Box::new(SilentPlayer::default());
    }
    match CpalPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            Box::new(SilentPlayer::default())
        }
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut rng = args.rng();

    let voice = StringVoice::new(args.voice_settings(), &mut rng, open_player(args.mute))?;
    log::info!("Voice ready:\n{}", voice.stats());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(voice, rng, args.render_config());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
