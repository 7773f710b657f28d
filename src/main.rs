//! Lasertrap entry point
//!
//! Loads settings and the level, opens the window and runs one simulation
//! tick plus one draw per frame.

use std::process::ExitCode;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use lasertrap::level::Level;
use lasertrap::platform::InputState;
use lasertrap::renderer::RenderState;
use lasertrap::sim::{GameEvent, GameState, build_state, tick};
use lasertrap::{Settings, unit_size_for_viewport};

/// Game instance holding all state
struct Game {
    settings: Settings,
    level: Level,
    state: GameState,
    input: InputState,
    window: Option<Arc<Window>>,
    render_state: Option<RenderState>,
    hud: String,
    failed: bool,
}

impl Game {
    fn new(settings: Settings, level: Level, state: GameState) -> Self {
        Self {
            settings,
            level,
            state,
            input: InputState::new(),
            window: None,
            render_state: None,
            hud: String::new(),
            failed: false,
        }
    }

    /// Advance the simulation one step and draw it
    fn frame(&mut self) {
        let events = tick(&mut self.state, &self.input.tick_input());
        self.input.end_frame();

        for event in events {
            match event {
                GameEvent::Caught { .. } => log::info!("Caught! Final score {}", self.state.score),
                GameEvent::PaintingCollected {
                    points,
                    main_objective: true,
                } => log::info!("Main objective stolen (+{}), final score {}", points, self.state.score),
                GameEvent::PaintingCollected { points, .. } => log::info!("Painting stolen (+{})", points),
                GameEvent::MirrorPlaced { id } => log::debug!("Mirror {} placed", id),
                GameEvent::MirrorCollected { id } => log::debug!("Mirror {} collected", id),
            }
        }

        self.update_hud();
        self.render();
    }

    /// Update the HUD in the window title
    fn update_hud(&mut self) {
        let hud = self.state.hud_text();
        if hud != self.hud {
            if let Some(window) = &self.window {
                window.set_title(&hud);
            }
            self.hud = hud;
        }
    }

    /// Render the current frame
    fn render(&mut self) {
        if let Some(ref mut render_state) = self.render_state {
            match render_state.render(&self.state) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }
}

impl ApplicationHandler for Game {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Lasertrap")
            .with_inner_size(PhysicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.failed = true;
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderState::new(
            Arc::clone(&window),
            &self.settings,
            &self.level,
        )) {
            Ok(render_state) => self.render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to initialise renderer: {}", e);
                self.failed = true;
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        self.update_hud();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    if !event.repeat {
                        self.input.handle_key(code, event.state);
                    }
                }
            }

            // Keys released while unfocused never arrive
            WindowEvent::Focused(false) => self.input.clear(),

            WindowEvent::Resized(new_size) => {
                if let Some(ref mut render_state) = self.render_state {
                    render_state.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::RedrawRequested => self.frame(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Lasertrap starting...");

    let settings = Settings::load();
    let level = match Level::load(&settings.levels_dir, settings.level) {
        Ok(level) => level,
        Err(e) => {
            log::error!("Failed to load level {}: {}", settings.level, e);
            return ExitCode::FAILURE;
        }
    };

    let unit = unit_size_for_viewport(settings.window_width, settings.window_height);
    let setup = settings.level_setup(unit);
    log::info!("Game initialized with seed: {}", setup.seed);
    let state = match build_state(&level, &setup) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to build level {}: {}", settings.level, e);
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut game = Game::new(settings, level, state);
    if let Err(e) = event_loop.run_app(&mut game) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!("{}", game.state.hud_text());
    if game.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
