use anyhow::{Context, Result};
use clap::Parser;
use colorbot_input::{Action, map_key};
use colorbot_render_wgpu::{GpuContext, ROBOT_SHADER, RobotRenderer};
use colorbot_scene::{
    AnimationConfig, AnimationState, Camera, ColorCube, DemoConfig, DrawList, TickTimer,
    color_cube, compose, world_transform,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "colorbot-desktop", about = "Animated robot built from color cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Window title
    #[arg(long, default_value = "Color Robot")]
    title: String,

    /// Turn the whole robot about its vertical axis
    #[arg(long)]
    spin: bool,

    /// WGSL file replacing the built-in shader
    #[arg(long)]
    shader: Option<PathBuf>,

    /// JSON file with animation and camera settings
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Animation and view state. Owned by the event loop thread.
struct AppState {
    animation: AnimationState,
    animation_config: AnimationConfig,
    camera: Camera,
    timer: TickTimer,
    spin: bool,
}

impl AppState {
    fn new(config: DemoConfig, spin: bool, start: Instant) -> Self {
        Self {
            animation: AnimationState::new(&config.animation),
            animation_config: config.animation,
            camera: config.camera,
            timer: TickTimer::new(config.animation.tick_interval(), start),
            spin,
        }
    }

    /// Advance the animation if a tick is due. Returns true when a redraw
    /// should be requested.
    fn update(&mut self, now: Instant) -> bool {
        match self.timer.poll(now) {
            Some(elapsed) => {
                self.animation.tick(elapsed, &self.animation_config);
                true
            }
            None => false,
        }
    }

    /// Start measuring tick intervals from `now`, so time spent before the
    /// first frame does not count as animation time.
    fn restart_timer(&mut self, now: Instant) {
        self.timer = TickTimer::new(self.animation_config.tick_interval(), now);
    }

    fn draw_list(&self) -> DrawList {
        let world = world_transform(&self.animation, self.spin);
        compose(&self.animation, &self.camera, world)
    }
}

struct WindowSettings {
    title: String,
    width: u32,
    height: u32,
}

struct GpuApp {
    state: AppState,
    settings: WindowSettings,
    mesh: ColorCube,
    shader_source: String,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<RobotRenderer>,
    /// Startup failure raised inside the event loop, reported by `main`.
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, settings: WindowSettings, shader_source: String) -> Self {
        Self {
            state,
            settings,
            mesh: color_cube(),
            shader_source,
            window: None,
            gpu: None,
            renderer: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU")?;

        let renderer = RobotRenderer::new(
            &gpu.device,
            gpu.surface_format(),
            size.width,
            size.height,
            &self.mesh,
            &self.shader_source,
        )
        .context("failed to build robot pipeline")?;

        self.state.camera.resize(size.width, size.height);
        self.state.restart_timer(Instant::now());

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let (Some(gpu), Some(renderer)) = (&mut self.gpu, &mut self.renderer) {
            gpu.resize(size.width, size.height);
            let (width, height) = gpu.size();
            renderer.resize(&gpu.device, width, height);
        }
        self.state.camera.resize(size.width, size.height);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = self.state.draw_list();
        renderer.render(&gpu.device, &gpu.queue, &view, &draws);

        if let Some(window) = &self.window {
            window.pre_present_notify();
        }
        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match map_key(&logical_key) {
                Action::Quit => {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
                Action::Noop => {}
            },
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.update(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.state.timer.deadline()));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("colorbot-desktop starting");

    let config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DemoConfig::default(),
    };

    let shader_source = match &cli.shader {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader {}", path.display()))?,
        None => ROBOT_SHADER.to_string(),
    };

    let state = AppState::new(config, cli.spin, Instant::now());
    let settings = WindowSettings {
        title: cli.title,
        width: cli.width,
        height: cli.height,
    };

    let event_loop = EventLoop::new()?;
    let mut app = GpuApp::new(state, settings, shader_source);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal.take() {
        return Err(err);
    }

    tracing::info!("colorbot-desktop exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbot_scene::SwingPhase;
    use std::time::Duration;

    #[test]
    fn update_ticks_only_after_interval() {
        let start = Instant::now();
        let mut state = AppState::new(DemoConfig::default(), false, start);

        assert!(!state.update(start + Duration::from_millis(10)));
        assert_eq!(state.animation.swing_angle, -0.08);

        assert!(state.update(start + Duration::from_millis(20)));
        assert!((state.animation.swing_angle - (-0.077)).abs() < 1e-6);
        assert_eq!(state.animation.phase, SwingPhase::Extending);
    }

    #[test]
    fn restarted_timer_ignores_startup_time() {
        let start = Instant::now();
        let mut state = AppState::new(DemoConfig::default(), true, start);

        // window and GPU setup took two seconds
        let ready = start + Duration::from_secs(2);
        state.restart_timer(ready);

        assert!(!state.update(ready + Duration::from_millis(10)));
        assert!(state.update(ready + Duration::from_millis(20)));
        // one 20 ms tick turns the body by 0.72 degrees
        assert!((state.animation.body_rotation - 0.72_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn draw_list_stands_still_without_spin() {
        let start = Instant::now();
        let mut state = AppState::new(DemoConfig::default(), false, start);
        for i in 1..=50 {
            state.update(start + Duration::from_millis(20 * i));
        }
        assert!(state.animation.body_rotation > 0.0);
        let body = state.draw_list().draws[0];
        assert_eq!(body.model.w_axis.x, 0.0);
        assert_eq!(body.model.w_axis.z, 0.0);
    }

    #[test]
    fn draw_list_turns_with_spin() {
        let start = Instant::now();
        let mut still = AppState::new(DemoConfig::default(), false, start);
        let mut spun = AppState::new(DemoConfig::default(), true, start);
        for i in 1..=50 {
            still.update(start + Duration::from_millis(20 * i));
            spun.update(start + Duration::from_millis(20 * i));
        }
        assert_ne!(still.draw_list().draws[1].model, spun.draw_list().draws[1].model);
    }
}
