//! Window management using winit

use std::sync::Arc;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::core::camera::Camera;
use crate::core::error::Error;
use crate::core::time::{Clock, FrameTime, FrameTimer};
use crate::garden::{Animator, Garden, RunLoop, StopHandle, TickOutcome, populate};
use crate::scene::{Environment, GardenConfig};

use super::context::GpuContext;
use super::renderer::Renderer;
use super::viewport::apply_resize;

/// Window configuration
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Posy".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Application handler that owns the garden and drives it from redraws
struct App {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    garden: Garden,
    camera: Camera,
    run_loop: RunLoop,
    stop: StopHandle,
    environment: Environment,
    clock: Clock,
    timer: FrameTimer,
    error: Option<Error>,
}

impl App {
    fn new(config: WindowConfig, garden_config: &GardenConfig) -> Self {
        let seed = garden_config.seed.unwrap_or_else(|| rand::rng().random());
        let garden = populate(garden_config, &mut StdRng::seed_from_u64(seed));
        log::info!("Garden seed: {}", seed);

        let animator = Animator::new(garden_config);
        let camera = animator.initial_camera(config.width as f32 / config.height.max(1) as f32);
        let run_loop = RunLoop::new(animator);
        let stop = run_loop.stop_handle();

        Self {
            config,
            window: None,
            renderer: None,
            garden,
            camera,
            run_loop,
            stop,
            environment: garden_config.environment.clone(),
            clock: Clock::start(),
            timer: FrameTimer::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Error> {
        let window_attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        log::info!("GPU: {}", gpu.adapter_name());

        let mut renderer = Renderer::new(gpu, self.environment.clone());

        let size = window.inner_size();
        apply_resize(&mut self.camera, &mut renderer, size.width, size.height);
        log::info!("Window created: {}x{}", size.width, size.height);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else { return };

        if self.timer.tick() {
            log::debug!("{:.1} FPS", self.timer.fps());
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {:.1} FPS", self.config.title, self.timer.fps()));
            }
        }

        let time = FrameTime::new(self.clock.elapsed_secs(), self.timer.delta_secs());
        match self.run_loop.tick(&mut self.garden, &mut self.camera, time, renderer) {
            Ok(TickOutcome::Continue) => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Ok(TickOutcome::Stopped) => {
                log::info!("Stopped after {} frames", self.run_loop.ticks());
                event_loop.exit();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
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
                log::info!("Window close requested");
                self.stop.request_stop();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(_) => {
                // The event payload may already be stale; the window is authoritative
                if let (Some(window), Some(renderer)) = (&self.window, self.renderer.as_mut()) {
                    let size = window.inner_size();
                    apply_resize(&mut self.camera, renderer, size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Create the window, plant the garden and run until the window closes
pub fn run(window_config: WindowConfig, garden_config: GardenConfig) -> Result<(), Error> {
    let event_loop = EventLoop::new()
        .map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;

    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(window_config, &garden_config);

    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(format!("Event loop error: {}", e)))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
