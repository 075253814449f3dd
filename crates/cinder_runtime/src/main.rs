//! Cinder host process
//!
//! Owns the window, the GPU surface and the engine context, and drives the
//! frame loop with `ControlFlow::Poll`. The gameplay module is loaded (and
//! reloaded) from the configured build artifact while this process runs:
//!
//!   cargo run --bin cinder            # the host
//!   cargo build -p cinder_game       # in another shell, to hot-swap
//!
//! Run with: RUST_LOG=debug for reload tracing.

mod platform;
mod renderer;

use crate::platform::{PlatformEvent, WinitPlatform};
use crate::renderer::SpriteRenderer;
use cinder_engine::{EngineContext, EngineError, FrameLoop, RuntimeConfig};
use cinder_math::IVec2;
use cinder_module::{DynLibBackend, HotReload};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes};

const MB: usize = 1024 * 1024;

/// Process exit codes for fatal failures, distinguishable in scripts.
/// Normal window-close exits 0.
const EXIT_CONFIG: i32 = -1;
const EXIT_PLATFORM: i32 = -2;
const EXIT_MODULE: i32 = -3;

struct HostApp {
    config: RuntimeConfig,
    ctx: EngineContext,
    frame_loop: FrameLoop<DynLibBackend>,
    platform: WinitPlatform,
    window: Option<Arc<Window>>,
    renderer: Option<SpriteRenderer>,
    /// First fatal error out of the loop; reported after the event loop
    /// unwinds.
    fatal: Option<EngineError>,
}

impl HostApp {
    fn new(config: RuntimeConfig) -> Self {
        let ctx = EngineContext::new(
            config.memory.persistent_mb * MB,
            config.memory.transient_mb * MB,
        );
        let reload = HotReload::new(
            DynLibBackend::new(),
            config.reload.module_path.clone(),
            config.shadow_path(),
            config.retry_backoff(),
        );
        let platform = WinitPlatform::new(IVec2::new(
            config.window.width as i32,
            config.window.height as i32,
        ));
        Self {
            config,
            ctx,
            frame_loop: FrameLoop::new(reload),
            platform,
            window: None,
            renderer: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: EngineError) {
        log::error!("fatal: {}", error);
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for HostApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                return self.fail(
                    event_loop,
                    EngineError::Platform(format!("window creation failed: {}", e)),
                );
            }
        };

        match SpriteRenderer::new(window.clone(), &self.config.assets.sprite_shader) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                return self.fail(event_loop, EngineError::Platform(e.to_string()));
            }
        }

        let size = window.inner_size();
        self.platform
            .push(PlatformEvent::Resize(IVec2::new(size.width as i32, size.height as i32)));
        self.window = Some(window);

        log::info!(
            "host up; watching '{}' for rebuilds",
            self.config.reload.module_path.display()
        );
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.platform.request_close(),

            WindowEvent::Resized(size) => {
                self.platform
                    .push(PlatformEvent::Resize(IVec2::new(size.width as i32, size.height as i32)));
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                // Key repeats would inflate half-transition counts.
                if !event.repeat {
                    self.platform
                        .push_key(event.physical_key, event.state == ElementState::Pressed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.platform.push(PlatformEvent::MouseMove(IVec2::new(
                    position.x as i32,
                    position.y as i32,
                )));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.platform
                    .push_mouse_button(button, state == ElementState::Pressed);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        if let Err(e) = self
            .frame_loop
            .step(&mut self.ctx, &mut self.platform, renderer)
        {
            return self.fail(event_loop, e);
        }

        if !self.ctx.running {
            log::info!("shutting down");
            event_loop.exit();
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match RuntimeConfig::load(std::path::Path::new("cinder.toml")) {
        Ok(config) => config,
        Err(e) => {
            log::error!("broken cinder.toml: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    log::info!(
        "arenas: {} MB persistent, {} MB transient",
        config.memory.persistent_mb,
        config.memory.transient_mb
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("no event loop available: {}", e);
            std::process::exit(EXIT_PLATFORM);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = HostApp::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop failed: {}", e);
        std::process::exit(EXIT_PLATFORM);
    }

    match app.fatal {
        Some(EngineError::Module(e)) => {
            log::error!("module failure: {}", e);
            std::process::exit(EXIT_MODULE);
        }
        Some(e) => {
            log::error!("{}", e);
            std::process::exit(EXIT_PLATFORM);
        }
        None => {}
    }
}
