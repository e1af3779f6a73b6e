//! Standalone window hosting the hero visual, backed by winit.
//!
//! ```no_run
//! # use prisma::Viewer;
//! Viewer::builder().with_title("Prisma").build().run().unwrap();
//! ```

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::PrismaError,
    frame::FrameOutcome,
    hero::HeroVisual,
    input::InputEvent,
    options::Options,
    renderer::GpuBackend,
    util::frame_timing::FrameTiming,
};

/// How often the smoothed frame rate is logged.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Prisma".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the hero visual.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`PrismaError::Host`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), PrismaError> {
        let event_loop =
            EventLoop::new().map_err(|e| PrismaError::Host(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            hero: None,
            started: Instant::now(),
            timing: FrameTiming::new(),
            options: Some(self.options),
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| PrismaError::Host(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    hero: Option<HeroVisual<GpuBackend>>,
    started: Instant,
    timing: FrameTiming,
    options: Option<Options>,
    title: String,
}

impl ViewerApp {
    fn redraw(&mut self) {
        let (Some(window), Some(hero)) = (&self.window, &mut self.hero) else {
            return;
        };
        let elapsed = self.started.elapsed().as_secs_f32();
        if let FrameOutcome::Presented { frame } = hero.tick(elapsed) {
            self.timing.end_frame();
            if self.timing.due_report(FPS_LOG_INTERVAL) {
                log::debug!("frame {frame}: {:.1} fps", self.timing.fps());
            }
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let options = self.options.take().unwrap_or_default();
        let hero = match pollster::block_on(HeroVisual::with_surface(
            window.clone(),
            (inner.width, inner.height),
            options,
        )) {
            Ok(hero) => hero,
            Err(e) => {
                log::error!("Failed to initialize hero visual: {e}");
                event_loop.exit();
                return;
            }
        };

        self.started = Instant::now();
        window.request_redraw();
        self.window = Some(window);
        self.hero = Some(hero);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        let input = match event {
            WindowEvent::CloseRequested => {
                if let Some(hero) = &mut self.hero {
                    hero.unmount();
                }
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                return;
            }
            WindowEvent::Resized(size) => InputEvent::Resized {
                width: size.width,
                height: size.height,
            },
            WindowEvent::Occluded(occluded) => {
                InputEvent::VisibilityChanged { visible: !occluded }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                }
            }
            WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
            _ => return,
        };

        if let Some(hero) = &mut self.hero {
            hero.handle_event(input);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
