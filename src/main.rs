use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use orbit_render::camera::{OrbitCameraController, OrbitConfig};
use orbit_render::cli::{Cli, Sample};
use orbit_render::core::{
    FrameScheduler, OrbitInput, RedrawSignal, SchedulerError, SchedulerStatus, SurfaceSize, SurfaceTarget,
};
use orbit_render::logging::{init_logging, LoggingConfig};
use orbit_render::scenes::{Cube, Globe, Marker, SceneScheduler, SharedCamera, Triangle};

/// Everything that exists once the window and device are up
struct Renderer {
    window: Arc<Window>,
    scheduler: Rc<SceneScheduler>,
    /// Set when a frame failed on a lost or outdated surface
    retry: Rc<Cell<bool>>,
}

struct App {
    cli: Cli,
    camera: SharedCamera,
    input: OrbitInput,
    pool: LocalPool,
    spawner: LocalSpawner,
    renderer: Option<Renderer>,
}

impl App {
    fn new(cli: Cli) -> Result<Self> {
        let config = OrbitConfig::default().with_radius(cli.radius);
        let camera = OrbitCameraController::new(config).context("invalid orbit camera settings")?;
        let pool = LocalPool::new();
        let spawner = pool.spawner();

        Ok(Self {
            cli,
            camera: Rc::new(RefCell::new(camera)),
            input: OrbitInput::new(),
            pool,
            spawner,
            renderer: None,
        })
    }

    fn init_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
        let attributes = Window::default_attributes()
            .with_title(format!("orbit-render - {}", self.cli.sample.title()))
            .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let target = pollster::block_on(SurfaceTarget::new(Arc::clone(&window)))
            .context("failed to initialize GPU surface")?;
        let gpu = target.gpu().clone();

        let redraw_window = Arc::clone(&window);
        let signal = RedrawSignal::new(move || redraw_window.request_redraw());
        let scheduler = Rc::new(FrameScheduler::new(target, signal).with_clear_color(self.cli.background));

        match self.cli.sample {
            Sample::Triangle => {
                Triangle::new(&gpu, &scheduler);
            }
            Sample::Cube => {
                Cube::new(&gpu, &scheduler, Rc::clone(&self.camera));
            }
            Sample::Globe => {
                let globe = Globe::new(&gpu, &scheduler, Rc::clone(&self.camera));
                Marker::new(&gpu, &scheduler, Rc::clone(&self.camera), globe.radius());
            }
        }

        log::info!(
            "{:?} sample ready, {} listener(s) registered",
            self.cli.sample,
            scheduler.listener_count()
        );

        Ok(Renderer {
            window,
            scheduler,
            retry: Rc::new(Cell::new(false)),
        })
    }

    /// Spawn a frame unless one is already waiting for the next refresh.
    ///
    /// A pending frame reads the camera when it draws, so skipping loses no input.
    fn request_frame(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        if renderer.scheduler.status() == SchedulerStatus::Pending {
            return;
        }

        let scheduler = Rc::clone(&renderer.scheduler);
        let retry = Rc::clone(&renderer.retry);
        let spawned = self.spawner.spawn_local(async move {
            match scheduler.trigger().await {
                Ok(status) => log::trace!("frame {status}"),
                Err(SchedulerError::Surface(_)) => retry.set(true),
                Err(_) => {}
            }
        });
        if let Err(err) = spawned {
            log::error!("failed to spawn frame: {err}");
            return;
        }

        // Runs the trigger up to its wait on the redraw signal
        self.pool.run_until_stalled();
    }

    fn on_redraw(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };

        let woken = renderer.scheduler.signal().fire();
        log::trace!("redraw woke {woken} waiter(s)");
        self.pool.run_until_stalled();

        let retry = renderer.retry.replace(false);
        if retry || self.cli.sample.is_animated() {
            self.request_frame();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.take() {
            renderer.scheduler.signal().close();
            self.pool.run_until_stalled();
            renderer.scheduler.destroy();
            log::info!(
                "shutting down after {} frame(s)",
                renderer.scheduler.frames_submitted()
            );
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match self.init_renderer(event_loop) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.request_frame();
            }
            Err(err) => {
                log::error!("{err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self
            .renderer
            .as_ref()
            .is_none_or(|renderer| renderer.window.id() != window_id)
        {
            return;
        }

        if self
            .input
            .process_event(&mut self.camera.borrow_mut(), &event)
        {
            self.request_frame();
            return;
        }

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
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                let size = SurfaceSize::from(size);
                if let Some(renderer) = &self.renderer {
                    renderer.scheduler.with_target(|target| target.resize(size));
                }
                // Minimized windows render nothing until restored
                if !size.is_empty() {
                    self.request_frame();
                }
            }
            WindowEvent::RedrawRequested => self.on_redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(cli)?;
    event_loop.run_app(&mut app).context("event loop error")?;

    Ok(())
}
