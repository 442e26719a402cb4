use glow::{
    Context, HasContext, COLOR_BUFFER_BIT, DEBUG_OUTPUT, DEBUG_SEVERITY_HIGH,
    DEBUG_SEVERITY_MEDIUM, DEBUG_SEVERITY_NOTIFICATION, DEPTH_BUFFER_BIT, NO_ERROR, VERSION,
};
use sdl2::event::{Event, WindowEvent};
use sdl2::video::GLContext;
use sdl2::TimerSubsystem;

use std::marker::PhantomData;
use std::time::{Duration, Instant};

pub use glam;
pub use glow;
pub use sdl2::{self, video::Window};

pub mod cubemap;
pub mod driver;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod image;
pub mod logging;
pub mod mesh;
pub mod shader;
mod texture;
pub mod time;
pub mod util;

pub use cubemap::{CubeFace, CubeMapFaces};
pub use driver::{DriverState, Ticker, DEFAULT_TICK_RATE};
pub use error::{SetupError, SetupErrorKind};
pub use frame::{FadeFactor, Frame};
pub use geometry::{Geometry, IndexData, VertexLayout};
pub use image::RgbaImage;
pub use logging::{init_logging, LoggingConfig};
pub use mesh::{Mesh, MeshData, MeshVertex};
pub use shader::{Pipeline, Program, ShaderSources, Uniform};
pub use texture::Texture;
pub use time::Clock;

/// Drains the GL error queue, logging every pending error. Returns `false` if
/// there was any.
pub fn print_error(gl: &Context, what: &str) -> bool {
    let mut clean = true;
    unsafe {
        let mut error = gl.get_error();
        while error != NO_ERROR {
            clean = false;
            log::error!("{what}: GL error {error:#06x}");
            error = gl.get_error();
        }
    }
    clean
}

/// Sets the viewport to the whole drawable and clears it to gray, so a frame
/// where nothing else draws is still visibly rendered.
pub fn clear_frame(gl: &Context, frame: &Frame) {
    unsafe {
        gl.viewport(0, 0, frame.width, frame.height);
        gl.clear_color(0.5, 0.5, 0.5, 1.0);
        gl.clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
    }
}

/// Forwards GL debug output to the `log` facade.
pub fn log_debug_message(source: u32, typ: u32, id: u32, severity: u32, message: String) {
    let level = match severity {
        DEBUG_SEVERITY_HIGH => log::Level::Error,
        DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        DEBUG_SEVERITY_NOTIFICATION => log::Level::Trace,
        _ => log::Level::Debug,
    };
    log::log!(target: "glplay::gl", level, "[{source:#x}/{typ:#x}/{id}] {message}");
}

/// One demo: GPU resources created once in `init`, drawn on every tick.
#[allow(unused)]
pub trait GlPlayground: Sized {
    fn init(gl: &Context, window: &Window) -> Result<Self, SetupError>;

    /// Called with the drawable size after `init` and on every resize.
    fn reshape(&mut self, gl: &Context, width: i32, height: i32) {}

    fn display(&mut self, gl: &Context, frame: &Frame);

    fn window(window_title: impl Into<String>) -> StartBuilder<Self> {
        StartBuilder::new(window_title.into())
    }
}

pub type DebugMessageCallback = dyn Fn(u32, u32, u32, u32, String) + Send + Sync;

pub struct StartBuilder<T: GlPlayground> {
    window_title: String,
    window_width: Option<u32>,
    window_height: Option<u32>,
    gl_version: Option<(u8, u8)>,
    tick_rate: Option<u32>,
    playground: PhantomData<T>,
    debug_message_callback: Option<Box<DebugMessageCallback>>,
}

impl<T: GlPlayground> StartBuilder<T> {
    pub fn new(window_title: String) -> Self {
        StartBuilder {
            window_title,
            window_width: None,
            window_height: None,
            gl_version: None,
            tick_rate: None,
            playground: PhantomData,
            debug_message_callback: None,
        }
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = Some(width);
        self.window_height = Some(height);
        self
    }

    pub fn gl_version(mut self, major: u8, minor: u8) -> Self {
        self.gl_version = Some((major, minor));
        self
    }

    /// Frames per second requested from the frame timer. Defaults to 60.
    pub fn tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate = Some(hz);
        self
    }

    pub fn debug_message_callback(
        mut self,
        callback: impl Fn(u32, u32, u32, u32, String) + Send + Sync + 'static,
    ) -> Self {
        self.debug_message_callback = Some(Box::new(callback));
        self
    }

    /// Opens the window, runs setup and drives frames until the window is
    /// closed.
    pub fn start(mut self) -> Result<(), SetupError> {
        let (gl_major_version, gl_minor_version) = self.gl_version.unwrap_or((4, 1));

        let sdl = sdl2::init().map_err(SetupError::context)?;
        let video = sdl.video().map_err(SetupError::context)?;
        let clock = Clock::new(sdl.timer().map_err(SetupError::context)?);

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(gl_major_version, gl_minor_version);
        gl_attr.set_double_buffer(true);
        gl_attr.set_depth_size(24);
        if self.debug_message_callback.is_some() {
            gl_attr.set_context_flags().debug().set();
        }

        let window = video
            .window(
                &self.window_title,
                self.window_width.unwrap_or(480),
                self.window_height.unwrap_or(270),
            )
            .allow_highdpi()
            .opengl()
            .resizable()
            .build()
            .map_err(|err| SetupError::context(err.to_string()))?;
        let gl_context = window.gl_create_context().map_err(SetupError::context)?;
        window.gl_make_current(&gl_context).map_err(SetupError::context)?;
        // the frame timer paces rendering, not the display
        if let Err(err) = video.gl_set_swap_interval(0) {
            log::warn!("cannot disable vsync: {err}");
        }

        let mut gl =
            unsafe { Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _) };
        log::info!(
            "{}: OpenGL {}",
            self.window_title,
            unsafe { gl.get_parameter_string(VERSION) }
        );

        if let Some(callback) = self.debug_message_callback.take() {
            if gl.supports_debug() {
                unsafe {
                    gl.enable(DEBUG_OUTPUT);
                    gl.debug_message_callback(move |source, typ, id, severity, message| {
                        callback(source, typ, id, severity, message.to_string())
                    });
                }
            } else {
                log::warn!("context has no debug output, callback ignored");
            }
        }

        let mut app = T::init(&gl, &window)?;
        print_error(&gl, "init");

        let mut host = Host {
            gl: &gl,
            window: &window,
            gl_context: &gl_context,
            clock: &clock,
            prev_elapsed: clock.elapsed_seconds(),
            tick_interval: Duration::ZERO,
        };
        let (width, height) = host.drawable_size();
        app.reshape(&gl, width, height);

        let mut driver = DriverState::Idle;
        driver.start(self.tick_rate.unwrap_or(DEFAULT_TICK_RATE), Instant::now());
        host.tick_interval = driver.ticker().map_or(Duration::ZERO, Ticker::interval);

        let mut event_pump = sdl.event_pump().map_err(SetupError::context)?;
        'running: loop {
            let budget = driver.wait_budget(Instant::now()).unwrap_or(Duration::ZERO);
            let first = if budget.is_zero() {
                event_pump.poll_event()
            } else {
                event_pump.wait_event_timeout(budget.as_millis().max(1) as u32)
            };

            for event in first.into_iter().chain(event_pump.poll_iter()) {
                match event {
                    Event::Quit { .. } => break 'running,
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(..),
                        ..
                    } => {
                        let (width, height) = host.drawable_size();
                        log::debug!("reshape to {width}x{height}");
                        app.reshape(&gl, width, height);
                        host.render(&mut app);
                    }
                    Event::Window {
                        win_event: WindowEvent::Exposed,
                        ..
                    } => host.render(&mut app),
                    _ => {}
                }
            }

            if driver.poll(Instant::now()) {
                host.render(&mut app);
            }
        }

        log::debug!("window closed");
        Ok(())
    }
}

/// The window side of the render loop: makes the context current, builds the
/// frame state and presents.
struct Host<'a> {
    gl: &'a Context,
    window: &'a Window,
    gl_context: &'a GLContext,
    clock: &'a Clock<TimerSubsystem>,
    prev_elapsed: f64,
    tick_interval: Duration,
}

impl Host<'_> {
    fn drawable_size(&self) -> (i32, i32) {
        let (width, height) = self.window.drawable_size();
        (width as i32, height as i32)
    }

    fn render<T: GlPlayground>(&mut self, app: &mut T) {
        if let Err(err) = self.window.gl_make_current(self.gl_context) {
            log::error!("cannot make context current: {err}");
            return;
        }
        let elapsed = self.clock.elapsed_seconds();
        let (width, height) = self.drawable_size();
        let frame = Frame {
            elapsed: elapsed as f32,
            delta: (elapsed - self.prev_elapsed) as f32,
            width,
            height,
        };
        self.prev_elapsed = elapsed;

        if frame.is_late(self.tick_interval) {
            log::debug!(
                "frame at {:.3}s came {:.1}ms after the previous one",
                frame.elapsed,
                frame.delta * 1000.0
            );
        }

        app.display(self.gl, &frame);
        self.window.gl_swap_window();
    }
}
