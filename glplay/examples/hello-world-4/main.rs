use glam::Vec2;
use glow::{Context, TRIANGLE_STRIP};
use glplay::{
    clear_frame, init_logging, log_debug_message, Frame, Geometry, GlPlayground, LoggingConfig,
    Pipeline, SetupError, ShaderSources, Uniform, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/hello-world-4");

struct Demo {
    pipeline: Pipeline,
    resolution: Uniform,
    quad: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, window: &Window) -> Result<Self, SetupError> {
        let pipeline = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/quad.vert"),
            format!("{EXAMPLE_DIR}/hello.frag"),
        )?
        .compile_separable(gl, window.subsystem())?;
        // resolution lives in the fragment stage program
        let resolution = pipeline.fragment().uniform(gl, "resolution");
        let quad = Geometry::attributeless(gl, 4)?;

        Ok(Demo {
            pipeline,
            resolution,
            quad,
        })
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.resolution
            .set_vec2(gl, Vec2::new(frame.width as f32, frame.height as f32));

        self.pipeline.bind(gl);
        self.quad.draw(gl, TRIANGLE_STRIP);
        self.pipeline.unbind();
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Hello World (program pipeline)")
        .debug_message_callback(log_debug_message)
        .start()
}
