use glam::Vec2;
use glow::{Context, TRIANGLE_STRIP};
use glplay::{
    clear_frame, init_logging, Frame, Geometry, GlPlayground, LoggingConfig, Program,
    SetupError, ShaderSources, Uniform, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/hello-world");

struct Demo {
    program: Program,
    resolution: Uniform,
    quad: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/quad.vert"),
            format!("{EXAMPLE_DIR}/hello.frag"),
        )?
        .compile(gl)?;
        let resolution = program.uniform(gl, "resolution");
        let quad = Geometry::attributeless(gl, 4)?;

        Ok(Demo {
            program,
            resolution,
            quad,
        })
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.resolution
            .set_vec2(gl, Vec2::new(frame.width as f32, frame.height as f32));
        self.quad.draw(gl, TRIANGLE_STRIP);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Hello World").start()
}
