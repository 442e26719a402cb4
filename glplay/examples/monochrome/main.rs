use glow::{Context, TRIANGLE_STRIP};
use glplay::{
    clear_frame, init_logging, Frame, Geometry, GlPlayground, LoggingConfig, Program,
    SetupError, ShaderSources, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/monochrome");

struct Demo {
    program: Program,
    quad: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        Ok(Demo {
            program: ShaderSources::from_paths(
                format!("{EXAMPLE_DIR}/quad.vert"),
                format!("{EXAMPLE_DIR}/mono.frag"),
            )?
            .compile(gl)?,
            quad: Geometry::attributeless(gl, 4)?,
        })
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.quad.draw(gl, TRIANGLE_STRIP);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("MonoChrome").window_size(200, 200).start()
}
