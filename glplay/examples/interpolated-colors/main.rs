use glow::{Context, TRIANGLES};
use glplay::{
    clear_frame, init_logging, Frame, Geometry, GlPlayground, LoggingConfig, Program,
    SetupError, ShaderSources, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/interpolated-colors");

// Corner positions and colors are indexed by gl_VertexID in the vertex shader.
struct Demo {
    program: Program,
    triangle: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        Ok(Demo {
            program: ShaderSources::from_paths(
                format!("{EXAMPLE_DIR}/colors.vert"),
                format!("{EXAMPLE_DIR}/colors.frag"),
            )?
            .compile(gl)?,
            triangle: Geometry::attributeless(gl, 3)?,
        })
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.triangle.draw(gl, TRIANGLES);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Interpolated Colors").start()
}
