use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use glow::{Context, TRIANGLES};
use glplay::{
    clear_frame, init_logging, FadeFactor, Frame, Geometry, GlPlayground, LoggingConfig,
    Program, SetupError, ShaderSources, Uniform, VertexLayout, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/tunnel");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    // glam's Vec4 is 16-byte aligned and would pad the vertex
    position: [f32; 4],
    tex_coord: Vec2,
}

fn vertex(x: f32, y: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0, 1.0],
        tex_coord: Vec2::new((x + 1.0) * 0.5, (y + 1.0) * 0.5),
    }
}

struct Demo {
    program: Program,
    time: Uniform,
    resolution: Uniform,
    factor: Uniform,
    fade: FadeFactor,
    quad: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let vertices = [
            vertex(-1.0, -1.0),
            vertex(1.0, -1.0),
            vertex(1.0, 1.0),
            vertex(-1.0, -1.0),
            vertex(1.0, 1.0),
            vertex(-1.0, 1.0),
        ];
        let quad = Geometry::upload(gl, &vertices, &VertexLayout::interleaved(&[4, 2]), None)?;

        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/tunnel.vert"),
            format!("{EXAMPLE_DIR}/tunnel.frag"),
        )?
        .compile(gl)?;

        Ok(Demo {
            time: program.uniform(gl, "time"),
            resolution: program.uniform(gl, "resolution"),
            factor: program.uniform(gl, "factor"),
            program,
            fade: FadeFactor::fade_in(),
            quad,
        })
    }

    fn reshape(&mut self, gl: &Context, width: i32, height: i32) {
        self.resolution
            .set_vec2(gl, Vec2::new(width as f32, height as f32));
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.time.set_f32(gl, frame.elapsed);
        self.factor.set_f32(gl, self.fade.value());
        self.quad.draw(gl, TRIANGLES);
        self.fade.advance();
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Tunnel").start()
}
