use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use glow::{Context, TRIANGLES};
use glplay::{
    clear_frame, init_logging, Frame, Geometry, GlPlayground, LoggingConfig, Program,
    SetupError, ShaderSources, Texture, VertexLayout, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/texture-2d");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: Vec3,
    tex_coord: Vec2,
}

fn vertex(x: f32, y: f32, s: f32, t: f32) -> Vertex {
    Vertex {
        position: Vec3::new(x, y, 0.0),
        tex_coord: Vec2::new(s, t),
    }
}

struct Demo {
    program: Program,
    texture: Texture,
    quad: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let vertices = [
            vertex(-0.5, -0.5, 0.0, 0.0),
            vertex(0.5, -0.5, 1.0, 0.0),
            vertex(0.5, 0.5, 1.0, 1.0),
            vertex(-0.5, -0.5, 0.0, 0.0),
            vertex(0.5, 0.5, 1.0, 1.0),
            vertex(-0.5, 0.5, 0.0, 1.0),
        ];
        let quad = Geometry::upload(gl, &vertices, &VertexLayout::interleaved(&[3, 2]), None)?;

        let texture = Texture::open_2d(gl, format!("{EXAMPLE_DIR}/checker.png"), true)?;

        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/textured.vert"),
            format!("{EXAMPLE_DIR}/textured.frag"),
        )?
        .compile(gl)?;
        program.uniform(gl, "tex").set_i32(gl, 0);

        Ok(Demo {
            program,
            texture,
            quad,
        })
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.texture.bind(gl, 0);
        self.quad.draw(gl, TRIANGLES);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Texture 2D").start()
}
