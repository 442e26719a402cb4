use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use glow::{Context, HasContext, BACK, CULL_FACE, DEPTH_TEST, TRIANGLES};
use glplay::util::{
    aspect_ratio, cube_face_indices, cube_faces, default_projection, tumbling_model_view,
};
use glplay::{
    clear_frame, init_logging, Frame, Geometry, GlPlayground, IndexData, LoggingConfig, Program,
    SetupError, ShaderSources, Uniform, VertexLayout, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/colored-cube");

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: Vec3,
    color: Vec3,
}

// +X, -X, +Y, -Y, +Z, -Z
const FACE_COLORS: [Vec3; 6] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 0.0),
];

struct Demo {
    program: Program,
    projection_matrix: Uniform,
    model_view_matrix: Uniform,
    cube: Geometry,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let vertices: Vec<Vertex> = cube_faces(0.5)
            .into_iter()
            .zip(FACE_COLORS)
            .flat_map(|(corners, color)| corners.map(|position| Vertex { position, color }))
            .collect();
        let indices = IndexData::U8(cube_face_indices().to_vec());
        let cube = Geometry::upload(
            gl,
            &vertices,
            &VertexLayout::interleaved(&[3, 3]),
            Some(&indices),
        )?;

        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/cube.vert"),
            format!("{EXAMPLE_DIR}/cube.frag"),
        )?
        .compile(gl)?;

        unsafe {
            gl.enable(DEPTH_TEST);
            gl.enable(CULL_FACE);
            gl.cull_face(BACK);
        }

        Ok(Demo {
            projection_matrix: program.uniform(gl, "projectionMatrix"),
            model_view_matrix: program.uniform(gl, "modelViewMatrix"),
            program,
            cube,
        })
    }

    fn reshape(&mut self, gl: &Context, width: i32, height: i32) {
        self.projection_matrix
            .set_mat4(gl, &default_projection(aspect_ratio(width, height)));
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        let model_view: Mat4 = tumbling_model_view(frame.elapsed, 3.0);

        self.program.bind(gl);
        self.model_view_matrix.set_mat4(gl, &model_view);
        self.cube.draw(gl, TRIANGLES);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Colored Cube").start()
}
