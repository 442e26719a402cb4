use glow::{Context, HasContext, BACK, CULL_FACE, DEPTH_TEST, TRIANGLES};
use glplay::util::{
    aspect_ratio, cube_face_indices, cube_faces, default_projection, tumbling_model_view,
};
use glplay::{
    clear_frame, init_logging, CubeMapFaces, Frame, Geometry, GlPlayground, IndexData,
    LoggingConfig, Program, SetupError, ShaderSources, Texture, Uniform, VertexLayout, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/texture-cubemap");

// Every face of the cube shows the single texel of the cube map face it points
// at: red, cyan, green, magenta, blue and yellow for +X through -Z.
struct Demo {
    program: Program,
    projection_matrix: Uniform,
    model_view_matrix: Uniform,
    cube: Geometry,
    cube_map: Texture,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let corners: Vec<_> = cube_faces(0.5).into_iter().flatten().collect();
        let cube = Geometry::upload(
            gl,
            &corners,
            &VertexLayout::interleaved(&[3]),
            Some(&IndexData::U8(cube_face_indices().to_vec())),
        )?;

        let cube_map = Texture::cube_map(gl, &CubeMapFaces::debug_colors())?;

        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/skybox.vert"),
            format!("{EXAMPLE_DIR}/skybox.frag"),
        )?
        .compile(gl)?;
        program.uniform(gl, "cubeMap").set_i32(gl, 0);

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
            cube_map,
        })
    }

    fn reshape(&mut self, gl: &Context, width: i32, height: i32) {
        self.projection_matrix
            .set_mat4(gl, &default_projection(aspect_ratio(width, height)));
    }

    fn display(&mut self, gl: &Context, frame: &Frame) {
        clear_frame(gl, frame);
        self.program.bind(gl);
        self.model_view_matrix
            .set_mat4(gl, &tumbling_model_view(frame.elapsed, 3.0));
        self.cube_map.bind(gl, 0);
        self.cube.draw(gl, TRIANGLES);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Texture Cubemap").start()
}
