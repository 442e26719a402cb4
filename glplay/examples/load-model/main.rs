use glow::{Context, HasContext, BACK, CULL_FACE, DEPTH_TEST};
use glplay::util::{aspect_ratio, default_projection, tumbling_model_view};
use glplay::{
    clear_frame, init_logging, Frame, GlPlayground, LoggingConfig, Mesh, Program, SetupError,
    ShaderSources, Uniform, Window,
};

const EXAMPLE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/load-model");

struct Demo {
    program: Program,
    projection_matrix: Uniform,
    model_view_matrix: Uniform,
    mesh: Mesh,
}

impl GlPlayground for Demo {
    fn init(gl: &Context, _window: &Window) -> Result<Self, SetupError> {
        let mesh = Mesh::load_obj(gl, format!("{EXAMPLE_DIR}/cube.obj"))?;

        let program = ShaderSources::from_paths(
            format!("{EXAMPLE_DIR}/model.vert"),
            format!("{EXAMPLE_DIR}/model.frag"),
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
            mesh,
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
            .set_mat4(gl, &tumbling_model_view(frame.elapsed, 5.0));
        self.mesh.draw(gl);
    }
}

fn main() -> Result<(), SetupError> {
    init_logging(LoggingConfig::default());
    Demo::window("Load Model").start()
}
