use std::fmt::Write as _;
use std::path::Path;

use glam::{Mat4, Vec2};
use glow::{
    Context, HasContext as _, NativeProgram, NativeShader, NativeUniformLocation,
    FRAGMENT_SHADER, FRAGMENT_SHADER_BIT, PROGRAM_SEPARABLE, VERTEX_SHADER, VERTEX_SHADER_BIT,
};
use sdl2::VideoSubsystem;

use crate::error::{gpu_alloc, SetupError, SetupErrorKind};

struct Source {
    name: String,
    text: String,
}

impl Source {
    fn read(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            SetupError::new(SetupErrorKind::Io, format!("{}: {err}", path.display()))
        })?;
        Ok(Source {
            name: path.display().to_string(),
            text,
        })
    }
}

/// A vertex and fragment shader pair waiting to be compiled.
pub struct ShaderSources {
    vertex: Source,
    fragment: Source,
}

impl ShaderSources {
    pub fn from_paths(
        vertex_shader_path: impl AsRef<Path>,
        fragment_shader_path: impl AsRef<Path>,
    ) -> Result<Self, SetupError> {
        Ok(ShaderSources {
            vertex: Source::read(vertex_shader_path.as_ref())?,
            fragment: Source::read(fragment_shader_path.as_ref())?,
        })
    }

    /// Links both stages into one program.
    pub fn compile(&self, gl: &Context) -> Result<Program, SetupError> {
        let stages = [(VERTEX_SHADER, &self.vertex), (FRAGMENT_SHADER, &self.fragment)];
        link_program(gl, &stages, None).map(Program)
    }

    /// Links each stage into its own separable program and binds both into a
    /// program pipeline.
    pub fn compile_separable(
        &self,
        gl: &Context,
        video: &VideoSubsystem,
    ) -> Result<Pipeline, SetupError> {
        let fns = PipelineFns::load(video)?;
        let vertex = Program(link_program(gl, &[(VERTEX_SHADER, &self.vertex)], Some(&fns))?);
        let fragment = Program(link_program(
            gl,
            &[(FRAGMENT_SHADER, &self.fragment)],
            Some(&fns),
        )?);

        let mut name = 0;
        unsafe {
            (fns.gen_program_pipelines)(1, &mut name);
        }
        if name == 0 {
            return Err(gpu_alloc("program pipeline")("glGenProgramPipelines returned 0".into()));
        }
        unsafe {
            (fns.use_program_stages)(name, VERTEX_SHADER_BIT, vertex.raw());
            (fns.use_program_stages)(name, FRAGMENT_SHADER_BIT, fragment.raw());
        }
        log::debug!("program pipeline {name} ready");

        Ok(Pipeline {
            name,
            vertex,
            fragment,
            fns,
        })
    }
}

/// Prefixes every line of `source` with its 1-based line number, the way
/// driver diagnostics count lines.
pub fn numbered_source(source: &str) -> String {
    let mut listing = String::new();
    for (index, line) in source.lines().enumerate() {
        let _ = writeln!(listing, "{:4}: {line}", index + 1);
    }
    listing
}

fn compile_stage(gl: &Context, stage: u32, source: &Source) -> Result<NativeShader, SetupError> {
    unsafe {
        let shader = gl.create_shader(stage).map_err(gpu_alloc("shader"))?;
        gl.shader_source(shader, &source.text);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(SetupError::new(
                SetupErrorKind::ShaderCompile,
                format!(
                    "{}:\n{}\n{}",
                    source.name,
                    log.trim_end(),
                    numbered_source(&source.text)
                ),
            ));
        }
        Ok(shader)
    }
}

fn link_program(
    gl: &Context,
    stages: &[(u32, &Source)],
    separable: Option<&PipelineFns>,
) -> Result<NativeProgram, SetupError> {
    unsafe {
        let program = gl.create_program().map_err(gpu_alloc("program"))?;
        if let Some(fns) = separable {
            (fns.program_parameteri)(program.0.get(), PROGRAM_SEPARABLE, 1);
        }

        let mut shaders = Vec::with_capacity(stages.len());
        for (stage, source) in stages {
            match compile_stage(gl, *stage, source) {
                Ok(shader) => {
                    gl.attach_shader(program, shader);
                    shaders.push(shader);
                }
                Err(err) => {
                    for shader in shaders {
                        gl.delete_shader(shader);
                    }
                    gl.delete_program(program);
                    return Err(err);
                }
            }
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            let names: Vec<_> = stages.iter().map(|(_, source)| source.name.as_str()).collect();
            return Err(SetupError::new(
                SetupErrorKind::ShaderLink,
                format!("{}: {}", names.join(" + "), log.trim_end()),
            ));
        }
        Ok(program)
    }
}

/// A linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program(NativeProgram);

impl Program {
    fn raw(&self) -> u32 {
        self.0 .0.get()
    }

    /// Looks up a uniform once so the render path never searches by name.
    pub fn uniform(&self, gl: &Context, name: &str) -> Uniform {
        let location = unsafe { gl.get_uniform_location(self.0, name) };
        if location.is_none() {
            log::debug!("uniform `{name}` is not active in program {}", self.raw());
        }
        Uniform {
            program: self.0,
            location,
        }
    }

    pub fn bind(&self, gl: &Context) {
        unsafe { gl.use_program(Some(self.0)) }
    }
}

/// Location of one uniform in one program. Setters write straight to that
/// program, whether or not it is in use, so stage programs of a pipeline
/// never need binding.
#[derive(Debug, Clone)]
pub struct Uniform {
    program: NativeProgram,
    location: Option<NativeUniformLocation>,
}

impl Uniform {
    pub fn set_f32(&self, gl: &Context, value: f32) {
        unsafe { gl.program_uniform_1_f32(self.program, self.location.as_ref(), value) }
    }

    pub fn set_i32(&self, gl: &Context, value: i32) {
        unsafe { gl.program_uniform_1_i32(self.program, self.location.as_ref(), value) }
    }

    pub fn set_vec2(&self, gl: &Context, value: Vec2) {
        unsafe {
            gl.program_uniform_2_f32(self.program, self.location.as_ref(), value.x, value.y)
        }
    }

    pub fn set_mat4(&self, gl: &Context, value: &Mat4) {
        unsafe {
            gl.program_uniform_matrix_4_f32_slice(
                self.program,
                self.location.as_ref(),
                false,
                value.as_ref(),
            )
        }
    }
}

type GenProgramPipelines = unsafe extern "system" fn(n: i32, pipelines: *mut u32);
type UseProgramStages = unsafe extern "system" fn(pipeline: u32, stages: u32, program: u32);
type BindProgramPipeline = unsafe extern "system" fn(pipeline: u32);
type ProgramParameteri = unsafe extern "system" fn(program: u32, pname: u32, value: i32);

// Pipeline entry points come straight from SDL's loader.
#[derive(Clone, Copy)]
struct PipelineFns {
    program_parameteri: ProgramParameteri,
    gen_program_pipelines: GenProgramPipelines,
    use_program_stages: UseProgramStages,
    bind_program_pipeline: BindProgramPipeline,
}

impl PipelineFns {
    fn load(video: &VideoSubsystem) -> Result<Self, SetupError> {
        Ok(PipelineFns {
            program_parameteri: load_fn(video, "glProgramParameteri")?,
            gen_program_pipelines: load_fn(video, "glGenProgramPipelines")?,
            use_program_stages: load_fn(video, "glUseProgramStages")?,
            bind_program_pipeline: load_fn(video, "glBindProgramPipeline")?,
        })
    }
}

fn load_fn<F: Copy>(video: &VideoSubsystem, name: &str) -> Result<F, SetupError> {
    let ptr = video.gl_get_proc_address(name);
    if ptr.is_null() {
        return Err(SetupError::context(format!("{name} is not available")));
    }
    assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const ()>());
    // SAFETY: F is one of the extern "system" fn aliases above, matching the
    // GL prototype of `name`.
    Ok(unsafe { std::mem::transmute_copy::<*const (), F>(&ptr) })
}

/// Separable vertex and fragment programs bound into one program pipeline.
pub struct Pipeline {
    name: u32,
    vertex: Program,
    fragment: Program,
    fns: PipelineFns,
}

impl Pipeline {
    pub fn vertex(&self) -> Program {
        self.vertex
    }

    pub fn fragment(&self) -> Program {
        self.fragment
    }

    /// Makes the pipeline the active program state. Any program installed with
    /// [`Program::bind`] is released first because it would take precedence.
    pub fn bind(&self, gl: &Context) {
        unsafe {
            gl.use_program(None);
            (self.fns.bind_program_pipeline)(self.name);
        }
    }

    pub fn unbind(&self) {
        unsafe { (self.fns.bind_program_pipeline)(0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_source_counts_from_one() {
        let listing = numbered_source("#version 410 core\nvoid main() {\n}\n");
        assert_eq!(
            listing,
            "   1: #version 410 core\n   2: void main() {\n   3: }\n"
        );
    }

    #[test]
    fn numbered_source_of_empty_text_is_empty() {
        assert_eq!(numbered_source(""), "");
    }

    #[test]
    fn missing_shader_file_is_an_io_error() {
        let err = match ShaderSources::from_paths("/nonexistent/a.vert", "/nonexistent/a.frag") {
            Ok(_) => panic!("loaded a missing file"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), SetupErrorKind::Io);
        assert!(err.detail().starts_with("/nonexistent/a.vert"));
    }
}
