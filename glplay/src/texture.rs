use std::path::Path;

use glow::{
    Context, HasContext as _, NativeTexture, CLAMP_TO_EDGE, LINEAR, LINEAR_MIPMAP_LINEAR, NEAREST,
    RGBA, RGBA8, TEXTURE0, TEXTURE_2D, TEXTURE_CUBE_MAP, TEXTURE_CUBE_MAP_SEAMLESS,
    TEXTURE_MAG_FILTER, TEXTURE_MIN_FILTER, TEXTURE_WRAP_R, TEXTURE_WRAP_S, TEXTURE_WRAP_T,
    UNSIGNED_BYTE,
};

use crate::cubemap::{CubeFace, CubeMapFaces};
use crate::error::{gpu_alloc, SetupError};
use crate::image::RgbaImage;
use crate::print_error;

/// A 2D or cube map texture.
#[derive(Debug, Clone, Copy)]
pub struct Texture {
    id: NativeTexture,
    target: u32,
}

impl Texture {
    /// Decodes an image file into a 2D texture, bottom row first.
    pub fn open_2d(gl: &Context, path: impl AsRef<Path>, gen_mipmap: bool) -> Result<Self, SetupError> {
        let mut image = RgbaImage::open(path)?;
        image.flip_vertically();
        Self::from_image(gl, &image, gen_mipmap)
    }

    pub fn from_image(gl: &Context, image: &RgbaImage, gen_mipmap: bool) -> Result<Self, SetupError> {
        unsafe {
            let id = gl.create_texture().map_err(gpu_alloc("texture"))?;
            gl.bind_texture(TEXTURE_2D, Some(id));
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, LINEAR as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_S, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_T, CLAMP_TO_EDGE as i32);
            upload_rgba(gl, TEXTURE_2D, image);
            if gen_mipmap {
                gl.generate_mipmap(TEXTURE_2D);
                gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR_MIPMAP_LINEAR as _);
            }
            gl.bind_texture(TEXTURE_2D, None);
            print_error(gl, "texture 2d");
            Ok(Texture {
                id,
                target: TEXTURE_2D,
            })
        }
    }

    /// Uploads six faces into a seamless, edge-clamped cube map. Single texel
    /// faces are sampled with nearest filtering so each face keeps its exact
    /// color.
    pub fn cube_map(gl: &Context, faces: &CubeMapFaces) -> Result<Self, SetupError> {
        let filter = if faces.size() == 1 { NEAREST } else { LINEAR };
        unsafe {
            let id = gl.create_texture().map_err(gpu_alloc("cube map"))?;
            gl.bind_texture(TEXTURE_CUBE_MAP, Some(id));
            gl.enable(TEXTURE_CUBE_MAP_SEAMLESS);
            gl.tex_parameter_i32(TEXTURE_CUBE_MAP, TEXTURE_WRAP_S, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_CUBE_MAP, TEXTURE_WRAP_T, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_CUBE_MAP, TEXTURE_WRAP_R, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_CUBE_MAP, TEXTURE_MIN_FILTER, filter as i32);
            gl.tex_parameter_i32(TEXTURE_CUBE_MAP, TEXTURE_MAG_FILTER, filter as i32);
            for face in CubeFace::ALL {
                upload_rgba(gl, face.gl_target(), faces.face(face));
            }
            gl.bind_texture(TEXTURE_CUBE_MAP, None);
            print_error(gl, "cube map");
            Ok(Texture {
                id,
                target: TEXTURE_CUBE_MAP,
            })
        }
    }

    /// Binds to texture unit `unit` (0 for `TEXTURE0`).
    pub fn bind(&self, gl: &Context, unit: u32) {
        unsafe {
            gl.active_texture(TEXTURE0 + unit);
            gl.bind_texture(self.target, Some(self.id));
        }
    }
}

unsafe fn upload_rgba(gl: &Context, target: u32, image: &RgbaImage) {
    gl.tex_image_2d(
        target,
        0,
        RGBA8 as _,
        image.width() as _,
        image.height() as _,
        0,
        RGBA,
        UNSIGNED_BYTE,
        Some(image.pixels()),
    );
}
