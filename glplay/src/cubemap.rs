use std::path::Path;

use glam::{Vec2, Vec3};
use glow::TEXTURE_CUBE_MAP_POSITIVE_X;

use crate::error::{SetupError, SetupErrorKind};
use crate::image::RgbaImage;

/// Cube faces in GL target order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn gl_target(self) -> u32 {
        TEXTURE_CUBE_MAP_POSITIVE_X + self as u32
    }

    /// Conventional image file name, without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "right",
            CubeFace::NegativeX => "left",
            CubeFace::PositiveY => "top",
            CubeFace::NegativeY => "bottom",
            CubeFace::PositiveZ => "front",
            CubeFace::NegativeZ => "back",
        }
    }

    /// Face a direction points at and the face coordinates it lands on, using
    /// the major-axis table GL samplers use. `None` for the zero vector.
    pub fn select(dir: Vec3) -> Option<(CubeFace, Vec2)> {
        let abs = dir.abs();
        let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
            if dir.x >= 0.0 {
                (CubeFace::PositiveX, -dir.z, -dir.y, abs.x)
            } else {
                (CubeFace::NegativeX, dir.z, -dir.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if dir.y >= 0.0 {
                (CubeFace::PositiveY, dir.x, dir.z, abs.y)
            } else {
                (CubeFace::NegativeY, dir.x, -dir.z, abs.y)
            }
        } else if dir.z >= 0.0 {
            (CubeFace::PositiveZ, dir.x, -dir.y, abs.z)
        } else {
            (CubeFace::NegativeZ, -dir.x, -dir.y, abs.z)
        };
        if ma == 0.0 {
            return None;
        }
        let st = Vec2::new(sc / ma + 1.0, tc / ma + 1.0) * 0.5;
        Some((face, st))
    }
}

/// The six images of a cube map, all square and the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeMapFaces {
    faces: [RgbaImage; 6],
}

impl CubeMapFaces {
    /// Faces are given in [`CubeFace::ALL`] order.
    pub fn new(faces: [RgbaImage; 6]) -> Result<Self, SetupError> {
        let size = faces[0].width();
        for (face, image) in CubeFace::ALL.iter().zip(&faces) {
            if image.width() != size || image.height() != size {
                return Err(SetupError::new(
                    SetupErrorKind::ImageDecode,
                    format!(
                        "cube face {} is {}x{}, expected {size}x{size}",
                        face.file_stem(),
                        image.width(),
                        image.height()
                    ),
                ));
            }
        }
        Ok(CubeMapFaces { faces })
    }

    /// One texel per face.
    pub fn solid(colors: [[u8; 4]; 6]) -> Self {
        CubeMapFaces {
            faces: colors.map(RgbaImage::solid),
        }
    }

    /// Red, cyan, green, magenta, blue and yellow for +X, -X, +Y, -Y, +Z, -Z.
    pub fn debug_colors() -> Self {
        Self::solid([
            [0xFF, 0x00, 0x00, 0xFF],
            [0x00, 0xFF, 0xFF, 0xFF],
            [0x00, 0xFF, 0x00, 0xFF],
            [0xFF, 0x00, 0xFF, 0xFF],
            [0x00, 0x00, 0xFF, 0xFF],
            [0xFF, 0xFF, 0x00, 0xFF],
        ])
    }

    /// Loads `right.<ext>`, `left.<ext>`, ... from `dir`, with the bottom row
    /// of every image first.
    pub fn open_dir(dir: impl AsRef<Path>, extension: &str) -> Result<Self, SetupError> {
        let dir = dir.as_ref();
        let mut images = Vec::with_capacity(6);
        for face in CubeFace::ALL {
            let mut image = RgbaImage::open(dir.join(format!("{}.{extension}", face.file_stem())))?;
            image.flip_vertically();
            images.push(image);
        }
        let faces: [RgbaImage; 6] = images
            .try_into()
            .map_err(|_| SetupError::new(SetupErrorKind::ImageDecode, "expected six faces"))?;
        Self::new(faces)
    }

    pub fn face(&self, face: CubeFace) -> &RgbaImage {
        &self.faces[face as usize]
    }

    pub fn size(&self) -> u32 {
        self.faces[0].width()
    }

    /// Nearest-texel lookup along `dir`.
    pub fn sample(&self, dir: Vec3) -> Option<[u8; 4]> {
        let (face, st) = CubeFace::select(dir)?;
        Some(self.face(face).sample_nearest(st))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_directions_sample_their_face_color() {
        let colors = [
            [0xFF, 0x00, 0x00, 0xFF],
            [0x00, 0xFF, 0xFF, 0xFF],
            [0x00, 0xFF, 0x00, 0xFF],
            [0xFF, 0x00, 0xFF, 0xFF],
            [0x00, 0x00, 0xFF, 0xFF],
            [0xFF, 0xFF, 0x00, 0xFF],
        ];
        let cube = CubeMapFaces::solid(colors);
        let directions = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (dir, color) in directions.into_iter().zip(colors) {
            assert_eq!(cube.sample(dir), Some(color), "direction {dir}");
        }
        assert_eq!(cube, CubeMapFaces::debug_colors());
    }

    #[test]
    fn principal_directions_hit_face_centers() {
        for (dir, face) in [
            (Vec3::X, CubeFace::PositiveX),
            (Vec3::NEG_X, CubeFace::NegativeX),
            (Vec3::Y, CubeFace::PositiveY),
            (Vec3::NEG_Y, CubeFace::NegativeY),
            (Vec3::Z, CubeFace::PositiveZ),
            (Vec3::NEG_Z, CubeFace::NegativeZ),
        ] {
            assert_eq!(CubeFace::select(dir * 7.0), Some((face, Vec2::splat(0.5))));
        }
    }

    #[test]
    fn zero_direction_selects_nothing() {
        assert_eq!(CubeFace::select(Vec3::ZERO), None);
        assert_eq!(CubeMapFaces::debug_colors().sample(Vec3::ZERO), None);
    }

    #[test]
    fn face_coordinates_follow_the_major_axis_table() {
        // +X face: s runs along -Z, t along -Y
        let (face, st) = CubeFace::select(Vec3::new(1.0, -0.5, -0.5)).unwrap();
        assert_eq!(face, CubeFace::PositiveX);
        assert_eq!(st, Vec2::new(0.75, 0.75));
    }

    #[test]
    fn larger_faces_are_sampled_by_quadrant() {
        let quadrant = |c: u8| [c, c, c, 255];
        let pixels: Vec<u8> = [quadrant(1), quadrant(2), quadrant(3), quadrant(4)].concat();
        let image = RgbaImage::new(2, 2, pixels).unwrap();
        let faces = CubeMapFaces::new(std::array::from_fn(|_| image.clone())).unwrap();
        // +Z face: s along +X, t along -Y
        assert_eq!(faces.sample(Vec3::new(-0.5, 0.5, 1.0)), Some(quadrant(1)));
        assert_eq!(faces.sample(Vec3::new(0.5, -0.5, 1.0)), Some(quadrant(4)));
    }

    #[test]
    fn mismatched_faces_are_rejected() {
        let mut faces: [RgbaImage; 6] = std::array::from_fn(|_| RgbaImage::solid([0; 4]));
        faces[3] = RgbaImage::new(2, 1, vec![0; 8]).unwrap();
        let err = CubeMapFaces::new(faces).unwrap_err();
        assert_eq!(err.kind(), SetupErrorKind::ImageDecode);
        assert!(err.detail().contains("bottom"));
    }

    #[test]
    fn gl_targets_are_consecutive() {
        let targets: Vec<u32> = CubeFace::ALL.iter().map(|face| face.gl_target()).collect();
        assert_eq!(targets[0], TEXTURE_CUBE_MAP_POSITIVE_X);
        assert!(targets.windows(2).all(|pair| pair[1] == pair[0] + 1));
    }
}
