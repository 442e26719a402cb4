use std::path::Path;

use glam::Vec2;

use crate::error::{SetupError, SetupErrorKind};

/// Tightly packed 8-bit RGBA pixels, first row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SetupError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize * 4 {
            return Err(SetupError::new(
                SetupErrorKind::ImageDecode,
                format!("{} bytes for a {width}x{height} RGBA image", pixels.len()),
            ));
        }
        Ok(RgbaImage {
            width,
            height,
            pixels,
        })
    }

    /// A single texel.
    pub fn solid(color: [u8; 4]) -> Self {
        RgbaImage {
            width: 1,
            height: 1,
            pixels: color.to_vec(),
        }
    }

    /// Decodes any format stb_image understands, expanded to four channels.
    pub fn decode(data: &[u8]) -> Result<Self, SetupError> {
        use stb_image::image::{load_from_memory_with_depth, LoadResult};
        match load_from_memory_with_depth(data, 4, true) {
            LoadResult::Error(e) => Err(SetupError::new(SetupErrorKind::ImageDecode, e)),
            LoadResult::ImageU8(image) => {
                RgbaImage::new(image.width as u32, image.height as u32, image.data)
            }
            LoadResult::ImageF32(_) => Err(SetupError::new(
                SetupErrorKind::ImageDecode,
                "floating point images are not supported",
            )),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            SetupError::new(SetupErrorKind::Io, format!("{}: {err}", path.display()))
        })?;
        Self::decode(&data).map_err(|err| {
            SetupError::new(err.kind(), format!("{}: {}", path.display(), err.detail()))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Image files store the top row first, GL textures expect the bottom row.
    pub fn flip_vertically(&mut self) {
        let row = self.width as usize * 4;
        let rows = self.height as usize;
        for y in 0..rows / 2 {
            let (top, bottom) = self.pixels.split_at_mut((rows - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[at],
            self.pixels[at + 1],
            self.pixels[at + 2],
            self.pixels[at + 3],
        ]
    }

    /// Nearest texel to normalized coordinates, clamped to the edge.
    pub fn sample_nearest(&self, st: Vec2) -> [u8; 4] {
        let pick = |coord: f32, size: u32| ((coord * size as f32).floor().max(0.0) as u32).min(size - 1);
        self.texel(pick(st.x, self.width), pick(st.y, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> RgbaImage {
        #[rustfmt::skip]
        let pixels = vec![
            1, 1, 1, 255,   2, 2, 2, 255,
            3, 3, 3, 255,   4, 4, 4, 255,
        ];
        RgbaImage::new(2, 2, pixels).unwrap()
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        let err = RgbaImage::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err.kind(), SetupErrorKind::ImageDecode);
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(RgbaImage::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn flip_swaps_rows() {
        let mut image = two_by_two();
        image.flip_vertically();
        assert_eq!(image.texel(0, 0), [3, 3, 3, 255]);
        assert_eq!(image.texel(1, 1), [2, 2, 2, 255]);
    }

    #[test]
    fn flip_keeps_middle_row_of_odd_images() {
        let mut image = RgbaImage::new(1, 3, vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]).unwrap();
        image.flip_vertically();
        assert_eq!(image.pixels(), [3, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn nearest_sampling_clamps_to_edges() {
        let image = two_by_two();
        assert_eq!(image.sample_nearest(Vec2::new(0.25, 0.25)), [1, 1, 1, 255]);
        assert_eq!(image.sample_nearest(Vec2::new(0.75, 0.25)), [2, 2, 2, 255]);
        assert_eq!(image.sample_nearest(Vec2::new(1.0, 1.0)), [4, 4, 4, 255]);
        assert_eq!(image.sample_nearest(Vec2::new(-0.5, 0.9)), [3, 3, 3, 255]);
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        let err = RgbaImage::decode(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), SetupErrorKind::ImageDecode);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RgbaImage::open("/nonexistent/right.png").unwrap_err();
        assert_eq!(err.kind(), SetupErrorKind::Io);
        assert!(err.detail().contains("right.png"));
    }
}
