use bytemuck::Pod;
use glow::{
    Context, HasContext as _, NativeVertexArray, ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER,
    FLOAT, STATIC_DRAW, UNSIGNED_BYTE, UNSIGNED_INT, UNSIGNED_SHORT,
};

use crate::error::{gpu_alloc, SetupError};

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// One float vector attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

/// Attribute locations, sizes and byte offsets of an interleaved float vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<Attribute>,
    stride: i32,
}

impl VertexLayout {
    /// Packs attributes tightly in order, at locations 0, 1, 2, ...
    pub fn interleaved(components: &[i32]) -> Self {
        let mut offset = 0;
        let attributes = components
            .iter()
            .enumerate()
            .map(|(location, &components)| {
                let attribute = Attribute {
                    location: location as u32,
                    components,
                    offset,
                };
                offset += components * FLOAT_SIZE as i32;
                attribute
            })
            .collect();
        VertexLayout {
            attributes,
            stride: offset,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }
}

/// Index data at the width it is uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    /// Stores `indices` at the narrowest width able to address `vertex_count`
    /// vertices. The width also fits every index given, so out of range
    /// indices survive for validation instead of wrapping.
    pub fn narrowest(indices: &[u32], vertex_count: usize) -> Self {
        let largest = indices
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(vertex_count.saturating_sub(1).min(u32::MAX as usize) as u32);
        if largest <= u8::MAX as u32 {
            IndexData::U8(indices.iter().map(|&i| i as u8).collect())
        } else if largest <= u16::MAX as u32 {
            IndexData::U16(indices.iter().map(|&i| i as u16).collect())
        } else {
            IndexData::U32(indices.to_vec())
        }
    }

    /// Reinterprets a native-endian index buffer of the given bit depth.
    pub fn from_bytes(bytes: &[u8], bits: u32) -> Result<Self, SetupError> {
        let width = match bits {
            8 | 16 | 32 => bits as usize / 8,
            _ => {
                return Err(SetupError::unsupported_mesh(format!(
                    "index bit depth {bits} is not 8, 16 or 32"
                )))
            }
        };
        if bytes.len() % width != 0 {
            return Err(SetupError::unsupported_mesh(format!(
                "{} index bytes do not divide into {bits}-bit indices",
                bytes.len()
            )));
        }
        Ok(match bits {
            8 => IndexData::U8(bytes.to_vec()),
            16 => IndexData::U16(bytemuck::pod_collect_to_vec(bytes)),
            _ => IndexData::U32(bytemuck::pod_collect_to_vec(bytes)),
        })
    }

    pub fn len(&self) -> usize {
        match self {
            IndexData::U8(indices) => indices.len(),
            IndexData::U16(indices) => indices.len(),
            IndexData::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest index, if any.
    pub fn max(&self) -> Option<u32> {
        match self {
            IndexData::U8(indices) => indices.iter().max().map(|&i| i as u32),
            IndexData::U16(indices) => indices.iter().max().map(|&i| i as u32),
            IndexData::U32(indices) => indices.iter().max().copied(),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            IndexData::U8(_) => 8,
            IndexData::U16(_) => 16,
            IndexData::U32(_) => 32,
        }
    }

    fn gl_type(&self) -> u32 {
        match self {
            IndexData::U8(_) => UNSIGNED_BYTE,
            IndexData::U16(_) => UNSIGNED_SHORT,
            IndexData::U32(_) => UNSIGNED_INT,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U8(indices) => indices.as_slice(),
            IndexData::U16(indices) => bytemuck::cast_slice(indices),
            IndexData::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Indices {
    count: i32,
    gl_type: u32,
}

/// A vertex array with its vertex buffer and optional index buffer. Built once,
/// drawn every frame.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    vertex_array: NativeVertexArray,
    indices: Option<Indices>,
    vertex_count: i32,
}

impl Geometry {
    /// A vertex array with no attributes, for shaders that generate their
    /// vertices from `gl_VertexID`.
    pub fn attributeless(gl: &Context, vertex_count: i32) -> Result<Self, SetupError> {
        let vertex_array = unsafe { gl.create_vertex_array() }.map_err(gpu_alloc("vertex array"))?;
        Ok(Geometry {
            vertex_array,
            indices: None,
            vertex_count,
        })
    }

    pub fn upload<V: Pod>(
        gl: &Context,
        vertices: &[V],
        layout: &VertexLayout,
        indices: Option<&IndexData>,
    ) -> Result<Self, SetupError> {
        debug_assert_eq!(std::mem::size_of::<V>(), layout.stride() as usize);

        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(gpu_alloc("vertex array"))?;
            gl.bind_vertex_array(Some(vertex_array));

            let vertex_buffer = gl.create_buffer().map_err(gpu_alloc("vertex buffer"))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, bytemuck::cast_slice(vertices), STATIC_DRAW);
            for attribute in layout.attributes() {
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    FLOAT,
                    false,
                    layout.stride(),
                    attribute.offset,
                );
                gl.enable_vertex_attrib_array(attribute.location);
            }

            let indices = match indices {
                Some(data) => {
                    let buffer = gl.create_buffer().map_err(gpu_alloc("index buffer"))?;
                    // element array binding is vertex array state
                    gl.bind_buffer(ELEMENT_ARRAY_BUFFER, Some(buffer));
                    gl.buffer_data_u8_slice(ELEMENT_ARRAY_BUFFER, data.as_bytes(), STATIC_DRAW);
                    Some(Indices {
                        count: data.len() as i32,
                        gl_type: data.gl_type(),
                    })
                }
                None => None,
            };

            gl.bind_vertex_array(None);
            gl.bind_buffer(ARRAY_BUFFER, None);

            Ok(Geometry {
                vertex_array,
                indices,
                vertex_count: vertices.len() as i32,
            })
        }
    }

    /// Binds the vertex array and issues one draw call with `mode`.
    pub fn draw(&self, gl: &Context, mode: u32) {
        unsafe {
            gl.bind_vertex_array(Some(self.vertex_array));
            match self.indices {
                Some(indices) => gl.draw_elements(mode, indices.count, indices.gl_type, 0),
                None => gl.draw_arrays(mode, 0, self.vertex_count),
            }
            gl.bind_vertex_array(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetupErrorKind;

    #[test]
    fn position_normal_uv_layout() {
        let layout = VertexLayout::interleaved(&[3, 3, 2]);
        assert_eq!(layout.stride(), 32);
        let offsets: Vec<_> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 24]);
        let locations: Vec<_> = layout.attributes().iter().map(|a| a.location).collect();
        assert_eq!(locations, [0, 1, 2]);
    }

    #[test]
    fn homogeneous_position_uv_layout() {
        let layout = VertexLayout::interleaved(&[4, 2]);
        assert_eq!(layout.stride(), 24);
        assert_eq!(layout.attributes()[1].offset, 16);
    }

    #[test]
    fn narrowest_index_width() {
        assert_eq!(IndexData::narrowest(&[0, 255], 256).bits(), 8);
        assert_eq!(IndexData::narrowest(&[0, 256], 257).bits(), 16);
        assert_eq!(IndexData::narrowest(&[0, 65_535], 65_536).bits(), 16);
        assert_eq!(IndexData::narrowest(&[70_000], 70_001), IndexData::U32(vec![70_000]));
    }

    #[test]
    fn narrowing_never_wraps_large_indices() {
        let indices = IndexData::narrowest(&[0, 1, 257], 3);
        assert_eq!(indices, IndexData::U16(vec![0, 1, 257]));
        assert_eq!(indices.max(), Some(257));
        assert_eq!(IndexData::narrowest(&[], 0), IndexData::U8(Vec::new()));
    }

    #[test]
    fn index_bytes_by_bit_depth() {
        let bytes = [1u8, 0, 2, 0];
        assert_eq!(
            IndexData::from_bytes(&bytes, 8).unwrap(),
            IndexData::U8(vec![1, 0, 2, 0])
        );
        let wide = IndexData::from_bytes(&bytes, 16).unwrap();
        assert_eq!(wide.len(), 2);
        assert_eq!(wide.bits(), 16);
        assert_eq!(IndexData::from_bytes(&bytes, 32).unwrap().len(), 1);
    }

    #[test]
    fn other_bit_depths_are_rejected() {
        for bits in [0, 1, 4, 12, 24, 64] {
            let err = IndexData::from_bytes(&[0; 24], bits).unwrap_err();
            assert_eq!(err.kind(), SetupErrorKind::UnsupportedMesh);
        }
    }

    #[test]
    fn unaligned_index_bytes_are_read() {
        let mut buffer = vec![0xFFu8];
        buffer.extend_from_slice(bytemuck::cast_slice(&[7u32, 8, 9]));
        assert_eq!(
            IndexData::from_bytes(&buffer[1..], 32).unwrap(),
            IndexData::U32(vec![7, 8, 9])
        );
        let wide = IndexData::from_bytes(&buffer[1..], 16).unwrap();
        assert_eq!(wide.len(), 6);
        assert_eq!(wide.max(), Some(9));
    }

    #[test]
    fn ragged_index_bytes_are_rejected() {
        assert!(IndexData::from_bytes(&[0, 1, 2], 16).is_err());
        assert!(IndexData::from_bytes(&[0, 1, 2, 3, 4], 32).is_err());
    }

    #[test]
    fn max_index_across_widths() {
        assert_eq!(IndexData::U16(vec![4, 9, 2]).max(), Some(9));
        assert_eq!(IndexData::U8(Vec::new()).max(), None);
    }
}
