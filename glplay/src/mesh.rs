use std::{collections::HashMap, f32::consts::PI, io::BufReader, path::Path};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use glow::{Context, TRIANGLES};

use crate::error::{SetupError, SetupErrorKind};
use crate::geometry::{Geometry, IndexData, VertexLayout};

/// Interleaved position, normal and texture coordinate; 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl MeshVertex {
    /// Attribute 0 position, 1 normal, 2 texture coordinate.
    pub fn layout() -> VertexLayout {
        VertexLayout::interleaved(&[3, 3, 2])
    }
}

/// How consecutive indices group into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    /// Polygons (or lines and points) with the given vertex count.
    Polygons(u32),
}

/// One triangle mesh on the CPU, validated and ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<MeshVertex>,
    indices: IndexData,
}

impl MeshData {
    pub fn new(
        vertices: Vec<MeshVertex>,
        indices: IndexData,
        topology: Topology,
    ) -> Result<Self, SetupError> {
        if let Topology::Polygons(arity) = topology {
            return Err(SetupError::unsupported_mesh(format!(
                "faces have {arity} vertices, only triangles are handled"
            )));
        }
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(SetupError::unsupported_mesh(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if let Some(max) = indices.max() {
            if max as usize >= vertices.len() {
                return Err(SetupError::unsupported_mesh(format!(
                    "index {max} out of range for {} vertices",
                    vertices.len()
                )));
            }
        }
        Ok(MeshData { vertices, indices })
    }

    /// Builds a mesh from an already packed index buffer of `index_bits` width.
    pub fn from_raw_parts(
        vertices: Vec<MeshVertex>,
        index_bytes: &[u8],
        index_bits: u32,
        topology: Topology,
    ) -> Result<Self, SetupError> {
        let indices = IndexData::from_bytes(index_bytes, index_bits)?;
        Self::new(vertices, indices, topology)
    }

    pub fn open_obj(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            SetupError::new(SetupErrorKind::Io, format!("{}: {err}", path.display()))
        })?;
        Self::from_obj(&data)
    }

    /// Parses an OBJ file holding exactly one mesh. Missing normals and texture
    /// coordinates are generated.
    pub fn from_obj(data: &[u8]) -> Result<Self, SetupError> {
        let (models, _materials) = tobj::load_obj_buf(
            &mut BufReader::new(data),
            &tobj::LoadOptions {
                // use the same index for every vertex/normal/texture coordinate
                single_index: true,
                // polygons must be rejected, not split
                triangulate: false,
                ..Default::default()
            },
            |_| Ok((Vec::new(), HashMap::new())),
        )?;

        let mesh = match <[tobj::Model; 1]>::try_from(models) {
            Ok([model]) => model.mesh,
            Err(models) if models.is_empty() => {
                return Err(SetupError::unsupported_mesh("asset has no mesh"))
            }
            Err(models) => {
                return Err(SetupError::unsupported_mesh(format!(
                    "asset has {} meshes, expected one",
                    models.len()
                )))
            }
        };

        // a ragged index count is reported by `new`
        let topology = match mesh.face_arities.iter().find(|&&arity| arity != 3) {
            Some(&arity) => Topology::Polygons(arity),
            None => Topology::Triangles,
        };

        let positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect();
        let vertex_count = positions.len();

        let normals = if mesh.normals.len() == vertex_count * 3 {
            mesh.normals.chunks_exact(3).map(Vec3::from_slice).collect()
        } else {
            log::debug!("mesh has no normals, generating smooth normals");
            smooth_normals(&positions, &mesh.indices)
        };
        let uvs = if mesh.texcoords.len() == vertex_count * 2 {
            mesh.texcoords.chunks_exact(2).map(Vec2::from_slice).collect()
        } else {
            log::debug!("mesh has no texture coordinates, unwrapping onto a sphere");
            spherical_uvs(&positions)
        };

        let vertices = positions
            .into_iter()
            .zip(normals)
            .zip(uvs)
            .map(|((position, normal), uv)| MeshVertex {
                position,
                normal,
                uv,
            })
            .collect();
        let indices = IndexData::narrowest(&mesh.indices, vertex_count);
        Self::new(vertices, indices, topology)
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &IndexData {
        &self.indices
    }

    pub fn upload(&self, gl: &Context) -> Result<Mesh, SetupError> {
        let geometry = Geometry::upload(gl, &self.vertices, &MeshVertex::layout(), Some(&self.indices))?;
        log::info!(
            "mesh uploaded: {} vertices, {} {}-bit indices",
            self.vertices.len(),
            self.indices.len(),
            self.indices.bits()
        );
        Ok(Mesh { geometry })
    }
}

/// Area weighted average of the face normals around each vertex.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a.max(b).max(c) >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(Vec3::normalize_or_zero).collect()
}

fn spherical_uvs(positions: &[Vec3]) -> Vec<Vec2> {
    let center = positions.iter().copied().sum::<Vec3>() / positions.len().max(1) as f32;
    positions
        .iter()
        .map(|&position| {
            let dir = (position - center).normalize_or_zero();
            Vec2::new(
                0.5 + dir.z.atan2(dir.x) / (2.0 * PI),
                0.5 + dir.y.clamp(-1.0, 1.0).asin() / PI,
            )
        })
        .collect()
}

/// A triangle mesh living on the GPU.
#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    geometry: Geometry,
}

impl Mesh {
    pub fn load_obj(gl: &Context, path: impl AsRef<Path>) -> Result<Self, SetupError> {
        MeshData::open_obj(path)?.upload(gl)
    }

    pub fn draw(&self, gl: &Context) {
        self.geometry.draw(gl, TRIANGLES);
    }
}
