//! Flat, already decoded geometry handed to meshes.

use crate::error::{RenderError, Result};

/// Vertex positions with optional parallel normals and texture coordinates,
/// plus a triangle list indexing into them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuffer {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
    pub tex_coords: Option<Vec<[f32; 2]>>,
}

impl GeometryBuffer {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: None,
            indices,
            tex_coords: None,
        }
    }

    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<[f32; 2]>) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the invariants a mesh relies on before anything is uploaded.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.positions.len();
        if vertex_count == 0 {
            return Err(RenderError::InvalidGeometry("no vertex positions".into()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(RenderError::InvalidGeometry(format!(
                "{} indices don't form whole triangles",
                self.indices.len()
            )));
        }
        if let Some(index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(RenderError::InvalidGeometry(format!(
                "index {} out of range for {} vertices",
                index, vertex_count
            )));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(RenderError::InvalidGeometry(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    vertex_count
                )));
            }
        }
        if let Some(tex_coords) = &self.tex_coords {
            if tex_coords.len() != vertex_count {
                return Err(RenderError::InvalidGeometry(format!(
                    "{} texture coordinates for {} vertices",
                    tex_coords.len(),
                    vertex_count
                )));
            }
        }
        Ok(())
    }
}
