//! glTF 2.0 adapter (`.gltf` with external buffers, or binary `.glb`).
//!
//! Every triangle primitive becomes one decoded mesh. Images stored in buffer
//! views go into the embedded texture table and materials reference them as
//! `*<index>`; images given by URI stay external references.

use std::path::Path;

use log::{debug, warn};

use crate::{
    error::{RenderError, Result},
    geometry::GeometryBuffer,
    importer::{
        DecodedMaterial, DecodedMesh, DecodedNode, DecodedScene, EmbeddedTexture, NodeTransform,
    },
};

pub fn load(path: &Path) -> Result<DecodedScene> {
    let failure = |message: String| RenderError::ImportFailure {
        path: path.to_path_buf(),
        message,
    };

    let bytes = std::fs::read(path).map_err(|e| failure(e.to_string()))?;
    let gltf = ::gltf::Gltf::from_slice(&bytes).map_err(|e| failure(e.to_string()))?;

    // Load buffers
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut buffers = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            ::gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| failure("missing binary chunk".to_string()))?,
            ::gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                return Err(failure("data URIs are not supported".to_string()));
            }
            ::gltf::buffer::Source::Uri(uri) => std::fs::read(base.join(uri))
                .map_err(|e| failure(format!("buffer '{}': {}", uri, e)))?,
        };
        if data.len() < buffer.length() {
            return Err(failure(format!(
                "buffer {} holds {} of {} bytes",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffers.push(data);
    }

    let mut decoded = DecodedScene::default();

    // Images: embedded ones get a table entry, the rest keep their URI
    let image_refs: Vec<String> = gltf
        .images()
        .map(|image| match image.source() {
            ::gltf::image::Source::View { view, mime_type } => {
                let start = view.offset();
                let end = start + view.length();
                let bytes = buffers
                    .get(view.buffer().index())
                    .and_then(|buffer| buffer.get(start..end))
                    .map(<[u8]>::to_vec)
                    .unwrap_or_default();
                decoded.embedded_textures.push(EmbeddedTexture {
                    bytes,
                    format: Some(mime_type.to_string()),
                });
                format!("*{}", decoded.embedded_textures.len() - 1)
            }
            ::gltf::image::Source::Uri { uri, .. } => uri.to_string(),
        })
        .collect();

    decoded.materials = gltf
        .materials()
        .map(|material| DecodedMaterial {
            name: material.name().unwrap_or("material").to_string(),
            diffuse: material
                .pbr_metallic_roughness()
                .base_color_texture()
                .and_then(|info| image_refs.get(info.texture().source().index()).cloned()),
        })
        .collect();

    // glTF mesh index -> decoded meshes, one per triangle primitive
    let mut mesh_table: Vec<Vec<usize>> = Vec::new();
    for mesh in gltf.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh {}", mesh.index()));
        let primitive_count = mesh.primitives().len();
        let mut decoded_indices = Vec::new();

        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{}#{}", mesh_name, primitive.index())
            } else {
                mesh_name.clone()
            };
            if primitive.mode() != ::gltf::mesh::Mode::Triangles {
                warn!("skipping primitive '{}' with mode {:?}", name, primitive.mode());
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|v| v.as_slice()));
            let Some(positions) = reader.read_positions() else {
                warn!("skipping primitive '{}' without positions", name);
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let mut geometry = GeometryBuffer::new(positions, indices);
            geometry.normals = reader.read_normals().map(|normals| normals.collect());
            geometry.tex_coords = reader
                .read_tex_coords(0)
                .map(|tex_coords| tex_coords.into_f32().collect());

            debug!(
                "decoded primitive '{}' with {} vertices",
                name,
                geometry.vertex_count()
            );
            decoded.meshes.push(DecodedMesh {
                name,
                geometry,
                material: primitive.material().index(),
            });
            decoded_indices.push(decoded.meshes.len() - 1);
        }
        mesh_table.push(decoded_indices);
    }

    decoded.nodes = gltf
        .nodes()
        .map(|node| DecodedNode {
            name: node
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("node {}", node.index())),
            transform: NodeTransform::ColumnMajor(node.transform().matrix()),
            meshes: node
                .mesh()
                .and_then(|mesh| mesh_table.get(mesh.index()).cloned())
                .unwrap_or_default(),
            children: node.children().map(|child| child.index()).collect(),
        })
        .collect();

    let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
    decoded.roots = match scene {
        Some(scene) => scene.nodes().map(|node| node.index()).collect(),
        None => {
            warn!("{} has no scene, nothing to import", path.display());
            Vec::new()
        }
    };

    Ok(decoded)
}
