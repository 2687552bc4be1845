//! Scene import.
//!
//! Loading happens in two steps. A format adapter ([`gltf`]) decodes the file
//! into a [`DecodedScene`], a flat arena of nodes, meshes, materials and
//! embedded textures. [`build_scene`] then walks the node hierarchy depth
//! first and turns every mesh reference into an initialised [`Mesh`].
//!
//! The walk uses an explicit stack, so deep hierarchies from untrusted files
//! can't overflow the call stack. Children are visited in file order.

use std::path::Path;

use cgmath::{Matrix, Matrix4, SquareMatrix};
use log::{error, info, warn};

use crate::{
    error::{RenderError, Result},
    geometry::GeometryBuffer,
    gpu::{Gpu, ProgramHandle},
    objects::{Mesh, Object},
    scene::Scene,
    texture::decode_rgb,
};

pub mod gltf;

/// Transform of a node as stored by the source format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeTransform {
    /// Sixteen floats, one row after the other.
    RowMajor([f32; 16]),
    /// Four columns, the layout cgmath uses.
    ColumnMajor([[f32; 4]; 4]),
}

impl NodeTransform {
    pub fn to_matrix(&self) -> Matrix4<f32> {
        match self {
            Self::RowMajor(m) => Matrix4::new(
                m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12],
                m[13], m[14], m[15],
            )
            .transpose(),
            Self::ColumnMajor(columns) => Matrix4::from(*columns),
        }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::ColumnMajor(Matrix4::<f32>::identity().into())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DecodedNode {
    pub name: String,
    pub transform: NodeTransform,
    /// Indices into [`DecodedScene::meshes`].
    pub meshes: Vec<usize>,
    /// Indices into [`DecodedScene::nodes`].
    pub children: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct DecodedMesh {
    pub name: String,
    pub geometry: GeometryBuffer,
    /// Index into [`DecodedScene::materials`].
    pub material: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct DecodedMaterial {
    pub name: String,
    /// First diffuse texture reference, as written by the source format.
    pub diffuse: Option<String>,
}

/// Compressed image bytes stored inside the scene file.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedTexture {
    pub bytes: Vec<u8>,
    /// Mime type or extension hint, if the file provides one.
    pub format: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct DecodedScene {
    pub nodes: Vec<DecodedNode>,
    pub roots: Vec<usize>,
    pub meshes: Vec<DecodedMesh>,
    pub materials: Vec<DecodedMaterial>,
    pub embedded_textures: Vec<EmbeddedTexture>,
}

impl DecodedScene {
    /// Node indices in depth-first pre-order starting from the roots.
    ///
    /// Each node is visited once even if the file references it more than once.
    pub fn depth_first(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                warn!("skipping reference to missing node {}", index);
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            order.push(index);
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Total number of mesh references across all reachable nodes.
    pub fn mesh_references(&self) -> usize {
        self.depth_first()
            .into_iter()
            .map(|index| self.nodes[index].meshes.len())
            .sum()
    }
}

/// How a material refers to its texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureReference {
    /// `*<n>`: entry `n` of the embedded texture table.
    Embedded(usize),
    /// Anything else, usually a path next to the asset.
    External(String),
}

impl TextureReference {
    pub fn parse(reference: &str) -> Self {
        reference
            .strip_prefix('*')
            .and_then(|index| index.parse().ok())
            .map(Self::Embedded)
            .unwrap_or_else(|| Self::External(reference.to_string()))
    }
}

/// Imports the file at `path` into a fresh scene.
pub fn import_scene<P: AsRef<Path>>(path: P, gpu: &mut dyn Gpu, program: ProgramHandle) -> Result<Scene> {
    let mut scene = Scene::default();
    import_into(path, gpu, program, &mut scene)?;
    Ok(scene)
}

/// Imports the file at `path` and appends its meshes to `scene`.
///
/// Returns how many meshes were added. Fails only if the file itself can't
/// be read or decoded; broken meshes are skipped.
pub fn import_into<P: AsRef<Path>>(
    path: P,
    gpu: &mut dyn Gpu,
    program: ProgramHandle,
    scene: &mut Scene,
) -> Result<usize> {
    let path = path.as_ref();
    let decoded = load_decoded(path)?;
    let added = build_scene(&decoded, gpu, program, scene);
    info!(
        "imported {} of {} meshes from {}",
        added,
        decoded.mesh_references(),
        path.display()
    );
    Ok(added)
}

fn load_decoded(path: &Path) -> Result<DecodedScene> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("gltf") | Some("glb") => gltf::load(path),
        _ => Err(RenderError::ImportFailure {
            path: path.to_path_buf(),
            message: "unsupported scene format".to_string(),
        }),
    }
}

/// Creates one mesh per mesh reference, in depth-first node order, and adds
/// it to `scene`. Returns the number of meshes added.
pub fn build_scene(
    decoded: &DecodedScene,
    gpu: &mut dyn Gpu,
    program: ProgramHandle,
    scene: &mut Scene,
) -> usize {
    let mut added = 0;
    for node_index in decoded.depth_first() {
        let node = &decoded.nodes[node_index];
        let model = node.transform.to_matrix();

        for &mesh_index in &node.meshes {
            let Some(source) = decoded.meshes.get(mesh_index) else {
                error!("node '{}' references missing mesh {}", node.name, mesh_index);
                continue;
            };
            if let Some(mesh) = build_mesh(decoded, source, model, gpu, program) {
                scene.add_object(Box::new(mesh));
                added += 1;
            }
        }
    }
    added
}

fn build_mesh(
    decoded: &DecodedScene,
    source: &DecodedMesh,
    model: Matrix4<f32>,
    gpu: &mut dyn Gpu,
    program: ProgramHandle,
) -> Option<Mesh> {
    let mut mesh = Mesh::new(source.name.clone(), program, source.geometry.clone());
    if let Err(e) = mesh.init(gpu) {
        error!("skipping mesh '{}': {}", source.name, e);
        return None;
    }
    mesh.set_model(model);

    let diffuse = source
        .material
        .and_then(|material| decoded.materials.get(material))
        .and_then(|material| material.diffuse.as_deref());
    if let Some(reference) = diffuse {
        if let Err(e) = apply_texture(decoded, &mut mesh, &source.geometry, reference, gpu) {
            warn!("unable to apply textures to mesh '{}': {}", source.name, e);
        }
    }

    info!(
        "loaded mesh '{}' ({} vertices, {} triangles)",
        source.name,
        source.geometry.vertex_count(),
        source.geometry.triangle_count()
    );
    Some(mesh)
}

fn apply_texture(
    decoded: &DecodedScene,
    mesh: &mut Mesh,
    geometry: &GeometryBuffer,
    reference: &str,
    gpu: &mut dyn Gpu,
) -> Result<()> {
    let index = match TextureReference::parse(reference) {
        TextureReference::Embedded(index) => index,
        TextureReference::External(path) => {
            return Err(RenderError::UnsupportedTextureReference(path));
        }
    };
    let embedded = decoded
        .embedded_textures
        .get(index)
        .ok_or_else(|| RenderError::UnsupportedTextureReference(reference.to_string()))?;
    let Some(tex_coords) = &geometry.tex_coords else {
        warn!("mesh '{}' has a texture but no texture coordinates", mesh.name());
        return Ok(());
    };

    let image = decode_rgb(&embedded.bytes, embedded.format.as_deref())?;
    let texture = gpu.upload_texture_rgb(image.width(), image.height(), image.as_raw())?;
    mesh.attach_texture(gpu, texture, tex_coords)
}
