//! Error types shared by the GPU layer, the scene objects and the importer.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building or loading scene objects.
///
/// Buffer-manager and binding-resolver failures surface here as typed errors and
/// are handled by the component that requested them. The scene-load boundary
/// logs them and carries on with the remaining objects.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A required attribute or uniform is not part of the linked program.
    #[error("shader program has no required binding '{name}'")]
    ShaderInvalid { name: String },

    /// The GPU refused to allocate or upload a buffer or texture.
    #[error("unable to allocate video buffer for {what}")]
    NoVideoBuffer { what: String },

    /// The material points at a texture we cannot load (only embedded ones are supported).
    #[error("unsupported texture reference '{0}'")]
    UnsupportedTextureReference(String),

    /// The asset file could not be read or decoded.
    #[error("failed to import scene '{path}': {message}")]
    ImportFailure { path: PathBuf, message: String },

    /// The geometry violates its own invariants (index range, parallel array lengths).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The object was torn down and cannot be initialised again.
    #[error("'{0}' was already destroyed")]
    AlreadyDestroyed(String),

    #[error("texture decode error: {0}")]
    TextureDecode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn shader_invalid(name: impl Into<String>) -> Self {
        Self::ShaderInvalid { name: name.into() }
    }

    pub fn no_video_buffer(what: impl Into<String>) -> Self {
        Self::NoVideoBuffer { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
