//! Resolution of named program inputs.
//!
//! Bindings are resolved once when an object initialises and are read-only
//! afterwards. A missing required binding is fatal for the object
//! ([`RenderError::ShaderInvalid`]); a missing optional one only disables the
//! feature that depends on it.

use log::debug;

use crate::{
    error::{RenderError, Result},
    gpu::{AttributeSlot, ProgramHandle, ShaderBindings, UniformHandle},
};

/// A named uniform together with what the program reported for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformBinding {
    pub name: String,
    pub handle: Option<UniformHandle>,
}

impl UniformBinding {
    pub fn is_present(&self) -> bool {
        self.handle.is_some()
    }
}

pub fn resolve_required_uniform<G>(
    gpu: &G,
    program: ProgramHandle,
    name: &str,
) -> Result<UniformHandle>
where
    G: ShaderBindings + ?Sized,
{
    gpu.uniform_handle(program, name)
        .ok_or_else(|| RenderError::shader_invalid(name))
}

pub fn resolve_optional_uniform<G>(gpu: &G, program: ProgramHandle, name: &str) -> UniformBinding
where
    G: ShaderBindings + ?Sized,
{
    let handle = gpu.uniform_handle(program, name);
    if handle.is_none() {
        debug!("no '{}' uniform in program {:?}", name, program);
    }
    UniformBinding {
        name: name.to_string(),
        handle,
    }
}

pub fn resolve_required_attribute<G>(
    gpu: &G,
    program: ProgramHandle,
    name: &str,
) -> Result<AttributeSlot>
where
    G: ShaderBindings + ?Sized,
{
    gpu.attribute_slot(program, name)
        .ok_or_else(|| RenderError::shader_invalid(name))
}

pub fn resolve_optional_attribute<G>(
    gpu: &G,
    program: ProgramHandle,
    name: &str,
) -> Option<AttributeSlot>
where
    G: ShaderBindings + ?Sized,
{
    let slot = gpu.attribute_slot(program, name);
    if slot.is_none() {
        debug!("program {:?} doesn't take a '{}' attribute", program, name);
    }
    slot
}

/// Resolves every name as a required uniform, failing on the first one missing.
///
/// Handles come back in the order of `names`.
pub fn bind_uniforms<G, S>(gpu: &G, program: ProgramHandle, names: &[S]) -> Result<Vec<UniformHandle>>
where
    G: ShaderBindings + ?Sized,
    S: AsRef<str>,
{
    names
        .iter()
        .map(|name| resolve_required_uniform(gpu, program, name.as_ref()))
        .collect()
}
