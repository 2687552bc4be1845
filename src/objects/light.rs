//! Point lights living in a fixed-size `lights[]` uniform array.

use std::any::Any;

use cgmath::{Matrix4, Vector3, Zero};
use log::debug;

use crate::{
    error::Result,
    gpu::{Gpu, ProgramHandle, UniformHandle, bindings::bind_uniforms},
    objects::{Object, ObjectKind},
};

/// Distance falloff: `1 / (constant + linear * d + quadratic * d²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct LightUniforms {
    position: UniformHandle,
    intensity: UniformHandle,
    constant: UniformHandle,
    linear: UniformHandle,
    quadratic: UniformHandle,
}

/// Uniform names of one `lights[index]` entry, in binding order.
pub fn light_uniform_names(index: u32) -> [String; 5] {
    ["position", "intensity", "constant", "linear", "quadratic"]
        .map(|field| format!("lights[{}].{}", index, field))
}

/// A point light bound to one slot of the program's light array.
///
/// A light without a slot is disabled: it resolves nothing and draws nothing.
pub struct Light {
    name: String,
    program: ProgramHandle,
    slot: Option<u32>,
    position: Vector3<f32>,
    intensity: f32,
    attenuation: Attenuation,
    uniforms: Option<LightUniforms>,
}

impl Light {
    pub fn new(program: ProgramHandle, slot: Option<u32>) -> Self {
        let name = match slot {
            Some(index) => format!("light {}", index),
            None => "disabled light".to_string(),
        };
        Self {
            name,
            program,
            slot,
            position: Vector3::zero(),
            intensity: 1.0,
            attenuation: Attenuation::default(),
            uniforms: None,
        }
    }

    pub fn create(gpu: &mut dyn Gpu, program: ProgramHandle, slot: Option<u32>) -> Result<Self> {
        let mut light = Self::new(program, slot);
        light.init(gpu)?;
        Ok(light)
    }

    pub fn slot(&self) -> Option<u32> {
        self.slot
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    pub fn move_to(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn dim(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn configure(&mut self, constant: f32, linear: f32, quadratic: f32) {
        self.attenuation = Attenuation {
            constant,
            linear,
            quadratic,
        };
    }

    /// Detaches the light from its slot. It stops drawing; the caller gives
    /// the slot back to its [`LightSlots`].
    pub fn disable(&mut self) -> Option<u32> {
        self.uniforms = None;
        self.slot.take()
    }
}

impl Object for Light {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Light
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, gpu: &mut dyn Gpu) -> Result<()> {
        let Some(index) = self.slot else {
            debug!("{} has no slot, skipping uniform lookup", self.name);
            return Ok(());
        };
        let handles = bind_uniforms(&*gpu, self.program, &light_uniform_names(index))?;
        self.uniforms = Some(LightUniforms {
            position: handles[0],
            intensity: handles[1],
            constant: handles[2],
            linear: handles[3],
            quadratic: handles[4],
        });
        Ok(())
    }

    fn update_transform(&mut self, _vp: &Matrix4<f32>) {}

    fn draw(&self, gpu: &mut dyn Gpu, _time: f32) {
        let (Some(_), Some(uniforms)) = (self.slot, self.uniforms) else {
            return;
        };
        gpu.use_program(self.program);

        gpu.set_uniform_vec3(uniforms.position, &self.position);
        gpu.set_uniform_f32(uniforms.intensity, self.intensity);
        gpu.set_uniform_f32(uniforms.constant, self.attenuation.constant);
        gpu.set_uniform_f32(uniforms.linear, self.attenuation.linear);
        gpu.set_uniform_f32(uniforms.quadratic, self.attenuation.quadratic);
    }

    fn deinit(&mut self, _gpu: &mut dyn Gpu) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Hands out indices into the program's light array.
///
/// An index is never given out twice while it is held.
#[derive(Clone, Debug)]
pub struct LightSlots {
    taken: Vec<bool>,
}

impl LightSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            taken: vec![false; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.taken.len()
    }

    pub fn in_use(&self) -> usize {
        self.taken.iter().filter(|&&taken| taken).count()
    }

    /// Lowest free index, or `None` when every slot is held.
    pub fn acquire(&mut self) -> Option<u32> {
        let index = self.taken.iter().position(|&taken| !taken)?;
        self.taken[index] = true;
        Some(index as u32)
    }

    pub fn release(&mut self, index: u32) {
        if let Some(taken) = self.taken.get_mut(index as usize) {
            *taken = false;
        }
    }

    pub fn clear(&mut self) {
        self.taken.iter_mut().for_each(|taken| *taken = false);
    }
}
