//! The scene: an ordered set of objects and the per-frame driver.
//!
//! Insertion order is draw order. The scene owns every object it holds and
//! releases their GPU resources on [`Scene::teardown`].

use cgmath::Matrix4;
use log::{debug, error, info};

use crate::{
    gpu::Gpu,
    objects::{Light, LightSlots, Object},
};

pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    light_slots: LightSlots,
}

impl Scene {
    /// An empty scene whose programs have room for `light_capacity` lights.
    pub fn new(light_capacity: usize) -> Self {
        Self {
            objects: Vec::new(),
            light_slots: LightSlots::new(light_capacity),
        }
    }

    /// Appends an already initialised object.
    pub fn add_object(&mut self, object: Box<dyn Object>) {
        debug!("adding {:?} '{}' to scene", object.kind(), object.name());
        self.objects.push(object);
    }

    /// Initialises `object` and appends it. An object that fails to initialise
    /// is logged and dropped, and a failed light gives its slot back; the rest
    /// of the scene is unaffected.
    pub fn load_object(&mut self, gpu: &mut dyn Gpu, mut object: Box<dyn Object>) -> bool {
        match object.init(gpu) {
            Ok(()) => {
                self.add_object(object);
                true
            }
            Err(e) => {
                error!("unable to load {:?} '{}': {}", object.kind(), object.name(), e);
                if let Some(index) = object.as_any().downcast_ref::<Light>().and_then(Light::slot) {
                    self.light_slots.release(index);
                }
                false
            }
        }
    }

    /// Runs one frame: every object gets the new `vp`, then draws.
    pub fn per_frame(&mut self, gpu: &mut dyn Gpu, vp: &Matrix4<f32>, time: f32) {
        for object in self.objects.iter_mut() {
            object.update_transform(vp);
            object.draw(gpu, time);
        }
    }

    /// De-initialises every object in insertion order and empties the scene.
    ///
    /// Calling it again on the emptied scene does nothing.
    pub fn teardown(&mut self, gpu: &mut dyn Gpu) {
        self.light_slots.clear();
        if self.objects.is_empty() {
            return;
        }
        info!("tearing down scene with {} objects", self.objects.len());
        for object in self.objects.iter_mut() {
            object.deinit(gpu);
        }
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &dyn Object> {
        self.objects.iter().map(|object| object.as_ref())
    }

    /// Downcasts every object of type `T`, in draw order.
    pub fn objects_of<T: Object>(&self) -> impl Iterator<Item = &T> {
        self.objects
            .iter()
            .filter_map(|object| object.as_any().downcast_ref::<T>())
    }

    pub fn light_slots(&self) -> &LightSlots {
        &self.light_slots
    }

    pub fn light_slots_mut(&mut self) -> &mut LightSlots {
        &mut self.light_slots
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(crate::config::Config::default().light_capacity)
    }
}
