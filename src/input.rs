//! Keyboard and mouse state collected from winit events.
//!
//! The frame loop feeds window and device events in, camera behaviours read
//! the accumulated state, and `end_frame` clears per-frame deltas.

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Clone, Debug, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    mouse_delta: (f64, f64),
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.press(*key),
                ElementState::Released => self.release(*key),
            },
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    // assume a line is about 100 pixels
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 / 100.0
                    }
                };
            }
            WindowEvent::Focused(false) => {
                self.keys.clear();
                self.buttons.clear();
            }
            _ => (),
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.add_mouse_delta(*dx, *dy);
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn add_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// `1.0` when only `positive` is held, `-1.0` for only `negative`, else `0.0`.
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        let value = |key| if self.is_pressed(key) { 1.0 } else { 0.0 };
        value(positive) - value(negative)
    }

    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Clears mouse motion and scroll; held keys and buttons stay.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll = 0.0;
    }
}
