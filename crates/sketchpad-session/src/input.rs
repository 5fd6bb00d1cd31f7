//! Host-neutral input events. Pointer and wheel positions are screen space.

use serde::{Deserialize, Serialize};

use sketchpad_geometry::freehand::DEFAULT_PRESSURE;
use sketchpad_geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, meta: false, alt: false };

    /// Ctrl or Cmd
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }
}

fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, pressure: DEFAULT_PRESSURE, modifiers: Modifiers::NONE }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::NONE)
    }

    pub fn command(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::ctrl())
    }
}
