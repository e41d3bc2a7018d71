//! Pointer state machine: drag to rotate, hover to pick.

use crate::scene::CrystalGroup;
use nalgebra::{UnitQuaternion, Vector3};

/// Raw pointer position in host (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPosition {
    pub x: f64,
    pub y: f64,
}

impl RawPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle occupied by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Maps a raw position to `[-1, 1]` device coordinates, y pointing up.
    pub fn normalize(&self, raw: RawPosition) -> (f64, f64) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return (0.0, 0.0);
        }
        let x = ((raw.x - self.left) / self.width) * 2.0 - 1.0;
        let y = -((raw.y - self.top) / self.height) * 2.0 + 1.0;
        (x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Hovering,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub normalized_x: f64,
    pub normalized_y: f64,
    pub is_dragging: bool,
    pub last_raw: RawPosition,
    has_position: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            normalized_x: 0.0,
            normalized_y: 0.0,
            is_dragging: false,
            last_raw: RawPosition::default(),
            has_position: false,
        }
    }
}

impl PointerState {
    pub fn mode(&self) -> InteractionMode {
        if self.is_dragging {
            InteractionMode::Dragging
        } else if self.has_position {
            InteractionMode::Hovering
        } else {
            InteractionMode::Idle
        }
    }

    pub fn normalized(&self) -> (f64, f64) {
        (self.normalized_x, self.normalized_y)
    }

    /// Whether the pointer is currently over the surface.
    pub fn has_position(&self) -> bool {
        self.has_position
    }
}

/// Rotation for a drag of `(dx, dy)` pixels: vertical motion pitches about
/// x, horizontal motion yaws about y, composed in XYZ order.
pub fn drag_rotation(dx: f64, dy: f64, sensitivity_deg_per_px: f64) -> UnitQuaternion<f64> {
    let pitch = (dy * sensitivity_deg_per_px).to_radians();
    let yaw = (dx * sensitivity_deg_per_px).to_radians();
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    pointer: PointerState,
    sensitivity_deg_per_px: f64,
}

impl InteractionController {
    pub fn new(sensitivity_deg_per_px: f64) -> Self {
        Self {
            pointer: PointerState::default(),
            sensitivity_deg_per_px,
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn mode(&self) -> InteractionMode {
        self.pointer.mode()
    }

    pub fn pointer_down(&mut self, raw: RawPosition) {
        self.pointer.is_dragging = true;
        self.pointer.last_raw = raw;
    }

    /// Tracks the pointer and, while dragging, rotates `crystal` by the
    /// motion since the last event.
    pub fn pointer_move(
        &mut self,
        raw: RawPosition,
        rect: &SurfaceRect,
        crystal: Option<&mut CrystalGroup>,
    ) {
        if self.pointer.is_dragging {
            if let Some(crystal) = crystal {
                let dx = raw.x - self.pointer.last_raw.x;
                let dy = raw.y - self.pointer.last_raw.y;
                crystal.rotate_world(drag_rotation(dx, dy, self.sensitivity_deg_per_px));
            }
            self.pointer.last_raw = raw;
        }

        let (x, y) = rect.normalize(raw);
        self.pointer.normalized_x = x;
        self.pointer.normalized_y = y;
        self.pointer.has_position = true;
    }

    pub fn pointer_up(&mut self) {
        self.pointer.is_dragging = false;
    }

    /// Losing the pointer gives no continuation signal, so the drag ends
    /// and nothing is hovered until the next move.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        self.pointer.has_position = false;
    }
}
