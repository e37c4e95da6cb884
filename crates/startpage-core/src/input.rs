//! Pointer events delivered by the host event loop.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in viewport coordinates, for unified mouse/touch handling.
/// Touch input is reported as the left button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            Self::Down { position, .. } | Self::Up { position, .. } | Self::Move { position } => {
                position
            }
        }
    }
}

/// Integer pixel delta between two pointer positions, rounded.
pub fn pixel_delta(from: Point, to: Point) -> (i32, i32) {
    let delta = to - from;
    (delta.x.round() as i32, delta.y.round() as i32)
}
