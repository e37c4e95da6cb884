//! Pointer-driven drag and resize gestures.
//!
//! Each gesture kind is a two-state machine (`Idle` / `Active(context)`). An
//! active gesture holds a [`PointerCapture`] on the shared [`PointerHub`];
//! ending the gesture drops the capture, which is the only way the
//! subscription is released.

mod capture;
mod drag;
mod resize;
mod session;

pub use capture::{PointerCapture, PointerHub};
pub use drag::{DragContext, DragController};
pub use resize::{ResizeContext, ResizeController};
pub use session::{HandleTarget, LayoutSession};

use thiserror::Error;

use crate::position::ComponentPosition;
use crate::settings::AppSettings;
use crate::widgets::{ResizeAxis, WidgetKind};

/// Gesture misuse by the host. None of these mutate layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("No gesture is active")]
    NotActive,
    #[error("Another gesture already holds the pointer")]
    Busy,
    #[error("Layout editing is turned off")]
    EditModeOff,
    #[error("{0:?} has no {1:?} resize handle")]
    NoSuchHandle(WidgetKind, ResizeAxis),
}

pub type GestureResult<T> = Result<T, GestureError>;

/// State of one gesture machine.
#[derive(Debug)]
pub enum GesturePhase<C> {
    Idle,
    Active(C),
}

impl<C> Default for GesturePhase<C> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<C> GesturePhase<C> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn context(&self) -> Option<&C> {
        match self {
            Self::Idle => None,
            Self::Active(context) => Some(context),
        }
    }

    /// Return to `Idle`, handing back the context that was active.
    pub fn finish(&mut self) -> Option<C> {
        match std::mem::replace(self, Self::Idle) {
            Self::Idle => None,
            Self::Active(context) => Some(context),
        }
    }
}

/// Where gesture results are written. Implemented by the store (write-through)
/// and by bare settings.
pub trait LayoutSink {
    fn widget_position(&self, widget: WidgetKind) -> ComponentPosition;

    /// `None` if the widget has no handle on `axis`.
    fn widget_size(&self, widget: WidgetKind, axis: ResizeAxis) -> Option<u32>;

    fn set_widget_position(&mut self, widget: WidgetKind, position: ComponentPosition);

    fn set_widget_size(&mut self, widget: WidgetKind, axis: ResizeAxis, value: u32);
}

impl LayoutSink for AppSettings {
    fn widget_position(&self, widget: WidgetKind) -> ComponentPosition {
        *self.position(widget)
    }

    fn widget_size(&self, widget: WidgetKind, axis: ResizeAxis) -> Option<u32> {
        self.size(widget, axis)
    }

    fn set_widget_position(&mut self, widget: WidgetKind, position: ComponentPosition) {
        *self.position_mut(widget) = position;
    }

    fn set_widget_size(&mut self, widget: WidgetKind, axis: ResizeAxis, value: u32) {
        self.set_size(widget, axis, value);
    }
}
