use kurbo::Point;

use super::{DragController, GestureError, GestureResult, LayoutSink, PointerHub, ResizeController};
use crate::input::{MouseButton, PointerEvent};
use crate::widgets::{ResizeAxis, WidgetKind};

/// The handle a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleTarget {
    /// The widget's drag handle.
    Move(WidgetKind),
    /// One of the widget's resize handles.
    Resize(WidgetKind, ResizeAxis),
}

/// Routes pointer events to the drag and resize controllers while layout
/// editing is on. Both controllers share one hub, so a drag and a resize can
/// never be active together.
#[derive(Debug, Default)]
pub struct LayoutSession {
    hub: PointerHub,
    edit_mode: bool,
    drag: DragController,
    resize: ResizeController,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Leaving edit mode ends any active gesture.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if !enabled {
            self.end_gestures();
        }
        if self.edit_mode != enabled {
            log::info!("Layout edit mode {}", if enabled { "on" } else { "off" });
        }
        self.edit_mode = enabled;
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.edit_mode);
        self.edit_mode
    }

    pub fn is_gesture_active(&self) -> bool {
        self.drag.is_dragging() || self.resize.is_resizing()
    }

    /// Begin a gesture on `target`, reading the start state from `sink`.
    pub fn pointer_down<S: LayoutSink + ?Sized>(
        &mut self,
        target: HandleTarget,
        position: Point,
        sink: &S,
    ) -> GestureResult<()> {
        if !self.edit_mode {
            return Err(GestureError::EditModeOff);
        }
        match target {
            HandleTarget::Move(widget) => {
                self.drag
                    .begin(&self.hub, widget, position, sink.widget_position(widget))
            }
            HandleTarget::Resize(widget, axis) => {
                let start = sink
                    .widget_size(widget, axis)
                    .ok_or(GestureError::NoSuchHandle(widget, axis))?;
                self.resize.begin(&self.hub, widget, axis, position, start)
            }
        }
    }

    pub fn pointer_move<S: LayoutSink + ?Sized>(
        &mut self,
        position: Point,
        sink: &mut S,
    ) -> GestureResult<()> {
        if self.drag.is_dragging() {
            self.drag.move_to(position, sink).map(|_| ())
        } else if self.resize.is_resizing() {
            self.resize.move_to(position, sink).map(|_| ())
        } else {
            Err(GestureError::NotActive)
        }
    }

    /// End whatever gesture is active. Returns false if none was.
    pub fn pointer_up(&mut self) -> bool {
        self.end_gestures()
    }

    fn end_gestures(&mut self) -> bool {
        let dragged = self.drag.end();
        let resized = self.resize.end();
        dragged || resized
    }

    /// Feed one event from the host loop. `target` is the handle under the
    /// pointer for `Down` events. Returns whether the event was consumed.
    pub fn handle_event<S: LayoutSink + ?Sized>(
        &mut self,
        event: PointerEvent,
        target: Option<HandleTarget>,
        sink: &mut S,
    ) -> GestureResult<bool> {
        match (event, target) {
            (
                PointerEvent::Down {
                    position,
                    button: MouseButton::Left,
                },
                Some(target),
            ) => {
                self.pointer_down(target, position, &*sink)?;
                Ok(true)
            }
            (PointerEvent::Down { .. }, _) => Ok(false),
            (PointerEvent::Move { position }, _) => {
                if !self.is_gesture_active() {
                    return Ok(false);
                }
                self.pointer_move(position, sink)?;
                Ok(true)
            }
            (PointerEvent::Up { .. }, _) => Ok(self.pointer_up()),
        }
    }
}
