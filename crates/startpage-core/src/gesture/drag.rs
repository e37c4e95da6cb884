use kurbo::{Point, Vec2};

use super::{GestureError, GesturePhase, GestureResult, LayoutSink, PointerCapture, PointerHub};
use crate::input::pixel_delta;
use crate::position::ComponentPosition;
use crate::widgets::WidgetKind;

/// State of an active move gesture.
#[derive(Debug)]
pub struct DragContext {
    /// The widget being moved.
    pub widget: WidgetKind,
    /// Pointer position at `begin`.
    pub start_point: Point,
    /// Last pointer position seen.
    pub current_point: Point,
    /// Position of the widget at `begin`.
    pub start_position: ComponentPosition,
    _capture: PointerCapture,
}

impl DragContext {
    /// Pointer travel since `begin`.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Position for a pointer at `point`: the start offset plus the raw
    /// pointer delta. The anchor's sign rule is applied by `resolve`.
    fn position_at(&self, point: Point) -> ComponentPosition {
        let (dx, dy) = pixel_delta(self.start_point, point);
        self.start_position.with_offset(
            self.start_position.offset_x.saturating_add(dx),
            self.start_position.offset_y.saturating_add(dy),
        )
    }
}

/// Moves one widget at a time by its drag handle.
///
/// Offsets are not clamped; a widget may be placed anywhere.
#[derive(Debug, Default)]
pub struct DragController {
    phase: GesturePhase<DragContext>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_active()
    }

    pub fn context(&self) -> Option<&DragContext> {
        self.phase.context()
    }

    /// Start moving `widget`. Subscribes to the hub until [`Self::end`].
    pub fn begin(
        &mut self,
        hub: &PointerHub,
        widget: WidgetKind,
        pointer: Point,
        current: ComponentPosition,
    ) -> GestureResult<()> {
        if self.phase.is_active() {
            return Err(GestureError::Busy);
        }
        let capture = hub.capture()?;
        log::debug!("Drag started: {} at {:?}", widget.name(), current);
        self.phase = GesturePhase::Active(DragContext {
            widget,
            start_point: pointer,
            current_point: pointer,
            start_position: current,
            _capture: capture,
        });
        Ok(())
    }

    /// Follow the pointer and write the new position to `sink`.
    pub fn move_to<S: LayoutSink + ?Sized>(
        &mut self,
        pointer: Point,
        sink: &mut S,
    ) -> GestureResult<ComponentPosition> {
        let GesturePhase::Active(context) = &mut self.phase else {
            return Err(GestureError::NotActive);
        };
        context.current_point = pointer;
        let position = context.position_at(pointer);
        sink.set_widget_position(context.widget, position);
        Ok(position)
    }

    /// Finish the gesture and release the pointer. Returns false if idle.
    pub fn end(&mut self) -> bool {
        match self.phase.finish() {
            Some(context) => {
                log::debug!(
                    "Drag ended: {} moved by {:?}",
                    context.widget.name(),
                    context.delta()
                );
                true
            }
            None => false,
        }
    }
}
