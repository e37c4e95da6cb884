use kurbo::Point;

use super::{GestureError, GesturePhase, GestureResult, LayoutSink, PointerCapture, PointerHub};
use crate::widgets::{ResizeAxis, SizeBounds, WidgetKind};

/// State of an active resize gesture.
#[derive(Debug)]
pub struct ResizeContext {
    pub widget: WidgetKind,
    pub axis: ResizeAxis,
    pub bounds: SizeBounds,
    pub start_point: Point,
    pub start_value: u32,
    _capture: PointerCapture,
}

impl ResizeContext {
    /// Size for a pointer at `point`: start value plus scaled travel, clamped
    /// into bounds and rounded. Width follows horizontal travel, the other
    /// axes follow vertical travel.
    pub fn value_at(&self, point: Point) -> u32 {
        let delta = point - self.start_point;
        let travel = match self.axis {
            ResizeAxis::Width => delta.x,
            ResizeAxis::Uniform | ResizeAxis::Height => delta.y,
        };
        self.bounds
            .clamp_round(f64::from(self.start_value) + travel * self.bounds.sensitivity(self.axis))
    }
}

/// Resizes one widget along one axis at a time.
#[derive(Debug, Default)]
pub struct ResizeController {
    phase: GesturePhase<ResizeContext>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resizing(&self) -> bool {
        self.phase.is_active()
    }

    pub fn context(&self) -> Option<&ResizeContext> {
        self.phase.context()
    }

    pub fn begin(
        &mut self,
        hub: &PointerHub,
        widget: WidgetKind,
        axis: ResizeAxis,
        pointer: Point,
        start_value: u32,
    ) -> GestureResult<()> {
        if self.phase.is_active() {
            return Err(GestureError::Busy);
        }
        let bounds = widget
            .size_bounds(axis)
            .ok_or(GestureError::NoSuchHandle(widget, axis))?;
        let capture = hub.capture()?;
        log::debug!(
            "Resize started: {} {:?} from {}{}",
            widget.name(),
            axis,
            start_value,
            bounds.unit.label()
        );
        self.phase = GesturePhase::Active(ResizeContext {
            widget,
            axis,
            bounds,
            start_point: pointer,
            start_value,
            _capture: capture,
        });
        Ok(())
    }

    pub fn move_to<S: LayoutSink + ?Sized>(
        &mut self,
        pointer: Point,
        sink: &mut S,
    ) -> GestureResult<u32> {
        let context = self.phase.context().ok_or(GestureError::NotActive)?;
        let value = context.value_at(pointer);
        sink.set_widget_size(context.widget, context.axis, value);
        Ok(value)
    }

    /// Finish the gesture and release the pointer. Returns false if idle.
    pub fn end(&mut self) -> bool {
        match self.phase.finish() {
            Some(context) => {
                log::debug!("Resize ended: {} {:?}", context.widget.name(), context.axis);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;

    fn begin(
        hub: &PointerHub,
        widget: WidgetKind,
        axis: ResizeAxis,
        start: u32,
    ) -> ResizeController {
        let mut resize = ResizeController::new();
        let pointer = Point::new(500.0, 500.0);
        resize.begin(hub, widget, axis, pointer, start).unwrap();
        resize
    }

    #[test]
    fn test_uniform_px_half_sensitivity() {
        let hub = PointerHub::new();
        let mut settings = AppSettings::default();
        let mut resize = begin(&hub, WidgetKind::Weather, ResizeAxis::Uniform, 200);
        let pointer = Point::new(900.0, 541.0);
        let value = resize.move_to(pointer, &mut settings).unwrap();
        // 200 + 41 * 0.5 = 220.5, rounded
        assert_eq!(value, 221);
        assert_eq!(settings.weather_size, 221);
    }

    #[test]
    fn test_percent_sensitivity() {
        let hub = PointerHub::new();
        let mut settings = AppSettings::default();
        let mut resize = begin(&hub, WidgetKind::Quote, ResizeAxis::Uniform, 100);
        let pointer = Point::new(500.0, 550.0);
        let value = resize.move_to(pointer, &mut settings).unwrap();
        assert_eq!(value, 110);
    }

    #[test]
    fn test_width_follows_horizontal_travel() {
        let hub = PointerHub::new();
        let mut settings = AppSettings::default();
        let mut resize = begin(&hub, WidgetKind::Todo, ResizeAxis::Width, 280);
        let pointer = Point::new(540.0, 100.0);
        resize.move_to(pointer, &mut settings).unwrap();
        assert_eq!(settings.todo_width, 320);
        assert_eq!(settings.todo_height, 320);
    }

    #[test]
    fn test_value_stays_in_bounds_for_any_travel() {
        let hub = PointerHub::new();
        let mut settings = AppSettings::default();
        for kind in WidgetKind::ALL {
            let Some(spec) = kind.size_spec() else {
                continue;
            };
            for &axis in spec.axes() {
                let bounds = spec.bounds(axis).unwrap();
                let mut resize = begin(&hub, kind, axis, bounds.default);
                for step in [-5000.0, -37.5, 0.0, 12.25, 999.0, 1.0e6] {
                    let pointer = Point::new(500.0 + step, 500.0 + step);
                    let value = resize.move_to(pointer, &mut settings).unwrap();
                    assert!(bounds.min <= value && value <= bounds.max, "{kind:?} {axis:?}");
                    assert_eq!(settings.size(kind, axis), Some(value));
                }
                resize.end();
            }
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_missing_handle() {
        let hub = PointerHub::new();
        let mut resize = ResizeController::new();
        assert_eq!(
            resize.begin(&hub, WidgetKind::Search, ResizeAxis::Uniform, Point::ZERO, 0),
            Err(GestureError::NoSuchHandle(WidgetKind::Search, ResizeAxis::Uniform))
        );
        assert_eq!(
            resize.begin(&hub, WidgetKind::Note, ResizeAxis::Uniform, Point::ZERO, 0),
            Err(GestureError::NoSuchHandle(WidgetKind::Note, ResizeAxis::Uniform))
        );
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_end_without_move() {
        let hub = PointerHub::new();
        let mut resize = begin(&hub, WidgetKind::Clock, ResizeAxis::Uniform, 80);
        assert!(resize.end());
        assert_eq!(hub.listener_count(), 0);
        let mut settings = AppSettings::default();
        assert_eq!(
            resize.move_to(Point::ZERO, &mut settings),
            Err(GestureError::NotActive)
        );
    }
}
