//! Widget catalog: which widgets exist, which can be hidden, and how each
//! one is sized.

use serde::{Deserialize, Serialize};

/// Every widget the start page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    Clock,
    Search,
    Weather,
    Pomodoro,
    Todo,
    Quote,
    Countdown,
    Note,
    Calendar,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 9] = [
        Self::Clock,
        Self::Search,
        Self::Weather,
        Self::Pomodoro,
        Self::Todo,
        Self::Quote,
        Self::Countdown,
        Self::Note,
        Self::Calendar,
    ];

    /// Short lowercase name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Search => "search",
            Self::Weather => "weather",
            Self::Pomodoro => "pomodoro",
            Self::Todo => "todo",
            Self::Quote => "quote",
            Self::Countdown => "countdown",
            Self::Note => "note",
            Self::Calendar => "calendar",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Clock and search are always on screen; the rest can be toggled.
    pub fn has_visibility_toggle(self) -> bool {
        !matches!(self, Self::Clock | Self::Search)
    }

    /// How this widget is resized, if at all.
    pub fn size_spec(self) -> Option<SizeSpec> {
        let px = |default, min, max| SizeBounds::new(default, min, max, SizeUnit::Px);
        match self {
            Self::Clock => Some(SizeSpec::Uniform(px(80, 40, 200))),
            Self::Search => None,
            Self::Weather | Self::Pomodoro => Some(SizeSpec::Uniform(px(200, 120, 400))),
            Self::Todo => Some(SizeSpec::Independent {
                width: px(280, 200, 600),
                height: px(320, 200, 800),
            }),
            Self::Quote => Some(SizeSpec::Uniform(SizeBounds::new(
                100,
                50,
                150,
                SizeUnit::Percent,
            ))),
            Self::Countdown | Self::Calendar => Some(SizeSpec::Uniform(px(240, 160, 480))),
            Self::Note => Some(SizeSpec::Independent {
                width: px(280, 160, 600),
                height: px(200, 100, 600),
            }),
        }
    }

    /// Bounds of one resize axis, if the widget has that handle.
    pub fn size_bounds(self, axis: ResizeAxis) -> Option<SizeBounds> {
        self.size_spec().and_then(|spec| spec.bounds(axis))
    }
}

/// Which dimension a resize handle changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeAxis {
    /// One scalar scaling the whole widget.
    Uniform,
    Width,
    Height,
}

/// Unit a size is expressed in. Only affects drag sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SizeUnit {
    #[default]
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
}

impl SizeUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
        }
    }
}

/// Default and inclusive `[min, max]` range of one size value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub default: u32,
    pub min: u32,
    pub max: u32,
    pub unit: SizeUnit,
}

impl SizeBounds {
    pub const fn new(default: u32, min: u32, max: u32, unit: SizeUnit) -> Self {
        Self {
            default,
            min,
            max,
            unit,
        }
    }

    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp a fractional value into range, then round to a whole unit.
    pub fn clamp_round(&self, value: f64) -> u32 {
        let clamped = value.clamp(f64::from(self.min), f64::from(self.max));
        // in range, so the cast cannot truncate
        clamped.round() as u32
    }

    /// Size units gained per pixel of pointer travel on `axis`.
    pub fn sensitivity(&self, axis: ResizeAxis) -> f64 {
        match (axis, self.unit) {
            (ResizeAxis::Uniform, SizeUnit::Px) => 0.5,
            (_, SizeUnit::Percent) => 0.2,
            (ResizeAxis::Width | ResizeAxis::Height, SizeUnit::Px) => 1.0,
        }
    }
}

/// A widget's sizing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    Uniform(SizeBounds),
    Independent { width: SizeBounds, height: SizeBounds },
}

impl SizeSpec {
    pub fn bounds(&self, axis: ResizeAxis) -> Option<SizeBounds> {
        match (self, axis) {
            (Self::Uniform(bounds), ResizeAxis::Uniform) => Some(*bounds),
            (Self::Independent { width, .. }, ResizeAxis::Width) => Some(*width),
            (Self::Independent { height, .. }, ResizeAxis::Height) => Some(*height),
            _ => None,
        }
    }

    /// Resize handles a widget with this spec exposes.
    pub fn axes(&self) -> &'static [ResizeAxis] {
        match self {
            Self::Uniform(_) => &[ResizeAxis::Uniform],
            Self::Independent { .. } => &[ResizeAxis::Width, ResizeAxis::Height],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_axis_has_consistent_bounds() {
        for kind in WidgetKind::ALL {
            let Some(spec) = kind.size_spec() else {
                continue;
            };
            for &axis in spec.axes() {
                let bounds = kind.size_bounds(axis).unwrap();
                assert!(bounds.min <= bounds.default && bounds.default <= bounds.max, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_clamp_round() {
        let bounds = SizeBounds::new(100, 50, 150, SizeUnit::Percent);
        assert_eq!(bounds.clamp_round(20.0), 50);
        assert_eq!(bounds.clamp_round(1e9), 150);
        assert_eq!(bounds.clamp_round(99.5), 100);
        assert_eq!(bounds.clamp_round(f64::from(u32::MAX) * -1.0), 50);
    }

    #[test]
    fn test_sensitivity_by_unit() {
        let px = WidgetKind::Weather.size_bounds(ResizeAxis::Uniform).unwrap();
        let pct = WidgetKind::Quote.size_bounds(ResizeAxis::Uniform).unwrap();
        assert_eq!(px.sensitivity(ResizeAxis::Uniform), 0.5);
        assert_eq!(pct.sensitivity(ResizeAxis::Uniform), 0.2);
    }

    #[test]
    fn test_uniform_widget_has_no_width_handle() {
        assert!(WidgetKind::Clock.size_bounds(ResizeAxis::Width).is_none());
        assert!(WidgetKind::Todo.size_bounds(ResizeAxis::Uniform).is_none());
        assert!(WidgetKind::Search.size_spec().is_none());
    }

    #[test]
    fn test_visibility_toggles() {
        let toggled: Vec<_> = WidgetKind::ALL
            .into_iter()
            .filter(|kind| kind.has_visibility_toggle())
            .collect();
        assert_eq!(toggled.len(), 7);
        assert_eq!(WidgetKind::parse("todo"), Some(WidgetKind::Todo));
    }
}
