//! Anchor + offset placement of widgets on the viewport.
//!
//! A widget position is one of nine anchor zones plus a pixel offset. The
//! offset is always relative to the anchor's natural point and is stored in
//! the anchor's own frame: for right- and bottom-anchored widgets a positive
//! offset points back toward the viewport interior. Gestures store raw pointer
//! deltas; [`resolve`] is the only place that turns that frame into screen
//! space.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Fraction of the viewport between an edge anchor and the viewport edge.
pub const ANCHOR_MARGIN: f64 = 0.10;

/// Horizontal component of an anchor preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalSide {
    Left,
    Center,
    Right,
}

/// Vertical component of an anchor preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalSide {
    Top,
    Center,
    Bottom,
}

impl HorizontalSide {
    /// Screen direction of a positive stored offset on this axis.
    fn offset_sign(self) -> i32 {
        match self {
            Self::Left | Self::Center => 1,
            Self::Right => -1,
        }
    }

    /// Anchor x as a fraction of the viewport width.
    fn anchor_fraction(self) -> f64 {
        match self {
            Self::Left => ANCHOR_MARGIN,
            Self::Center => 0.5,
            Self::Right => 1.0 - ANCHOR_MARGIN,
        }
    }

    /// Fraction of the widget width that sits left of the anchor.
    fn alignment(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }

    /// The side on the opposite edge (center stays center).
    pub fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }
}

impl VerticalSide {
    fn offset_sign(self) -> i32 {
        match self {
            Self::Top | Self::Center => 1,
            Self::Bottom => -1,
        }
    }

    fn anchor_fraction(self) -> f64 {
        match self {
            Self::Top => ANCHOR_MARGIN,
            Self::Center => 0.5,
            Self::Bottom => 1.0 - ANCHOR_MARGIN,
        }
    }

    fn alignment(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }

    /// The side on the opposite edge (center stays center).
    pub fn mirrored(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Center => Self::Center,
            Self::Bottom => Self::Top,
        }
    }
}

/// One of the nine named screen zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPreset {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorPreset {
    /// All presets in reading order.
    pub const ALL: [AnchorPreset; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Build a preset from its two sides.
    pub fn from_sides(vertical: VerticalSide, horizontal: HorizontalSide) -> Self {
        use HorizontalSide as H;
        use VerticalSide as V;
        match (vertical, horizontal) {
            (V::Top, H::Left) => Self::TopLeft,
            (V::Top, H::Center) => Self::TopCenter,
            (V::Top, H::Right) => Self::TopRight,
            (V::Center, H::Left) => Self::CenterLeft,
            (V::Center, H::Center) => Self::Center,
            (V::Center, H::Right) => Self::CenterRight,
            (V::Bottom, H::Left) => Self::BottomLeft,
            (V::Bottom, H::Center) => Self::BottomCenter,
            (V::Bottom, H::Right) => Self::BottomRight,
        }
    }

    pub fn horizontal(self) -> HorizontalSide {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => HorizontalSide::Left,
            Self::TopCenter | Self::Center | Self::BottomCenter => HorizontalSide::Center,
            Self::TopRight | Self::CenterRight | Self::BottomRight => HorizontalSide::Right,
        }
    }

    pub fn vertical(self) -> VerticalSide {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalSide::Top,
            Self::CenterLeft | Self::Center | Self::CenterRight => VerticalSide::Center,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalSide::Bottom,
        }
    }

    /// Stable kebab-case name, as stored in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Parse a kebab-case preset name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.as_str() == name)
    }
}

/// Where a widget lives: an anchor zone plus a pixel offset from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPosition {
    pub preset: AnchorPreset,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
}

impl ComponentPosition {
    pub const fn new(preset: AnchorPreset, offset_x: i32, offset_y: i32) -> Self {
        Self {
            preset,
            offset_x,
            offset_y,
        }
    }

    /// Same anchor, different offset.
    pub fn with_offset(self, offset_x: i32, offset_y: i32) -> Self {
        Self {
            offset_x,
            offset_y,
            ..self
        }
    }
}

/// Screen placement produced by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Natural anchor point of the preset, in viewport pixels.
    pub anchor: Point,
    /// Fraction of the widget size lying left of / above the anchor.
    pub alignment: Vec2,
    /// Screen-space translation derived from the stored offset.
    pub translation: Vec2,
}

impl Placement {
    /// Top-left corner of a widget of the given size.
    pub fn origin(&self, widget: Size) -> Point {
        Point::new(
            self.anchor.x - self.alignment.x * widget.width + self.translation.x,
            self.anchor.y - self.alignment.y * widget.height + self.translation.y,
        )
    }

    /// The anchor point moved by the translation.
    pub fn reference_point(&self) -> Point {
        self.anchor + self.translation
    }
}

/// Map a position onto the viewport.
///
/// Left/top anchored offsets translate right/down. Right/bottom anchored
/// offsets are inverted, so `(10, 10)` on `bottom-right` sits 10px left and
/// 10px up from the anchor.
pub fn resolve(position: &ComponentPosition, viewport: Size) -> Placement {
    let h = position.preset.horizontal();
    let v = position.preset.vertical();
    Placement {
        anchor: Point::new(
            viewport.width * h.anchor_fraction(),
            viewport.height * v.anchor_fraction(),
        ),
        alignment: Vec2::new(h.alignment(), v.alignment()),
        translation: Vec2::new(
            f64::from(h.offset_sign() * position.offset_x),
            f64::from(v.offset_sign() * position.offset_y),
        ),
    }
}

/// Change the anchor of a position.
///
/// A different anchor resets the offset to `(0, 0)`; an offset tuned for one
/// side would land off-screen when measured from the other. Re-selecting the
/// current anchor leaves the position untouched.
pub fn change_anchor_preserve_side(
    position: &ComponentPosition,
    new_preset: AnchorPreset,
) -> ComponentPosition {
    if position.preset == new_preset {
        *position
    } else {
        ComponentPosition::new(new_preset, 0, 0)
    }
}

/// Move a widget to the opposite horizontal side (left <-> right).
pub fn mirror_horizontal(position: &ComponentPosition) -> ComponentPosition {
    let preset = AnchorPreset::from_sides(
        position.preset.vertical(),
        position.preset.horizontal().mirrored(),
    );
    change_anchor_preserve_side(position, preset)
}

/// Move a widget to the opposite vertical side (top <-> bottom).
pub fn mirror_vertical(position: &ComponentPosition) -> ComponentPosition {
    let preset = AnchorPreset::from_sides(
        position.preset.vertical().mirrored(),
        position.preset.horizontal(),
    );
    change_anchor_preserve_side(position, preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1000.0, 800.0);

    #[test]
    fn test_top_left_anchor_at_margin() {
        let placement = resolve(&ComponentPosition::new(AnchorPreset::TopLeft, 0, 0), VIEWPORT);
        assert_eq!(placement.anchor, Point::new(100.0, 80.0));
        assert_eq!(placement.origin(Size::new(50.0, 50.0)), Point::new(100.0, 80.0));
    }

    #[test]
    fn test_center_is_centered() {
        let placement = resolve(&ComponentPosition::default(), VIEWPORT);
        assert_eq!(placement.anchor, Point::new(500.0, 400.0));
        assert_eq!(placement.origin(Size::new(200.0, 100.0)), Point::new(400.0, 350.0));
    }

    #[test]
    fn test_bottom_right_offset_is_inverted() {
        let widget = Size::new(40.0, 40.0);
        let zero = resolve(&ComponentPosition::new(AnchorPreset::BottomRight, 0, 0), VIEWPORT);
        let moved = resolve(&ComponentPosition::new(AnchorPreset::BottomRight, 10, 10), VIEWPORT);

        let a = zero.origin(widget);
        let b = moved.origin(widget);
        assert_eq!(b.x, a.x - 10.0);
        assert_eq!(b.y, a.y - 10.0);
        // right edge of the unmoved widget sits on the 10% margin
        assert_eq!(a.x + widget.width, 900.0);
        assert_eq!(a.y + widget.height, 720.0);
    }

    #[test]
    fn test_offset_delta_mirrors_on_right_and_bottom() {
        let widget = Size::new(120.0, 60.0);
        for preset in AnchorPreset::ALL {
            let start = ComponentPosition::new(preset, 7, -3);
            let moved = start.with_offset(start.offset_x + 25, start.offset_y + 40);

            let before = resolve(&start, VIEWPORT).origin(widget);
            let after = resolve(&moved, VIEWPORT).origin(widget);
            let sign_x = f64::from(preset.horizontal().offset_sign());
            let sign_y = f64::from(preset.vertical().offset_sign());
            assert_eq!(after.x - before.x, 25.0 * sign_x, "{preset:?}");
            assert_eq!(after.y - before.y, 40.0 * sign_y, "{preset:?}");
            if preset.horizontal() == HorizontalSide::Right {
                assert_eq!(after.x - before.x, -25.0);
            }
        }
    }

    #[test]
    fn test_anchor_change_resets_offset() {
        let position = ComponentPosition::new(AnchorPreset::CenterLeft, 42, -17);
        for preset in AnchorPreset::ALL {
            let changed = change_anchor_preserve_side(&position, preset);
            if preset == position.preset {
                assert_eq!(changed, position);
            } else {
                assert_eq!(changed, ComponentPosition::new(preset, 0, 0));
            }
        }
    }

    #[test]
    fn test_mirror_sides() {
        let position = ComponentPosition::new(AnchorPreset::TopLeft, 5, 5);
        assert_eq!(
            mirror_horizontal(&position),
            ComponentPosition::new(AnchorPreset::TopRight, 0, 0)
        );
        assert_eq!(
            mirror_vertical(&position),
            ComponentPosition::new(AnchorPreset::BottomLeft, 0, 0)
        );
        // center columns have no opposite side
        let centered = ComponentPosition::new(AnchorPreset::TopCenter, 5, 5);
        assert_eq!(mirror_horizontal(&centered), centered);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in AnchorPreset::ALL {
            assert_eq!(AnchorPreset::parse(preset.as_str()), Some(preset));
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
        assert_eq!(AnchorPreset::parse("middle"), None);
    }

    #[test]
    fn test_position_json_shape() {
        let position: ComponentPosition =
            serde_json::from_str(r#"{"preset":"center-right","offsetX":3,"offsetY":-4}"#).unwrap();
        assert_eq!(position, ComponentPosition::new(AnchorPreset::CenterRight, 3, -4));
    }
}
