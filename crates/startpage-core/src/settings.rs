//! Application settings.
//!
//! A flat record whose JSON form matches the settings files written by the
//! web build (camelCase keys). Every field has a default, and any field
//! missing from a loaded document takes that default.

use serde::{Deserialize, Serialize};

use crate::position::{AnchorPreset, ComponentPosition, change_anchor_preserve_side};
use crate::weather::WeatherUnit;
use crate::widgets::{ResizeAxis, WidgetKind};

/// Web search provider for the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Baidu,
    Bing,
    DuckDuckGo,
}

impl SearchEngine {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Baidu => "百度",
            Self::Bing => "Bing",
            Self::DuckDuckGo => "DuckDuckGo",
        }
    }

    fn query_prefix(self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search?q=",
            Self::Baidu => "https://www.baidu.com/s?wd=",
            Self::Bing => "https://www.bing.com/search?q=",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=",
        }
    }

    /// Full search URL for `query`, form-encoded.
    pub fn search_url(self, query: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        format!("{}{}", self.query_prefix(), encoded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Gradient,
    Unsplash,
    Bing,
    Wallhaven,
    Custom,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsplash_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallhaven_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u32>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            kind: BackgroundType::Gradient,
            value: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string(),
            unsplash_category: None,
            wallhaven_category: None,
            blur: Some(0),
            brightness: Some(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Auto,
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkDisplayMode {
    #[default]
    Grid,
    List,
    Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockFontFamily {
    #[default]
    System,
    Serif,
    Mono,
    Rounded,
    Elegant,
    Digital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClockSeparator {
    #[default]
    #[serde(rename = ":")]
    Colon,
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = " ")]
    Space,
}

impl ClockSeparator {
    pub fn as_char(self) -> char {
        match self {
            Self::Colon => ':',
            Self::Dot => '.',
            Self::Space => ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClockStyle {
    pub font_family: ClockFontFamily,
    /// CSS weight, 100-900.
    pub font_weight: u16,
    pub color: String,
    /// 0-100.
    pub opacity: u8,
    pub shadow: bool,
    pub separator: ClockSeparator,
}

impl Default for ClockStyle {
    fn default() -> Self {
        Self {
            font_family: ClockFontFamily::System,
            font_weight: 200,
            color: "#ffffff".to_string(),
            opacity: 100,
            shadow: true,
            separator: ClockSeparator::Colon,
        }
    }
}

/// All user-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    // Search
    pub search_engine: SearchEngine,
    pub show_search_suggestions: bool,
    pub search_box_opacity: u8,
    pub search_box_color: String,
    pub search_box_radius: u32,

    // Clock
    pub clock_font_size: u32,
    pub clock_style: ClockStyle,
    pub clock_position: ComponentPosition,
    pub search_position: ComponentPosition,

    // Appearance
    pub background: BackgroundConfig,
    pub custom_css: String,
    pub theme: Theme,

    // Time
    pub time_format: TimeFormat,
    pub show_seconds: bool,
    pub show_date: bool,

    // Bookmarks
    pub bookmark_display_mode: BookmarkDisplayMode,
    pub bookmark_position: AnchorPreset,
    pub show_bookmark_title: bool,

    // Widget visibility
    pub show_weather: bool,
    pub show_quote: bool,
    pub show_todo: bool,
    pub show_pomodoro: bool,
    pub show_countdown: bool,
    pub show_note: bool,
    pub show_calendar: bool,

    // Widget positions
    pub weather_position: ComponentPosition,
    pub pomodoro_position: ComponentPosition,
    pub todo_position: ComponentPosition,
    pub quote_position: ComponentPosition,
    pub countdown_position: ComponentPosition,
    pub note_position: ComponentPosition,
    pub calendar_position: ComponentPosition,

    // Widget sizes
    pub weather_size: u32,
    pub pomodoro_size: u32,
    pub todo_width: u32,
    pub todo_height: u32,
    /// Percent of natural size.
    pub quote_size: u32,
    pub countdown_size: u32,
    pub note_width: u32,
    pub note_height: u32,
    pub calendar_size: u32,

    // Widget content
    pub weather_city: String,
    pub weather_unit: WeatherUnit,
    pub countdown_title: String,
    pub countdown_target: Option<String>,
    pub note_content: String,

    // Sync and backup
    pub webdav_url: String,
    pub webdav_username: String,
    pub webdav_password: String,
    pub webdav_use_cors_proxy: bool,
    pub webdav_cors_proxy_url: String,
    #[serde(rename = "cloudBookmarksXBEL")]
    pub cloud_bookmarks_xbel: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        use AnchorPreset as A;
        let size = |kind: WidgetKind, axis| {
            kind.size_bounds(axis).map(|bounds| bounds.default).unwrap_or_default()
        };
        Self {
            search_engine: SearchEngine::Google,
            show_search_suggestions: true,
            search_box_opacity: 95,
            search_box_color: "#ffffff".to_string(),
            search_box_radius: 9999,
            clock_font_size: size(WidgetKind::Clock, ResizeAxis::Uniform),
            clock_style: ClockStyle::default(),
            clock_position: ComponentPosition::new(A::Center, 0, -80),
            search_position: ComponentPosition::new(A::Center, 0, 0),
            background: BackgroundConfig::default(),
            custom_css: String::new(),
            theme: Theme::Dark,
            time_format: TimeFormat::TwentyFourHour,
            show_seconds: false,
            show_date: true,
            bookmark_display_mode: BookmarkDisplayMode::Grid,
            bookmark_position: A::Center,
            show_bookmark_title: true,
            show_weather: true,
            show_quote: true,
            show_todo: true,
            show_pomodoro: true,
            show_countdown: false,
            show_note: false,
            show_calendar: false,
            weather_position: ComponentPosition::new(A::CenterLeft, 0, -100),
            pomodoro_position: ComponentPosition::new(A::CenterLeft, 0, 100),
            todo_position: ComponentPosition::new(A::CenterRight, 0, 0),
            quote_position: ComponentPosition::new(A::Center, 0, 60),
            countdown_position: ComponentPosition::new(A::CenterLeft, 0, 100),
            note_position: ComponentPosition::new(A::BottomRight, 0, 0),
            calendar_position: ComponentPosition::new(A::CenterRight, 0, 100),
            weather_size: size(WidgetKind::Weather, ResizeAxis::Uniform),
            pomodoro_size: size(WidgetKind::Pomodoro, ResizeAxis::Uniform),
            todo_width: size(WidgetKind::Todo, ResizeAxis::Width),
            todo_height: size(WidgetKind::Todo, ResizeAxis::Height),
            quote_size: size(WidgetKind::Quote, ResizeAxis::Uniform),
            countdown_size: size(WidgetKind::Countdown, ResizeAxis::Uniform),
            note_width: size(WidgetKind::Note, ResizeAxis::Width),
            note_height: size(WidgetKind::Note, ResizeAxis::Height),
            calendar_size: size(WidgetKind::Calendar, ResizeAxis::Uniform),
            weather_city: "北京".to_string(),
            weather_unit: WeatherUnit::Celsius,
            countdown_title: "倒计时".to_string(),
            countdown_target: None,
            note_content: String::new(),
            webdav_url: String::new(),
            webdav_username: String::new(),
            webdav_password: String::new(),
            webdav_use_cors_proxy: false,
            webdav_cors_proxy_url: "https://corsproxy.io/?".to_string(),
            cloud_bookmarks_xbel: String::new(),
        }
    }
}

impl AppSettings {
    fn visibility_flag(&self, kind: WidgetKind) -> Option<&bool> {
        match kind {
            WidgetKind::Clock | WidgetKind::Search => None,
            WidgetKind::Weather => Some(&self.show_weather),
            WidgetKind::Pomodoro => Some(&self.show_pomodoro),
            WidgetKind::Todo => Some(&self.show_todo),
            WidgetKind::Quote => Some(&self.show_quote),
            WidgetKind::Countdown => Some(&self.show_countdown),
            WidgetKind::Note => Some(&self.show_note),
            WidgetKind::Calendar => Some(&self.show_calendar),
        }
    }

    fn visibility_flag_mut(&mut self, kind: WidgetKind) -> Option<&mut bool> {
        match kind {
            WidgetKind::Clock | WidgetKind::Search => None,
            WidgetKind::Weather => Some(&mut self.show_weather),
            WidgetKind::Pomodoro => Some(&mut self.show_pomodoro),
            WidgetKind::Todo => Some(&mut self.show_todo),
            WidgetKind::Quote => Some(&mut self.show_quote),
            WidgetKind::Countdown => Some(&mut self.show_countdown),
            WidgetKind::Note => Some(&mut self.show_note),
            WidgetKind::Calendar => Some(&mut self.show_calendar),
        }
    }

    /// Whether a widget is shown. Widgets without a toggle always are.
    pub fn is_visible(&self, kind: WidgetKind) -> bool {
        self.visibility_flag(kind).copied().unwrap_or(true)
    }

    /// Set a widget's visibility. Returns false for widgets without a toggle.
    pub fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> bool {
        match self.visibility_flag_mut(kind) {
            Some(flag) => {
                *flag = visible;
                true
            }
            None => false,
        }
    }

    /// Flip a widget's visibility. Returns false for widgets without a toggle.
    pub fn toggle_widget(&mut self, kind: WidgetKind) -> bool {
        let visible = self.is_visible(kind);
        self.set_visible(kind, !visible)
    }

    pub fn position(&self, kind: WidgetKind) -> &ComponentPosition {
        match kind {
            WidgetKind::Clock => &self.clock_position,
            WidgetKind::Search => &self.search_position,
            WidgetKind::Weather => &self.weather_position,
            WidgetKind::Pomodoro => &self.pomodoro_position,
            WidgetKind::Todo => &self.todo_position,
            WidgetKind::Quote => &self.quote_position,
            WidgetKind::Countdown => &self.countdown_position,
            WidgetKind::Note => &self.note_position,
            WidgetKind::Calendar => &self.calendar_position,
        }
    }

    pub fn position_mut(&mut self, kind: WidgetKind) -> &mut ComponentPosition {
        match kind {
            WidgetKind::Clock => &mut self.clock_position,
            WidgetKind::Search => &mut self.search_position,
            WidgetKind::Weather => &mut self.weather_position,
            WidgetKind::Pomodoro => &mut self.pomodoro_position,
            WidgetKind::Todo => &mut self.todo_position,
            WidgetKind::Quote => &mut self.quote_position,
            WidgetKind::Countdown => &mut self.countdown_position,
            WidgetKind::Note => &mut self.note_position,
            WidgetKind::Calendar => &mut self.calendar_position,
        }
    }

    /// Move a widget to another anchor, resetting its offset.
    pub fn change_anchor(&mut self, kind: WidgetKind, preset: AnchorPreset) {
        let position = self.position_mut(kind);
        *position = change_anchor_preserve_side(position, preset);
    }

    fn size_slot_mut(&mut self, kind: WidgetKind, axis: ResizeAxis) -> Option<&mut u32> {
        use ResizeAxis::{Height, Uniform, Width};
        match (kind, axis) {
            (WidgetKind::Clock, Uniform) => Some(&mut self.clock_font_size),
            (WidgetKind::Weather, Uniform) => Some(&mut self.weather_size),
            (WidgetKind::Pomodoro, Uniform) => Some(&mut self.pomodoro_size),
            (WidgetKind::Todo, Width) => Some(&mut self.todo_width),
            (WidgetKind::Todo, Height) => Some(&mut self.todo_height),
            (WidgetKind::Quote, Uniform) => Some(&mut self.quote_size),
            (WidgetKind::Countdown, Uniform) => Some(&mut self.countdown_size),
            (WidgetKind::Note, Width) => Some(&mut self.note_width),
            (WidgetKind::Note, Height) => Some(&mut self.note_height),
            (WidgetKind::Calendar, Uniform) => Some(&mut self.calendar_size),
            _ => None,
        }
    }

    /// Current size of one axis, or `None` if the widget has no such handle.
    pub fn size(&self, kind: WidgetKind, axis: ResizeAxis) -> Option<u32> {
        use ResizeAxis::{Height, Uniform, Width};
        match (kind, axis) {
            (WidgetKind::Clock, Uniform) => Some(self.clock_font_size),
            (WidgetKind::Weather, Uniform) => Some(self.weather_size),
            (WidgetKind::Pomodoro, Uniform) => Some(self.pomodoro_size),
            (WidgetKind::Todo, Width) => Some(self.todo_width),
            (WidgetKind::Todo, Height) => Some(self.todo_height),
            (WidgetKind::Quote, Uniform) => Some(self.quote_size),
            (WidgetKind::Countdown, Uniform) => Some(self.countdown_size),
            (WidgetKind::Note, Width) => Some(self.note_width),
            (WidgetKind::Note, Height) => Some(self.note_height),
            (WidgetKind::Calendar, Uniform) => Some(self.calendar_size),
            _ => None,
        }
    }

    /// Store a size, clamped into the widget's bounds. Returns the value
    /// actually stored.
    pub fn set_size(&mut self, kind: WidgetKind, axis: ResizeAxis, value: u32) -> Option<u32> {
        let bounds = kind.size_bounds(axis)?;
        let slot = self.size_slot_mut(kind, axis)?;
        *slot = bounds.clamp(value);
        Some(*slot)
    }

    /// Pull every size back into its bounds. Returns true if anything moved.
    pub fn clamp_sizes(&mut self) -> bool {
        let mut changed = false;
        for kind in WidgetKind::ALL {
            let Some(spec) = kind.size_spec() else {
                continue;
            };
            for &axis in spec.axes() {
                if let Some(current) = self.size(kind, axis) {
                    let stored = self.set_size(kind, axis, current);
                    changed |= stored != Some(current);
                }
            }
        }
        changed
    }
}
