use super::Locale;

/// Display names for one Calendar event color id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    pub id: &'static str,
    pub ja: &'static str,
    pub en: &'static str,
}

impl ColorEntry {
    const fn new(id: &'static str, ja: &'static str, en: &'static str) -> Self {
        Self { id, ja, en }
    }

    pub fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ja => self.ja,
            Locale::En => self.en,
        }
    }
}

/// Label for events without a color id or with an unknown one
pub const DEFAULT_COLOR: ColorEntry = ColorEntry::new("", "デフォルト", "Default");

/// Event color ids 1-11 of the Calendar API
pub static COLOR_CATALOG: &[ColorEntry] = &[
    ColorEntry::new("1", "薄紫", "Lavender"),
    ColorEntry::new("2", "緑", "Sage"),
    ColorEntry::new("3", "紫", "Grape"),
    ColorEntry::new("4", "赤", "Flamingo"),
    ColorEntry::new("5", "黄", "Banana"),
    ColorEntry::new("6", "オレンジ", "Tangerine"),
    ColorEntry::new("7", "水色", "Peacock"),
    ColorEntry::new("8", "グレー", "Graphite"),
    ColorEntry::new("9", "青紫", "Blueberry"),
    ColorEntry::new("10", "緑", "Basil"),
    ColorEntry::new("11", "赤", "Tomato"),
];

/// Look up a color entry, falling back to [`DEFAULT_COLOR`]
pub fn lookup_color(color_id: Option<&str>) -> &'static ColorEntry {
    color_id
        .filter(|id| !id.is_empty())
        .and_then(|id| COLOR_CATALOG.iter().find(|entry| entry.id == id))
        .unwrap_or(&DEFAULT_COLOR)
}

/// Human readable color name for an event color id
pub fn color_name(color_id: Option<&str>, locale: Locale) -> &'static str {
    lookup_color(color_id).name(locale)
}
