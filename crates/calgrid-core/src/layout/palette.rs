//! Color resolution for bars and chips.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";
pub const DEFAULT_TASK_COLOR: &str = "#9ca3af";

/// Maps upstream color keys to concrete colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub event: String,
    pub task: String,
    pub named: BTreeMap<String, String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            event: DEFAULT_EVENT_COLOR.into(),
            task: DEFAULT_TASK_COLOR.into(),
            named: BTreeMap::new(),
        }
    }
}

impl Palette {
    /// Tasks always get the task color. Events use their key when it names a
    /// palette entry or is itself a hex color, and the event color otherwise.
    pub fn resolve(&self, color_key: Option<&str>, is_task: bool) -> String {
        if is_task {
            return self.task.clone();
        }
        match color_key {
            Some(key) => match self.named.get(key) {
                Some(color) => color.clone(),
                None if key.starts_with('#') => key.to_string(),
                None => self.event.clone(),
            },
            None => self.event.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_task_color() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(Some("#ff0000"), true), DEFAULT_TASK_COLOR);
    }

    #[test]
    fn resolve_named_hex_and_unknown_keys() {
        let mut palette = Palette::default();
        palette.named.insert("work".into(), "#10b981".into());
        assert_eq!(palette.resolve(Some("work"), false), "#10b981");
        assert_eq!(palette.resolve(Some("#123456"), false), "#123456");
        assert_eq!(palette.resolve(Some("mystery"), false), DEFAULT_EVENT_COLOR);
        assert_eq!(palette.resolve(None, false), DEFAULT_EVENT_COLOR);
    }

    #[test]
    fn partial_palette_keeps_defaults() {
        let palette: Palette = serde_json::from_str(r##"{"named": {"home": "#f43f5e"}}"##).unwrap();
        assert_eq!(palette.event, DEFAULT_EVENT_COLOR);
        assert_eq!(palette.resolve(Some("home"), false), "#f43f5e");
    }
}
