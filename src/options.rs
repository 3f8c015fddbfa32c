use crate::layout::Anchor;
use serde::{Deserialize, Serialize};

/// Everything the host chooses about a single card render. Field names follow the
/// host's camelCase JSON; every field has a default so partial documents are fine,
/// and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Drawn above the body when `show_name` is set
    pub character_name: String,
    /// Always wrapped and drawn
    pub body_text: String,
    /// Pixels, floored at 10
    pub name_font_size: f32,
    /// Pixels, floored at 10
    pub body_font_size: f32,
    pub show_name: bool,
    /// Draw the separator image under the name (needs a loaded separator)
    pub show_line: bool,
    pub with_shadow: bool,
    pub shadow_offset_px: f32,
    /// Prefer the custom font over the bundled one when one is loaded
    pub use_custom_font: bool,
    pub name_x01: f32,
    pub name_y01: f32,
    pub body_x01: f32,
    pub body_y01: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            character_name: String::new(),
            body_text: String::new(),
            name_font_size: 48.0,
            body_font_size: 40.0,
            show_name: true,
            show_line: true,
            with_shadow: true,
            shadow_offset_px: 2.0,
            use_custom_font: false,
            name_x01: Anchor::DEFAULT.x01,
            name_y01: Anchor::DEFAULT.y01,
            body_x01: Anchor::DEFAULT.x01,
            body_y01: Anchor::DEFAULT.y01,
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<RenderOptions, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn name_anchor(&self) -> Anchor {
        Anchor::new(self.name_x01, self.name_y01)
    }

    pub fn body_anchor(&self) -> Anchor {
        Anchor::new(self.body_x01, self.body_y01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options = RenderOptions::from_json(
            r#"{ "characterName": "Aoi", "bodyFontSize": 50, "showName": false, "bodyY01": 0.5 }"#,
        )
        .expect("parses");
        assert_eq!(options.character_name, "Aoi");
        assert_eq!(options.body_font_size, 50.0);
        assert!(!options.show_name);
        assert_eq!(options.body_y01, 0.5);
        assert_eq!(options.body_x01, 0.2);
        assert_eq!(options.name_font_size, RenderOptions::default().name_font_size);
    }

    #[test]
    fn dead_host_fields_are_ignored() {
        let options = RenderOptions::from_json(
            r#"{ "addBottomBar": true, "bottomBarHeightPx": 40, "fallbackFont": "serif" }"#,
        )
        .expect("parses");
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn anchors_keep_raw_values() {
        let options = RenderOptions {
            name_x01: 1.7,
            name_y01: -0.5,
            ..RenderOptions::default()
        };
        assert_eq!(options.name_anchor(), Anchor::new(1.7, -0.5));
        assert_eq!(options.body_anchor(), Anchor::DEFAULT);
    }
}
