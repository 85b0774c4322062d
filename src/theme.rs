use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}

impl NodeStyle {
    fn new(fill: &str, stroke: &str, stroke_width: f32) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            stroke_width,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub title_font_size: f32,
    pub description_font_size: f32,
    pub subtitle_font_size: f32,
    pub title_color: String,
    pub description_color: String,
    pub subtitle_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub background: String,
    pub corner_radius: f32,
    pub badge_fill: String,
    pub badge_stroke: String,
    pub badge_text: String,
    /// Node styles keyed by record `type`.
    pub node_styles: BTreeMap<String, NodeStyle>,
    pub default_node_style: NodeStyle,
}

impl Theme {
    pub fn classic() -> Self {
        let node_styles = [
            ("action", NodeStyle::new("#e3f2fd", "#1976d2", 2.0)),
            ("task", NodeStyle::new("#f3e5f5", "#7b1fa2", 1.0)),
            ("milestone", NodeStyle::new("#fff3e0", "#f57c00", 2.0)),
            ("review", NodeStyle::new("#e8f5e8", "#388e3c", 1.0)),
            ("strategy", NodeStyle::new("#fce4ec", "#c2185b", 3.0)),
            ("initiative", NodeStyle::new("#e0f2f1", "#00796b", 2.0)),
            ("goal", NodeStyle::new("#fff8e1", "#fbc02d", 1.0)),
            ("objective", NodeStyle::new("#f1f8e9", "#689f38", 1.0)),
        ]
        .into_iter()
        .map(|(kind, style)| (kind.to_string(), style))
        .collect();
        Self {
            font_family: "\"Segoe UI\", Tahoma, Geneva, Verdana, sans-serif".to_string(),
            title_font_size: 12.0,
            description_font_size: 10.0,
            subtitle_font_size: 9.0,
            title_color: "#333333".to_string(),
            description_color: "#666666".to_string(),
            subtitle_color: "#999999".to_string(),
            line_color: "#999999".to_string(),
            line_width: 2.0,
            background: "#FFFFFF".to_string(),
            corner_radius: 6.0,
            badge_fill: "#007bff".to_string(),
            badge_stroke: "#0056b3".to_string(),
            badge_text: "#FFFFFF".to_string(),
            node_styles,
            default_node_style: NodeStyle::new("#f5f5f5", "#757575", 1.0),
        }
    }

    pub fn modern() -> Self {
        let node_styles = [
            ("action", NodeStyle::new("#EEF4FF", "#4C6FFF", 1.5)),
            ("task", NodeStyle::new("#F6F0FF", "#8A5CF6", 1.0)),
            ("milestone", NodeStyle::new("#FFF6EB", "#F59E0B", 1.5)),
            ("review", NodeStyle::new("#EEFBF3", "#22A06B", 1.0)),
            ("strategy", NodeStyle::new("#FFF0F4", "#E11D74", 2.0)),
            ("initiative", NodeStyle::new("#ECFBF9", "#0F9D8A", 1.5)),
            ("goal", NodeStyle::new("#FFFBEA", "#EAB308", 1.0)),
            ("objective", NodeStyle::new("#F4FBEC", "#65A30D", 1.0)),
        ]
        .into_iter()
        .map(|(kind, style)| (kind.to_string(), style))
        .collect();
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            title_font_size: 12.0,
            description_font_size: 10.0,
            subtitle_font_size: 9.0,
            title_color: "#1C2430".to_string(),
            description_color: "#4A5568".to_string(),
            subtitle_color: "#8A94A6".to_string(),
            line_color: "#7A8AA6".to_string(),
            line_width: 1.5,
            background: "#FFFFFF".to_string(),
            corner_radius: 10.0,
            badge_fill: "#4C6FFF".to_string(),
            badge_stroke: "#3451D1".to_string(),
            badge_text: "#FFFFFF".to_string(),
            node_styles,
            default_node_style: NodeStyle::new("#F8FAFF", "#C7D2E5", 1.0),
        }
    }

    /// Style for a record `type`, falling back to the default style.
    pub fn node_style(&self, kind: &str) -> &NodeStyle {
        self.node_styles
            .get(kind)
            .unwrap_or(&self.default_node_style)
    }
}
