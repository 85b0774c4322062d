use crate::theme::{NodeStyle, Theme};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Vertical distance between a node and its first row of children.
    pub level_height: f32,
    pub sibling_spacing: f32,
    /// Gap between consecutive subtrees stacked under a vertical parent.
    pub stack_gap: f32,
    pub top_margin: f32,
    /// Drop from a horizontal parent's bottom edge to its shared connector bus.
    pub connection_offset: f32,
    pub channel_spacing: f32,
    /// Height of the buckets vertical connectors are grouped into for channel assignment.
    pub region_bucket: f32,
    pub default_viewport_width: f32,
    pub default_viewport_height: f32,
    pub fit_padding: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub title_max_chars: usize,
    pub description_line_chars: usize,
    pub description_max_lines: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 110.0,
            level_height: 150.0,
            sibling_spacing: 220.0,
            stack_gap: 50.0,
            top_margin: 50.0,
            connection_offset: 25.0,
            channel_spacing: 25.0,
            region_bucket: 100.0,
            default_viewport_width: 800.0,
            default_viewport_height: 600.0,
            fit_padding: 50.0,
            min_zoom: 0.1,
            max_zoom: 3.0,
            title_max_chars: 25,
            description_line_chars: 25,
            description_max_lines: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    title_font_size: Option<f32>,
    description_font_size: Option<f32>,
    title_color: Option<String>,
    description_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    background: Option<String>,
    badge_fill: Option<String>,
    badge_stroke: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    level_height: Option<f32>,
    sibling_spacing: Option<f32>,
    stack_gap: Option<f32>,
    top_margin: Option<f32>,
    connection_offset: Option<f32>,
    channel_spacing: Option<f32>,
    region_bucket: Option<f32>,
    fit_padding: Option<f32>,
    min_zoom: Option<f32>,
    max_zoom: Option<f32>,
    title_max_chars: Option<usize>,
    description_line_chars: Option<usize>,
    description_max_lines: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeStyleFile {
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
    node_styles: Option<BTreeMap<String, NodeStyleFile>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    match parsed.theme.as_deref() {
        Some("modern") => config.theme = Theme::modern(),
        Some("classic") | Some("default") => config.theme = Theme::classic(),
        _ => {}
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.title_font_size {
            theme.title_font_size = v;
        }
        if let Some(v) = vars.description_font_size {
            theme.description_font_size = v;
        }
        if let Some(v) = vars.title_color {
            theme.title_color = v;
        }
        if let Some(v) = vars.description_color {
            theme.description_color = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            theme.line_width = v;
        }
        if let Some(v) = vars.background {
            theme.background = v;
        }
        if let Some(v) = vars.badge_fill {
            theme.badge_fill = v;
        }
        if let Some(v) = vars.badge_stroke {
            theme.badge_stroke = v;
        }
    }

    if let Some(styles) = parsed.node_styles {
        for (kind, file) in styles {
            let base = config.theme.node_style(&kind).clone();
            config.theme.node_styles.insert(
                kind,
                NodeStyle {
                    fill: file.fill.unwrap_or(base.fill),
                    stroke: file.stroke.unwrap_or(base.stroke),
                    stroke_width: file.stroke_width.unwrap_or(base.stroke_width),
                },
            );
        }
    }

    if let Some(layout) = parsed.layout {
        let cfg = &mut config.layout;
        if let Some(v) = layout.node_width {
            cfg.node_width = v;
        }
        if let Some(v) = layout.node_height {
            cfg.node_height = v;
        }
        if let Some(v) = layout.level_height {
            cfg.level_height = v;
        }
        if let Some(v) = layout.sibling_spacing {
            cfg.sibling_spacing = v;
        }
        if let Some(v) = layout.stack_gap {
            cfg.stack_gap = v;
        }
        if let Some(v) = layout.top_margin {
            cfg.top_margin = v;
        }
        if let Some(v) = layout.connection_offset {
            cfg.connection_offset = v;
        }
        if let Some(v) = layout.channel_spacing {
            cfg.channel_spacing = v;
        }
        if let Some(v) = layout.region_bucket {
            cfg.region_bucket = v;
        }
        if let Some(v) = layout.fit_padding {
            cfg.fit_padding = v;
        }
        if let Some(v) = layout.min_zoom {
            cfg.min_zoom = v;
        }
        if let Some(v) = layout.max_zoom {
            cfg.max_zoom = v;
        }
        if let Some(v) = layout.title_max_chars {
            cfg.title_max_chars = v;
        }
        if let Some(v) = layout.description_line_chars {
            cfg.description_line_chars = v;
        }
        if let Some(v) = layout.description_max_lines {
            cfg.description_max_lines = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_width, 200.0);
        assert_eq!(config.layout.sibling_spacing, 220.0);
        assert_eq!(config.render.width, 1200.0);
    }

    #[test]
    fn overlays_partial_file() {
        let parsed: ConfigFile = serde_json::from_str(
            r##"{
                "theme": "modern",
                "themeVariables": { "lineColor": "#123456" },
                "layout": { "siblingSpacing": 180, "stackGap": 40 },
                "nodeStyles": { "task": { "fill": "#ffffff" } }
            }"##,
        )
        .unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.layout.sibling_spacing, 180.0);
        assert_eq!(config.layout.stack_gap, 40.0);
        assert_eq!(config.layout.node_width, 200.0);
        let task = config.theme.node_style("task");
        assert_eq!(task.fill, "#ffffff");
        assert_eq!(task.stroke, Theme::modern().node_style("task").stroke);
    }

    #[test]
    fn background_variable_lands_on_theme() {
        let parsed: ConfigFile =
            serde_json::from_str(r##"{ "themeVariables": { "background": "#101820" } }"##).unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed);
        assert_eq!(config.theme.background, "#101820");
    }
}
