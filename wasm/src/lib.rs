use orgchart_layout::layout_dump::LayoutDump;
use orgchart_layout::{Arrangement, LayoutConfig, OrgChart, Theme, Viewport, parse_records, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgChartOptions {
    theme: Option<String>,
    font_family: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    sub_arrangement: Option<Arrangement>,
    collapse_all: Option<bool>,
}

impl OrgChartOptions {
    fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some(raw) => serde_json::from_str(raw).map_err(|error| error.to_string()),
            None => Ok(Self::default()),
        }
    }

    fn theme(&self) -> Theme {
        let mut theme = if self.theme.as_deref() == Some("modern") {
            Theme::modern()
        } else {
            Theme::classic()
        };
        if let Some(font_family) = &self.font_family {
            theme.font_family = font_family.clone();
        }
        theme
    }

    fn viewport(&self) -> Viewport {
        let fallback = LayoutConfig::default();
        Viewport::new(
            self.width.unwrap_or(fallback.default_viewport_width),
            self.height.unwrap_or(fallback.default_viewport_height),
        )
    }
}

/// Builds the chart and theme described by the JSON inputs.
fn build_chart(records_json: &str, options_json: Option<&str>) -> Result<(OrgChart, Theme), String> {
    let options = OrgChartOptions::parse(options_json)?;
    let records = parse_records(records_json).map_err(|error| error.to_string())?;
    let mut chart = OrgChart::new(&records, LayoutConfig::default(), options.viewport())
        .map_err(|error| error.to_string())?;
    if let Some(arrangement) = options.sub_arrangement {
        chart.set_arrangement_for_subtree(arrangement);
    }
    if options.collapse_all.unwrap_or(false) {
        chart.collapse_all();
    }
    Ok((chart, options.theme()))
}

fn dump_json(chart: &OrgChart) -> Result<String, String> {
    serde_json::to_string(&LayoutDump::from_chart(chart)).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub struct OrgChartHandle {
    chart: OrgChart,
    theme: Theme,
}

#[wasm_bindgen]
impl OrgChartHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(records_json: &str, options_json: Option<String>) -> Result<OrgChartHandle, JsValue> {
        let (chart, theme) =
            build_chart(records_json, options_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
        Ok(OrgChartHandle { chart, theme })
    }

    #[wasm_bindgen(js_name = toggleArrangement)]
    pub fn toggle_arrangement(&mut self, id: &str) -> bool {
        self.chart.toggle_arrangement(id)
    }

    #[wasm_bindgen(js_name = toggleCollapsed)]
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        self.chart.toggle_collapsed(id)
    }

    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.chart.expand_all();
    }

    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) {
        self.chart.collapse_all();
    }

    /// Accepts `"horizontal"` or `"vertical"`.
    #[wasm_bindgen(js_name = setSubArrangement)]
    pub fn set_sub_arrangement(&mut self, arrangement: &str) -> Result<(), JsValue> {
        let arrangement = match arrangement {
            "horizontal" => Arrangement::Horizontal,
            "vertical" => Arrangement::Vertical,
            other => return Err(JsValue::from_str(&format!("unknown arrangement: {other}"))),
        };
        self.chart.set_arrangement_for_subtree(arrangement);
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.chart.recompute_layout(Viewport::new(width, height));
    }

    #[wasm_bindgen(js_name = renderSvg)]
    pub fn render_svg(&self) -> String {
        render_svg(&self.chart, &self.theme)
    }

    #[wasm_bindgen(js_name = layoutJson)]
    pub fn layout_json(&self) -> Result<String, JsValue> {
        dump_json(&self.chart).map_err(|e| JsValue::from_str(&e))
    }
}
