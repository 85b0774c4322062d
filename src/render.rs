use crate::chart::OrgChart;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::hierarchy::TreeNode;
use crate::layout::{EdgePath, Position, ViewTransform, visible_nodes};
use crate::text::{truncate_text, wrap_text};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const BADGE_RADIUS: f32 = 12.0;
const BADGE_INSET: f32 = 15.0;

/// Renders the chart's current layout as a standalone SVG document.
///
/// The drawing is wrapped in the fit-to-viewport camera transform.
pub fn render_svg(chart: &OrgChart, theme: &Theme) -> String {
    let layout = chart.layout();
    let width = layout.viewport.width;
    let height = layout.viewport.height;
    let transform = chart.fit_transform().unwrap_or(ViewTransform::IDENTITY);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!("<g class=\"chart\" transform=\"{}\">", transform.to_svg()));

    for edge in &layout.edges {
        let Some(path) = layout.path_for(edge) else {
            continue;
        };
        svg.push_str(&format!(
            "<path class=\"link\" data-edge=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(&edge.key()),
            points_to_path(path),
            theme.line_color,
            theme.line_width
        ));
    }

    for node in visible_nodes(chart.forest(), chart.state()) {
        let Some(pos) = layout.position(node.id()) else {
            continue;
        };
        svg.push_str(&node_svg(node, pos, chart, theme));
    }

    svg.push_str("</g></svg>");
    svg
}

fn node_svg(node: &TreeNode, pos: &Position, chart: &OrgChart, theme: &Theme) -> String {
    let config = chart.config();
    let record = &node.record;
    let state = chart.state().node(node.id());
    let style = theme.node_style(&record.kind);
    let half_w = config.node_width / 2.0;
    let half_h = config.node_height / 2.0;

    let mut classes = Vec::new();
    if node.has_children() {
        classes.push("has-children");
    }
    if state.collapsed {
        classes.push("collapsed");
    }

    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"node\" data-id=\"{}\" transform=\"translate({:.2},{:.2})\">",
        escape_xml(node.id()),
        pos.x,
        pos.y
    ));
    out.push_str(&format!(
        "<title>{}\n{}\nID: {} | Position: {}</title>",
        escape_xml(&record.title),
        escape_xml(&record.description),
        escape_xml(&record.id),
        record.position
    ));
    out.push_str(&format!(
        "<rect class=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        classes.join(" "),
        -half_w,
        -half_h,
        config.node_width,
        config.node_height,
        theme.corner_radius,
        theme.corner_radius,
        style.fill,
        style.stroke,
        style.stroke_width
    ));
    out.push_str(&format!(
        "<text class=\"title\" text-anchor=\"middle\" dy=\"-1.2em\" font-family=\"{}\" font-weight=\"bold\" font-size=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.title_font_size,
        theme.title_color,
        escape_xml(&truncate_text(&record.title, config.title_max_chars))
    ));

    let lines = wrap_text(
        &record.description,
        config.description_line_chars,
        config.description_max_lines,
    );
    for (idx, line) in lines.iter().enumerate() {
        let dy = 0.3 + idx as f32 * 1.2;
        out.push_str(&format!(
            "<text class=\"description\" text-anchor=\"middle\" dy=\"{dy:.1}em\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            theme.description_font_size,
            theme.description_color,
            escape_xml(line)
        ));
    }

    if node.has_children() {
        out.push_str(&format!(
            "<text class=\"subtitle\" text-anchor=\"middle\" dy=\"4.5em\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{} items</text>",
            escape_xml(&theme.font_family),
            theme.subtitle_font_size,
            theme.subtitle_color,
            node.children.len()
        ));
        let cx = half_w - BADGE_INSET;
        let cy = -half_h + BADGE_INSET;
        out.push_str(&format!(
            "<circle class=\"layout-toggle-bg\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{BADGE_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
            theme.badge_fill, theme.badge_stroke
        ));
        out.push_str(&format!(
            "<text class=\"layout-toggle\" x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"14\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            theme.badge_text,
            state.arrangement.badge()
        ));
    }

    out.push_str("</g>");
    out
}

fn points_to_path(path: &EdgePath) -> String {
    let Some((first, rest)) = path.points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.0, first.1);
    for point in rest {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
