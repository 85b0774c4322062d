use super::*;

/// Camera transform that fits the whole chart into its viewport.
///
/// Never zooms in past 1:1 and stays inside the configured zoom range.
/// Returns `None` for an empty layout.
pub fn fit_transform(layout: &ChartLayout, config: &LayoutConfig) -> Option<ViewTransform> {
    let bounds = layout.bounds?;
    let viewport = layout.viewport.resolve(config);
    let pad = config.fit_padding;

    let scale_x = (viewport.width - pad * 2.0) / bounds.width();
    let scale_y = (viewport.height - pad * 2.0) / bounds.height();
    let scale = scale_x
        .min(scale_y)
        .min(1.0)
        .max(config.min_zoom)
        .min(config.max_zoom);

    Some(ViewTransform {
        translate_x: (viewport.width - bounds.width() * scale) / 2.0 - bounds.min_x * scale,
        translate_y: (viewport.height - bounds.height() * scale) / 2.0 - bounds.min_y * scale,
        scale,
    })
}
