mod fit;
mod routing;
mod tree;
pub(crate) mod types;
pub use fit::*;
pub use routing::*;
pub use tree::{
    FAN_LEFT_CLEARANCE, HORIZONTAL_UNDER_VERTICAL_SHIFT, VERTICAL_CHILD_INDENT,
    VERTICAL_FAN_EXTRA_INDENT, layout_subtree,
};
pub use types::*;
use tree::Span;

use crate::config::LayoutConfig;
use crate::hierarchy::{Forest, TreeNode};
use crate::state::{Arrangement, LayoutState};

/// Y of every root before centering.
const ROOT_Y: f32 = 0.0;
/// Gap between neighbouring root subtrees, in sibling spacings.
const ROOT_GAP_SPACINGS: f32 = 2.0;

/// Positions of every visible node, centered in `viewport`.
///
/// Pure: identical inputs always produce identical maps.
pub fn compute_layout(
    forest: &Forest,
    state: &LayoutState,
    viewport: Viewport,
    config: &LayoutConfig,
) -> Positions {
    let mut positions = Positions::new();
    let mut cursor_x = 0.0;
    for root in &forest.roots {
        let subtree = layout_subtree(root, 0, ROOT_Y, cursor_x, None, state, config);
        let span = Span::of(&subtree);
        let offset = cursor_x - span.min_x;
        positions.extend(
            subtree
                .into_iter()
                .map(|(id, pos)| (id, pos.translated(offset, 0.0))),
        );
        cursor_x += span.width(config.node_width) + config.sibling_spacing * ROOT_GAP_SPACINGS;
    }
    center_in_viewport(positions, viewport, config)
}

fn center_in_viewport(positions: Positions, viewport: Viewport, config: &LayoutConfig) -> Positions {
    let Some(bounds) = Bounds::of_positions(&positions, config) else {
        return positions;
    };
    let viewport = viewport.resolve(config);
    let dx = (viewport.width - bounds.width()) / 2.0 - bounds.min_x;
    let dy = ((viewport.height - bounds.height()) / 2.0 - bounds.min_y).max(config.top_margin);
    positions
        .into_iter()
        .map(|(id, pos)| (id, pos.translated(dx, dy)))
        .collect()
}

/// Nodes not hidden by a collapsed ancestor, in pre-order.
pub fn visible_nodes<'a>(forest: &'a Forest, state: &LayoutState) -> Vec<&'a TreeNode> {
    fn visit<'a>(node: &'a TreeNode, state: &LayoutState, out: &mut Vec<&'a TreeNode>) {
        out.push(node);
        if !state.node(node.id()).collapsed {
            for child in &node.children {
                visit(child, state, out);
            }
        }
    }
    let mut out = Vec::new();
    for root in &forest.roots {
        visit(root, state, &mut out);
    }
    out
}

/// Parent to child pairs between visible nodes, in pre-order.
pub fn visible_edges(forest: &Forest, state: &LayoutState) -> Vec<Edge> {
    visible_nodes(forest, state)
        .into_iter()
        .filter(|node| !state.node(node.id()).collapsed)
        .flat_map(|node| {
            node.children
                .iter()
                .map(move |child| Edge::new(node.id(), child.id()))
        })
        .collect()
}

/// Full layout pass: positions, edges, routing channels and connector paths.
pub fn layout_chart(
    forest: &Forest,
    state: &LayoutState,
    viewport: Viewport,
    config: &LayoutConfig,
) -> ChartLayout {
    let viewport = viewport.resolve(config);
    let positions = compute_layout(forest, state, viewport, config);
    let edges = visible_edges(forest, state);
    let channels = route_edges(&edges, &positions, state, config);
    let paths = compute_paths(forest, &positions, state, config);
    let bounds = Bounds::of_positions(&positions, config);
    tracing::debug!(
        nodes = positions.len(),
        edges = edges.len(),
        width = viewport.width,
        height = viewport.height,
        "computed chart layout"
    );
    ChartLayout {
        positions,
        edges,
        channels,
        paths,
        bounds,
        viewport,
    }
}
