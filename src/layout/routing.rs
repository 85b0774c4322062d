use std::collections::BTreeMap;

use super::*;

type RegionKey = (i64, i64);

/// Assigns a routing channel to every edge.
///
/// Edges of a horizontal parent share the parent's bus. Edges of a vertical
/// parent are grouped by the coarse vertical span they cover; inside a group
/// they are ordered by source x and numbered left to right. The result is
/// advisory and does not move nodes.
pub fn route_edges(
    edges: &[Edge],
    positions: &Positions,
    state: &LayoutState,
    config: &LayoutConfig,
) -> BTreeMap<Edge, RoutingChannel> {
    let mut channels = BTreeMap::new();
    let mut regions: BTreeMap<RegionKey, Vec<(&Edge, f32)>> = BTreeMap::new();

    for edge in edges {
        let (Some(source), Some(target)) =
            (positions.get(&edge.source), positions.get(&edge.target))
        else {
            continue;
        };
        match state.node(&edge.source).arrangement {
            Arrangement::Horizontal => {
                channels.insert(edge.clone(), RoutingChannel::SHARED);
            }
            Arrangement::Vertical => {
                let key = (
                    region_bucket(source.y.min(target.y), config),
                    region_bucket(source.y.max(target.y), config),
                );
                regions.entry(key).or_default().push((edge, source.x));
            }
        }
    }

    for members in regions.values_mut() {
        members.sort_by(|a, b| a.1.total_cmp(&b.1));
        let total = members.len();
        for (index, (edge, _)) in members.iter().enumerate() {
            channels.insert(
                (*edge).clone(),
                RoutingChannel {
                    channel_offset: index as f32 * config.channel_spacing,
                    channel_index: index,
                    total_channels: total,
                },
            );
        }
    }
    channels
}

fn region_bucket(y: f32, config: &LayoutConfig) -> i64 {
    let bucket = if config.region_bucket > 0.0 {
        config.region_bucket
    } else {
        LayoutConfig::default().region_bucket
    };
    (y / bucket).floor() as i64
}

/// Connector geometry from `source` (the parent) to `target`.
///
/// Vertical parents get an elbow: down from the parent's bottom center to the
/// child's mid height, then right to the child's left edge. Horizontal parents
/// get a drop to a shared bus and a stub into the child's top, or a straight
/// line when only one child is expanded.
pub fn build_path(
    source: &Position,
    target: &Position,
    source_node: &TreeNode,
    state: &LayoutState,
    config: &LayoutConfig,
) -> EdgePath {
    let half_w = config.node_width / 2.0;
    let half_h = config.node_height / 2.0;
    let source_bottom = source.y + half_h;

    let points = match state.node(source_node.id()).arrangement {
        Arrangement::Vertical => vec![
            (source.x, source_bottom),
            (source.x, target.y),
            (target.x - half_w, target.y),
        ],
        Arrangement::Horizontal => {
            let target_top = target.y - half_h;
            let expanded = source_node
                .children
                .iter()
                .filter(|child| !state.node(child.id()).collapsed)
                .count();
            if expanded == 1 {
                vec![(source.x, source_bottom), (target.x, target_top)]
            } else {
                let bus_y = source_bottom + config.connection_offset;
                vec![
                    (source.x, source_bottom),
                    (source.x, bus_y),
                    (target.x, bus_y),
                    (target.x, target_top),
                ]
            }
        }
    };
    EdgePath { points }
}

/// Paths for every visible edge.
pub fn compute_paths(
    forest: &Forest,
    positions: &Positions,
    state: &LayoutState,
    config: &LayoutConfig,
) -> BTreeMap<Edge, EdgePath> {
    let mut paths = BTreeMap::new();
    for root in &forest.roots {
        collect_paths(root, positions, state, config, &mut paths);
    }
    paths
}

fn collect_paths(
    node: &TreeNode,
    positions: &Positions,
    state: &LayoutState,
    config: &LayoutConfig,
    paths: &mut BTreeMap<Edge, EdgePath>,
) {
    if state.node(node.id()).collapsed {
        return;
    }
    for child in &node.children {
        if let (Some(source), Some(target)) = (positions.get(node.id()), positions.get(child.id())) {
            paths.insert(
                Edge::new(node.id(), child.id()),
                build_path(source, target, node, state, config),
            );
        }
        collect_paths(child, positions, state, config, paths);
    }
}
