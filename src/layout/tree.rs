use super::*;

// ── Connector clearance ─────────────────────────────────────────────
/// Right shift, in sibling spacings, of a horizontal node whose parent is
/// vertical, so its fan clears the parent's vertical connector.
pub const HORIZONTAL_UNDER_VERTICAL_SHIFT: f32 = 1.5;
/// Indent, in sibling spacings, of the children stacked under a vertical node.
pub const VERTICAL_CHILD_INDENT: f32 = 0.5;
/// Extra indent, in sibling spacings, for a stacked child that fans out horizontally.
pub const VERTICAL_FAN_EXTRA_INDENT: f32 = 0.5;
/// Minimum left edge of a horizontal fan under a vertical parent, in sibling
/// spacings from the fan parent's anchor.
pub const FAN_LEFT_CLEARANCE: f32 = 1.0;

/// Horizontal extent of a set of node centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Span {
    pub(super) min_x: f32,
    pub(super) max_x: f32,
}

impl Span {
    pub(super) fn of(positions: &Positions) -> Self {
        let mut values = positions.values();
        let Some(first) = values.next() else {
            return Self {
                min_x: 0.0,
                max_x: 0.0,
            };
        };
        values.fold(
            Self {
                min_x: first.x,
                max_x: first.x,
            },
            |span, pos| Self {
                min_x: span.min_x.min(pos.x),
                max_x: span.max_x.max(pos.x),
            },
        )
    }

    /// Subtree width: center span plus one node box.
    pub(super) fn width(&self, node_width: f32) -> f32 {
        self.max_x - self.min_x + node_width
    }

    pub(super) fn center(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }
}

/// Lays out `node` and its visible descendants.
///
/// `node` is placed at `start_y` with depth `depth`; `anchor_x` is the x the
/// caller reserved for it and `parent` the arrangement of the node's parent
/// (`None` for roots). Returns a fresh position map for the subtree.
pub fn layout_subtree(
    node: &TreeNode,
    depth: usize,
    start_y: f32,
    anchor_x: f32,
    parent: Option<Arrangement>,
    state: &LayoutState,
    config: &LayoutConfig,
) -> Positions {
    let mut positions = Positions::new();
    let node_state = state.node(node.id());
    if node_state.collapsed || !node.has_children() {
        positions.insert(
            node.id().to_string(),
            Position::new(anchor_x, start_y, depth),
        );
        return positions;
    }

    match node_state.arrangement {
        Arrangement::Horizontal => {
            layout_horizontal(node, depth, start_y, anchor_x, parent, state, config, &mut positions)
        }
        Arrangement::Vertical => {
            layout_vertical(node, depth, start_y, anchor_x, state, config, &mut positions)
        }
    }
    positions
}

#[allow(clippy::too_many_arguments)]
fn layout_horizontal(
    node: &TreeNode,
    depth: usize,
    start_y: f32,
    anchor_x: f32,
    parent: Option<Arrangement>,
    state: &LayoutState,
    config: &LayoutConfig,
    positions: &mut Positions,
) {
    let spacing = config.sibling_spacing;
    let child_y = start_y + config.level_height;
    let under_vertical = parent == Some(Arrangement::Vertical);
    let mut node_x = if under_vertical {
        anchor_x + spacing * HORIZONTAL_UNDER_VERTICAL_SHIFT
    } else {
        anchor_x
    };

    if let [child] = node.children.as_slice() {
        positions.extend(layout_subtree(
            child,
            depth + 1,
            child_y,
            node_x,
            Some(Arrangement::Horizontal),
            state,
            config,
        ));
        positions.insert(node.id().to_string(), Position::new(node_x, start_y, depth));
        return;
    }

    // Measure every child subtree on its own, then line them up.
    let subtrees: Vec<(Positions, Span)> = node
        .children
        .iter()
        .map(|child| {
            let subtree = layout_subtree(
                child,
                depth + 1,
                child_y,
                0.0,
                Some(Arrangement::Horizontal),
                state,
                config,
            );
            let span = Span::of(&subtree);
            (subtree, span)
        })
        .collect();
    let gaps = subtrees.len().saturating_sub(1) as f32;
    let total_width = subtrees
        .iter()
        .map(|(_, span)| span.width(config.node_width))
        .sum::<f32>()
        + spacing * gaps;

    let mut start_x = node_x - total_width / 2.0;
    if under_vertical {
        let min_allowed = anchor_x + spacing * FAN_LEFT_CLEARANCE;
        if start_x < min_allowed {
            node_x += min_allowed - start_x;
            start_x = min_allowed;
        }
    }

    let mut cursor = start_x;
    for (subtree, span) in subtrees {
        let width = span.width(config.node_width);
        let offset = cursor + width / 2.0 - span.center();
        positions.extend(
            subtree
                .into_iter()
                .map(|(id, pos)| (id, pos.translated(offset, 0.0))),
        );
        cursor += width + spacing;
    }
    positions.insert(node.id().to_string(), Position::new(node_x, start_y, depth));
}

fn layout_vertical(
    node: &TreeNode,
    depth: usize,
    start_y: f32,
    anchor_x: f32,
    state: &LayoutState,
    config: &LayoutConfig,
    positions: &mut Positions,
) {
    let spacing = config.sibling_spacing;
    positions.insert(node.id().to_string(), Position::new(anchor_x, start_y, depth));

    let base_x = anchor_x + spacing * VERTICAL_CHILD_INDENT;
    let mut child_y = start_y + config.level_height;
    for child in &node.children {
        let fans_out =
            state.node(child.id()).arrangement == Arrangement::Horizontal && child.has_children();
        let child_x = if fans_out {
            base_x + spacing * VERTICAL_FAN_EXTRA_INDENT
        } else {
            base_x
        };
        let subtree = layout_subtree(
            child,
            depth + 1,
            child_y,
            child_x,
            Some(Arrangement::Vertical),
            state,
            config,
        );
        let max_y = subtree
            .values()
            .map(|pos| pos.y)
            .fold(child_y, f32::max);
        child_y = max_y + config.node_height + config.stack_gap;
        positions.extend(subtree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_forest;
    use crate::record::Record;

    fn chart(records: &[Record]) -> (Forest, LayoutState) {
        let forest = build_forest(records).unwrap();
        let state = LayoutState::initialize(&forest);
        (forest, state)
    }

    #[test]
    fn leaf_sits_on_its_anchor() {
        let (forest, state) = chart(&[Record::new("1", None, 0, "Solo")]);
        let config = LayoutConfig::default();
        let positions = layout_subtree(&forest.roots[0], 0, 10.0, 42.0, None, &state, &config);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["1"], Position::new(42.0, 10.0, 0));
    }

    #[test]
    fn horizontal_children_are_centered_under_parent() {
        let (forest, state) = chart(&[
            Record::new("1", None, 0, "Root"),
            Record::new("2", Some("1"), 0, "A"),
            Record::new("3", Some("1"), 1, "B"),
        ]);
        let config = LayoutConfig::default();
        let positions = layout_subtree(&forest.roots[0], 0, 0.0, 0.0, None, &state, &config);
        // Two leaves: 200 + 220 + 200 wide, centered on the parent.
        assert_eq!(positions["2"].x, -210.0);
        assert_eq!(positions["3"].x, 210.0);
        assert_eq!(positions["2"].y, config.level_height);
        assert_eq!(positions["1"].x, 0.0);
    }

    #[test]
    fn vertical_children_stack_with_gap() {
        let (forest, state) = chart(&[
            Record::new("1", None, 0, "Root"),
            Record::new("2", Some("1"), 0, "Lead"),
            Record::new("3", Some("2"), 0, "A"),
            Record::new("4", Some("2"), 1, "B"),
        ]);
        let config = LayoutConfig::default();
        let lead = &forest.roots[0].children[0];
        let positions = layout_subtree(
            lead,
            1,
            0.0,
            0.0,
            Some(Arrangement::Horizontal),
            &state,
            &config,
        );
        assert_eq!(positions["2"], Position::new(0.0, 0.0, 1));
        assert_eq!(positions["3"], Position::new(110.0, 150.0, 2));
        assert_eq!(positions["4"], Position::new(110.0, 150.0 + 110.0 + 50.0, 2));
    }

    #[test]
    fn horizontal_fan_under_vertical_parent_is_shifted() {
        let (forest, mut state) = chart(&[
            Record::new("1", None, 0, "Root"),
            Record::new("2", Some("1"), 0, "Lead"),
            Record::new("3", Some("2"), 0, "Team"),
            Record::new("4", Some("3"), 0, "A"),
            Record::new("5", Some("3"), 1, "B"),
        ]);
        state.toggle_arrangement("3");
        let config = LayoutConfig::default();
        let lead = &forest.roots[0].children[0];
        let positions = layout_subtree(
            lead,
            1,
            0.0,
            0.0,
            Some(Arrangement::Horizontal),
            &state,
            &config,
        );
        // Team anchor = 0.5 + 0.5 spacings = 220; own shift 1.5 spacings => 550.
        // Its fan (620 wide) would start at 240, left of 220 + 220 = 440, so it moves right by 200.
        assert_eq!(positions["3"].x, 750.0);
        assert_eq!(positions["4"].x, 540.0);
        assert_eq!(positions["5"].x, 960.0);
    }

    #[test]
    fn collapsed_node_hides_descendants() {
        let (forest, mut state) = chart(&[
            Record::new("1", None, 0, "Root"),
            Record::new("2", Some("1"), 0, "A"),
        ]);
        state.toggle_collapsed("1");
        let config = LayoutConfig::default();
        let positions = layout_subtree(&forest.roots[0], 0, 0.0, 0.0, None, &state, &config);
        assert_eq!(positions.len(), 1);
        assert!(positions.contains_key("1"));
    }

    #[test]
    fn span_of_empty_map_is_zero() {
        let span = Span::of(&Positions::new());
        assert_eq!(span.width(200.0), 200.0);
    }
}
