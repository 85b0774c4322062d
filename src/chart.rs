use crate::config::LayoutConfig;
use crate::hierarchy::{Forest, HierarchyError, build_forest};
use crate::layout::{ChartLayout, Edge, EdgePath, ViewTransform, Viewport, fit_transform, layout_chart};
use crate::record::Record;
use crate::state::{Arrangement, LayoutState};

/// One org chart instance: the hierarchy, its per-node layout state and the
/// layout derived from both.
///
/// Every mutator recomputes the layout before returning, so [`OrgChart::layout`]
/// always reflects the current state.
#[derive(Debug, Clone)]
pub struct OrgChart {
    forest: Forest,
    state: LayoutState,
    config: LayoutConfig,
    layout: ChartLayout,
}

impl OrgChart {
    pub fn new(
        records: &[Record],
        config: LayoutConfig,
        viewport: Viewport,
    ) -> Result<Self, HierarchyError> {
        let forest = build_forest(records)?;
        let state = LayoutState::initialize(&forest);
        let layout = layout_chart(&forest, &state, viewport, &config);
        Ok(Self {
            forest,
            state,
            config,
            layout,
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.viewport
    }

    pub fn path_for(&self, edge: &Edge) -> Option<&EdgePath> {
        self.layout.path_for(edge)
    }

    /// Transform that fits the current layout into the viewport.
    pub fn fit_transform(&self) -> Option<ViewTransform> {
        fit_transform(&self.layout, &self.config)
    }

    /// Returns `false` and leaves the chart untouched for unknown ids.
    pub fn toggle_arrangement(&mut self, id: &str) -> bool {
        match self.state.toggle_arrangement(id) {
            Some(arrangement) => {
                tracing::debug!(id, ?arrangement, "toggled arrangement");
                self.relayout();
                true
            }
            None => {
                tracing::warn!(id, "cannot toggle arrangement of unknown node");
                false
            }
        }
    }

    /// Returns `false` and leaves the chart untouched for unknown ids.
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        match self.state.toggle_collapsed(id) {
            Some(collapsed) => {
                tracing::debug!(id, collapsed, "toggled collapse");
                self.relayout();
                true
            }
            None => {
                tracing::warn!(id, "cannot toggle collapse of unknown node");
                false
            }
        }
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        if !self.state.set_collapsed(id, collapsed) {
            tracing::warn!(id, "cannot collapse unknown node");
            return false;
        }
        self.relayout();
        true
    }

    pub fn expand_all(&mut self) {
        self.state.expand_all();
        tracing::debug!("expanded all nodes");
        self.relayout();
    }

    pub fn collapse_all(&mut self) {
        self.state.collapse_all();
        tracing::debug!("collapsed all nodes");
        self.relayout();
    }

    /// Sets the arrangement of every non-root node.
    pub fn set_arrangement_for_subtree(&mut self, arrangement: Arrangement) {
        self.state
            .set_arrangement_for_subtree(&self.forest, arrangement);
        tracing::debug!(?arrangement, "set arrangement for all sub-nodes");
        self.relayout();
    }

    pub fn recompute_layout(&mut self, viewport: Viewport) {
        self.layout = layout_chart(&self.forest, &self.state, viewport, &self.config);
    }

    /// Drops every toggle and collapse, back to the depth-seeded defaults.
    pub fn reset_state(&mut self) {
        self.state = LayoutState::initialize(&self.forest);
        self.relayout();
    }

    fn relayout(&mut self) {
        let viewport = self.layout.viewport;
        self.recompute_layout(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> OrgChart {
        let records = vec![
            Record::new("1", None, 0, "CEO"),
            Record::new("2", Some("1"), 0, "CTO"),
            Record::new("3", Some("1"), 1, "CFO"),
            Record::new("4", Some("2"), 0, "Platform"),
            Record::new("5", Some("2"), 1, "Product"),
        ];
        OrgChart::new(&records, LayoutConfig::default(), Viewport::new(1024.0, 768.0)).unwrap()
    }

    #[test]
    fn mutators_refresh_layout() {
        let mut chart = chart();
        assert_eq!(chart.layout().positions.len(), 5);
        assert!(chart.toggle_collapsed("2"));
        assert_eq!(chart.layout().positions.len(), 3);
        chart.expand_all();
        assert_eq!(chart.layout().positions.len(), 5);
        chart.collapse_all();
        assert_eq!(chart.layout().positions.len(), 1);
        assert!(chart.layout().edges.is_empty());
    }

    #[test]
    fn toggle_arrangement_twice_is_identity() {
        let mut chart = chart();
        let before = chart.layout().clone();
        assert!(chart.toggle_arrangement("2"));
        assert_ne!(chart.layout().positions, before.positions);
        assert!(chart.toggle_arrangement("2"));
        assert_eq!(chart.layout(), &before);
    }

    #[test]
    fn unknown_ids_leave_chart_untouched() {
        let mut chart = chart();
        let before = chart.layout().clone();
        assert!(!chart.toggle_arrangement("404"));
        assert!(!chart.toggle_collapsed("404"));
        assert!(!chart.set_collapsed("404", true));
        assert_eq!(chart.layout(), &before);
    }

    #[test]
    fn recompute_uses_new_viewport() {
        let mut chart = chart();
        let before = chart.layout().positions["1"];
        chart.recompute_layout(Viewport::new(2048.0, 768.0));
        let after = chart.layout().positions["1"];
        assert_eq!(after.x - before.x, 512.0);
        assert_eq!(chart.viewport(), Viewport::new(2048.0, 768.0));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut chart = chart();
        let before = chart.layout().clone();
        chart.set_arrangement_for_subtree(Arrangement::Horizontal);
        chart.toggle_collapsed("1");
        chart.reset_state();
        assert_eq!(chart.layout(), &before);
    }

    #[test]
    fn cyclic_records_are_rejected() {
        let records = vec![
            Record::new("a", Some("b"), 0, "A"),
            Record::new("b", Some("a"), 0, "B"),
        ];
        let err = OrgChart::new(&records, LayoutConfig::default(), Viewport::new(800.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, HierarchyError::CyclicHierarchy { .. }));
    }
}
