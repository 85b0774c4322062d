pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod hierarchy;
pub mod layout;
pub mod layout_dump;
pub mod record;
pub mod render;
pub mod state;
pub mod text;
pub mod theme;

pub use chart::OrgChart;
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use hierarchy::{Forest, HierarchyError, MAX_DEPTH, TreeNode, build_forest};
pub use layout::{
    ChartLayout, Edge, EdgePath, Position, Positions, RoutingChannel, ViewTransform, Viewport,
    build_path, compute_layout, layout_chart, route_edges, visible_edges, visible_nodes,
};
pub use record::{Record, RecordError, parse_records};
pub use render::render_svg;
pub use state::{Arrangement, LayoutState, NodeState};
pub use theme::{NodeStyle, Theme};
