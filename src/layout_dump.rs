use crate::chart::OrgChart;
use crate::layout::{Bounds, ViewTransform, visible_nodes};
use crate::state::Arrangement;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub node_width: f32,
    pub node_height: f32,
    pub bounds: Option<Bounds>,
    pub transform: Option<ViewTransform>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub orphans: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub depth: usize,
    pub arrangement: Arrangement,
    pub collapsed: bool,
    pub child_count: usize,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub channel_index: usize,
    pub channel_offset: f32,
    pub total_channels: usize,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_chart(chart: &OrgChart) -> Self {
        let layout = chart.layout();
        let nodes = visible_nodes(chart.forest(), chart.state())
            .into_iter()
            .filter_map(|node| {
                let pos = layout.position(node.id())?;
                let state = chart.state().node(node.id());
                Some(NodeDump {
                    id: node.record.id.clone(),
                    title: node.record.title.clone(),
                    kind: node.record.kind.clone(),
                    x: pos.x,
                    y: pos.y,
                    depth: pos.depth,
                    arrangement: state.arrangement,
                    collapsed: state.collapsed,
                    child_count: node.children.len(),
                })
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| {
                let channel = layout.channel_for(edge);
                EdgeDump {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    channel_index: channel.map(|c| c.channel_index).unwrap_or(0),
                    channel_offset: channel.map(|c| c.channel_offset).unwrap_or(0.0),
                    total_channels: channel.map(|c| c.total_channels).unwrap_or(1),
                    points: layout
                        .path_for(edge)
                        .map(|path| path.points.iter().map(|(x, y)| [*x, *y]).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        LayoutDump {
            width: layout.viewport.width,
            height: layout.viewport.height,
            node_width: chart.config().node_width,
            node_height: chart.config().node_height,
            bounds: layout.bounds,
            transform: chart.fit_transform(),
            nodes,
            edges,
            orphans: chart.forest().orphans.clone(),
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or to stdout when `None`.
pub fn write_layout_dump(path: Option<&Path>, chart: &OrgChart) -> anyhow::Result<()> {
    let dump = LayoutDump::from_chart(chart);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::Viewport;
    use crate::record::Record;

    #[test]
    fn dump_mirrors_layout() {
        let records = vec![
            Record::new("1", None, 0, "Root"),
            Record::new("2", Some("1"), 0, "Lead"),
            Record::new("3", Some("2"), 0, "A"),
            Record::new("4", Some("2"), 1, "B"),
            Record::new("5", Some("gone"), 0, "Orphan"),
        ];
        let chart =
            OrgChart::new(&records, LayoutConfig::default(), Viewport::new(800.0, 600.0)).unwrap();
        let dump = LayoutDump::from_chart(&chart);
        assert_eq!(dump.nodes.len(), 4);
        assert_eq!(dump.edges.len(), 3);
        assert_eq!(dump.orphans, vec!["5".to_string()]);
        let stacked: Vec<usize> = dump
            .edges
            .iter()
            .filter(|e| e.from == "2")
            .map(|e| e.points.len())
            .collect();
        assert_eq!(stacked, vec![3, 3]);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["nodes"][0]["arrangement"], "horizontal");
        assert_eq!(json["nodes"][1]["arrangement"], "vertical");
    }
}
