use crate::chart::OrgChart;
use crate::config::{Config, load_config};
use crate::layout::Viewport;
use crate::layout_dump::write_layout_dump;
use crate::record::parse_records;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::state::Arrangement;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ORGCHART_LOG";

#[derive(Parser, Debug)]
#[command(name = "orgchart", version, about = "Org chart layout and renderer")]
pub struct Args {
    /// Input file (JSON/JSON5 array of records) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, nodeStyles)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Viewport height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Arrangement for every non-root node
    #[arg(long = "sub-arrangement", value_enum)]
    pub sub_arrangement: Option<ArrangementArg>,

    /// Collapse every node before applying the other flags
    #[arg(long = "collapse-all")]
    pub collapse_all: bool,

    /// Node ids to collapse
    #[arg(long = "collapse", value_name = "ID")]
    pub collapse: Vec<String>,

    /// Node ids whose arrangement is toggled
    #[arg(long = "toggle", value_name = "ID")]
    pub toggle: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ArrangementArg {
    Horizontal,
    Vertical,
}

impl From<ArrangementArg> for Arrangement {
    fn from(value: ArrangementArg) -> Self {
        match value {
            ArrangementArg::Horizontal => Arrangement::Horizontal,
            ArrangementArg::Vertical => Arrangement::Vertical,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let chart = build_chart(&args, &config, &input)?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&chart, &config.theme);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&chart, &config, &output)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &chart)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_chart(args: &Args, config: &Config, input: &str) -> Result<OrgChart> {
    let records = parse_records(input)?;
    let viewport = Viewport::new(config.render.width, config.render.height);
    let mut chart = OrgChart::new(&records, config.layout.clone(), viewport)?;

    if let Some(arrangement) = args.sub_arrangement {
        chart.set_arrangement_for_subtree(arrangement.into());
    }
    if args.collapse_all {
        chart.collapse_all();
    }
    for id in &args.collapse {
        if !chart.set_collapsed(id, true) {
            return Err(anyhow::anyhow!("Unknown node id for --collapse: {}", id));
        }
    }
    for id in &args.toggle {
        if !chart.toggle_arrangement(id) {
            return Err(anyhow::anyhow!("Unknown node id for --toggle: {}", id));
        }
    }
    Ok(chart)
}

#[cfg(feature = "png")]
fn write_png(chart: &OrgChart, config: &Config, output: &Path) -> Result<()> {
    let svg = render_svg(chart, &config.theme);
    write_output_png(&svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_chart: &OrgChart, _config: &Config, _output: &Path) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
