//! Command-line interface for the envdraw utility
//!
//! Replays trace scripts into environment diagrams and prints them as a text
//! preview or a JSON snapshot.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

use envdraw::core::logging::init_logging;
use envdraw::core::{CharacterSet, LayoutConfig, Point, Renderer};
use envdraw::layout::PathRouter;
use envdraw::render::{AsciiRenderer, JsonRenderer};
use envdraw::trace::{TraceParser, Tracker};
use envdraw::Scene;

/// Envdraw - environment diagrams from program traces
#[derive(Parser)]
#[command(name = "envdraw")]
#[command(about = "Replay program traces as environment diagrams with routed arrows")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Layout options shared by commands that build a diagram
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// JSON file with layout settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for node placement (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Canvas width in units
    #[arg(long)]
    pub width: Option<i32>,

    /// Canvas height in units
    #[arg(long)]
    pub height: Option<i32>,

    /// Cap on router expansions per connector
    #[arg(long)]
    pub max_expansions: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a trace script and draw the resulting diagram
    Render {
        /// Input trace script (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Character set for the text preview
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Parse and replay a trace script without drawing it
    Check {
        /// Input trace script (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Route between two points on an empty canvas and print the polyline
    Route {
        /// Start point as X,Y
        #[arg(long, value_parser = parse_point)]
        from: Point,

        /// Goal point as X,Y
        #[arg(long, value_parser = parse_point)]
        to: Point,

        /// Print the route as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// Output formats for the render command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Box-drawing text preview
    #[default]
    Text,
    /// Serialized snapshot of nodes and connectors
    Json,
}

/// Parse `X,Y` into a point
pub fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok(Point::new(x, y))
}

/// Main CLI application
#[derive(Default)]
pub struct EnvdrawApp;

impl EnvdrawApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("ENVDRAW_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("ENVDRAW_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Envdraw v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                style,
                format,
                layout,
            } => self.render_command(input, output, style, format, &layout, cli.verbose),
            Commands::Check { input } => self.check_command(input, cli.verbose),
            Commands::Route {
                from,
                to,
                json,
                layout,
            } => self.route_command(from, to, json, &layout),
        }
    }

    /// Build the layout configuration from a config file and flag overrides
    pub fn build_config(&self, layout: &LayoutArgs) -> Result<LayoutConfig> {
        let mut config = match &layout.config {
            Some(path) => LayoutConfig::from_json_file(path)
                .map_err(|e| anyhow!("Failed to load config '{}': {}", path.display(), e))?,
            None => LayoutConfig::default(),
        };
        if let Some(seed) = layout.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = layout.width {
            config.canvas_width = width;
        }
        if let Some(height) = layout.height {
            config.canvas_height = height;
        }
        if let Some(max) = layout.max_expansions {
            config.router.max_expansions = Some(max);
        }
        Ok(config)
    }

    /// Handle the render command
    fn render_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        style: StyleChoice,
        format: OutputFormat,
        layout: &LayoutArgs,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let config = self.build_config(layout)?;
        let diagram = envdraw::replay(&content, config)?;
        let rendered = match format {
            OutputFormat::Text => AsciiRenderer::with_style(style.into()).render(&diagram)?,
            OutputFormat::Json => JsonRenderer::new().render(&diagram)?,
        };

        if verbose {
            eprintln!(
                "Drew {} nodes and {} connectors",
                diagram.nodes().count(),
                diagram.connectors().count()
            );
        }
        self.write_output(output, &rendered)
    }

    /// Handle the check command
    fn check_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let steps = match TraceParser::new().parse(&content) {
            Ok(steps) => steps,
            Err(e) => {
                println!("✗ Invalid trace: {}", e);
                return Err(e.into());
            }
        };
        let mut tracker = Tracker::new(LayoutConfig::seeded(0))?;
        if let Err(e) = tracker.replay(&steps) {
            println!("✗ Trace does not replay: {}", e);
            return Err(e.into());
        }
        println!("✓ Valid trace: {} events", steps.len());
        Ok(())
    }

    /// Handle the route command
    fn route_command(&self, from: Point, to: Point, json: bool, layout: &LayoutArgs) -> Result<()> {
        let config = self.build_config(layout)?;
        let router = PathRouter::new(config.router.clone(), config.canvas_bounds());
        let route = router.route(from, to, &Scene::new())?;
        info!(quality = ?route.quality, expansions = route.expansions, "route computed");

        if json {
            println!("{}", serde_json::to_string_pretty(&route)?);
        } else {
            let points: Vec<String> = route.simplified().iter().map(|p| p.to_string()).collect();
            println!("{}", points.join(" -> "));
        }
        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    let mut content = String::new();
                    io::stdin().read_to_string(&mut content)?;
                    Ok(content)
                } else {
                    fs::read_to_string(&path).map_err(|e| {
                        anyhow!("Failed to read input file '{}': {}", path.display(), e)
                    })
                }
            }
            None => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    print!("{}", stdout_content);
                    io::stdout().flush()?;
                } else {
                    fs::write(&path, content).map_err(|e| {
                        anyhow!("Failed to write output file '{}': {}", path.display(), e)
                    })?;
                }
            }
            None => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}
