//! planvis: viewer for motion-planner dumps and replayer for recorded requests.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use bevy::app::AppExit;
use clap::{Args, Parser, Subcommand};
use plan_explorer::config;
use plan_explorer::prelude::*;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "planvis", about = "Debug tools for the motion planner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show EST dumps with their k-d trees and mesh objects
    Est {
        #[command(flatten)]
        input: EstInput,
        #[command(flatten)]
        visual: VisualArgs,
        #[command(flatten)]
        viewer: ViewerArgs,
    },
    /// Show a world tree, optionally with an EST on top
    Wtree {
        #[command(flatten)]
        input: WorldTreeInput,
        #[command(flatten)]
        visual: VisualArgs,
        #[command(flatten)]
        viewer: ViewerArgs,
    },
    /// Replay recorded requests against the planner service
    Replay {
        /// Fixture directory (defaults to PLANVIS_REQUESTS_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Planner address (defaults to PLANVIS_HOST)
        #[arg(long)]
        host: Option<Url>,
        /// Pause between requests, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
    /// Print what the viewer would draw, without opening a window
    Inspect {
        #[command(flatten)]
        input: EstInput,
        /// World tree dump to summarise instead of an EST session
        #[arg(long)]
        tree: Option<PathBuf>,
        #[command(flatten)]
        visual: VisualArgs,
    },
}

#[derive(Args)]
struct EstInput {
    /// EST dump files; when empty, the newest session in the dump directory
    files: Vec<PathBuf>,
    /// Dump directory (defaults to PLANVIS_DUMP_DIR)
    #[arg(short, long)]
    dir: Option<PathBuf>,
    /// Session id to load instead of the newest
    #[arg(short, long)]
    session: Option<u64>,
}

impl EstInput {
    fn source(self) -> SceneSource {
        if self.files.is_empty() {
            SceneSource::Session {
                dir: self.dir.unwrap_or_else(config::dump_dir),
                session: self.session,
            }
        } else {
            SceneSource::EstFiles(self.files)
        }
    }
}

#[derive(Args)]
struct WorldTreeInput {
    /// World tree dump (defaults to world_tree.json in the dump directory)
    #[arg(long)]
    tree: Option<PathBuf>,
    /// EST dump drawn on top of the world tree
    #[arg(long)]
    est: Option<PathBuf>,
    /// Draw the EST as plain green edges instead of the full EST rendering
    #[arg(long)]
    plain: bool,
}

impl WorldTreeInput {
    fn source(self) -> SceneSource {
        SceneSource::WorldTree {
            tree: self
                .tree
                .unwrap_or_else(|| config::dump_dir().join("world_tree.json")),
            est: self.est,
            overlay: if self.plain {
                WorldTreeOverlay::Plain
            } else {
                WorldTreeOverlay::Full
            },
        }
    }
}

/// Overrides for the environment's visual toggles.
#[derive(Args)]
struct VisualArgs {
    /// Do not draw edges to leaf nodes
    #[arg(long)]
    hide_leaves: bool,
    /// Do not draw mesh objects
    #[arg(long)]
    hide_objects: bool,
    /// Colour nodes by rotation distance to the root
    #[arg(long)]
    rotation: bool,
    /// Number of k-d leaves to highlight
    #[arg(long)]
    highlight: Option<usize>,
    /// Draw only the highlighted k-d leaves
    #[arg(long)]
    exclusive: bool,
    /// Draw the samples stored in k-d leaves
    #[arg(long)]
    kd_samples: bool,
    /// Deepest k-d level drawn
    #[arg(long)]
    max_kd_depth: Option<usize>,
    /// Draw the world tree's own k-d index
    #[arg(long)]
    world_kd_tree: bool,
    /// Mirror the X axis
    #[arg(long)]
    mirror_x: bool,
}

impl VisualArgs {
    fn apply(&self, mut settings: VisualSettings) -> VisualSettings {
        if self.hide_leaves {
            settings.visualize_leaves = false;
        }
        if self.hide_objects {
            settings.visualize_objects = false;
        }
        if self.rotation {
            settings.visualize_rotation = true;
        }
        if let Some(highlight) = self.highlight {
            settings.highlight_kd_nodes = highlight;
        }
        if self.exclusive {
            settings.exclusive_highlight_kd_nodes = true;
        }
        if self.kd_samples {
            settings.visualize_kd_nodes = true;
        }
        if let Some(depth) = self.max_kd_depth {
            settings.maximum_kd_depth = depth;
        }
        if self.world_kd_tree {
            settings.visualize_world_kd_tree = true;
        }
        if self.mirror_x {
            settings.mirror_x = true;
        }
        settings
    }
}

#[derive(Args)]
struct ViewerArgs {
    /// File written when Space is pressed
    #[arg(long, default_value = "graph.png")]
    screenshot: PathBuf,
    /// Capture a screenshot after this many frames and exit
    #[arg(long)]
    auto_screenshot: Option<u32>,
    /// Hide the statistics overlay
    #[arg(long)]
    no_hud: bool,
}

/// Log filter for both the plain subscriber and the viewer's bevy logger.
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug,wgpu=error,naga=warn"
    } else {
        "info,wgpu=error,naga=warn"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(verbose)))
        .init();
}

fn run_viewer(
    title: &str,
    source: SceneSource,
    settings: VisualSettings,
    viewer: ViewerArgs,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut builder = PlanExplorerBuilder::new()
        .window_title(title)
        .log_filter(log_filter(verbose))
        .source(source)
        .settings(settings)
        .screenshot_path(viewer.screenshot);
    if let Some(frames) = viewer.auto_screenshot {
        builder = builder.auto_screenshot(frames);
    }
    if viewer.no_hud {
        builder = builder.disable_hud();
    }
    match builder.build().run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("viewer exited with code {code}"),
    }
}

fn replay(dir: Option<PathBuf>, host: Option<Url>, delay_ms: u64) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(config::requests_dir);
    let host = host.unwrap_or_else(config::host);
    let plan = ReplayPlan::from_dir(&dir)
        .with_context(|| format!("cannot build a replay plan from {}", dir.display()))?;
    if plan.is_empty() {
        tracing::warn!("no fixtures in {}", dir.display());
    }

    let replayer = Replayer::new(host)?.with_delay(Duration::from_millis(delay_ms));
    let report = replayer
        .run_blocking(&plan, |response| println!("{}", response.body))
        .with_context(|| format!("replay against {} aborted", replayer.host()))?;
    if report.failed > 0 {
        tracing::warn!("{} of {} requests failed", report.failed, report.sent);
    }
    Ok(())
}

/// `inspect --tree` overlays at most one EST file on the world tree.
fn inspect_source(input: EstInput, tree: Option<PathBuf>) -> anyhow::Result<SceneSource> {
    let Some(tree) = tree else {
        return Ok(input.source());
    };
    if input.files.len() > 1 {
        bail!(
            "--tree takes at most one EST file to overlay, got {}",
            input.files.len()
        );
    }
    Ok(SceneSource::WorldTree {
        tree,
        est: input.files.into_iter().next(),
        overlay: WorldTreeOverlay::Full,
    })
}

fn inspect(source: SceneSource, settings: &VisualSettings) -> anyhow::Result<()> {
    let scene = source
        .load(settings)
        .with_context(|| format!("cannot load {source:?}"))?;
    let counts = scene.counts();
    println!("{}", scene.label);
    for summary in &scene.summaries {
        println!("  {summary}");
    }
    println!(
        "  {} primitives: {} points, {} lines, {} boxes, {} meshes",
        counts.total(),
        counts.points,
        counts.lines,
        counts.boxes,
        counts.meshes
    );
    if let Some((min, max)) = scene.bounds() {
        println!("  bounds {min} .. {max}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::load_env();

    match cli.command {
        Commands::Est {
            input,
            visual,
            viewer,
        } => {
            let settings = visual.apply(config::visual_settings());
            run_viewer("planvis: EST", input.source(), settings, viewer, cli.verbose)
        }
        Commands::Wtree {
            input,
            visual,
            viewer,
        } => {
            let settings = visual.apply(config::visual_settings());
            run_viewer(
                "planvis: world tree",
                input.source(),
                settings,
                viewer,
                cli.verbose,
            )
        }
        Commands::Replay {
            dir,
            host,
            delay_ms,
        } => {
            init_tracing(cli.verbose);
            replay(dir, host, delay_ms)
        }
        Commands::Inspect {
            input,
            tree,
            visual,
        } => {
            init_tracing(cli.verbose);
            let settings = visual.apply(config::visual_settings());
            let source = inspect_source(input, tree)?;
            inspect(source, &settings)
        }
    }
}
