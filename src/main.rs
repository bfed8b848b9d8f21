// ============================================================================
// main.rs — ArcadeKit
// Entry point. Initializes logging and dispatches the CLI subcommands.
// ============================================================================

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use winit::event_loop::EventLoop;

use arcade_kit::app::ProbeApp;
use arcade_kit::replay::{self, ReplayConfig};
use arcade_kit::{AssetCache, Bounds, KeyBindings, KeyStateTracker};

#[derive(Parser, Debug)]
#[command(name = "arcade-kit", about = "Keyboard state and asset tools for 2D games")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted input replay headlessly and report per-frame key state.
    Replay {
        /// JSON input script.
        script: PathBuf,

        /// Key bindings JSON file (defaults: arrows, Enter, Escape).
        #[arg(long)]
        bindings: Option<PathBuf>,

        /// Write frame records here (.json for JSON, otherwise CSV).
        #[arg(long)]
        report: Option<PathBuf>,

        /// Log progress every N frames (0 disables).
        #[arg(long, default_value_t = 1000)]
        progress: u32,
    },

    /// Open a window and log key press pulses live.
    Probe {
        /// Key bindings JSON file.
        #[arg(long)]
        bindings: Option<PathBuf>,
    },

    /// Scale an image asset to cover a bounding box.
    Scale {
        /// Asset name relative to --root.
        name: String,

        #[arg(long, default_value = "assets")]
        root: PathBuf,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Output image path; the format follows the extension.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let result = match args.command {
        Command::Replay {
            script,
            bindings,
            report,
            progress,
        } => replay::run_replay(&ReplayConfig {
            script_path: script,
            bindings_path: bindings,
            report_path: report,
            progress_interval: progress,
        })
        .map(|_| ()),
        Command::Probe { bindings } => run_probe(bindings),
        Command::Scale {
            name,
            root,
            width,
            height,
            out,
        } => run_scale(root, &name, Bounds::new(width, height), &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_probe(bindings_path: Option<PathBuf>) -> Result<(), String> {
    let bindings = match bindings_path {
        Some(path) => KeyBindings::load_from(path).map_err(|e| e.to_string())?,
        None => KeyBindings::default(),
    };
    let map = bindings.to_key_map().map_err(|e| e.to_string())?;
    let tracker = Arc::new(KeyStateTracker::new(map));

    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {}", e))?;
    let mut app = ProbeApp::new(tracker);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {}", e))?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_scale(root: PathBuf, name: &str, bounds: Bounds, out: &Path) -> Result<(), String> {
    let mut cache = AssetCache::new(root);
    let scaled = cache.get_scaled_image(name, bounds).map_err(|e| e.to_string())?;
    scaled
        .save(out)
        .map_err(|e| format!("Failed to save {:?}: {}", out, e))?;
    log::info!(
        "Scaled {} to {}x{} -> {:?}",
        name,
        scaled.width(),
        scaled.height(),
        out
    );
    Ok(())
}
