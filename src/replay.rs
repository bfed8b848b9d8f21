// ============================================================================
// replay.rs — ArcadeKit
// Headless scripted input runner: feed recorded key events frame by frame and
// capture what the tracker reports, for regression checks and debugging.
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::config::KeyBindings;
use crate::input::KeyStateTracker;
use crate::keys::LogicalKey;

// ======================== Script ========================

/// One raw key transition in a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEvent {
    Down(KeyCode),
    Up(KeyCode),
}

/// Events delivered before one `advance_frame`, in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub frames: Vec<ScriptFrame>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid input script: {}", e))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script {:?}: {}", path, e))?;
        Self::from_json(&content).map_err(|e| format!("{} ({:?})", e, path))
    }
}

// ======================== Frame Records ========================

/// What the tracker reported after one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub pressed: Vec<LogicalKey>,
    pub just_pressed: Vec<LogicalKey>,
}

impl FrameRecord {
    pub fn csv_header() -> &'static str {
        "frame,pressed,just_pressed"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{}",
            self.frame,
            join_keys(&self.pressed),
            join_keys(&self.just_pressed)
        )
    }
}

fn join_keys(keys: &[LogicalKey]) -> String {
    keys.iter().map(|k| k.name()).collect::<Vec<_>>().join("|")
}

/// Drive `tracker` through `script`, one `advance_frame` per script frame.
pub fn run_script(
    tracker: &KeyStateTracker<KeyCode>,
    script: &InputScript,
    progress_interval: u32,
) -> Vec<FrameRecord> {
    let total = script.frames.len();
    let started = Instant::now();
    let mut records = Vec::with_capacity(total);

    for (i, script_frame) in script.frames.iter().enumerate() {
        for event in &script_frame.events {
            match event {
                ScriptEvent::Down(code) => tracker.on_key_down(code),
                ScriptEvent::Up(code) => tracker.on_key_up(code),
            };
        }

        let frame = tracker.advance_frame();
        let frame_no = i as u32 + 1;
        records.push(FrameRecord {
            frame: frame_no,
            pressed: frame.pressed_keys().collect(),
            just_pressed: frame.just_pressed_keys().collect(),
        });

        if progress_interval > 0 && frame_no % progress_interval == 0 {
            let elapsed = started.elapsed().as_secs_f64().max(1e-6);
            log::info!(
                "Replay progress: {}/{} | {:.0} frames/s",
                frame_no,
                total,
                frame_no as f64 / elapsed
            );
        }
    }

    records
}

// ======================== Export ========================

pub fn export_csv(records: &[FrameRecord], path: &Path) -> Result<(), String> {
    let mut file = fs::File::create(path)
        .map_err(|e| format!("Failed to create {:?}: {}", path, e))?;

    writeln!(file, "{}", FrameRecord::csv_header()).map_err(|e| format!("Write error: {}", e))?;
    for record in records {
        writeln!(file, "{}", record.to_csv_line()).map_err(|e| format!("Write error: {}", e))?;
    }

    log::info!("Exported {} frame records to {:?}", records.len(), path);
    Ok(())
}

pub fn export_json(records: &[FrameRecord], path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| format!("Failed to serialize frame records: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
    log::info!("Exported {} frame records to {:?}", records.len(), path);
    Ok(())
}

// ======================== Runner ========================

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    pub script_path: PathBuf,
    pub bindings_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub progress_interval: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("script.json"),
            bindings_path: None,
            report_path: None,
            progress_interval: 1000,
        }
    }
}

pub fn run_replay(config: &ReplayConfig) -> Result<Vec<FrameRecord>, String> {
    let bindings = match &config.bindings_path {
        Some(path) => KeyBindings::load_from(path).map_err(|e| e.to_string())?,
        None => KeyBindings::default(),
    };
    let map = bindings.to_key_map().map_err(|e| e.to_string())?;
    let tracker = KeyStateTracker::new(map);

    let script = InputScript::load(&config.script_path)?;
    log::info!(
        "Replay started: {} frames from {:?}",
        script.frames.len(),
        config.script_path
    );

    let records = run_script(&tracker, &script, config.progress_interval);

    if let Some(path) = &config.report_path {
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json {
            export_json(&records, path)?;
        } else {
            export_csv(&records, path)?;
        }
    }

    let pulses: usize = records.iter().map(|r| r.just_pressed.len()).sum();
    log::info!("Replay finished: {} frames, {} press pulses", records.len(), pulses);
    Ok(records)
}
