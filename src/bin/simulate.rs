use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chips_rust_server::campaign::Campaign;
use chips_rust_server::constants::MOVE_TICK_MS;
use chips_rust_server::engine::GameEngineOptions;
use chips_rust_server::input::{KeyBindings, KeyTracker};
use chips_rust_server::level_pack::read_level_pack;
use chips_rust_server::render::{render_ascii, GlyphSheet};
use chips_rust_server::types::{Confirmation, Facing, RunningState, RuntimeEvent};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Level pack in the binary .dat format.
    #[arg(long, default_value = "data/chips.dat")]
    data: PathBuf,
    /// Zero-based index of the first level to play.
    #[arg(long, default_value_t = 0)]
    level: usize,
    /// Comma separated steps: `E*3` holds East for three move ticks,
    /// `.*2` waits, `!` confirms.
    #[arg(long, default_value = "")]
    script: String,
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,
    #[arg(long, default_value_t = 20_000)]
    max_frames: usize,
    /// Print the grid to stderr whenever a level ends.
    #[arg(long)]
    render: bool,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScriptStep {
    Hold(Facing, u32),
    Wait(u32),
    Confirm,
}

#[derive(Clone, Debug, Default, Serialize)]
struct EventCounts {
    chips: usize,
    items: usize,
    doors: usize,
    #[serde(rename = "blocksSunk")]
    blocks_sunk: usize,
    #[serde(rename = "monstersDrowned")]
    monsters_drowned: usize,
}

impl EventCounts {
    fn record(&mut self, event: &RuntimeEvent) {
        match event {
            RuntimeEvent::ChipCollected { .. } => self.chips += 1,
            RuntimeEvent::ItemCollected { .. } => self.items += 1,
            RuntimeEvent::DoorOpened { .. } | RuntimeEvent::ChipGateOpened { .. } => {
                self.doors += 1
            }
            RuntimeEvent::BlockSunk { .. } => self.blocks_sunk += 1,
            RuntimeEvent::MonsterDrowned { .. } => self.monsters_drowned += 1,
            _ => {}
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct LevelResultLine {
    #[serde(rename = "levelIndex")]
    level_index: usize,
    #[serde(rename = "levelNumber")]
    level_number: u16,
    title: String,
    outcome: RunningState,
    frames: usize,
    #[serde(rename = "timeLeftMs")]
    time_left_ms: u64,
    #[serde(rename = "chipsRemaining")]
    chips_remaining: u32,
    events: EventCounts,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    pack: String,
    #[serde(rename = "startLevel")]
    start_level: usize,
    #[serde(rename = "framesRun")]
    frames_run: usize,
    #[serde(rename = "finalLevelIndex")]
    final_level_index: usize,
    #[serde(rename = "finalState")]
    final_state: RunningState,
    finished: bool,
    results: Vec<LevelResultLine>,
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    if cli.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }
    let script = parse_script(&cli.script)?;
    let levels = read_level_pack(&cli.data)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    info!("loaded {} levels from {}", levels.len(), cli.data.display());

    let mut campaign = Campaign::new(levels, cli.level, GameEngineOptions::default())?;
    let summary = run_script(&mut campaign, &cli, &script);

    if let Some(path) = cli.summary_out.as_ref() {
        write_summary(path, &summary)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!("summary written to {}", path.display());
    }
    Ok(())
}

fn run_script(campaign: &mut Campaign, cli: &Cli, script: &[ScriptStep]) -> RunSummary {
    let sheet = GlyphSheet::default();
    let mut results = Vec::new();
    let mut counts = EventCounts::default();
    let mut level_frames = 0usize;
    let mut frames_run = 0usize;

    let bindings = KeyBindings::default();
    let mut tracker = KeyTracker::new(bindings.clone());

    for step in script {
        if campaign.is_finished() {
            break;
        }
        let (held_key, ticks) = match *step {
            ScriptStep::Hold(dir, ticks) => (key_for(&bindings, dir), ticks),
            ScriptStep::Wait(ticks) => (None, ticks),
            ScriptStep::Confirm => {
                if let Some(key) = bindings.confirm.first() {
                    tracker.key_down(key);
                    tracker.key_up(key);
                }
                if tracker.take_confirmation().is_some() {
                    match campaign.confirm() {
                        Some(Confirmation::Restarted) => info!("level restarted"),
                        Some(Confirmation::LevelCompleted) => info!("level confirmed"),
                        None => warn!("confirm ignored: level still in play"),
                    }
                }
                counts = EventCounts::default();
                level_frames = 0;
                continue;
            }
        };
        if let Some(key) = held_key {
            tracker.key_down(key);
        }

        for _ in 0..frames_for(ticks, cli.frame_ms) {
            if frames_run >= cli.max_frames {
                warn!("frame limit {} reached", cli.max_frames);
                return summarize(campaign, cli, frames_run, results);
            }
            let intent = tracker.poll_intent();
            let before = campaign.engine().running_state();
            campaign.advance_frame(cli.frame_ms, &intent);
            frames_run += 1;
            level_frames += 1;

            let snapshot = campaign.build_snapshot(true);
            for event in &snapshot.events {
                counts.record(event);
            }
            if !before.is_terminal() && snapshot.state.is_terminal() {
                let engine = campaign.engine();
                let line = LevelResultLine {
                    level_index: campaign.current_index(),
                    level_number: snapshot.level_number,
                    title: engine.level().title.clone(),
                    outcome: snapshot.state,
                    frames: level_frames,
                    time_left_ms: snapshot.time_left_ms,
                    chips_remaining: snapshot.chips_remaining,
                    events: counts.clone(),
                };
                emit_line(&line);
                if cli.render {
                    eprintln!("{}", render_ascii(engine.state(), &sheet));
                }
                results.push(line);
            }
        }
        if let Some(key) = held_key {
            tracker.key_up(key);
        }
    }

    summarize(campaign, cli, frames_run, results)
}

fn summarize(
    campaign: &Campaign,
    cli: &Cli,
    frames_run: usize,
    results: Vec<LevelResultLine>,
) -> RunSummary {
    let summary = RunSummary {
        pack: cli.data.to_string_lossy().to_string(),
        start_level: cli.level,
        frames_run,
        final_level_index: campaign.current_index(),
        final_state: campaign.engine().running_state(),
        finished: campaign.is_finished(),
        results,
    };
    emit_line(&serde_json::json!({
        "framesRun": summary.frames_run,
        "finalLevelIndex": summary.final_level_index,
        "finalState": summary.final_state,
        "finished": summary.finished,
    }));
    summary
}

fn emit_line<T: Serialize>(line: &T) {
    match serde_json::to_string(line) {
        Ok(text) => println!("{text}"),
        Err(error) => warn!("result line failed to serialize: {error}"),
    }
}

fn key_for(bindings: &KeyBindings, dir: Facing) -> Option<&str> {
    bindings
        .directions
        .iter()
        .find(|(_, bound)| *bound == dir)
        .map(|(key, _)| key.as_str())
}

/// Frames needed to cover `ticks` move ticks at the given frame length.
fn frames_for(ticks: u32, frame_ms: u64) -> u64 {
    (u64::from(ticks) * MOVE_TICK_MS).div_ceil(frame_ms)
}

fn parse_script(raw: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        if token == "!" {
            steps.push(ScriptStep::Confirm);
            continue;
        }
        let (head, count) = match token.split_once('*') {
            Some((head, count)) => {
                let count = count
                    .parse::<u32>()
                    .with_context(|| format!("bad repeat count in `{token}`"))?;
                (head, count)
            }
            None => (token, 1),
        };
        let step = match head.to_ascii_uppercase().as_str() {
            "N" => ScriptStep::Hold(Facing::North, count),
            "S" => ScriptStep::Hold(Facing::South, count),
            "E" => ScriptStep::Hold(Facing::East, count),
            "W" => ScriptStep::Hold(Facing::West, count),
            "." => ScriptStep::Wait(count),
            _ => bail!("unknown script step `{token}`"),
        };
        steps.push(step);
    }
    Ok(steps)
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
