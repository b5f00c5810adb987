// src/main.rs

use anyhow::{bail, Context};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_modules::config::EditorConfig;
use studio_modules::decoder::decode_file;
use studio_modules::session::TrimManifest;
use studio_modules::trim_controller::TrimController;

const USAGE: &str = "usage: waveview <audio-file> [--config <path>] [--bins <n>] [--min-gap <secs>] \
[--manifest <path>] [--track-id <id>] [--export <path>]";

struct Args {
    audio: PathBuf,
    config: Option<PathBuf>,
    bins: Option<usize>,
    min_gap: Option<f64>,
    manifest: PathBuf,
    track_id: Option<String>,
    export: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut it = std::env::args().skip(1);
    let mut audio = None;
    let mut args = Args {
        audio: PathBuf::new(),
        config: None,
        bins: None,
        min_gap: None,
        manifest: PathBuf::from("trims.json"),
        track_id: None,
        export: None,
    };

    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .with_context(|| format!("{flag} needs a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?.into()),
            "--bins" => {
                let bins = value("--bins")?;
                args.bins = Some(bins.parse().context("--bins must be an integer")?);
            }
            "--min-gap" => {
                let gap = value("--min-gap")?;
                args.min_gap = Some(gap.parse().context("--min-gap must be a number")?);
            }
            "--manifest" => args.manifest = value("--manifest")?.into(),
            "--track-id" => args.track_id = Some(value("--track-id")?),
            "--export" => args.export = Some(value("--export")?.into()),
            "-h" | "--help" => bail!(USAGE),
            other if other.starts_with("--") => bail!("unknown flag {other}\n{USAGE}"),
            other => audio = Some(PathBuf::from(other)),
        }
    }

    args.audio = audio.context(USAGE)?;
    Ok(args)
}

fn main() -> Result<(), anyhow::Error> {
    // Logs go to stderr so they stay out of the redraw area.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_modules=info,waveview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => EditorConfig::load_from_disk(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if let Some(bins) = args.bins {
        config.bin_count = bins;
    }
    if let Some(gap) = args.min_gap {
        config.min_gap = gap;
    }
    config.validate()?;

    tracing::info!(path = %args.audio.display(), "decoding");
    let audio = decode_file(&args.audio)
        .with_context(|| format!("decoding {}", args.audio.display()))?;

    let track_id = args.track_id.clone().unwrap_or_else(|| {
        args.audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.audio.display().to_string())
    });
    let manifest = TrimManifest::load_or_default(&args.manifest)?;

    let mut ui = TrimController::new(
        track_id,
        audio,
        config,
        manifest,
        args.manifest.clone(),
        args.export.clone(),
    )?;

    enable_raw_mode()?;
    let result = run_loop(&mut ui);
    disable_raw_mode()?;
    println!();
    result
}

fn run_loop(ui: &mut TrimController) -> anyhow::Result<()> {
    let frame = Duration::from_millis(50);
    ui.run_tick()?;

    loop {
        if event::poll(frame)? {
            if let Event::Key(ev) = event::read()? {
                if ev.kind != KeyEventKind::Press {
                    continue;
                }
                if ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL) {
                    break;
                }
                if ui.should_quit(ev.code) {
                    break;
                }
                ui.handle_key(ev.code);
            }
        }
        ui.run_tick()?;
    }
    Ok(())
}
