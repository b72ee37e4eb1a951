//! Demo binary: speak a phrase through the silent synthesizer and print one
//! JSON snapshot per frame on stdout.
//!
//! Tracing goes to stderr so stdout stays a clean JSON-lines stream.

use clap::Parser;
use mouthsync::session::{LipSyncController, SessionEvent, spawn_frame_loop};
use mouthsync::timing::{SystemTime, TimeSource};
use mouthsync::tts::SilentSynthesizer;
use mouthsync::LipSyncConfig;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Animate a mouth for a phrase and dump per-frame state as JSON lines.
#[derive(Parser)]
#[command(name = "mouthsync-demo", version, about)]
struct Cli {
    /// Phrase to speak.
    #[arg(required = true)]
    text: Vec<String>,

    /// Path to TOML configuration file (defaults to the user config path).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Playback-rate multiplier (overrides config).
    #[arg(short, long)]
    rate: Option<f64>,

    /// Simulated synthesis latency in milliseconds.
    #[arg(long, default_value_t = 300)]
    latency_ms: u64,

    /// Number of looped replays after the first utterance.
    #[arg(long, default_value_t = 0)]
    repeat: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mouthsync=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = LipSyncConfig::load_or_default(cli.config.as_deref())?;
    if let Some(rate) = cli.rate {
        config.session.playback_rate = rate;
    }
    let frame_interval = config.session.frame_interval();
    let text = cli.text.join(" ");

    let time: Arc<dyn TimeSource> = Arc::new(SystemTime::new());
    let synth = SilentSynthesizer::new(Arc::clone(&time), config.clock.words_per_minute)
        .with_latency(Duration::from_millis(cli.latency_ms));
    let controller = Arc::new(Mutex::new(LipSyncController::new(
        config,
        Arc::new(synth),
        time,
    )));

    let mut events = {
        let mut ctl = lock(&controller)?;
        let events = ctl.subscribe();
        ctl.set_looping(cli.repeat > 0);
        ctl.play(&text);
        events
    };

    let cancel = CancellationToken::new();
    let frames = spawn_frame_loop(Arc::clone(&controller), frame_interval, cancel.clone());

    let mut ticker = tokio::time::interval(frame_interval);
    let mut completions = 0u32;
    let stdout = std::io::stdout();
    'run: loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                lock(&controller)?.stop();
                break 'run;
            }
            _ = ticker.tick() => {
                let snapshot = lock(&controller)?.snapshot();
                let mut out = stdout.lock();
                writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;

                loop {
                    match events.try_recv() {
                        Ok(SessionEvent::Completed { session, .. }) => {
                            completions += 1;
                            info!(session, completions, "utterance finished");
                            if completions > cli.repeat {
                                lock(&controller)?.set_looping(false);
                            }
                        }
                        Ok(event) => info!(?event, "session event"),
                        Err(TryRecvError::Lagged(skipped)) => {
                            info!(skipped, "event receiver lagged");
                        }
                        Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                    }
                }

                if completions > cli.repeat && !lock(&controller)?.needs_frames() {
                    break 'run;
                }
            }
        }
    }

    cancel.cancel();
    frames.await?;
    Ok(())
}

fn lock(
    controller: &Mutex<LipSyncController>,
) -> anyhow::Result<std::sync::MutexGuard<'_, LipSyncController>> {
    controller
        .lock()
        .map_err(|_| anyhow::anyhow!("controller lock poisoned"))
}
