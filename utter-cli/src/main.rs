use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use utter_core::speech::tts::gemini::{GeminiConfig, GeminiTts};
use utter_core::SettingsManager;

mod oneshot;
mod tui;

use crate::tui::TuiApp;

#[derive(Parser, Debug)]
#[command(name = "utter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Utter - terminal text-to-speech studio")]
struct Args {
    /// Load settings from a specific profile
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// One-shot mode: synthesize this text to a WAV file and exit
    #[arg(long)]
    text: Option<String>,

    /// Voice to use in one-shot mode (Kore, Puck, Charon, Fenrir, Zephyr)
    #[arg(long)]
    voice: Option<String>,

    /// Speaking rate percentage (50-200)
    #[arg(long)]
    rate: Option<u16>,

    /// Pitch offset percentage (-20..=20)
    #[arg(long, allow_hyphen_values = true)]
    pitch: Option<i16>,

    /// Output path for one-shot mode (defaults to <voice>-<timestamp>.wav)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_tracing()?;

    // cpal streams are !Send, so the whole app runs on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "startup: profile={:?}, oneshot={}",
        args.profile,
        args.text.is_some()
    );

    let settings_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("failed to get home directory"))?
        .join(".utter");
    let settings_manager =
        SettingsManager::from_settings_dir(settings_dir, args.profile.as_deref())?;
    let settings = settings_manager.settings();

    let api_key = settings.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "no API key configured; set GEMINI_API_KEY or api_key in {:?}",
            settings_manager.path()
        )
    })?;

    let tts = GeminiTts::new(GeminiConfig {
        api_key,
        model: settings.model.clone(),
    })?;

    if let Some(text) = args.text {
        let request = oneshot::Request {
            text,
            voice: args.voice,
            rate: args.rate,
            pitch: args.pitch,
            output: args.output,
        };
        let path = oneshot::run(&tts, &settings, request).await?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut app = TuiApp::new(settings, tts)?;
    app.run().await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // The TUI owns the terminal, so logs go to a file.
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".utter").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("utter.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("tracing initialized to {:?}", log_file);
    Ok(())
}
