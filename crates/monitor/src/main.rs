//! Drowsiness Monitor - Main Entry Point

use std::path::PathBuf;

use alerting::{open_player, AlertManager};
use anyhow::Context;
use clap::Parser;
use dms::DmsModule;
use monitor::{
    init_logging, CanvasRenderer, LandmarkTrace, Monitor, MonitorConfig, SystemClock,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "drowsiness-monitor", version, about = "Eye-closure drowsiness monitor")]
struct Args {
    /// Landmark trace to replay (JSON lines, one frame per line)
    #[arg(long, value_name = "FILE")]
    trace: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, short, value_name = "FILE", env = "DROWSY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = MonitorConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(&config.log);

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "EAR threshold {}, alert after {} closed frames",
        config.dms.ear_threshold, config.dms.sustained_frames
    );

    let player = open_player(&config.alert).context("opening alert sound")?;
    let trace = LandmarkTrace::load(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let (source, locator, predictor) =
        trace.into_replay(config.frame_width, config.frame_height())?;

    let dms = DmsModule::new(
        config.dms.clone(),
        Box::new(locator),
        Box::new(predictor),
        AlertManager::new(player),
    )?;
    let renderer = CanvasRenderer::new(config.window_title.as_str());

    let quit = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let summary = Monitor::new(source, dms, renderer, SystemClock, &config)
        .run(quit)
        .await;

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
