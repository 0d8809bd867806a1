//! ring_picker — interactive entry point.

use std::time::Duration;

use clap::Parser;
use hand_intent::IntentConfig;
use ring_picker::app::{run, AppConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ring_picker", about = "Pick a hexagram from the ring with your hand")]
struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = 1200)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Number of cards on the ring
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u16).range(1..=512))]
    items: u16,

    /// Pointer smoothing factor in (0, 1]; 1 disables smoothing
    #[arg(long, default_value_t = 0.25)]
    smoothing: f32,

    /// Seconds a card must be hovered before a pinch selects it
    #[arg(long, default_value_t = 0.1)]
    dwell: f32,

    /// Minimum gap between two open-palm triggers
    #[arg(long, default_value_t = 1000)]
    palm_cooldown_ms: u64,

    /// Pinch threshold as a fraction of hand size
    #[arg(long, default_value_t = 0.35)]
    pinch_ratio: f32,

    /// Do not mirror the hand horizontally
    #[arg(long)]
    no_mirror: bool,

    /// Log filter (overrides RUST_LOG), e.g. "debug" or "hand_intent=trace"
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        let mut intent = IntentConfig::default();
        intent.pointer.smoothing = self.smoothing;
        intent.pointer.mirror_x = !self.no_mirror;
        intent.gesture.pinch_ratio = self.pinch_ratio;
        intent.gesture.palm_cooldown = Duration::from_millis(self.palm_cooldown_ms);
        intent.interaction.dwell_threshold = self.dwell;
        AppConfig {
            width:  self.width,
            height: self.height,
            items:  self.items as usize,
            intent,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(f) => EnvFilter::new(f),
        None    => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Ring Picker — point, pinch, open your palm          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Simulated hand  (H=hand  P=pinch  O=palm  C=camera fail  Q=quit)");
    println!();

    let cfg = cli.app_config();
    if let Err(e) = cfg.intent.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
