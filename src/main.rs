use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skyhop::airborne::AirborneKind;
use skyhop::app::{SimApp, SimSettings};
use skyhop::config::Tuning;

#[derive(Parser)]
#[command(name = "skyhop", about = "Headless platformer movement demo")]
struct Args {
    /// Tuning file (TOML). Missing sections keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Length of the run in seconds
    #[arg(long, default_value_t = 9.0)]
    seconds: f32,

    /// Nominal frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Frame time wobble, as a fraction of the nominal frame time
    #[arg(long, default_value_t = 0.3)]
    jitter: f32,

    /// Airborne action selected at start
    #[arg(long, value_enum)]
    airborne: Option<AirborneKind>,

    /// Print the effective tuning as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut tuning = match &args.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(kind) = args.airborne {
        tuning.airborne.action = kind;
    }

    if args.dump_config {
        print!("{}", tuning.to_toml()?);
        return Ok(());
    }

    let settings = SimSettings {
        seconds: args.seconds,
        fps: args.fps,
        jitter: args.jitter,
    };
    let mut app = SimApp::new(tuning, settings)?;
    let summary = app.run();

    for (label, frames) in &summary.label_frames {
        println!("{label:>12}: {frames} frames");
    }
    let path: Vec<&str> = summary.visited.iter().map(|s| s.label()).collect();
    println!("{}", path.join(" -> "));

    Ok(())
}
