use std::path::PathBuf;

use clap::Parser;
use gpu::surface::Viewport;
use tools::{RunOptions, SceneKind, run};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a triangle scene headless and print its GL call trace")]
struct Args {
    #[arg(value_enum)]
    scene: SceneKind,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Animation frames to run (ignored by the static triangle)
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Raw value of the xAngle slider; omit to leave it off the page
    #[arg(long, allow_hyphen_values = true)]
    x_angle: Option<String>,

    /// Raw value of the yAngle slider; omit to leave it off the page
    #[arg(long, allow_hyphen_values = true)]
    y_angle: Option<String>,

    /// Behave like a browser without WebGL
    #[arg(long)]
    no_webgl: bool,

    /// JSON scene config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let options = RunOptions {
        scene: args.scene,
        viewport: Viewport::new(args.width, args.height),
        frames: args.frames,
        fps: args.fps,
        x_angle: args.x_angle,
        y_angle: args.y_angle,
        webgl: !args.no_webgl,
        config: args.config,
    };
    let report = run(&options)?;
    let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}
