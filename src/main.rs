use clap::Parser;
use glyph_light::app::{run_gui, run_headless};
use glyph_light::io::config::Config;
use log::{error, info};
use std::process::ExitCode;

/// Text meshes lit by a light cube you can move around.
#[derive(Parser, Debug)]
#[command(name = "glyph-light", version, about)]
struct Cli {
    /// Scene configuration (TOML). Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Render without a window and save the last frame.
    #[arg(long)]
    headless: bool,

    /// Number of frames to render in headless mode.
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Output image path for headless mode.
    #[arg(short, long, value_name = "PNG")]
    output: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("minifb", log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from '{}'", path);
            match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load config '{}': {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!("No config given, using defaults");
            Config::default()
        }
    };
    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }
    if let Some(output) = cli.output {
        config.render.output = output;
    }

    let result = if cli.headless {
        run_headless(&config)
    } else {
        run_gui(&config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
