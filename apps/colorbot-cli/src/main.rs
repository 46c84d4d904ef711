use anyhow::Context;
use clap::{Parser, Subcommand};
use colorbot_render::{DebugTextRenderer, Renderer};
use colorbot_scene::{
    AnimationState, DemoConfig, PART_COUNT, color_cube, compose, world_transform,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colorbot-cli", about = "Headless tool for the color robot demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with animation and camera settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, mesh and configuration info
    Info,
    /// Run the swing animation without a window
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Wall time covered by each tick, in milliseconds
        #[arg(long, default_value = "20")]
        tick_ms: u64,
        /// Only print ticks where the swing phase changes
        #[arg(long)]
        flips_only: bool,
    },
    /// Print the composed part transforms after some ticks
    Scene {
        /// Number of ticks to simulate before composing
        #[arg(short, long, default_value = "0")]
        ticks: u64,
        /// Turn the whole robot about its vertical axis
        #[arg(long)]
        spin: bool,
        /// Framebuffer width used for the projection
        #[arg(long, default_value = "512")]
        width: u32,
        /// Framebuffer height used for the projection
        #[arg(long, default_value = "512")]
        height: u32,
        /// Also print each part's PVM matrix
        #[arg(long)]
        pvm: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DemoConfig::default(),
    };
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Info => {
            let mesh = color_cube();
            println!("colorbot-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", colorbot_render::crate_info());
            println!(
                "mesh: {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangles().count()
            );
            println!("parts: {PART_COUNT}");
            println!("config: {}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Simulate {
            ticks,
            tick_ms,
            flips_only,
        } => {
            let elapsed = Duration::from_millis(tick_ms);
            tracing::info!(ticks, tick_ms, "simulating swing animation");
            let mut state = AnimationState::new(&config.animation);
            println!(
                "tick {:>5}  swing={:+.4}  phase={:?}  rotation={:.4}",
                0, state.swing_angle, state.phase, state.body_rotation
            );
            for tick in 1..=ticks {
                let prev = state.phase;
                state.tick(elapsed, &config.animation);
                if !flips_only || prev != state.phase {
                    println!(
                        "tick {:>5}  swing={:+.4}  phase={:?}  rotation={:.4}",
                        tick, state.swing_angle, state.phase, state.body_rotation
                    );
                }
            }
        }
        Commands::Scene {
            ticks,
            spin,
            width,
            height,
            pvm,
        } => {
            let mut state = AnimationState::new(&config.animation);
            for _ in 0..ticks {
                state.tick(config.animation.tick_interval(), &config.animation);
            }
            tracing::info!(ticks, spin, width, height, "composing scene");
            let mut camera = config.camera;
            camera.resize(width, height);

            let draws = compose(&state, &camera, world_transform(&state, spin));
            let renderer = if pvm {
                DebugTextRenderer::new().with_pvm()
            } else {
                DebugTextRenderer::new()
            };
            print!("{}", renderer.render(&draws, &state));
        }
    }

    Ok(())
}
