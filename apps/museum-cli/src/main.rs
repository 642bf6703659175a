use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use museum_input::{NavigationController, PointerLockControls};
use museum_kernel::{Camera, FixedFrames, FrameDriver, FrameHost, Museum};
use museum_render::{DebugTextRenderer, RenderView, Renderer};
use museum_tools::{AppConfig, MuseumInspector};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "museum-cli", about = "Headless museum runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Animate a number of frames and print the last one
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "100")]
        frames: u64,
        /// Camera height for the run
        #[arg(long)]
        height: Option<f32>,
    },
    /// Apply key codes to the camera, then animate
    Walk {
        /// Comma-separated key codes, e.g. 87,87,65
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<u32>,
        /// Frames to run after the keys
        #[arg(short, long, default_value = "0")]
        frames: u64,
    },
    /// Print the museum layout as JSON
    Layout,
}

/// Frame host that renders to text and keeps the last frame.
struct TextHost {
    pointer: PointerLockControls,
    renderer: DebugTextRenderer,
    last_frame: String,
}

impl FrameHost for TextHost {
    fn update_controls(&mut self, camera: &mut Camera) {
        self.pointer.update(camera);
    }

    fn render(&mut self, museum: &Museum) {
        let view = RenderView::from_camera(&museum.camera);
        self.last_frame = self.renderer.render(museum, &view);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;

    match cli.command {
        Commands::Info => {
            let museum = Museum::new(&config.museum);
            println!("museum-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "kernel: frame={} nodes={}",
                museum.frame(),
                museum.scene().len()
            );
            println!("render: {}", museum_render::crate_info());
            println!("input: {}", museum_input::crate_info());
            println!("assets: {}", museum_assets::crate_info());
            println!("tools: {}", museum_tools::crate_info());
        }
        Commands::Simulate { frames, height } => {
            let mut museum = Museum::new(&config.museum);
            if let Some(height) = height {
                museum.camera.position.y = height;
            }
            let mut host = TextHost {
                pointer: PointerLockControls::new(config.input.pointer),
                renderer: DebugTextRenderer::new(),
                last_frame: String::new(),
            };
            let mut driver = FrameDriver::new();
            let ran = driver.run(&mut museum, &mut host, &mut FixedFrames::new(frames));
            tracing::info!(frames = ran, "simulation finished");
            print!("{}", host.last_frame);
        }
        Commands::Walk { keys, frames } => {
            let mut museum = Museum::new(&config.museum);
            let navigation = NavigationController::new(config.input.navigation);
            for code in &keys {
                navigation.handle_key(*code, &mut museum.camera);
            }
            let mut host = TextHost {
                pointer: PointerLockControls::new(config.input.pointer),
                renderer: DebugTextRenderer::new(),
                last_frame: String::new(),
            };
            FrameDriver::new().run(&mut museum, &mut host, &mut FixedFrames::new(frames));
            print!("{}", MuseumInspector::summary(&museum));
        }
        Commands::Layout => {
            let json = serde_json::to_string_pretty(&config.museum.layout)?;
            println!("{json}");
        }
    }

    Ok(())
}
