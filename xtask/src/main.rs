use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the museum workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, smoke
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the headless CLI through a long simulation and a layout dump
    Smoke {
        /// Frames to simulate
        #[arg(long, default_value = "1000")]
        frames: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            doc()?;
            smoke(1000)?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Doc => doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Smoke { frames } => smoke(frames)?,
    }

    Ok(())
}

/// Run `cargo <args>` and fail with `label` if it exits non-zero.
fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {label} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn smoke(frames: u64) -> Result<()> {
    let frames = frames.to_string();
    cargo(
        "simulate",
        &["run", "-q", "-p", "museum-cli", "--", "simulate", "--frames", &frames],
    )?;
    cargo(
        "walk",
        &["run", "-q", "-p", "museum-cli", "--", "walk", "--keys", "87,87,65,68,83"],
    )?;
    cargo("layout", &["run", "-q", "-p", "museum-cli", "--", "layout"])
}
