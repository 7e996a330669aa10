//! Tawy CLI
//!
//! Check, render and simulate hero carousel configurations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod page;

use page::HostPage;

#[derive(Parser)]
#[command(name = "tawy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tawy blog hero carousel tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a carousel configuration
    Check {
        /// Configuration file
        #[arg(default_value = config::CONFIG_FILE)]
        path: PathBuf,
    },

    /// Render the carousel markup
    Render {
        /// Configuration file (the sample configuration when omitted)
        path: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run auto-play on a virtual clock and log slide changes
    Simulate {
        /// Configuration file (the sample configuration when omitted)
        path: Option<PathBuf>,

        /// Seconds of virtual time to run
        #[arg(
            short,
            long,
            default_value = "30",
            value_parser = clap::value_parser!(u64).range(1..=page::MAX_SIMULATED_SECONDS)
        )]
        seconds: u64,
    },

    /// Write the sample configuration
    Init {
        /// Destination file
        #[arg(default_value = config::CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { path } => cmd_check(&path),
        Commands::Render { path, output } => cmd_render(path.as_deref(), output.as_deref()),
        Commands::Simulate { path, seconds } => cmd_simulate(path.as_deref(), seconds),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = config::load_validated(path)?;
    let settings = &config.settings;

    info!("Checking {}", path.display());
    println!("{} slide(s)", config.slides.len());
    for slide in &config.slides {
        println!("  [{}] {} -> {}", slide.id, slide.title, slide.button_link);
        if slide.image.is_none() {
            println!("      no image, icon: {}", slide.fallback_icon);
        }
    }
    println!(
        "auto-play: {}",
        if settings.auto_play {
            format!("every {} ms", settings.auto_play_interval)
        } else {
            "off".to_string()
        }
    );
    println!(
        "input: touch={} keyboard={} indicators={} buttons={}",
        settings.enable_touch,
        settings.enable_keyboard,
        settings.enable_indicators,
        settings.enable_buttons
    );

    if config.slides.len() < 2 {
        warn!("Fewer than two slides: navigation and auto-play are inactive");
    }

    Ok(())
}

fn cmd_render(path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let page = HostPage::mount(config::load_or_sample(path)?)?;
    let html = page.html();

    match output {
        Some(output) => {
            fs::write(output, &html)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Rendered {} slide(s) to {}", page.carousel.total_slides(), output.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn cmd_simulate(path: Option<&Path>, seconds: u64) -> Result<()> {
    let page = HostPage::mount(config::load_or_sample(path)?)?;

    if !page.carousel.is_auto_playing() {
        warn!("Auto-play is inactive for this configuration");
    }

    info!("Simulating {}s of auto-play", seconds);
    let shown = page.simulate(seconds);
    let changes = shown.windows(2).filter(|pair| pair[0] != pair[1]).count()
        + usize::from(shown.first().is_some_and(|&first| first != 0));
    info!(
        "Done: {} transition(s), showing slide {} of {}",
        changes,
        page.carousel.current_slide() + 1,
        page.carousel.total_slides()
    );

    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    config::write_sample(path)?;
    info!("Wrote sample configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn simulate_seconds(args: &[&str]) -> Option<u64> {
        let argv = ["tawy", "simulate"].into_iter().chain(args.iter().copied());
        match Cli::try_parse_from(argv).ok()?.command {
            Commands::Simulate { seconds, .. } => Some(seconds),
            _ => None,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_seconds_bounds() {
        assert_eq!(simulate_seconds(&[]), Some(30));
        assert_eq!(simulate_seconds(&["--seconds", "1"]), Some(1));
        assert_eq!(simulate_seconds(&["--seconds", "86400"]), Some(86_400));

        assert_eq!(simulate_seconds(&["--seconds", "0"]), None);
        assert_eq!(simulate_seconds(&["--seconds", "86401"]), None);
        assert_eq!(simulate_seconds(&["--seconds", "18446744073709551615"]), None);
    }
}
