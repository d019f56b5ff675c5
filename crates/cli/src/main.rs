//! onboard - client onboarding workflow runner

mod replay;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use colored::Colorize;
use ob_core::config::load_config;
use ob_core::init::{generate_onboard_kit_structure, InitOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "onboard-kit - dependency-aware client onboarding")]
#[command(version)]
struct Cli {
    /// Project root containing the .onboard-kit directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .onboard-kit directory with starter templates
    Init {
        /// Overwrite an existing .onboard-kit directory
        #[arg(short, long)]
        force: bool,

        /// Only generate one process and no documents
        #[arg(short, long)]
        minimal: bool,
    },

    /// Load and validate every process template
    Validate,

    /// Apply a YAML list of operations and print the results
    Replay {
        /// Path to a YAML file holding a list of operations
        file: PathBuf,

        /// Print one JSON object per operation instead of text
        #[arg(long)]
        json: bool,

        /// Stop at the first failed operation
        #[arg(long)]
        fail_fast: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force, minimal } => init_project(&cli.dir, force, minimal).await,
        Commands::Validate => validate_project(&cli.dir).await,
        Commands::Replay {
            file,
            json,
            fail_fast,
        } => {
            let failed = replay::run(&cli.dir, &file, json, fail_fast).await?;
            if failed > 0 {
                bail!("{failed} operation(s) failed");
            }
            Ok(())
        }
    }
}

async fn init_project(dir: &Path, force: bool, minimal: bool) -> color_eyre::Result<()> {
    let options = InitOptions {
        target_dir: dir.to_path_buf(),
        force,
        minimal,
    };
    let ok_dir = generate_onboard_kit_structure(options).await?;

    println!("{} Initialized {}", "✓".green(), ok_dir.display());
    Ok(())
}

async fn validate_project(dir: &Path) -> color_eyre::Result<()> {
    let config = load_config(dir)
        .await
        .wrap_err_with(|| format!("failed to load configuration from {}", dir.display()))?;
    let templates = config.build_templates()?;

    if templates.is_empty() {
        bail!("no process templates found under {}", dir.join(".onboard-kit").display());
    }

    for graph in &templates {
        let order: Vec<String> = graph
            .topological_order()
            .iter()
            .map(ToString::to_string)
            .collect();

        println!("{} Process '{}' is valid", "✓".green(), graph.name().bold());
        if !graph.description().is_empty() {
            println!("  {}", graph.description().dimmed());
        }
        println!("  Steps: {}", graph.len());
        let gated: Vec<String> = graph
            .steps_with_dependencies()
            .iter()
            .map(ToString::to_string)
            .collect();
        if !gated.is_empty() {
            println!("  Gated steps: {}", gated.join(", "));
        }
        println!("  Order: {}", order.join(" → "));
        println!("  Documents: {}", graph.required_documents().count());
    }

    if let Some(default) = &config.global.default_process {
        println!("  Default process: {}", default.cyan());
    }
    println!("  Lock timeout: {} ms", config.global.lock_timeout_ms);

    Ok(())
}
