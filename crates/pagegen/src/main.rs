//! pagegen CLI - landing pages from an HTML template and a CSV file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagegen_static::Delimiter;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "pagegen")]
#[command(about = "Generate static landing pages from an HTML template and a CSV file")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pages.toml config file
    #[arg(short, long, default_value = "pages.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create pages.toml, template.html and content.csv starter files
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate one page per data row
    Build {
        /// HTML template (defaults to config or "template.html")
        template: Option<PathBuf>,

        /// CSV data file (defaults to config or "content.csv")
        data: Option<PathBuf>,

        /// Output directory (defaults to config or "landingpages")
        output: Option<PathBuf>,

        /// Field delimiter: "auto", "tab" or a single character
        #[arg(short, long)]
        delimiter: Option<Delimiter>,

        /// Write sitemap.xml for the pages under this base URL
        #[arg(long, value_name = "BASE_URL")]
        sitemap: Option<String>,
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

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&PathBuf::from("."), yes)?;
        }
        Commands::Build {
            template,
            data,
            output,
            delimiter,
            sitemap,
        } => {
            let args = commands::build::BuildArgs {
                template,
                data,
                output,
                delimiter,
                sitemap,
            };
            commands::build::run(&cli.config, args)?;
        }
    }

    Ok(())
}
