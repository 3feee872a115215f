//! Landing page build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pagegen_static::{Delimiter, DuplicatePolicy, GenerateConfig, PageGenerator};
use serde::Deserialize;

/// Configuration file structure (pages.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    pages: PagesConfig,
    #[serde(default)]
    data: DataConfig,
    #[serde(default)]
    build: BuildSettings,
    #[serde(default)]
    sitemap: SitemapConfig,
}

#[derive(Debug, Deserialize)]
struct PagesConfig {
    #[serde(default = "default_template")]
    template: String,
    #[serde(default = "default_data")]
    data: String,
    #[serde(default = "default_output")]
    output: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            data: default_data(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct DataConfig {
    #[serde(default)]
    delimiter: Delimiter,
}

#[derive(Debug, Deserialize, Default)]
struct BuildSettings {
    #[serde(default)]
    on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Deserialize, Default)]
struct SitemapConfig {
    /// Site URL the pages are published under
    base_url: Option<String>,
}

fn default_template() -> String {
    "template.html".to_string()
}
fn default_data() -> String {
    "content.csv".to_string()
}
fn default_output() -> String {
    "landingpages".to_string()
}

/// Arguments of the build command.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub template: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub delimiter: Option<Delimiter>,
    pub sitemap: Option<String>,
}

/// Load configuration from the config file if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(config_path: &Path) -> Result<ConfigFile> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!("Failed to read {}: {}", config_path.display(), e)
        })?;
        let config: ConfigFile = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse {}: {}", config_path.display(), e)
        })?;
        tracing::debug!("Loaded config from {}", config_path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Merge command line arguments over the config file.
fn resolve_config(args: BuildArgs, file_config: ConfigFile) -> GenerateConfig {
    GenerateConfig {
        template_path: args
            .template
            .unwrap_or_else(|| PathBuf::from(&file_config.pages.template)),
        data_path: args
            .data
            .unwrap_or_else(|| PathBuf::from(&file_config.pages.data)),
        output_dir: args
            .output
            .unwrap_or_else(|| PathBuf::from(&file_config.pages.output)),
        delimiter: args.delimiter.unwrap_or(file_config.data.delimiter),
        on_duplicate: file_config.build.on_duplicate,
        sitemap_base_url: args.sitemap.or(file_config.sitemap.base_url),
    }
}

/// Run the build command.
pub fn run(config_path: &Path, args: BuildArgs) -> Result<()> {
    let config = resolve_config(args, load_config(config_path)?);

    tracing::info!(
        "Generating pages from {} and {}",
        config.template_path.display(),
        config.data_path.display()
    );

    let report = PageGenerator::new(config).generate()?;

    tracing::info!(
        "Generated {} pages in {}ms",
        report.pages(),
        report.duration_ms
    );
    tracing::info!("Output: {}", report.output_dir.display());

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} rows failed",
            report.failures().count(),
            report.outcomes.len()
        );
    }

    Ok(())
}
