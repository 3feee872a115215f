//! Landing page generator.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;

use crate::data::{DataSource, Delimiter, Row};
use crate::error::{GenerateError, RowError};
use crate::sitemap;
use crate::template::{unresolved_tokens, Template};

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// HTML template file
    pub template_path: PathBuf,

    /// Delimited data file with a header row
    pub data_path: PathBuf,

    /// Directory receiving one file per row
    pub output_dir: PathBuf,

    /// Field delimiter of the data file
    pub delimiter: Delimiter,

    /// What to do when two rows name the same output file
    pub on_duplicate: DuplicatePolicy,

    /// Site URL; when set, a sitemap.xml is written next to the pages
    pub sitemap_base_url: Option<String>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.html"),
            data_path: PathBuf::from("content.csv"),
            output_dir: PathBuf::from("landingpages"),
            delimiter: Delimiter::Auto,
            on_duplicate: DuplicatePolicy::Warn,
            sitemap_base_url: None,
        }
    }
}

/// Handling of rows that share a `file_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last row wins, silently
    Overwrite,
    /// Last row wins, with a warning
    #[default]
    Warn,
    /// Later rows fail; the first page is kept
    Error,
}

/// A page written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    /// Value of the row's `file_name` column
    pub file_name: String,

    /// Full output path
    pub path: PathBuf,

    /// Tokens left in the page because the row had no such column
    pub unresolved: Vec<String>,
}

/// Result for one data row.
#[derive(Debug)]
pub struct PageOutcome {
    /// 1-based data row number
    pub row: usize,

    pub result: Result<GeneratedPage, RowError>,
}

/// Summary of a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// One outcome per data row, in source order
    pub outcomes: Vec<PageOutcome>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Sitemap path, if one was written
    pub sitemap: Option<PathBuf>,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

impl GenerateReport {
    /// Pages successfully written.
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedPage> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Rows that failed, with their row number.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &RowError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.row, e)))
    }

    /// Number of pages written.
    pub fn pages(&self) -> usize {
        self.generated().count()
    }

    /// True when every row produced a page.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Generates one page per data row from a single template.
pub struct PageGenerator {
    config: GenerateConfig,
}

impl PageGenerator {
    /// Create a new page generator.
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Run the generator.
    ///
    /// Template and data are both loaded before the output directory is
    /// touched, so a missing input leaves the filesystem unchanged. Row
    /// failures are recorded in the report rather than returned.
    pub fn generate(&self) -> Result<GenerateReport, GenerateError> {
        let start = Instant::now();

        let template = self.load_template()?;
        let data = self.load_data()?;

        self.ensure_output_dir()?;

        let mut written: HashMap<String, usize> = HashMap::new();
        let mut outcomes = Vec::with_capacity(data.len());

        for (index, record) in data.into_records().into_iter().enumerate() {
            let row_number = index + 1;
            let result = record.and_then(|row| self.generate_page(&template, &row, &mut written));

            if let Err(e) = &result {
                tracing::warn!("Row {}: {}", row_number, e);
            }

            outcomes.push(PageOutcome {
                row: row_number,
                result,
            });
        }

        let mut report = GenerateReport {
            outcomes,
            output_dir: self.config.output_dir.clone(),
            sitemap: None,
            duration_ms: 0,
        };

        if let Some(base_url) = &self.config.sitemap_base_url {
            report.sitemap = self.write_sitemap(base_url, &report)?;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        if report.is_success() {
            tracing::info!("All {} landing pages generated", report.pages());
        } else {
            tracing::warn!(
                "Generated {} of {} pages; {} rows failed",
                report.pages(),
                report.outcomes.len(),
                report.failures().count()
            );
        }

        Ok(report)
    }

    fn load_template(&self) -> Result<Template, GenerateError> {
        let path = &self.config.template_path;
        Template::load(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GenerateError::TemplateNotFound { path: path.clone() },
            _ => GenerateError::TemplateRead {
                path: path.clone(),
                source: e,
            },
        })
    }

    fn load_data(&self) -> Result<DataSource, GenerateError> {
        let path = &self.config.data_path;
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GenerateError::DataNotFound { path: path.clone() },
            _ => GenerateError::DataRead {
                path: path.clone(),
                source: e,
            },
        })?;

        let data = DataSource::parse(&text, self.config.delimiter).map_err(|e| {
            GenerateError::DataParse {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(
            "Loaded {} rows with columns [{}] from {}",
            data.len(),
            data.columns().join(", "),
            path.display()
        );

        Ok(data)
    }

    fn ensure_output_dir(&self) -> Result<(), GenerateError> {
        let dir = &self.config.output_dir;
        if dir.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| GenerateError::CreateOutputDir {
            path: dir.clone(),
            source: e,
        })?;
        tracing::info!("Created output directory {}", dir.display());

        Ok(())
    }

    /// Render and write the page for a single row.
    fn generate_page(
        &self,
        template: &Template,
        row: &Row,
        written: &mut HashMap<String, usize>,
    ) -> Result<GeneratedPage, RowError> {
        let file_name = row.file_name()?;

        if let Some(&first_row) = written.get(file_name) {
            match self.config.on_duplicate {
                DuplicatePolicy::Overwrite => {}
                DuplicatePolicy::Warn => tracing::warn!(
                    "Row {} overwrites '{}' from row {}",
                    row.number(),
                    file_name,
                    first_row
                ),
                DuplicatePolicy::Error => {
                    return Err(RowError::DuplicateFileName {
                        file_name: file_name.to_string(),
                        first_row,
                    })
                }
            }
        }

        let html = template.render(row);

        let unresolved = unresolved_tokens(&html);
        if !unresolved.is_empty() {
            tracing::debug!(
                "Page '{}' has unresolved placeholders: {}",
                file_name,
                unresolved.join(", ")
            );
        }

        // No sanitization: a file_name like "../x.html" escapes the output directory.
        let path = self.config.output_dir.join(file_name);
        write_page(&path, &html)?;

        written.entry(file_name.to_string()).or_insert(row.number());
        tracing::info!("Page '{}' generated", file_name);

        Ok(GeneratedPage {
            file_name: file_name.to_string(),
            path,
            unresolved,
        })
    }

    fn write_sitemap(
        &self,
        base_url: &str,
        report: &GenerateReport,
    ) -> Result<Option<PathBuf>, GenerateError> {
        let path = self.config.output_dir.join(sitemap::FILE_NAME);

        // A generated page already owns this path; keep the page.
        if let Some(page) = report.generated().find(|p| p.path == path) {
            tracing::warn!(
                "Not writing sitemap: page '{}' uses {}",
                page.file_name,
                path.display()
            );
            return Ok(None);
        }

        let file_names: Vec<&str> = report.generated().map(|p| p.file_name.as_str()).collect();
        let xml = sitemap::render(base_url, &file_names);

        fs::write(&path, xml).map_err(|e| GenerateError::WriteSitemap {
            path: path.clone(),
            source: e,
        })?;
        tracing::info!("Wrote sitemap with {} URLs", file_names.len());

        Ok(Some(path))
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), RowError> {
    let to_row_error = |e: io::Error| RowError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    // file_name may contain subdirectories
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_row_error)?;
    }

    fs::write(path, html).map_err(to_row_error)
}
