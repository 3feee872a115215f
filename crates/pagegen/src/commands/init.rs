//! Scaffold a landing page project in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing pagegen...");

    let files = [
        ("pages.toml", DEFAULT_CONFIG),
        ("template.html", DEFAULT_TEMPLATE),
        ("content.csv", DEFAULT_CONTENT),
    ];

    for (name, content) in files {
        let path = root.join(name);
        if path.exists() && !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", name);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", name))?;
        tracing::info!("Created {}", name);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pagegen build' to generate the landing pages.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# pagegen configuration

[pages]
# HTML template with {{ column }} placeholders
template = "template.html"

# Data file; the header row names the columns
data = "content.csv"

# Output directory for generated pages
output = "landingpages"

[data]
# "auto" picks ";" or "," from the header line
delimiter = "auto"

[build]
# Rows sharing a file_name: "overwrite", "warn" or "error"
on_duplicate = "warn"

# [sitemap]
# base_url = "https://example.com"
"#;

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
</head>
<body>
  <main>
    <h1>{{ title }}</h1>
    <p>{{ body }}</p>
  </main>
</body>
</html>
"#;

const DEFAULT_CONTENT: &str = r#"file_name,title,description,body
welcome.html,Welcome,Our landing page,Every row of this file becomes one page.
contact.html,Contact,Get in touch,"Edit content.csv, then run pagegen build."
"#;
