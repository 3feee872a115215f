//! Sitemap for generated landing pages.

/// File name of the sitemap inside the output directory.
pub const FILE_NAME: &str = "sitemap.xml";

/// Render a sitemap listing the given page file names under `base_url`.
///
/// Pages get clean URLs: `.html` is dropped and `index.html` maps to its
/// directory. Repeated names are listed once.
pub fn render(base_url: &str, file_names: &[&str]) -> String {
    let base = base_url.trim_end_matches('/');

    let mut seen: Vec<&str> = Vec::new();
    let mut urls: Vec<String> = Vec::new();
    for &name in file_names {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        urls.push(format!(
            "  <url>\n    <loc>{}/{}</loc>\n  </url>",
            escape_xml(base),
            escape_xml(&clean_path(name))
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls.join("\n")
    )
}

/// URL path for a page file name.
fn clean_path(file_name: &str) -> String {
    let path = file_name.replace('\\', "/");
    let path = path.trim_start_matches("./").trim_start_matches('/');

    if path == "index.html" {
        return String::new();
    }
    if let Some(dir) = path.strip_suffix("/index.html") {
        return format!("{}/", dir);
    }
    path.strip_suffix(".html").unwrap_or(path).to_string()
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
