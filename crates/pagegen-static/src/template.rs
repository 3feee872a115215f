//! Page template with `{{ column }}` placeholder tokens.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::data::Row;

/// An HTML page template.
///
/// Substitution is plain text replacement: there is no escaping, no nesting
/// and no control flow. A token is exactly `{{ <column> }}` with one space of
/// padding on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    /// Create a template from its source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template from a UTF-8 file.
    pub fn load(path: &Path) -> io::Result<Self> {
        fs::read_to_string(path).map(Self::new)
    }

    /// The raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render a page for one row.
    ///
    /// Columns are applied in header order and every occurrence of a token is
    /// replaced. Tokens naming columns the row does not have stay as they are.
    pub fn render(&self, row: &Row) -> String {
        let mut page = self.source.clone();

        for (column, value) in row.iter() {
            let token = placeholder(column);
            if page.contains(&token) {
                page = page.replace(&token, value);
            }
        }

        page
    }
}

/// Build the placeholder token for a column name.
pub fn placeholder(column: &str) -> String {
    format!("{{{{ {} }}}}", column)
}

/// Column names of tokens still present in a rendered page, in order of
/// first appearance.
pub fn unresolved_tokens(page: &str) -> Vec<String> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN.get_or_init(|| {
        Regex::new(r"\{\{ ([^{}\s](?:[^{}]*[^{}\s])?) \}\}").expect("token pattern is valid")
    });

    let mut names: Vec<String> = Vec::new();
    for caps in re.captures_iter(page) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(fields: &[(&str, &str)]) -> Row {
        Row::new(
            1,
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn renders_basic_page() {
        let template = Template::new("<h1>{{ title }}</h1><p>{{ body }}</p>");
        let row = row(&[("title", "Hi"), ("body", "World"), ("file_name", "a.html")]);

        assert_eq!(template.render(&row), "<h1>Hi</h1><p>World</p>");
    }

    #[test]
    fn replaces_every_occurrence() {
        let template = Template::new("<title>{{ city }}</title><h1>{{ city }}</h1>{{ city }}");
        let row = row(&[("city", "Wien")]);

        assert_eq!(
            template.render(&row),
            "<title>Wien</title><h1>Wien</h1>Wien"
        );
    }

    #[test]
    fn leaves_unknown_tokens_verbatim() {
        let template = Template::new("{{ title }} {{ subtitle }} {{ titel }}");
        let row = row(&[("title", "Hello")]);

        assert_eq!(template.render(&row), "Hello {{ subtitle }} {{ titel }}");
    }

    #[test]
    fn token_match_is_exact() {
        let template = Template::new("{{title}} {{  title  }} {{ Title }} {{ title }}");
        let row = row(&[("title", "X")]);

        assert_eq!(
            template.render(&row),
            "{{title}} {{  title  }} {{ Title }} X"
        );
    }

    #[test]
    fn values_are_inserted_without_escaping() {
        let template = Template::new("<div>{{ body }}</div>");
        let row = row(&[("body", "<b>Fish & Chips</b>")]);

        assert_eq!(template.render(&row), "<div><b>Fish & Chips</b></div>");
    }

    #[test]
    fn columns_apply_in_header_order() {
        // A value that contains a later column's token is itself substituted.
        let template = Template::new("{{ a }}");
        let row = row(&[("a", "[{{ b }}]"), ("b", "B")]);

        assert_eq!(template.render(&row), "[B]");
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let template = Template::new("<p>static</p>");
        let row = row(&[("title", "ignored")]);

        assert_eq!(template.render(&row), "<p>static</p>");
    }

    #[test]
    fn builds_placeholder() {
        assert_eq!(placeholder("file_name"), "{{ file_name }}");
    }

    #[test]
    fn finds_unresolved_tokens() {
        let page = "<h1>{{ title }}</h1>{{ meta description }}{{ title }}{{nope}}";

        assert_eq!(
            unresolved_tokens(page),
            vec!["title".to_string(), "meta description".to_string()]
        );
    }

    #[test]
    fn loads_template_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("template.html");
        fs::write(&path, "<p>{{ body }}</p>").unwrap();

        let template = Template::load(&path).unwrap();

        assert_eq!(template.source(), "<p>{{ body }}</p>");
    }
}
