//! Tabular data source: a delimited text file with a header row.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::RowError;

/// Column whose value names the output file.
pub const FILE_NAME_COLUMN: &str = "file_name";

/// One data row: column name to value, in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position among the data rows (header excluded)
    number: usize,
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create a row from its 1-based number and ordered fields.
    pub fn new(number: usize, fields: Vec<(String, String)>) -> Self {
        Self { number, fields }
    }

    /// 1-based row number, not counting the header.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Value for a column, if the row has it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The output file name for this row.
    pub fn file_name(&self) -> Result<&str, RowError> {
        match self.get(FILE_NAME_COLUMN) {
            None => Err(RowError::MissingFileName),
            Some(name) if name.trim().is_empty() => Err(RowError::EmptyFileName),
            Some(name) => Ok(name),
        }
    }
}

/// Field delimiter for the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Delimiter {
    /// Pick `;` or `,` from the header line
    #[default]
    Auto,
    /// A fixed single-byte delimiter
    Byte(u8),
}

impl Delimiter {
    /// Resolve to a concrete delimiter byte for the given header line.
    ///
    /// `Auto` picks `;` when the header has semicolons and no commas, as
    /// spreadsheets exported with a European locale do; otherwise `,`.
    pub fn resolve(self, header_line: &str) -> u8 {
        match self {
            Delimiter::Byte(b) => b,
            Delimiter::Auto => {
                if header_line.contains(';') && !header_line.contains(',') {
                    b';'
                } else {
                    b','
                }
            }
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Delimiter::Auto),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Byte(b'\t')),
            _ => match s.as_bytes() {
                [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => {
                    Ok(Delimiter::Byte(*b))
                }
                _ => Err(format!(
                    "invalid delimiter '{}': expected 'auto', 'tab' or a single ASCII character",
                    s
                )),
            },
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Auto => write!(f, "auto"),
            Delimiter::Byte(b'\t') => write!(f, "tab"),
            Delimiter::Byte(b) => write!(f, "{}", *b as char),
        }
    }
}

/// Errors from parsing the data file as a whole.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataError {
    #[error("missing header row")]
    NoHeader,

    #[error("empty column name at position {0}")]
    EmptyColumn(usize),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("{0}")]
    Csv(String),
}

/// Parsed data file.
#[derive(Debug)]
pub struct DataSource {
    columns: Vec<String>,
    records: Vec<Result<Row, RowError>>,
}

impl DataSource {
    /// Parse delimited text. The first line is the header.
    ///
    /// Rows shorter than the header carry only the columns they have. Rows
    /// longer than the header, or that fail to parse, are kept as per-row
    /// errors so the remaining rows can still be generated.
    pub fn parse(text: &str, delimiter: Delimiter) -> Result<Self, DataError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        // The reader skips blank lines before the header, so detection must too.
        let header_line = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        let delimiter = delimiter.resolve(header_line);
        tracing::debug!("Using delimiter '{}'", delimiter as char);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DataError::Csv(e.to_string()))?
            .clone();

        if headers.is_empty() {
            return Err(DataError::NoHeader);
        }

        let mut columns: Vec<String> = Vec::with_capacity(headers.len());
        for (position, name) in headers.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(DataError::EmptyColumn(position + 1));
            }
            if columns.iter().any(|c| c == name) {
                return Err(DataError::DuplicateColumn(name.to_string()));
            }
            columns.push(name.to_string());
        }

        let records = reader
            .records()
            .enumerate()
            .map(|(index, record)| {
                let number = index + 1;
                let record = record.map_err(|e| RowError::Malformed {
                    message: e.to_string(),
                })?;

                if record.len() > columns.len() {
                    return Err(RowError::Malformed {
                        message: format!(
                            "expected at most {} fields, found {}",
                            columns.len(),
                            record.len()
                        ),
                    });
                }

                let fields = columns
                    .iter()
                    .zip(record.iter())
                    .map(|(column, value)| (column.clone(), value.to_string()))
                    .collect();

                Ok(Row::new(number, fields))
            })
            .collect();

        Ok(Self { columns, records })
    }

    /// Column names from the header, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parsed rows in source order; unparseable rows are errors.
    pub fn records(&self) -> &[Result<Row, RowError>] {
        &self.records
    }

    /// Consume the source, yielding its rows in order.
    pub fn into_records(self) -> Vec<Result<Row, RowError>> {
        self.records
    }

    /// Number of data rows, including malformed ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the file has no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(source: &DataSource) -> Vec<&Row> {
        source
            .records()
            .iter()
            .map(|r| r.as_ref().unwrap())
            .collect()
    }

    #[test]
    fn parses_header_and_rows() {
        let source = DataSource::parse(
            "file_name,title\na.html,Alpha\nb.html,Beta\n",
            Delimiter::Auto,
        )
        .unwrap();

        assert_eq!(source.columns(), &["file_name", "title"]);
        let rows = rows(&source);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number(), 1);
        assert_eq!(rows[0].get("title"), Some("Alpha"));
        assert_eq!(rows[1].file_name().unwrap(), "b.html");
    }

    #[test]
    fn keeps_header_order() {
        let source = DataSource::parse("b,a,file_name\n2,1,x.html\n", Delimiter::Auto).unwrap();
        let row = rows(&source)[0];

        let order: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["b", "a", "file_name"]);
    }

    #[test]
    fn handles_quoted_fields() {
        let source = DataSource::parse(
            "file_name,body\na.html,\"Hello, \"\"world\"\"\nsecond line\"\n",
            Delimiter::Auto,
        )
        .unwrap();

        assert_eq!(
            rows(&source)[0].get("body"),
            Some("Hello, \"world\"\nsecond line")
        );
    }

    #[test]
    fn detects_semicolon_delimiter() {
        let source = DataSource::parse("file_name;title\na.html;Hallo\n", Delimiter::Auto).unwrap();

        assert_eq!(source.columns(), &["file_name", "title"]);
        assert_eq!(rows(&source)[0].get("title"), Some("Hallo"));
    }

    #[test]
    fn detects_delimiter_past_leading_blank_lines() {
        let source =
            DataSource::parse("\n\nfile_name;title\na.html;X\n", Delimiter::Auto).unwrap();

        assert_eq!(source.columns(), &["file_name", "title"]);
        assert_eq!(rows(&source)[0].file_name().unwrap(), "a.html");
    }

    #[test]
    fn explicit_delimiter_overrides_detection() {
        let source =
            DataSource::parse("file_name|title\na.html|x;y\n", "|".parse().unwrap()).unwrap();

        assert_eq!(rows(&source)[0].get("title"), Some("x;y"));
    }

    #[test]
    fn strips_bom_and_trims_header_names() {
        let source =
            DataSource::parse("\u{feff} file_name , title\na.html,Hi\n", Delimiter::Auto).unwrap();

        assert_eq!(source.columns(), &["file_name", "title"]);
    }

    #[test]
    fn values_keep_their_text() {
        let source =
            DataSource::parse("file_name,price,empty\na.html,1.50,\n", Delimiter::Auto).unwrap();
        let row = rows(&source)[0];

        assert_eq!(row.get("price"), Some("1.50"));
        assert_eq!(row.get("empty"), Some(""));
    }

    #[test]
    fn short_row_omits_missing_columns() {
        let source = DataSource::parse("title,file_name\nOnly title\n", Delimiter::Auto).unwrap();
        let row = rows(&source)[0];

        assert_eq!(row.get("title"), Some("Only title"));
        assert_eq!(row.get("file_name"), None);
        assert!(matches!(row.file_name(), Err(RowError::MissingFileName)));
    }

    #[test]
    fn long_row_is_malformed() {
        let source =
            DataSource::parse("file_name,title\na.html,A,extra\nb.html,B\n", Delimiter::Auto)
                .unwrap();

        assert_eq!(source.len(), 2);
        assert!(matches!(
            source.records()[0],
            Err(RowError::Malformed { .. })
        ));
        assert!(source.records()[1].is_ok());
    }

    #[test]
    fn blank_file_name_is_an_error() {
        let row = Row::new(1, vec![("file_name".to_string(), "  ".to_string())]);

        assert!(matches!(row.file_name(), Err(RowError::EmptyFileName)));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            DataSource::parse("", Delimiter::Auto).unwrap_err(),
            DataError::NoHeader
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        assert_eq!(
            DataSource::parse("title,title,file_name\n", Delimiter::Auto).unwrap_err(),
            DataError::DuplicateColumn("title".to_string())
        );
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let source = DataSource::parse("file_name,title\n", Delimiter::Auto).unwrap();

        assert!(source.is_empty());
    }

    #[test]
    fn parses_delimiter_names() {
        assert_eq!("auto".parse::<Delimiter>().unwrap(), Delimiter::Auto);
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Byte(b'\t'));
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Byte(b';'));
        assert!("ab".parse::<Delimiter>().is_err());
        assert!("\"".parse::<Delimiter>().is_err());
    }
}
