//! Landing page generator.
//!
//! Fills a single HTML template with the values of each row of a CSV file and
//! writes one page per row, named by the row's `file_name` column.

pub mod builder;
pub mod data;
pub mod error;
pub mod sitemap;
pub mod template;

pub use builder::{
    DuplicatePolicy, GenerateConfig, GenerateReport, GeneratedPage, PageGenerator, PageOutcome,
};
pub use data::{DataSource, Delimiter, Row, FILE_NAME_COLUMN};
pub use error::{GenerateError, RowError};
pub use template::Template;
