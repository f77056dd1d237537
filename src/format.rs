//! Formatting utilities for the vico-cli client.
//!
//! This module provides functionality for formatting output as aligned
//! tables, pretty-printed JSON or CSV.

use csv::Writer;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("error formatting JSON: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

/// Enum representing the supported output formats
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Fixed-width columns for people
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// CSV with a header row
    Csv,
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        OutputFormat::VARIANTS.to_vec()
    }

    pub fn all() -> Vec<OutputFormat> {
        OutputFormat::iter().collect()
    }

    pub fn parse(format_str: &str) -> Result<OutputFormat, FormattingError> {
        format_str
            .parse()
            .map_err(|_| FormattingError::UnsupportedOutputFormat(format_str.to_lowercase()))
    }
}

/// Trait for producing CSV records from data
pub trait CsvRecordProducer {
    /// Returns the header row for the CSV output
    fn csv_header() -> Vec<String>;

    /// Converts the data into CSV records
    fn as_csv_records(&self) -> Vec<Vec<String>>;

    /// Produces CSV output with a header row
    fn to_csv_with_header(&self) -> Result<String, FormattingError> {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(Self::csv_header())?;
        for record in self.as_csv_records() {
            wtr.write_record(&record)?;
        }
        let bytes = wtr.into_inner()?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Trait for producing pretty-printed JSON from serializable data
pub trait JsonProducer: Serialize {
    fn to_json(&self) -> Result<String, FormattingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Trait for producing the human-readable table view
pub trait TableProducer {
    fn to_table(&self) -> String;
}

/// Anything that can be rendered in every supported output format
pub trait Formattable {
    fn format(&self, f: OutputFormat) -> Result<String, FormattingError>;
}

impl<T> Formattable for T
where
    T: CsvRecordProducer + JsonProducer + TableProducer,
{
    fn format(&self, f: OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Table => Ok(self.to_table()),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Csv => self.to_csv_with_header(),
        }
    }
}

/// Left-align `value` in a column of `width` characters.
///
/// Longer values are not truncated, matching `%-Ns` style formatting.
pub fn pad(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}
