//! File format tags and extension parsing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported tabular file formats.
///
/// The format is declared at upload time from the filename extension and
/// recorded in the catalog; it selects the codec used for decode and encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Derive the format from a filename's extension.
    ///
    /// Returns `Error::UnsupportedFormat` for anything other than `.csv` or
    /// `.xlsx`, including filenames with no extension at all. This check runs
    /// before any store or catalog call is made.
    pub fn from_extension(filename: &str) -> Result<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "" => Err(Error::UnsupportedFormat(format!(
                "'{filename}' has no file extension"
            ))),
            other => Err(Error::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Catalog string form of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }

    /// Content type attached to blobs written in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}
