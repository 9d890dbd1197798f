//! Catalog document formats understood by tscat.
//!
//! TS is the primary format; JSON snapshots are a lossless dump of the
//! [`crate::types::Catalog`] model for tooling.

pub mod json;
pub mod ts;

use std::{
    fmt::{Display, Formatter},
    io::Write,
    str::FromStr,
};

pub use json::Format as JsonFormat;
pub use ts::Format as TsFormat;

use crate::{error::Error, traits::Document, types::Catalog};

/// Supported catalog document formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Qt Linguist `.ts` XML.
    #[default]
    Ts,
    /// JSON snapshot of the catalog model.
    Json,
}

/// # Example
/// ```rust
/// use tscat::formats::FormatType;
/// assert_eq!(FormatType::Ts.to_string(), "ts");
/// assert_eq!(FormatType::Json.to_string(), "json");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Ts => write!(f, "ts"),
            FormatType::Json => write!(f, "json"),
        }
    }
}

/// Accepts `ts`, `linguist`, `xml` and `json`, case-insensitively.
///
/// # Example
/// ```rust
/// use tscat::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("TS").unwrap(), FormatType::Ts);
/// assert_eq!(FormatType::from_str("json").unwrap(), FormatType::Json);
/// assert!(FormatType::from_str("po").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "ts" | "linguist" | "xml" => Ok(FormatType::Ts),
            "json" => Ok(FormatType::Json),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Ts => "ts",
            FormatType::Json => "json",
        }
    }

    /// Decodes a catalog document of this format.
    pub fn parse(&self, bytes: &[u8]) -> Result<Catalog, Error> {
        match self {
            FormatType::Ts => TsFormat::from_bytes(bytes).map(Catalog::from),
            FormatType::Json => JsonFormat::from_bytes(bytes).map(Catalog::from),
        }
    }

    /// Encodes `catalog` as a document of this format.
    pub fn write<W: Write>(&self, catalog: &Catalog, writer: W) -> Result<(), Error> {
        match self {
            FormatType::Ts => TsFormat::from(catalog.clone()).to_writer(writer),
            FormatType::Json => JsonFormat::from(catalog.clone()).to_writer(writer),
        }
    }
}
