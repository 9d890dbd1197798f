//! Traits for format-agnostic reading and writing of catalog documents.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A catalog document that can be read from and written to bytes.
///
/// Reading through [`Document::from_bytes`] or [`Document::read_from`] sniffs a
/// byte-order mark and transcodes UTF-16 input to UTF-8 first.
///
/// # Example
///
/// ```rust,no_run
/// use tscat::traits::Document;
/// let doc = tscat::formats::ts::Format::read_from("locale/es_AR.ts")?;
/// doc.write_to("es_AR.copy.ts")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Document {
    /// Parse from a UTF-8 reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Parse from raw bytes, honouring a byte-order mark.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let decoded = decode_bom(bytes)?;
        Self::from_reader(Cursor::new(decoded))
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from a file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut bytes = Vec::new();
        BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Write to a file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(out)
    }
}

/// Transcodes BOM-marked input to UTF-8; input without a BOM passes through.
pub(crate) fn decode_bom(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .strip_bom(true)
        .build(bytes);
    let mut decoded = Vec::with_capacity(bytes.len());
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}
