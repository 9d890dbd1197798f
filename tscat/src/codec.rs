//! Catalog loading: decode, validate, index.
//!
//! A [`LoadedCatalog`] is the immutable snapshot the resolver reads. It is
//! shared as a [`CatalogHandle`] and never mutated; reloading builds a new
//! one.

use std::{fs, path::Path, sync::Arc};

use crate::{
    error::Error,
    formats::FormatType,
    index::CatalogIndex,
    locale,
    options::LoadOptions,
    plural_rules::{self, PluralRule},
    types::{Catalog, Message},
    validation,
};

/// A validated, indexed catalog.
#[derive(Debug)]
pub struct LoadedCatalog {
    catalog: Catalog,
    index: CatalogIndex,
    rule: &'static PluralRule,
    locale: String,
}

/// Shared handle to a loaded catalog.
pub type CatalogHandle = Arc<LoadedCatalog>;

impl LoadedCatalog {
    /// Validates `catalog` and builds its index.
    ///
    /// Fails with [`Error::MalformedCatalog`] when the catalog has no locale,
    /// an impossible structure, or duplicate message identities, and with
    /// [`Error::PluralFormCountMismatch`] when a numerus message does not
    /// have one form per plural category of its locale.
    pub fn new(catalog: Catalog) -> Result<Self, Error> {
        if catalog.locale.trim().is_empty() {
            return Err(Error::malformed("catalog does not declare a language"));
        }
        let locale = catalog.locale_key();
        let rule = plural_rules::resolve_rule(&locale);
        validation::validate_catalog(&catalog, rule)?;
        let index = CatalogIndex::build(&catalog);
        Ok(LoadedCatalog {
            catalog,
            index,
            rule,
            locale,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Plural rule of the catalog's locale.
    pub fn rule(&self) -> &'static PluralRule {
        self.rule
    }

    /// Normalized locale tag the catalog is registered under.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Message> {
        self.index
            .lookup(&self.catalog, context, source, disambiguation)
    }
}

/// Loads a TS document from memory.
///
/// # Example
///
/// ```rust
/// let handle = tscat::codec::load_catalog(
///     br#"<TS language="es_AR"><context><name>MediaView</name>
///         <message><source>of</source><translation>de</translation></message>
///         </context></TS>"#,
/// )?;
/// assert_eq!(handle.locale(), "es-AR");
/// assert!(handle.lookup("MediaView", "of", None).is_some());
/// # Ok::<(), tscat::Error>(())
/// ```
pub fn load_catalog(bytes: &[u8]) -> Result<CatalogHandle, Error> {
    load_catalog_with(bytes, &LoadOptions::default())
}

/// Loads a document from memory with explicit options.
pub fn load_catalog_with(bytes: &[u8], options: &LoadOptions) -> Result<CatalogHandle, Error> {
    let mut catalog = options.format.parse(bytes)?;
    apply_language_hint(&mut catalog, options.language_hint.as_deref());
    LoadedCatalog::new(catalog).map(Arc::new)
}

/// Reads a catalog file without validating it.
///
/// The format comes from the file extension, or from `options` when the
/// extension is not recognized. A document without a locale takes the
/// language hint, or else the locale encoded in the file name.
pub fn read_catalog<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Catalog, Error> {
    let path = path.as_ref();
    let format = infer_format_from_extension(path).unwrap_or(options.format);
    let bytes = fs::read(path)?;
    let mut catalog = format.parse(&bytes)?;
    let hint = options
        .language_hint
        .clone()
        .or_else(|| locale::infer_locale_from_path(path));
    apply_language_hint(&mut catalog, hint.as_deref());
    Ok(catalog)
}

/// Reads, validates and indexes a catalog file.
pub fn read_catalog_file<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<CatalogHandle, Error> {
    LoadedCatalog::new(read_catalog(path, options)?).map(Arc::new)
}

fn apply_language_hint(catalog: &mut Catalog, hint: Option<&str>) {
    if catalog.locale.trim().is_empty() {
        if let Some(hint) = hint {
            catalog.locale = hint.to_string();
        }
    }
}

/// Infers the document format from a file extension.
///
/// # Example
/// ```rust
/// use tscat::{codec::infer_format_from_extension, formats::FormatType};
/// assert_eq!(infer_format_from_extension("locale/es_AR.ts"), Some(FormatType::Ts));
/// assert_eq!(infer_format_from_extension("es_AR.json"), Some(FormatType::Json));
/// assert_eq!(infer_format_from_extension("es_AR.qm"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    match path.as_ref().extension().and_then(|s| s.to_str()) {
        Some("ts") => Some(FormatType::Ts),
        Some("json") => Some(FormatType::Json),
        _ => None,
    }
}

/// Converts a catalog between formats, both inferred from the extensions.
///
/// # Example
/// ```rust,no_run
/// tscat::convert("locale/es_AR.ts", "es_AR.json")?;
/// # Ok::<(), tscat::Error>(())
/// ```
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<(), Error> {
    let input = input.as_ref();
    let output = output.as_ref();
    let input_format = infer_format_from_extension(input).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "cannot infer input format from extension: {:?}",
            input.extension()
        ))
    })?;
    let output_format = infer_format_from_extension(output).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "cannot infer output format from extension: {:?}",
            output.extension()
        ))
    })?;

    let catalog = read_catalog(input, &LoadOptions::new().with_format(input_format))?;
    let file = fs::File::create(output)?;
    let mut writer = std::io::BufWriter::new(file);
    output_format.write(&catalog, &mut writer)?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}
