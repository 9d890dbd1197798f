#![forbid(unsafe_code)]
//! Runtime resolution of Qt Linguist translation catalogs.
//!
//! tscat loads `.ts` catalogs, indexes their messages by
//! `(context, source, disambiguation)`, picks plural forms with per-locale
//! rules, expands `%1`/`%n` placeholders and falls back across a locale chain
//! (`es-AR` → `es` → source text) when a translation is missing or
//! unfinished.
//!
//! # Quick Start
//!
//! ```rust
//! use tscat::Registry;
//!
//! let registry = Registry::new();
//! registry.load_catalog(
//!     br#"<TS language="es_AR"><context><name>DownloadManager</name>
//!         <message numerus="yes"><source>%n Download(s)</source>
//!         <translation><numerusform>%n Descarga</numerusform><numerusform>%n Descargas</numerusform></translation>
//!         </message></context></TS>"#,
//! )?;
//! registry.set_active_locale("es_AR");
//!
//! let text = registry.resolve("DownloadManager", "%n Download(s)", None, Some(3), &[]);
//! assert_eq!(text, "3 Descargas");
//! # Ok::<(), tscat::Error>(())
//! ```
//!
//! Resolution never fails: a missing message yields its source text and an
//! unexpandable placeholder is left as written. Both are reported through
//! [`Resolution::diagnostics`] and logged with `tracing`.

pub mod codec;
pub mod error;
pub mod formats;
pub mod index;
pub mod locale;
pub mod options;
pub mod placeholder;
pub mod plural_rules;
pub mod registry;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{CatalogHandle, LoadedCatalog, convert, infer_format_from_extension, read_catalog_file},
    error::Error,
    formats::FormatType,
    locale::FallbackChain,
    options::{LoadOptions, ResolverOptions},
    placeholder::interpolate,
    plural_rules::{PluralCategory, PluralRule, Truncation, count_from_quantity, resolve_rule},
    registry::{Registry, active_locale, global, load_catalog, resolve, set_active_locale, tr},
    resolver::{Diagnostic, Outcome, Request, Resolution},
    types::{Catalog, Context, Message, MessageStatus, Translation},
};
