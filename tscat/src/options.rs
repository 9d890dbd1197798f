//! Options for loading catalogs and resolving messages.

use crate::formats::FormatType;

/// Load behavior for [`crate::codec::load_catalog_with`] and the registry's
/// loading APIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Locale applied when the document does not declare one.
    pub language_hint: Option<String>,
    /// Document format of the input bytes.
    pub format: FormatType,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a language hint.
    pub fn with_language_hint(mut self, language_hint: Option<String>) -> Self {
        self.language_hint = language_hint;
        self
    }

    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = format;
        self
    }
}

/// Resolution behavior of a [`crate::registry::Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Locale that is active until [`crate::registry::Registry::set_active_locale`]
    /// is called.
    pub default_locale: String,
    /// Locales tried after the language-only step and before source text.
    pub fallback_locales: Vec<String>,
    /// When false, unfinished entries are never displayed.
    pub use_unfinished: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            default_locale: "en".to_string(),
            fallback_locales: Vec::new(),
            use_unfinished: true,
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn with_fallback_locales(mut self, locales: Vec<String>) -> Self {
        self.fallback_locales = locales;
        self
    }

    /// Enables/disables unfinished text as a last-resort candidate.
    pub fn with_unfinished(mut self, use_unfinished: bool) -> Self {
        self.use_unfinished = use_unfinished;
        self
    }
}
