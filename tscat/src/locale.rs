//! Locale tag normalization and fallback chains.
//!
//! Catalogs spell locales the Qt way (`es_AR`); lookups are keyed by the BCP 47
//! spelling (`es-AR`). Every place that compares tags goes through
//! [`normalize_tag`] so both spellings reach the same catalog and plural rule.

use std::{path::Path, str::FromStr};

use unic_langid::LanguageIdentifier;

/// Normalizes a locale tag into its BCP 47 spelling.
///
/// Underscores become hyphens and the tag is canonicalized with
/// `unic-langid`. A tag that does not parse is lowercased and returned with
/// hyphens so it can still serve as a key.
///
/// # Examples
///
/// ```rust
/// use tscat::locale::normalize_tag;
///
/// assert_eq!(normalize_tag("es_AR"), "es-AR");
/// assert_eq!(normalize_tag("zh_hant_tw"), "zh-Hant-TW");
/// assert_eq!(normalize_tag("Not A Tag"), "not a tag");
/// ```
pub fn normalize_tag(tag: &str) -> String {
    let candidate = tag.trim().replace('_', "-");
    match LanguageIdentifier::from_str(&candidate) {
        Ok(id) => id.to_string(),
        Err(_) => candidate.to_ascii_lowercase(),
    }
}

/// Normalizes a POSIX-style environment locale (`es_AR.UTF-8@euro`).
///
/// Returns `None` for empty values and for `C`/`POSIX`, which carry no
/// language.
pub fn normalize_env_locale(raw: &str) -> Option<String> {
    let stripped = raw.trim().split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() || stripped == "C" || stripped == "POSIX" {
        return None;
    }
    let candidate = stripped.replace('_', "-");
    LanguageIdentifier::from_str(&candidate)
        .ok()
        .map(|id| id.to_string())
}

/// Language-only form of a tag (`es-AR` → `es`).
pub fn language_only(tag: &str) -> String {
    let normalized = normalize_tag(tag);
    match LanguageIdentifier::from_str(&normalized) {
        Ok(id) => id.language.as_str().to_string(),
        Err(_) => normalized
            .split('-')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Infers a locale tag from a catalog file name, following the Qt naming
/// convention `<app>_<lang>[_<REGION>].ts`.
///
/// # Examples
///
/// ```rust
/// use tscat::locale::infer_locale_from_path;
///
/// assert_eq!(infer_locale_from_path("locale/es_AR.ts"), Some("es-AR".to_string()));
/// assert_eq!(infer_locale_from_path("i18n/myapp_ja.ts"), Some("ja".to_string()));
/// assert_eq!(infer_locale_from_path("translations.ts"), None);
/// ```
pub fn infer_locale_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let parts: Vec<&str> = stem.split('_').collect();
    // The language subtag is the rightmost lowercase 2-3 letter part; region
    // and script parts after it are written with capitals.
    (0..parts.len()).rev().find_map(|start| {
        let part = parts[start];
        let is_language = (2..=3).contains(&part.len())
            && part.bytes().all(|b| b.is_ascii_lowercase());
        if !is_language {
            return None;
        }
        LanguageIdentifier::from_str(&parts[start..].join("-"))
            .ok()
            .map(|id| id.to_string())
    })
}

/// One step of a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStep {
    /// Look up the catalog registered under this normalized tag.
    Locale(String),
    /// Terminal step: the message's source text.
    Source,
}

/// Ordered list of places to look for a translation.
///
/// Built once per requested locale: the full tag, the language plus script
/// when both a script and a region are present, the bare language, any
/// configured extra locales, then source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    requested: String,
    steps: Vec<ChainStep>,
}

impl FallbackChain {
    pub fn new(requested: &str) -> Self {
        Self::with_extra_locales::<&str>(requested, &[])
    }

    pub fn with_extra_locales<S: AsRef<str>>(requested: &str, extra: &[S]) -> Self {
        let normalized = normalize_tag(requested);
        let mut tags: Vec<String> = Vec::new();
        let mut push = |tag: String| {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        };

        push(normalized.clone());
        if let Ok(id) = LanguageIdentifier::from_str(&normalized) {
            if let (Some(script), Some(_)) = (id.script, id.region) {
                push(format!("{}-{}", id.language, script));
            }
            push(id.language.as_str().to_string());
        } else {
            push(language_only(&normalized));
        }
        for tag in extra {
            push(normalize_tag(tag.as_ref()));
        }

        let mut steps: Vec<ChainStep> = tags.into_iter().map(ChainStep::Locale).collect();
        steps.push(ChainStep::Source);
        FallbackChain {
            requested: normalized,
            steps,
        }
    }

    /// The normalized tag the chain was built for.
    pub fn requested(&self) -> &str {
        &self.requested
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Locale steps only, in order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            ChainStep::Locale(tag) => Some(tag.as_str()),
            ChainStep::Source => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("es_AR"), "es-AR");
        assert_eq!(normalize_tag("es-ar"), "es-AR");
        assert_eq!(normalize_tag(" ja "), "ja");
        assert_eq!(normalize_tag("pt_BR"), "pt-BR");
    }

    #[test]
    fn test_normalize_env_locale() {
        assert_eq!(normalize_env_locale("es_AR.UTF-8"), Some("es-AR".to_string()));
        assert_eq!(normalize_env_locale("sr_RS@latin"), Some("sr-RS".to_string()));
        assert_eq!(normalize_env_locale("C"), None);
        assert_eq!(normalize_env_locale("POSIX"), None);
        assert_eq!(normalize_env_locale(""), None);
    }

    #[test]
    fn test_language_only() {
        assert_eq!(language_only("es_AR"), "es");
        assert_eq!(language_only("ja"), "ja");
        assert_eq!(language_only("zh-Hant-TW"), "zh");
    }

    #[test]
    fn test_infer_locale_from_path() {
        assert_eq!(
            infer_locale_from_path("locale/ja_JP.ts"),
            Some("ja-JP".to_string())
        );
        assert_eq!(
            infer_locale_from_path("minitube_es_AR.ts"),
            Some("es-AR".to_string())
        );
        assert_eq!(infer_locale_from_path("app_de.ts"), Some("de".to_string()));
        assert_eq!(infer_locale_from_path("noextension"), None);
    }

    #[test]
    fn test_chain_region_to_language_to_source() {
        let chain = FallbackChain::new("es_AR");
        assert_eq!(chain.requested(), "es-AR");
        assert_eq!(
            chain.steps(),
            &[
                ChainStep::Locale("es-AR".to_string()),
                ChainStep::Locale("es".to_string()),
                ChainStep::Source,
            ]
        );
    }

    #[test]
    fn test_chain_language_only_is_not_duplicated() {
        let chain = FallbackChain::new("ja");
        assert_eq!(
            chain.steps(),
            &[ChainStep::Locale("ja".to_string()), ChainStep::Source]
        );
    }

    #[test]
    fn test_chain_with_script_and_region() {
        let chain = FallbackChain::new("zh_Hant_TW");
        let locales: Vec<&str> = chain.locales().collect();
        assert_eq!(locales, vec!["zh-Hant-TW", "zh-Hant", "zh"]);
    }

    #[test]
    fn test_chain_with_extra_locales() {
        let chain = FallbackChain::with_extra_locales("es_AR", &["en", "es"]);
        let locales: Vec<&str> = chain.locales().collect();
        assert_eq!(locales, vec!["es-AR", "es", "en"]);
        assert_eq!(chain.steps().last(), Some(&ChainStep::Source));
    }
}
