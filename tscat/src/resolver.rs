//! Fallback resolution over a chain of catalogs.
//!
//! Walks the chain in order. A translated entry ends the walk. The first
//! unfinished entry with text is remembered and used only when the chain runs
//! out. With nothing usable the source text itself is rendered. Every path
//! ends in a string; anomalies are returned as [`Diagnostic`]s.

use std::collections::HashMap;

use crate::{
    codec::{CatalogHandle, LoadedCatalog},
    locale::FallbackChain,
    options::ResolverOptions,
    placeholder::{UnresolvedPlaceholder, interpolate_detailed},
    plural_rules::PluralRule,
    types::{Message, MessageStatus, Translation},
};

/// What to resolve.
///
/// # Example
///
/// ```rust
/// use tscat::Request;
///
/// let request = Request::new("DownloadManager", "%n Download(s)").with_count(3);
/// assert_eq!(request.count, Some(3));
/// assert_eq!(request.disambiguation, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub context: &'a str,
    pub source: &'a str,
    pub disambiguation: Option<&'a str>,
    pub count: Option<u64>,
    pub args: &'a [&'a str],
}

impl<'a> Request<'a> {
    pub fn new(context: &'a str, source: &'a str) -> Self {
        Request {
            context,
            source,
            disambiguation: None,
            count: None,
            args: &[],
        }
    }

    pub fn with_disambiguation(mut self, disambiguation: Option<&'a str>) -> Self {
        self.disambiguation = disambiguation;
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_args(mut self, args: &'a [&'a str]) -> Self {
        self.args = args;
        self
    }
}

/// Terminal state of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A finished translation from the catalog of `locale`.
    Translated { locale: String },
    /// Unfinished text from `locale`, used because nothing better was found.
    Unfinished { locale: String },
    /// The request's source text.
    SourceFallback,
}

/// Non-fatal anomaly observed while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnresolvedPlaceholder(UnresolvedPlaceholder),
    /// The displayed text is marked unfinished in `locale`.
    UnfinishedTranslation { locale: String },
    /// No catalog on the chain had a usable entry.
    MissingTranslation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_translated(&self) -> bool {
        matches!(self.outcome, Outcome::Translated { .. })
    }
}

/// Resolves `request` along `chain` against `catalogs`, keyed by normalized
/// locale tag.
pub fn resolve_with(
    catalogs: &HashMap<String, CatalogHandle>,
    chain: &FallbackChain,
    request: &Request<'_>,
    options: &ResolverOptions,
) -> Resolution {
    let mut candidate: Option<(&str, &str)> = None;

    for locale in chain.locales() {
        let Some(handle) = catalogs.get(locale) else {
            continue;
        };
        let Some(message) =
            handle.lookup(request.context, request.source, request.disambiguation)
        else {
            continue;
        };
        match message.status {
            MessageStatus::Translated => {
                if let Some(text) = select_text(handle, message, request.count) {
                    return render(
                        text,
                        request,
                        Outcome::Translated {
                            locale: locale.to_string(),
                        },
                        Vec::new(),
                    );
                }
            }
            MessageStatus::Unfinished if options.use_unfinished && candidate.is_none() => {
                candidate = select_text(handle, message, request.count).map(|t| (locale, t));
            }
            _ => {}
        }
    }

    if let Some((locale, text)) = candidate {
        tracing::debug!(
            context = request.context,
            source = request.source,
            locale,
            "using unfinished translation"
        );
        return render(
            text,
            request,
            Outcome::Unfinished {
                locale: locale.to_string(),
            },
            vec![Diagnostic::UnfinishedTranslation {
                locale: locale.to_string(),
            }],
        );
    }

    tracing::debug!(
        context = request.context,
        source = request.source,
        locale = chain.requested(),
        "no translation found, falling back to source text"
    );
    render(
        request.source,
        request,
        Outcome::SourceFallback,
        vec![Diagnostic::MissingTranslation],
    )
}

/// Text to display for `message`, or `None` when the selected form is empty.
fn select_text<'m>(
    handle: &LoadedCatalog,
    message: &'m Message,
    count: Option<u64>,
) -> Option<&'m str> {
    let text = match message.translation.as_ref()? {
        Translation::Singular(text) => text.as_str(),
        Translation::Plural(forms) => {
            let ordinal = form_ordinal(handle.rule(), count);
            forms.get(ordinal)?.as_str()
        }
    };
    (!text.is_empty()).then_some(text)
}

fn form_ordinal(rule: &PluralRule, count: Option<u64>) -> usize {
    match count {
        Some(n) => rule.ordinal(n),
        None => rule.countless_ordinal(),
    }
}

fn render(
    template: &str,
    request: &Request<'_>,
    outcome: Outcome,
    mut diagnostics: Vec<Diagnostic>,
) -> Resolution {
    let interpolated = interpolate_detailed(template, request.args, request.count);
    for missing in interpolated.unresolved {
        tracing::warn!(
            token = %missing.token,
            context = request.context,
            source = request.source,
            args = request.args.len(),
            "unresolved placeholder left in output"
        );
        diagnostics.push(Diagnostic::UnresolvedPlaceholder(missing));
    }
    Resolution {
        text: interpolated.text,
        outcome,
        diagnostics,
    }
}
