//! All error types for the tscat crate.
//!
//! Errors are only produced while loading a catalog. Resolution never fails:
//! anomalies found while resolving are reported as [`crate::Diagnostic`]s.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The document does not have the structure of a translation catalog.
    #[error("malformed catalog{}: {reason}", Where(.context, .message))]
    MalformedCatalog {
        context: Option<String>,
        message: Option<String>,
        reason: String,
    },

    /// A numerus message carries a number of forms that differs from the
    /// number of plural categories of the catalog's locale.
    #[error(
        "plural form count mismatch in `{locale}` (context `{context}`, source `{source_text}`): expected {expected}, found {found}"
    )]
    PluralFormCountMismatch {
        locale: String,
        context: String,
        source_text: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a malformed-catalog error with no known location.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedCatalog {
            context: None,
            message: None,
            reason: reason.into(),
        }
    }

    /// Attaches the offending context (and message source text, when known)
    /// to a malformed-catalog error. Locations already set are kept.
    pub fn located(self, context: Option<&str>, message: Option<&str>) -> Self {
        match self {
            Error::MalformedCatalog {
                context: ctx,
                message: msg,
                reason,
            } => Error::MalformedCatalog {
                context: ctx.or_else(|| context.map(str::to_string)),
                message: msg.or_else(|| message.map(str::to_string)),
                reason,
            },
            other => other,
        }
    }

    /// Returns true for errors raised by load-time validation rather than by
    /// I/O or syntax.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MalformedCatalog { .. } | Error::PluralFormCountMismatch { .. }
        )
    }
}

struct Where<'a>(&'a Option<String>, &'a Option<String>);

impl fmt::Display for Where<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, self.1) {
            (Some(ctx), Some(msg)) => write!(f, " (context `{}`, message `{}`)", ctx, msg),
            (Some(ctx), None) => write!(f, " (context `{}`)", ctx),
            (None, Some(msg)) => write!(f, " (message `{}`)", msg),
            (None, None) => Ok(()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(quick_xml::Error::InvalidAttr(value))
    }
}
