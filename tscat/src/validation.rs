//! Load-time validation and non-fatal catalog lint.
//!
//! [`validate_catalog`] runs on every load and rejects catalogs the resolver
//! cannot serve. The `collect_*` functions report issues for tooling without
//! failing.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    error::Error,
    placeholder::{Placeholder, signature},
    plural_rules::PluralRule,
    types::{Catalog, MessageStatus, Translation},
};

/// A numerus message whose form count differs from its locale's category count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluralIssue {
    pub locale: String,
    pub context: String,
    pub source: String,
    pub expected: usize,
    pub found: usize,
}

impl From<PluralIssue> for Error {
    fn from(issue: PluralIssue) -> Self {
        Error::PluralFormCountMismatch {
            locale: issue.locale,
            context: issue.context,
            source_text: issue.source,
            expected: issue.expected,
            found: issue.found,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderIssueKind {
    /// The translation references `%k` but the source text does not.
    UnknownPositional,
    /// The source uses `%n` but this numerus form does not.
    MissingCount,
}

/// A translation whose placeholders do not line up with its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderIssue {
    pub locale: String,
    pub context: String,
    pub source: String,
    /// Form ordinal for numerus messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<usize>,
    pub token: String,
    pub kind: PlaceholderIssueKind,
}

/// Checks the shape the TS reader guarantees: unique context names, form
/// lists only on numerus messages and never empty, and no single-text body
/// on a numerus message. Obsolete messages are checked too.
pub fn check_structure(catalog: &Catalog) -> Result<(), Error> {
    let mut names: HashSet<&str> = HashSet::new();
    for context in &catalog.contexts {
        if !names.insert(context.name.as_str()) {
            return Err(
                Error::malformed("duplicate context name").located(Some(&context.name), None)
            );
        }
        for message in &context.messages {
            let problem = match (&message.translation, message.numerus) {
                (Some(Translation::Singular(_)), true) => {
                    "numerus message with a non-list translation body"
                }
                (Some(Translation::Plural(_)), false) => "plural forms in a non-numerus message",
                (Some(Translation::Plural(forms)), true) if forms.is_empty() => {
                    "empty plural form list"
                }
                _ => continue,
            };
            return Err(
                Error::malformed(problem).located(Some(&context.name), Some(&message.source))
            );
        }
    }
    Ok(())
}

/// Checks that no two non-obsolete messages of a context share their
/// `(source, comment)` identity.
pub fn check_unique_messages(catalog: &Catalog) -> Result<(), Error> {
    for context in &catalog.contexts {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for message in &context.messages {
            if message.status == MessageStatus::Obsolete {
                continue;
            }
            if !seen.insert((message.source.as_str(), message.comment.as_str())) {
                return Err(Error::malformed("duplicate message identity")
                    .located(Some(&context.name), Some(&message.source)));
            }
        }
    }
    Ok(())
}

/// Lists every non-obsolete message with plural forms whose form count does
/// not match `rule`.
pub fn collect_plural_issues(catalog: &Catalog, rule: &PluralRule) -> Vec<PluralIssue> {
    let locale = catalog.locale_key();
    catalog
        .messages()
        .filter(|(_, m)| m.status != MessageStatus::Obsolete)
        .filter_map(|(context, m)| {
            let forms = m.forms()?;
            (forms.len() != rule.category_count()).then(|| PluralIssue {
                locale: locale.clone(),
                context: context.to_string(),
                source: m.source.clone(),
                expected: rule.category_count(),
                found: forms.len(),
            })
        })
        .collect()
}

/// Fails with the first plural form count mismatch, if any.
pub fn validate_plural_forms(catalog: &Catalog, rule: &PluralRule) -> Result<(), Error> {
    match collect_plural_issues(catalog, rule).into_iter().next() {
        Some(issue) => Err(issue.into()),
        None => Ok(()),
    }
}

/// Lists translations whose placeholders disagree with their source text.
pub fn collect_placeholder_issues(catalog: &Catalog) -> Vec<PlaceholderIssue> {
    let locale = catalog.locale_key();
    let mut issues = Vec::new();
    for (context, message) in catalog.messages() {
        if message.status == MessageStatus::Obsolete {
            continue;
        }
        let source_sig = signature(&message.source);
        let forms: Vec<(Option<usize>, &str)> = match &message.translation {
            Some(Translation::Singular(text)) => vec![(None, text.as_str())],
            Some(Translation::Plural(forms)) => forms
                .iter()
                .enumerate()
                .map(|(i, f)| (Some(i), f.as_str()))
                .collect(),
            None => continue,
        };

        for (form, text) in forms {
            if text.is_empty() {
                continue;
            }
            let sig = signature(text);
            let mut push = |token: String, kind| {
                issues.push(PlaceholderIssue {
                    locale: locale.clone(),
                    context: context.to_string(),
                    source: message.source.clone(),
                    form,
                    token,
                    kind,
                })
            };
            for placeholder in sig.difference(&source_sig) {
                if let Placeholder::Positional(_) = placeholder {
                    push(placeholder.to_string(), PlaceholderIssueKind::UnknownPositional);
                }
            }
            if message.numerus
                && source_sig.contains(&Placeholder::Count)
                && !sig.contains(&Placeholder::Count)
            {
                push(Placeholder::Count.to_string(), PlaceholderIssueKind::MissingCount);
            }
        }
    }
    issues
}

/// Runs every load-time check.
pub fn validate_catalog(catalog: &Catalog, rule: &PluralRule) -> Result<(), Error> {
    check_structure(catalog)?;
    check_unique_messages(catalog)?;
    validate_plural_forms(catalog, rule)
}
