//! Core catalog types for tscat.
//! Format readers decode into these; the index and resolver read them.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::locale;

/// A parsed translation catalog for one locale.
///
/// Built once per load and never mutated after it has been handed to the
/// index; a reload produces a new `Catalog`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Catalog {
    /// Locale tag as spelled in the document (e.g. `es_AR`).
    pub locale: String,

    /// Language the source texts are written in, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_locale: Option<String>,

    /// Format version declared by the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub version: Option<String>,

    /// Legacy `<defaultcodec>` value, kept for round-trips.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub default_codec: Option<String>,

    /// Contexts in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl Catalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Catalog {
            locale: locale.into(),
            ..Default::default()
        }
    }

    /// Normalized BCP 47 form of [`Catalog::locale`], used as registry key.
    pub fn locale_key(&self) -> String {
        locale::normalize_tag(&self.locale)
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Iterates over every message together with the name of its context.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Re-applies the derived status rule to every message.
    ///
    /// Formats whose documents carry a free-form status (JSON snapshots edited
    /// by hand, for instance) call this after decoding.
    pub fn normalize_statuses(&mut self) {
        for context in &mut self.contexts {
            for message in &mut context.messages {
                message.status = MessageStatus::derive(message.status, message.translation.as_ref());
            }
        }
    }
}

/// A named group of messages, usually one per UI component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Context {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Context {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A single translatable message.
///
/// Identified within its context by `(source, comment)`; an empty comment
/// means the message carries no disambiguation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Message {
    /// Optional message id (id-based translation).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<String>,

    /// Original-language text, possibly containing `%1`, `%n` placeholders.
    pub source: String,

    /// Disambiguation comment; empty when absent.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub comment: String,

    /// Whether the message has count-dependent forms.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub numerus: bool,

    /// Translated text; `None` when the document has no translation body.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub translation: Option<Translation>,

    pub status: MessageStatus,

    /// Where the source text was extracted from. Informational only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Note from the developer to the translator.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub extra_comment: Option<String>,

    /// Note from the translator.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub translator_comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub old_source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub old_comment: Option<String>,
}

impl Message {
    /// Creates a translated, non-numerus message.
    pub fn singular(source: impl Into<String>, translation: impl Into<String>) -> Self {
        let translation = Translation::Singular(translation.into());
        Message {
            source: source.into(),
            status: MessageStatus::derive(MessageStatus::Translated, Some(&translation)),
            translation: Some(translation),
            ..Default::default()
        }
    }

    /// Creates a translated numerus message with forms in category order.
    pub fn plural(source: impl Into<String>, forms: Vec<String>) -> Self {
        let translation = Translation::Plural(forms);
        Message {
            source: source.into(),
            numerus: true,
            status: MessageStatus::derive(MessageStatus::Translated, Some(&translation)),
            translation: Some(translation),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets a stated status, subject to the derived status rule.
    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = MessageStatus::derive(status, self.translation.as_ref());
        self
    }

    pub fn disambiguation(&self) -> Option<&str> {
        (!self.comment.is_empty()).then_some(self.comment.as_str())
    }

    /// Plural forms, when the translation is a form list.
    pub fn forms(&self) -> Option<&[String]> {
        match &self.translation {
            Some(Translation::Plural(forms)) => Some(forms),
            _ => None,
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Message {{ source: {}, ", self.source)?;
        if !self.comment.is_empty() {
            write!(f, "comment: {}, ", self.comment)?;
        }
        match &self.translation {
            Some(t) => write!(f, "translation: {}, ", t)?,
            None => write!(f, "translation: <none>, ")?,
        }
        write!(f, "status: {} }}", self.status)
    }
}

/// Translated text: a single string or one string per plural category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Translation {
    Singular(String),
    /// Forms indexed by the plural-category ordinal of the catalog's locale.
    Plural(Vec<String>),
}

impl Translation {
    /// True when there is no displayable text: an empty string, an empty
    /// form list, or any empty form.
    pub fn is_empty(&self) -> bool {
        match self {
            Translation::Singular(value) => value.is_empty(),
            Translation::Plural(forms) => forms.is_empty() || forms.iter().any(String::is_empty),
        }
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Translation::Singular(value) => write!(f, "{}", value),
            Translation::Plural(forms) => write!(f, "[{}]", forms.join(" | ")),
        }
    }
}

/// Provenance of a message in the application's sources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub filename: Option<String>,

    /// Line as written; Qt uses relative values such as `+3` after the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub line: Option<String>,
}

/// Translation status of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Finished and authoritative.
    Translated,
    /// Not finished; used only as a last resort before source text.
    #[default]
    Unfinished,
    /// No longer present in the sources; never displayed.
    Obsolete,
}

impl MessageStatus {
    /// Applies the derived status rule: a non-obsolete message without
    /// displayable text is unfinished whatever its stated status.
    pub fn derive(stated: MessageStatus, translation: Option<&Translation>) -> MessageStatus {
        match stated {
            MessageStatus::Obsolete => MessageStatus::Obsolete,
            _ if translation.is_none_or(Translation::is_empty) => MessageStatus::Unfinished,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Translated => "translated",
            MessageStatus::Unfinished => "unfinished",
            MessageStatus::Obsolete => "obsolete",
        }
    }
}

impl Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    /// Parses a status name, including the spellings used by TS documents
    /// (`finished`, `vanished`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "translated" | "finished" => Ok(MessageStatus::Translated),
            "unfinished" => Ok(MessageStatus::Unfinished),
            "obsolete" | "vanished" => Ok(MessageStatus::Obsolete),
            _ => Err(format!("Unknown message status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new("es_AR");
        let mut media = Context::new("MediaView");
        media.messages.push(Message::singular("of", "de").with_comment("video parts"));
        media.messages.push(Message::singular("Continue", "Continuar"));
        catalog.contexts.push(media);
        let mut downloads = Context::new("DownloadManager");
        downloads.messages.push(Message::plural(
            "%n Download(s)",
            vec!["%n Descarga".into(), "%n Descargas".into()],
        ));
        catalog.contexts.push(downloads);
        catalog
    }

    #[test]
    fn test_locale_key_is_normalized() {
        assert_eq!(Catalog::new("es_AR").locale_key(), "es-AR");
        assert_eq!(Catalog::new("ja").locale_key(), "ja");
    }

    #[test]
    fn test_messages_iterates_in_document_order() {
        let catalog = sample_catalog();
        let collected: Vec<(&str, &str)> = catalog
            .messages()
            .map(|(ctx, m)| (ctx, m.source.as_str()))
            .collect();
        assert_eq!(
            collected,
            vec![
                ("MediaView", "of"),
                ("MediaView", "Continue"),
                ("DownloadManager", "%n Download(s)"),
            ]
        );
        assert_eq!(catalog.message_count(), 3);
        assert!(catalog.context("MediaView").is_some());
        assert!(catalog.context("Missing").is_none());
    }

    #[test]
    fn test_derive_empty_translation_is_unfinished() {
        let empty = Translation::Singular(String::new());
        assert_eq!(
            MessageStatus::derive(MessageStatus::Translated, Some(&empty)),
            MessageStatus::Unfinished
        );
        assert_eq!(
            MessageStatus::derive(MessageStatus::Translated, None),
            MessageStatus::Unfinished
        );
    }

    #[test]
    fn test_derive_keeps_obsolete() {
        assert_eq!(
            MessageStatus::derive(MessageStatus::Obsolete, None),
            MessageStatus::Obsolete
        );
    }

    #[test]
    fn test_derive_keeps_stated_unfinished_with_text() {
        let text = Translation::Singular("Hola".into());
        assert_eq!(
            MessageStatus::derive(MessageStatus::Unfinished, Some(&text)),
            MessageStatus::Unfinished
        );
        assert_eq!(
            MessageStatus::derive(MessageStatus::Translated, Some(&text)),
            MessageStatus::Translated
        );
    }

    #[test]
    fn test_plural_with_empty_form_is_empty() {
        assert!(Translation::Plural(vec!["a".into(), String::new()]).is_empty());
        assert!(Translation::Plural(vec![]).is_empty());
        assert!(!Translation::Plural(vec!["a".into(), "b".into()]).is_empty());
    }

    #[test]
    fn test_message_constructors() {
        let message = Message::singular("of", "de").with_comment("video parts");
        assert_eq!(message.status, MessageStatus::Translated);
        assert_eq!(message.disambiguation(), Some("video parts"));
        assert!(message.forms().is_none());

        let message = Message::plural("%n file(s)", vec!["%n archivo".into(), String::new()]);
        assert!(message.numerus);
        assert_eq!(message.status, MessageStatus::Unfinished);
        assert_eq!(message.forms().map(<[String]>::len), Some(2));
        assert_eq!(message.disambiguation(), None);
    }

    #[test]
    fn test_with_status_applies_derived_rule() {
        let message = Message::singular("Close", "").with_status(MessageStatus::Translated);
        assert_eq!(message.status, MessageStatus::Unfinished);
        let message = Message::singular("Close", "Cerrar").with_status(MessageStatus::Obsolete);
        assert_eq!(message.status, MessageStatus::Obsolete);
    }

    #[test]
    fn test_normalize_statuses() {
        let mut catalog = sample_catalog();
        catalog.contexts[0].messages[1].translation = Some(Translation::Singular(String::new()));
        catalog.normalize_statuses();
        assert_eq!(
            catalog.contexts[0].messages[1].status,
            MessageStatus::Unfinished
        );
        assert_eq!(
            catalog.contexts[0].messages[0].status,
            MessageStatus::Translated
        );
    }

    #[test]
    fn test_message_status_from_str() {
        assert_eq!(
            MessageStatus::from_str("unfinished").unwrap(),
            MessageStatus::Unfinished
        );
        assert_eq!(
            MessageStatus::from_str("vanished").unwrap(),
            MessageStatus::Obsolete
        );
        assert_eq!(
            MessageStatus::from_str("OBSOLETE").unwrap(),
            MessageStatus::Obsolete
        );
        assert_eq!(
            MessageStatus::from_str("finished").unwrap(),
            MessageStatus::Translated
        );
        assert!(MessageStatus::from_str("reviewed").is_err());
    }

    #[test]
    fn test_message_display() {
        let message = Message::singular("of", "de").with_comment("video parts");
        let display = message.to_string();
        assert!(display.contains("source: of"));
        assert!(display.contains("comment: video parts"));
        assert!(display.contains("status: translated"));
    }

    #[test]
    fn test_catalog_serde_roundtrip() {
        let catalog = sample_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
