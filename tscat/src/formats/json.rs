//! JSON snapshots of the catalog model.
//!
//! The document is the serde form of [`Catalog`]. Statuses are re-derived
//! after decoding, so a hand-edited snapshot cannot mark an empty translation
//! as finished. A snapshot must also have a shape the TS reader could have
//! produced.

use std::io::{BufRead, Write};

use crate::{error::Error, traits::Document, types::Catalog, validation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub catalog: Catalog,
}

impl Document for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut catalog: Catalog = serde_json::from_reader(reader)?;
        validation::check_structure(&catalog)?;
        catalog.normalize_statuses();
        Ok(Format { catalog })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.catalog)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<Format> for Catalog {
    fn from(value: Format) -> Self {
        value.catalog
    }
}

impl From<Catalog> for Format {
    fn from(value: Catalog) -> Self {
        Format { catalog: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Context, Message, MessageStatus};
    use indoc::indoc;

    #[test]
    fn test_parse_snapshot() {
        let json = indoc! {r#"
            {
              "locale": "es_AR",
              "contexts": [
                {
                  "name": "MediaView",
                  "messages": [
                    {
                      "source": "of",
                      "comment": "Used in video parts, as in '2 of 3'",
                      "translation": { "singular": "de" },
                      "status": "translated"
                    },
                    {
                      "source": "%n Download(s)",
                      "numerus": true,
                      "translation": { "plural": ["%n Descarga", ""] },
                      "status": "translated"
                    }
                  ]
                }
              ]
            }
        "#};
        let catalog = Catalog::from(Format::from_str(json).unwrap());
        let messages = &catalog.contexts[0].messages;
        assert_eq!(messages[0].status, MessageStatus::Translated);
        assert_eq!(messages[0].disambiguation(), Some("Used in video parts, as in '2 of 3'"));
        assert_eq!(messages[1].status, MessageStatus::Unfinished);
    }

    #[test]
    fn test_write_is_pretty() {
        let mut catalog = Catalog::new("ja");
        let mut context = Context::new("C");
        context.messages.push(Message::singular("Stop", "停止"));
        catalog.contexts.push(context);

        let out = String::from_utf8(Format::from(catalog).to_bytes().unwrap()).unwrap();
        assert!(out.contains("\n  \"locale\": \"ja\""));
        assert!(out.contains("停止"));
        assert!(out.ends_with("}\n"));
    }

    fn malformed_reason(json: &str) -> String {
        match Format::from_str(json) {
            Err(Error::MalformedCatalog { reason, .. }) => reason,
            other => panic!("expected malformed catalog, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bodies_the_ts_reader_cannot_produce() {
        let plural_on_plain = indoc! {r#"
            { "locale": "es", "contexts": [ { "name": "C", "messages": [
              { "source": "Stop", "translation": { "plural": ["Parar"] }, "status": "translated" }
            ] } ] }
        "#};
        assert_eq!(
            malformed_reason(plural_on_plain),
            "plural forms in a non-numerus message"
        );

        let singular_on_numerus = indoc! {r#"
            { "locale": "es", "contexts": [ { "name": "C", "messages": [
              { "source": "%n file(s)", "numerus": true, "translation": { "singular": "archivos" }, "status": "translated" }
            ] } ] }
        "#};
        assert_eq!(
            malformed_reason(singular_on_numerus),
            "numerus message with a non-list translation body"
        );

        let empty_forms = indoc! {r#"
            { "locale": "es", "contexts": [ { "name": "C", "messages": [
              { "source": "%n file(s)", "numerus": true, "translation": { "plural": [] }, "status": "translated" }
            ] } ] }
        "#};
        assert_eq!(malformed_reason(empty_forms), "empty plural form list");
    }

    #[test]
    fn test_rejects_duplicate_context_names() {
        let json = indoc! {r#"
            { "locale": "es", "contexts": [
              { "name": "C", "messages": [ { "source": "a", "translation": { "singular": "b" }, "status": "translated" } ] },
              { "name": "C", "messages": [] }
            ] }
        "#};
        assert_eq!(malformed_reason(json), "duplicate context name");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Format::from_str("{ not json"),
            Err(Error::Json(_))
        ));
    }
}
