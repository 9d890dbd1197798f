//! Lookup index from `(context, source, disambiguation)` to a message.

use std::collections::HashMap;

use crate::types::{Catalog, Message, MessageStatus};

/// Position of a message inside its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagePosition {
    pub context: usize,
    pub message: usize,
}

#[derive(Debug, Clone)]
struct Slot {
    disambiguation: String,
    position: MessagePosition,
    obsolete: bool,
}

/// Maps message identity to its position in a catalog.
///
/// The index owns no message data; lookups borrow from the catalog it was
/// built from. Disambiguation is matched exactly: a lookup without one only
/// finds messages that carry no comment.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    contexts: HashMap<String, HashMap<String, Vec<Slot>>>,
    len: usize,
}

impl CatalogIndex {
    /// Indexes every message of `catalog`. When an obsolete message shares
    /// its identity with an active one, the active one wins.
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = CatalogIndex::default();
        for (ci, context) in catalog.contexts.iter().enumerate() {
            let by_source = index.contexts.entry(context.name.clone()).or_default();
            for (mi, message) in context.messages.iter().enumerate() {
                let slots = by_source.entry(message.source.clone()).or_default();
                let obsolete = message.status == MessageStatus::Obsolete;
                let position = MessagePosition {
                    context: ci,
                    message: mi,
                };
                match slots
                    .iter_mut()
                    .find(|slot| slot.disambiguation == message.comment)
                {
                    Some(slot) if slot.obsolete && !obsolete => {
                        slot.position = position;
                        slot.obsolete = false;
                    }
                    Some(_) => {}
                    None => {
                        slots.push(Slot {
                            disambiguation: message.comment.clone(),
                            position,
                            obsolete,
                        });
                        index.len += 1;
                    }
                }
            }
        }
        index
    }

    /// Position of the message with the given identity. `Some("")` is the
    /// same as `None`.
    pub fn position(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<MessagePosition> {
        let wanted = disambiguation.unwrap_or_default();
        self.contexts
            .get(context)?
            .get(source)?
            .iter()
            .find(|slot| slot.disambiguation == wanted)
            .map(|slot| slot.position)
    }

    /// Looks a message up in `catalog`, which must be the catalog this index
    /// was built from.
    pub fn lookup<'c>(
        &self,
        catalog: &'c Catalog,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&'c Message> {
        let position = self.position(context, source, disambiguation)?;
        catalog
            .contexts
            .get(position.context)?
            .messages
            .get(position.message)
    }

    /// Number of distinct identities indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Context;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("es_AR");
        let mut media = Context::new("MediaView");
        media
            .messages
            .push(Message::singular("of", "de").with_comment("Used in video parts, as in '2 of 3'"));
        media.messages.push(Message::singular("of", "sobre"));
        media
            .messages
            .push(Message::singular("Close", "Cerrar viejo").with_status(MessageStatus::Obsolete));
        media.messages.push(Message::singular("Close", "Cerrar"));
        catalog.contexts.push(media);
        let mut other = Context::new("MainWindow");
        other.messages.push(Message::singular("of", "del"));
        catalog.contexts.push(other);
        catalog
    }

    #[test]
    fn test_lookup_by_identity() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog);
        let found = index
            .lookup(&catalog, "MediaView", "of", Some("Used in video parts, as in '2 of 3'"))
            .unwrap();
        assert_eq!(found.translation.as_ref().unwrap().to_string(), "de");
    }

    #[test]
    fn test_disambiguation_is_exact() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog);
        let plain = index.lookup(&catalog, "MediaView", "of", None).unwrap();
        assert_eq!(plain.translation.as_ref().unwrap().to_string(), "sobre");
        let empty = index.lookup(&catalog, "MediaView", "of", Some("")).unwrap();
        assert_eq!(empty, plain);
        assert!(index.lookup(&catalog, "MediaView", "of", Some("other")).is_none());
    }

    #[test]
    fn test_contexts_are_isolated() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog);
        let other = index.lookup(&catalog, "MainWindow", "of", None).unwrap();
        assert_eq!(other.translation.as_ref().unwrap().to_string(), "del");
        assert!(index.lookup(&catalog, "Missing", "of", None).is_none());
    }

    #[test]
    fn test_active_message_wins_over_obsolete() {
        let catalog = catalog();
        let index = CatalogIndex::build(&catalog);
        let close = index.lookup(&catalog, "MediaView", "Close", None).unwrap();
        assert_eq!(close.status, MessageStatus::Translated);
        assert_eq!(
            index.position("MediaView", "Close", None),
            Some(MessagePosition {
                context: 0,
                message: 3
            })
        );
    }

    #[test]
    fn test_len() {
        let index = CatalogIndex::build(&catalog());
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        assert!(CatalogIndex::build(&Catalog::new("ja")).is_empty());
    }
}
