//! Content-addressed message identity.

use std::fmt;

/// Identity of a message: `(context, source text, disambiguation)`.
///
/// Two messages with equal keys are the same logical message regardless of
/// their locations or translation state. An empty disambiguation note is
/// the same as no note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    context: String,
    source: String,
    disambiguation: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        disambiguation: Option<String>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            disambiguation: normalize_note(disambiguation),
        }
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source)?;
        if let Some(note) = &self.disambiguation {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Collapse `Some("")` to `None` so that optional notes compare by meaning.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_disambiguation_is_no_disambiguation() {
        let a = MessageKey::new("Ctx", "Open", Some(String::new()));
        let b = MessageKey::new("Ctx", "Open", None);
        assert_eq!(a, b);
        assert_eq!(a.disambiguation(), None);
    }

    #[test]
    fn disambiguation_is_part_of_identity() {
        let verb = MessageKey::new("Menu", "Open", Some("verb".into()));
        let adjective = MessageKey::new("Menu", "Open", Some("adjective".into()));
        assert_ne!(verb, adjective);
    }

    #[test]
    fn display_quotes_source() {
        let key = MessageKey::new("Menu", "Open", Some("verb".into()));
        assert_eq!(key.to_string(), "Menu::\"Open\" (verb)");
    }
}
