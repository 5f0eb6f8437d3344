use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::TemplateError;
use crate::insert::insert_break;
use crate::lexer::{self, Segment};
use crate::marker::Alignment;
use crate::sections::{parse, LayoutSection};
use crate::template::{apply_template, TemplateMode, TemplatePattern};

/// Raw marked text, the single source of truth for a document.
///
/// Values are immutable: every edit returns a new `MarkedText`, and the
/// parsed sections are rebuilt on each call rather than cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkedText(String);

impl MarkedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len_chars(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> Vec<Segment<'_>> {
        lexer::lex(&self.0)
    }

    pub fn sections(&self) -> Vec<LayoutSection> {
        parse(&self.0)
    }

    pub fn apply_template(
        &self,
        pattern: &TemplatePattern,
    ) -> Result<(Self, TemplateMode), TemplateError> {
        let outcome = apply_template(&self.0, pattern)?;
        Ok((Self(outcome.text), outcome.mode))
    }

    /// Returns the new text and the char offset to put the caret back at.
    pub fn insert_break(&self, selection: Range<usize>, style: Alignment) -> (Self, usize) {
        let inserted = insert_break(&self.0, selection, style);
        (Self(inserted.text), inserted.caret)
    }

    pub fn strip_markers(&self) -> String {
        lexer::strip_markers(&self.0)
    }
}

impl From<String> for MarkedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for MarkedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for MarkedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_leave_original_untouched() {
        let original = MarkedText::from("a\n\nb");
        let pattern = TemplatePattern::new("p", vec![Alignment::Left], "").unwrap();
        let (styled, mode) = original.apply_template(&pattern).unwrap();
        assert_eq!(mode, TemplateMode::Insert { breaks: 1 });
        assert_eq!(original.as_str(), "a\n\nb");
        assert_eq!(styled.as_str(), "a\n\n||BREAK:left||\n\nb");

        let (inserted, caret) = original.insert_break(1..1, Alignment::Right);
        assert_eq!(original.as_str(), "a\n\nb");
        assert_eq!(inserted.sections().len(), 3);
        assert_eq!(caret, 14);
    }

    #[test]
    fn test_failed_template_keeps_text() {
        let original = MarkedText::from("one stanza");
        let pattern = TemplatePattern::new("p", vec![Alignment::Left], "").unwrap();
        assert!(original.apply_template(&pattern).is_err());
        assert_eq!(original.as_str(), "one stanza");
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let text = MarkedText::from("x||BREAK||y");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"x||BREAK||y\"");
    }
}
