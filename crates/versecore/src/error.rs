use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown alignment '{0}' (expected right, center, indent or left)")]
pub struct UnknownAlignment(pub String);

/// Failures of the template engine. The input text is never modified when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("a template needs at least 2 paragraphs separated by a blank line, found {found}")]
    TooFewParagraphs { found: usize },

    #[error("template '{name}' has no styles")]
    EmptyPattern { name: String },

    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },
}
