//! Section builder.
//!
//! Folds the lexer's segment stream into typed layout sections. A break
//! marker closes the open section, emits a standalone divider and sets the
//! style of the section that FOLLOWS it. Authored documents depend on that
//! ordering, so the style is never applied backwards.

use serde::{Deserialize, Serialize};

use crate::lexer::{self, Segment};
use crate::marker::{Alignment, MarkerKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Trimmed lines joined by `\n`. Empty for a pure divider.
    pub content: String,
    pub style: Alignment,
    pub is_break: bool,
    pub is_header: bool,
}

impl LayoutSection {
    pub fn divider() -> Self {
        Self {
            content: String::new(),
            style: Alignment::Right,
            is_break: true,
            is_header: false,
        }
    }

    pub fn text(content: impl Into<String>, style: Alignment) -> Self {
        Self {
            content: content.into(),
            style,
            is_break: false,
            is_header: false,
        }
    }

    /// Headers are centred; the header role replaces any alignment.
    pub fn header(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: Alignment::Center,
            is_break: false,
            is_header: true,
        }
    }

    /// Non-blank lines, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    pub fn has_content(&self) -> bool {
        self.lines().next().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Current {
    Aligned(Alignment),
    Header,
}

struct Fold {
    current: Current,
    open: Option<LayoutSection>,
    sections: Vec<LayoutSection>,
}

impl Fold {
    fn new() -> Self {
        Self {
            current: Current::Aligned(Alignment::Right),
            open: None,
            sections: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if let Some(section) = self.open.take() {
            self.sections.push(section);
        }
    }

    fn push_line(&mut self, line: &str) {
        match &mut self.open {
            Some(section) => {
                section.content.push('\n');
                section.content.push_str(line);
            }
            None => {
                self.open = Some(match self.current {
                    Current::Aligned(style) => LayoutSection::text(line, style),
                    Current::Header => LayoutSection::header(line),
                });
            }
        }
    }

    fn step(mut self, segment: &Segment<'_>) -> Self {
        match segment {
            Segment::Marker(marker) => match marker.kind {
                MarkerKind::Break(style) => {
                    self.flush();
                    self.sections.push(LayoutSection::divider());
                    self.current = Current::Aligned(style);
                }
                MarkerKind::Header => {
                    self.flush();
                    self.current = Current::Header;
                }
            },
            Segment::Text { text, .. } => {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    self.push_line(line);
                }
            }
        }
        self
    }

    fn finish(mut self) -> Vec<LayoutSection> {
        self.flush();
        self.sections
    }
}

pub(crate) fn build_sections(segments: &[Segment<'_>]) -> Vec<LayoutSection> {
    segments.iter().fold(Fold::new(), Fold::step).finish()
}

/// Parse raw marked text. Never fails; text without markers falls back to
/// one right-aligned section per paragraph.
pub fn parse(input: &str) -> Vec<LayoutSection> {
    let segments = lexer::lex(input);
    if !segments.iter().any(Segment::is_marker) {
        log::debug!("No markers found, splitting on paragraphs");
        return lexer::paragraphs(input)
            .into_iter()
            .map(|p| LayoutSection::text(p, Alignment::Right))
            .collect();
    }
    build_sections(&segments)
}
