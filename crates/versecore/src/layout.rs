//! Layout policy.
//!
//! Turns parsed sections into renderable blocks: divider placement, spacing
//! near breaks, couplet grouping and verse indexing. Output formats (HTML,
//! terminal) consume the blocks and decide how a spacing class looks.

use serde::{Deserialize, Serialize};

use crate::marker::Alignment;
use crate::sections::LayoutSection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub compact_mode: bool,
    pub highlight_current_verse: bool,
    /// Supplied by the playback position; `None` when nothing is playing.
    pub current_verse_index: Option<usize>,
    pub show_verse_numbers: bool,
}

impl RenderConfig {
    fn highlights(&self, verse: usize) -> bool {
        self.highlight_current_verse && self.current_verse_index == Some(verse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    Compact,
    Regular,
}

impl Margin {
    fn for_config(config: &RenderConfig) -> Self {
        if config.compact_mode {
            Margin::Compact
        } else {
            Margin::Regular
        }
    }

    /// Blank rows above and below a divider rule.
    pub fn rows(self) -> usize {
        match self {
            Margin::Compact => 0,
            Margin::Regular => 1,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Margin::Compact => "divider-compact",
            Margin::Regular => "divider-regular",
        }
    }
}

/// Spacing class of a content block, escalated next to breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Header,
    Regular,
    AfterBreak,
    BeforeBreak,
    Enclosed,
}

impl Spacing {
    fn classify(section: &LayoutSection, after_break: bool, before_break: bool) -> Self {
        if section.is_header {
            return Spacing::Header;
        }
        match (after_break, before_break) {
            (true, true) => Spacing::Enclosed,
            (true, false) => Spacing::AfterBreak,
            (false, true) => Spacing::BeforeBreak,
            (false, false) => Spacing::Regular,
        }
    }

    /// Blank rows `(above, below)` the block.
    pub fn rows(self, compact: bool) -> (usize, usize) {
        match (self, compact) {
            (Spacing::Header, _) => (0, 1),
            (Spacing::Regular, false) => (0, 1),
            (Spacing::Regular, true) => (0, 0),
            (Spacing::AfterBreak, false) => (1, 1),
            (Spacing::AfterBreak, true) => (1, 0),
            (Spacing::BeforeBreak, false) => (0, 2),
            (Spacing::BeforeBreak, true) => (0, 1),
            (Spacing::Enclosed, false) => (1, 2),
            (Spacing::Enclosed, true) => (1, 1),
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Spacing::Header => "spacing-header",
            Spacing::Regular => "spacing-regular",
            Spacing::AfterBreak => "spacing-after-break",
            Spacing::BeforeBreak => "spacing-before-break",
            Spacing::Enclosed => "spacing-enclosed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly two lines, stacked as one unit.
    Couplet,
    Lines,
}

impl Shape {
    pub fn of(lines: &[&str]) -> Self {
        if lines.len() == 2 {
            Shape::Couplet
        } else {
            Shape::Lines
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock<'a> {
    /// Position of the source section in the parsed list.
    pub section: usize,
    pub lines: Vec<&'a str>,
    pub style: Alignment,
    pub is_header: bool,
    pub spacing: Spacing,
    /// A divider rule directly before this block, closing the preceding break.
    pub framed: bool,
    pub shape: Shape,
    pub verse: Option<usize>,
    /// One-based number to show, when verse numbers are on.
    pub badge: Option<usize>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Divider { section: usize, margin: Margin },
    Content(ContentBlock<'a>),
}

fn is_verse(section: &LayoutSection) -> bool {
    !section.is_break && !section.is_header && section.has_content()
}

/// Zero-based verse index per section; `None` for dividers, headers and
/// sections without text. Depends only on the section list.
pub fn verse_indices(sections: &[LayoutSection]) -> Vec<Option<usize>> {
    let mut next = 0;
    sections
        .iter()
        .map(|section| {
            is_verse(section).then(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

pub fn layout<'a>(sections: &'a [LayoutSection], config: &RenderConfig) -> Vec<Block<'a>> {
    layout_with_anchors(sections, config, |_, _| {})
}

/// Like [`layout`], calling `on_anchor(verse, block_index)` for every verse
/// block so a scroll-sync collaborator can register where each verse lands.
pub fn layout_with_anchors<'a, F>(
    sections: &'a [LayoutSection],
    config: &RenderConfig,
    mut on_anchor: F,
) -> Vec<Block<'a>>
where
    F: FnMut(usize, usize),
{
    let verses = verse_indices(sections);
    let margin = Margin::for_config(config);
    let mut blocks = Vec::with_capacity(sections.len());

    for (i, section) in sections.iter().enumerate() {
        if section.is_break {
            if !section.content.trim().is_empty() {
                log::warn!(
                    "Break section {} carries stray content; rendering it as a divider",
                    i
                );
            }
            blocks.push(Block::Divider { section: i, margin });
            continue;
        }

        let lines: Vec<&str> = section.lines().collect();
        if lines.is_empty() {
            log::debug!("Skipping section {} without text", i);
            continue;
        }

        let after_break = i > 0 && sections[i - 1].is_break;
        let before_break = sections.get(i + 1).is_some_and(|next| next.is_break);
        let verse = verses[i];
        if let Some(verse) = verse {
            on_anchor(verse, blocks.len());
        }

        blocks.push(Block::Content(ContentBlock {
            section: i,
            style: section.style,
            is_header: section.is_header,
            spacing: Spacing::classify(section, after_break, before_break),
            framed: after_break && !section.is_header,
            shape: Shape::of(&lines),
            verse,
            badge: verse.filter(|_| config.show_verse_numbers).map(|v| v + 1),
            highlighted: verse.is_some_and(|v| config.highlights(v)),
            lines,
        }));
    }

    blocks
}
