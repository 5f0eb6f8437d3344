//! Terminal rendering of laid-out verse.
//!
//! Consumes the blocks produced by `versecore::layout` and turns them into
//! padded ratatui lines for a fixed-width column. The text is right to left,
//! so right alignment hugs the right edge and the verse-number gutter sits
//! on the right, before the text starts.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use versecore::layout::{layout_with_anchors, Block, ContentBlock, Shape};
use versecore::{Alignment, LayoutSection, RenderConfig};

use crate::config::ReaderConfig;
use crate::text_width::{leading_padding, str_width, wrap_text};

/// Columns reserved for verse numbers when they are shown.
pub const GUTTER_WIDTH: usize = 5;

#[derive(Debug, Clone)]
pub struct ReaderStyle {
    pub width: usize,
    pub indent_width: usize,
    pub rule_glyph: String,
    pub highlight: Style,
    pub badge: Style,
}

impl ReaderStyle {
    pub fn from_config(reader: &ReaderConfig) -> Self {
        let highlight_bg = reader
            .highlight_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::Yellow);
        let badge_fg = reader
            .number_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::DarkGray);

        Self {
            width: reader.width as usize,
            indent_width: reader.indent_width as usize,
            rule_glyph: reader.rule_glyph.clone(),
            highlight: Style::default()
                .bg(highlight_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            badge: Style::default().fg(badge_fg),
        }
    }

    /// Same geometry, narrowed to the space actually available.
    pub fn fit_to(&self, available: usize) -> Self {
        let mut fitted = self.clone();
        fitted.width = self.width.min(available).max(1);
        fitted.indent_width = self.indent_width.min(fitted.width / 2);
        fitted
    }
}

/// Parse `#RRGGBB` or a basic colour name.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    match value.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// A rendered document: terminal rows plus where each verse starts.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub lines: Vec<Line<'static>>,
    /// First text row of each verse, indexed by verse.
    pub verse_rows: Vec<usize>,
}

impl Page {
    pub fn row_of(&self, verse: usize) -> Option<usize> {
        self.verse_rows.get(verse).copied()
    }

    pub fn verse_count(&self) -> usize {
        self.verse_rows.len()
    }

    /// Rows as plain strings, trailing whitespace trimmed.
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let row: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                row.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn render_page(sections: &[LayoutSection], config: &RenderConfig, style: &ReaderStyle) -> Page {
    let mut anchors = Vec::new();
    let blocks = layout_with_anchors(sections, config, |verse, block| {
        anchors.push((verse, block));
    });

    let gutter = if config.show_verse_numbers {
        GUTTER_WIDTH.min(style.width / 4)
    } else {
        0
    };

    let mut lines = Vec::new();
    let mut text_rows = Vec::with_capacity(blocks.len());

    for block in &blocks {
        match block {
            Block::Divider { margin, .. } => {
                push_blank(&mut lines, margin.rows());
                text_rows.push(lines.len());
                lines.push(rule(style, style.width));
                push_blank(&mut lines, margin.rows());
            }
            Block::Content(content) => {
                let row = push_content(&mut lines, content, config, style, gutter);
                text_rows.push(row);
            }
        }
    }

    let mut verse_rows = vec![0; anchors.len()];
    for (verse, block) in anchors {
        if let (Some(slot), Some(row)) = (verse_rows.get_mut(verse), text_rows.get(block)) {
            *slot = *row;
        }
    }

    Page { lines, verse_rows }
}

fn push_blank(lines: &mut Vec<Line<'static>>, count: usize) {
    lines.extend(std::iter::repeat_with(Line::default).take(count));
}

/// A rule of `span` cells, centered in the column.
fn rule(style: &ReaderStyle, span: usize) -> Line<'static> {
    let glyph_width = str_width(&style.rule_glyph).max(1);
    let count = span / glyph_width;
    let pad = style.width.saturating_sub(count * glyph_width) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(
            style.rule_glyph.repeat(count),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Returns the row the block's first line of text lands on.
fn push_content(
    lines: &mut Vec<Line<'static>>,
    block: &ContentBlock<'_>,
    config: &RenderConfig,
    style: &ReaderStyle,
    gutter: usize,
) -> usize {
    let (above, below) = block.spacing.rows(config.compact_mode);
    if block.framed {
        lines.push(rule(style, style.width / 3));
    }
    push_blank(lines, above);

    let column = style.width.saturating_sub(gutter);
    let text_style = if block.highlighted {
        style.highlight
    } else if block.is_header {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let text_row = lines.len();
    let rows = place_rows(block, column, style.indent_width);
    for (i, (pad, text)) in rows.into_iter().enumerate() {
        let mut spans = vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(text, text_style),
        ];
        if gutter > 0 {
            let badge = match block.badge {
                Some(number) if i == 0 => {
                    format!("  {:<width$}", number, width = gutter.saturating_sub(2))
                }
                _ => String::new(),
            };
            // Fill out to the column edge so the badge lines up.
            let used: usize = spans.iter().map(|s| str_width(&s.content)).sum();
            spans.push(Span::raw(" ".repeat(column.saturating_sub(used))));
            spans.push(Span::styled(badge, style.badge));
        }
        lines.push(Line::from(spans));
    }

    push_blank(lines, below);
    text_row
}

/// Leading padding and text for each terminal row of a block.
fn place_rows(block: &ContentBlock<'_>, column: usize, indent: usize) -> Vec<(usize, String)> {
    let alignment = if block.is_header {
        Alignment::Center
    } else {
        block.style
    };

    if block.shape == Shape::Couplet {
        let widths: Vec<usize> = block.lines.iter().map(|line| str_width(line)).collect();
        let unit = widths.iter().copied().max().unwrap_or(0);
        if unit <= column {
            // Hemistichs stack as one unit: the first against its right
            // edge, the second against its left.
            let start = leading_padding(unit, column, alignment, indent);
            return vec![
                (start + unit - widths[0], block.lines[0].to_string()),
                (start, block.lines[1].to_string()),
            ];
        }
    }

    block
        .lines
        .iter()
        .flat_map(|line| wrap_text(line, column))
        .map(|row| {
            let pad = leading_padding(str_width(&row), column, alignment, indent);
            (pad, row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use versecore::parse;

    fn plain_style(width: usize) -> ReaderStyle {
        ReaderStyle {
            width,
            indent_width: 4,
            rule_glyph: "-".to_string(),
            highlight: Style::default().add_modifier(Modifier::REVERSED),
            badge: Style::default(),
        }
    }

    #[test]
    fn test_two_line_header_is_a_centered_couplet() {
        let sections = parse("||HEADER||\nab\nabcdef");
        let page = render_page(&sections, &RenderConfig::default(), &plain_style(20));
        let text = page.to_plain_text();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], format!("{}ab", " ".repeat(11)));
        assert_eq!(rows[1], format!("{}abcdef", " ".repeat(7)));
        assert_eq!(page.verse_count(), 0);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FFD166"), Some(Color::Rgb(0xFF, 0xD1, 0x66)));
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#GG0000"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn test_page_layout() {
        let sections = parse("one\n||BREAK:center||\ntwo\nthree");
        let page = render_page(&sections, &RenderConfig::default(), &plain_style(20));
        let rows: Vec<String> = page.to_plain_text().lines().map(String::from).collect();

        let expected = vec![
            format!("{}one", " ".repeat(17)),
            String::new(),
            String::new(),
            String::new(),
            "-".repeat(20),
            String::new(),
            format!("{}{}", " ".repeat(7), "-".repeat(6)),
            String::new(),
            format!("{}two", " ".repeat(9)),
            format!("{}three", " ".repeat(7)),
        ];
        assert_eq!(rows, expected);
        assert_eq!(page.verse_rows, vec![0, 8]);
        assert_eq!(page.row_of(1), Some(8));
        assert_eq!(page.row_of(2), None);
    }

    #[test]
    fn test_compact_mode_tightens_rows() {
        let sections = parse("one\n||BREAK:center||\ntwo\nthree");
        let compact = RenderConfig {
            compact_mode: true,
            ..RenderConfig::default()
        };
        let regular = render_page(&sections, &RenderConfig::default(), &plain_style(20));
        let tight = render_page(&sections, &compact, &plain_style(20));
        assert!(tight.lines.len() < regular.lines.len());
        assert_eq!(tight.verse_count(), 2);
    }

    #[test]
    fn test_alignments_pad_from_the_right() {
        let style = plain_style(20);
        let config = RenderConfig::default();
        let pad = |alignment| {
            let sections = [LayoutSection::text("abcd", alignment)];
            let page = render_page(&sections, &config, &style);
            let row = page.to_plain_text();
            let first = row.lines().next().unwrap_or_default().to_string();
            first.len() - first.trim_start().len()
        };
        assert_eq!(pad(Alignment::Right), 16);
        assert_eq!(pad(Alignment::Indent), 12);
        assert_eq!(pad(Alignment::Center), 8);
        assert_eq!(pad(Alignment::Left), 0);
    }

    #[test]
    fn test_badges_in_right_gutter() {
        let sections = parse("alpha\n||BREAK||\nbeta");
        let config = RenderConfig {
            show_verse_numbers: true,
            ..RenderConfig::default()
        };
        let page = render_page(&sections, &config, &plain_style(20));
        let text = page.to_plain_text();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[page.verse_rows[0]], format!("{}alpha  1", " ".repeat(10)));
        assert_eq!(rows[page.verse_rows[1]], format!("{}beta  2", " ".repeat(11)));
    }

    #[test]
    fn test_highlight_style_follows_position() {
        let sections = parse("alpha\n||BREAK||\nbeta");
        let style = plain_style(20);
        let config = RenderConfig {
            highlight_current_verse: true,
            current_verse_index: Some(1),
            ..RenderConfig::default()
        };
        let page = render_page(&sections, &config, &style);
        let beta = &page.lines[page.verse_rows[1]];
        assert_eq!(beta.spans[1].content, "beta");
        assert_eq!(beta.spans[1].style, style.highlight);
        let alpha = &page.lines[page.verse_rows[0]];
        assert_eq!(alpha.spans[1].style, Style::default());
    }

    #[test]
    fn test_long_lines_wrap_inside_column() {
        let sections = [LayoutSection::text(
            "a long line of verse that will not fit",
            Alignment::Right,
        )];
        let page = render_page(&sections, &RenderConfig::default(), &plain_style(12));
        let text = page.to_plain_text();
        let rows: Vec<&str> = text.lines().filter(|r| !r.is_empty()).collect();
        assert!(rows.len() > 1);
        assert!(rows.iter().all(|r| str_width(r) <= 12));
    }

    #[test]
    fn test_header_is_bold_and_centered() {
        let sections = parse("||HEADER||\nTitle");
        let page = render_page(&sections, &RenderConfig::default(), &plain_style(21));
        let row = &page.lines[0];
        assert_eq!(row.spans[0].content.len(), 8);
        assert!(row.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(page.verse_rows.is_empty());
    }

    #[test]
    fn test_fit_to_narrows_geometry() {
        let style = plain_style(72).fit_to(30);
        assert_eq!(style.width, 30);
        assert_eq!(style.indent_width, 4);
        assert_eq!(plain_style(72).fit_to(0).width, 1);
    }
}
