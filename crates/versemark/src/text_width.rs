//! Display-width helpers for aligning verse in a fixed-width terminal column.
//!
//! Widths are measured per grapheme cluster so Persian and Arabic combining
//! marks (zero width) and wide CJK or emoji clusters count correctly.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;
use versecore::Alignment;

/// Display width of a single grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() || grapheme.chars().all(|c| c.is_control()) {
        return 0;
    }

    // A cluster never occupies more than two cells, however many code
    // points (ZWJ sequences, marks) it is built from.
    let width: usize = grapheme.chars().map(|c| c.width().unwrap_or(0)).sum();
    width.min(2)
}

pub fn str_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Wrap `text` to at most `max_width` cells, preferring whitespace.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || str_width(text) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = str_width(word);
        let gap = usize::from(!current.is_empty());

        if current_width + gap + word_width <= max_width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
        } else {
            // A single word wider than the column is split by grapheme.
            for grapheme in word.graphemes(true) {
                let width = grapheme_width(grapheme);
                if current_width + width > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += width;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Leading padding that places a line of `line_width` cells in a column of
/// `width` cells. Text runs right to left, so `Right` hugs the right edge and
/// `Indent` sits `indent` cells in from it.
pub fn leading_padding(line_width: usize, width: usize, alignment: Alignment, indent: usize) -> usize {
    let free = width.saturating_sub(line_width);
    match alignment {
        Alignment::Right => free,
        Alignment::Indent => free.saturating_sub(indent),
        Alignment::Center => free / 2,
        Alignment::Left => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_width() {
        assert_eq!(str_width("Hello"), 5);
        assert_eq!(str_width("こんにちは"), 10);
        assert_eq!(str_width(""), 0);
        assert_eq!(str_width("\t"), 0);
    }

    #[test]
    fn test_combining_marks_take_no_space() {
        // "دَر" with a fatha on the first letter.
        assert_eq!(str_width("د\u{064E}ر"), 2);
        assert_eq!(str_width("دلبر"), 4);
    }

    #[test]
    fn test_wrap_prefers_whitespace() {
        let lines = wrap_text("از دل برود هر آنکه از دیده برفت", 12);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(str_width(line) <= 12, "{:?} is too wide", line);
        }
        assert_eq!(lines.join(" "), "از دل برود هر آنکه از دیده برفت");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(wrap_text("short", 20), vec!["short"]);
    }

    #[test]
    fn test_leading_padding() {
        assert_eq!(leading_padding(10, 30, Alignment::Right, 4), 20);
        assert_eq!(leading_padding(10, 30, Alignment::Indent, 4), 16);
        assert_eq!(leading_padding(10, 30, Alignment::Center, 4), 10);
        assert_eq!(leading_padding(10, 30, Alignment::Left, 4), 0);
        assert_eq!(leading_padding(40, 30, Alignment::Right, 4), 0);
    }
}
