use ropey::Rope;
use std::ops::Range;

use crate::marker::Alignment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakInsertion {
    pub text: String,
    /// Char offset just past the inserted snippet, where the caret goes back to.
    pub caret: usize,
}

/// Insert a break marker at `selection.start`, replacing whatever the
/// selection covers. Offsets are char indices and are clamped to the text.
pub fn insert_break(input: &str, selection: Range<usize>, style: Alignment) -> BreakInsertion {
    let mut rope = Rope::from_str(input);
    let len = rope.len_chars();
    let start = selection.start.min(len);
    let end = selection.end.clamp(start, len);

    if selection.start > len || selection.end > len {
        log::warn!(
            "Caret range {:?} outside text of {} chars, clamped to {:?}",
            selection,
            len,
            start..end
        );
    }

    if start < end {
        rope.remove(start..end);
    }

    let literal = style.break_literal();
    rope.insert(start, &format!("\n\n{}\n\n", literal));

    BreakInsertion {
        text: rope.to_string(),
        caret: start + literal.chars().count() + 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{parse, LayoutSection};

    #[test]
    fn test_insert_at_caret() {
        let result = insert_break("firstsecond", 5..5, Alignment::Right);
        assert_eq!(result.text, "first\n\n||BREAK||\n\nsecond");
        assert_eq!(result.caret, 5 + 9 + 4);
    }

    #[test]
    fn test_styled_literal_and_caret() {
        let result = insert_break("ab", 1..1, Alignment::Indent);
        assert_eq!(result.text, "a\n\n||BREAK:indent||\n\nb");
        assert_eq!(result.caret, 1 + "||BREAK:indent||".len() + 4);
    }

    #[test]
    fn test_selection_is_replaced() {
        let result = insert_break("keep DROP keep", 5..9, Alignment::Center);
        assert_eq!(result.text, "keep \n\n||BREAK:center||\n\n keep");
    }

    #[test]
    fn test_caret_counts_chars_not_bytes() {
        // Each Persian letter is two bytes in UTF-8.
        let result = insert_break("دلبر", 2..2, Alignment::Left);
        assert_eq!(result.text, "دل\n\n||BREAK:left||\n\nبر");
        assert_eq!(result.caret, 2 + 14 + 4);
        let before_caret: String = result.text.chars().take(result.caret).collect();
        assert!(before_caret.ends_with("||BREAK:left||\n\n"));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let result = insert_break("abc", 10..20, Alignment::Right);
        assert_eq!(result.text, "abc\n\n||BREAK||\n\n");
        assert_eq!(result.caret, 3 + 9 + 4);

        let reversed = insert_break("abc", 2..1, Alignment::Right);
        assert_eq!(reversed.text, "ab\n\n||BREAK||\n\nc");
    }

    #[test]
    fn test_insert_then_reparse() {
        let input = "one\ntwo\n\nthree\nfour";
        let result = insert_break(input, 8..8, Alignment::Center);
        let sections = parse(&result.text);
        assert_eq!(
            sections,
            vec![
                LayoutSection::text("one\ntwo", Alignment::Right),
                LayoutSection::divider(),
                LayoutSection::text("three\nfour", Alignment::Center),
            ]
        );
    }
}
