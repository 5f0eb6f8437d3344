//! Marker lexer.
//!
//! Splits raw marked text into an ordered stream of plain-text and marker
//! segments. The stream is lossless: concatenating the spans of every segment
//! gives back the input byte for byte.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use crate::marker::{Alignment, Marker, MarkerKind};

lazy_static! {
    static ref MARKER: Regex =
        Regex::new(r"\|\|(?:(?P<brk>BREAK)(?::(?P<style>[^|\n]*))?|(?P<hdr>HEADER))\|\|")
            .expect("Invalid MARKER regex pattern");
    static ref PARAGRAPH_GAP: Regex =
        Regex::new(r"(?:\r?\n){2,}").expect("Invalid PARAGRAPH_GAP regex pattern");
    static ref EXCESS_NEWLINES: Regex =
        Regex::new(r"(?:[ \t]*\r?\n){3,}").expect("Invalid EXCESS_NEWLINES regex pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text { text: &'a str, span: Range<usize> },
    Marker(Marker),
}

impl Segment<'_> {
    pub fn span(&self) -> Range<usize> {
        match self {
            Segment::Text { span, .. } => span.clone(),
            Segment::Marker(marker) => marker.span.clone(),
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Segment::Marker(_))
    }
}

/// Scan `input` once, left to right.
pub fn lex(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for marker in markers(input) {
        if marker.span.start > cursor {
            segments.push(Segment::Text {
                text: &input[cursor..marker.span.start],
                span: cursor..marker.span.start,
            });
        }
        cursor = marker.span.end;
        segments.push(Segment::Marker(marker));
    }

    if cursor < input.len() {
        segments.push(Segment::Text {
            text: &input[cursor..],
            span: cursor..input.len(),
        });
    }

    segments
}

/// Every marker in `input`, in document order.
pub fn markers(input: &str) -> impl Iterator<Item = Marker> + '_ {
    MARKER.captures_iter(input).filter_map(|caps| {
        let whole = caps.get(0)?;
        let kind = if caps.name("hdr").is_some() {
            MarkerKind::Header
        } else {
            let style = caps
                .name("style")
                .map(|m| Alignment::parse_lenient(m.as_str()))
                .unwrap_or_default();
            MarkerKind::Break(style)
        };
        Some(Marker {
            kind,
            span: whole.range(),
        })
    })
}

pub fn has_markers(input: &str) -> bool {
    MARKER.is_match(input)
}

pub fn break_markers(input: &str) -> Vec<Marker> {
    markers(input).filter(Marker::is_break).collect()
}

/// Paragraph fallback: split on runs of two or more newlines, trim, drop blanks.
pub fn paragraphs(input: &str) -> Vec<&str> {
    PARAGRAPH_GAP
        .split(input)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Plain-text export. Each marker becomes a paragraph gap, the same shape
/// translated text comes back in.
pub fn strip_markers(input: &str) -> String {
    let gapped = MARKER.replace_all(input, "\n\n");
    EXCESS_NEWLINES
        .replace_all(&gapped, "\n\n")
        .trim()
        .to_string()
}
