use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::UnknownAlignment;

/// Literal written for a right-aligned break. Right is never written with a suffix.
pub const BREAK_LITERAL: &str = "||BREAK||";

/// Alignment a section is laid out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Right,
    Center,
    Indent,
    Left,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Right,
        Alignment::Center,
        Alignment::Indent,
        Alignment::Left,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Indent => "indent",
            Alignment::Left => "left",
        }
    }

    /// Resolve a marker suffix. Hand-edited and legacy content may carry
    /// anything after the colon, so unknown values fall back to `Right`.
    pub fn parse_lenient(suffix: &str) -> Self {
        suffix.trim().parse().unwrap_or_else(|_| {
            log::debug!("Unrecognised break style {:?}, using right", suffix);
            Alignment::Right
        })
    }

    /// The exact marker literal the authoring tools write for this style.
    pub fn break_literal(self) -> String {
        match self {
            Alignment::Right => BREAK_LITERAL.to_string(),
            other => format!("||BREAK:{}||", other.as_str()),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = UnknownAlignment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" => Ok(Alignment::Right),
            "center" => Ok(Alignment::Center),
            "indent" => Ok(Alignment::Indent),
            "left" => Ok(Alignment::Left),
            _ => Err(UnknownAlignment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Break(Alignment),
    Header,
}

/// A marker token found in raw text. `span` is a byte range into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub span: Range<usize>,
}

impl Marker {
    pub fn is_break(&self) -> bool {
        matches!(self.kind, MarkerKind::Break(_))
    }

    pub fn style(&self) -> Option<Alignment> {
        match self.kind {
            MarkerKind::Break(style) => Some(style),
            MarkerKind::Header => None,
        }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_literals() {
        assert_eq!(Alignment::Right.break_literal(), "||BREAK||");
        assert_eq!(Alignment::Center.break_literal(), "||BREAK:center||");
        assert_eq!(Alignment::Indent.break_literal(), "||BREAK:indent||");
        assert_eq!(Alignment::Left.break_literal(), "||BREAK:left||");
    }

    #[test]
    fn test_lenient_parse_defaults_to_right() {
        assert_eq!(Alignment::parse_lenient("center"), Alignment::Center);
        assert_eq!(Alignment::parse_lenient(" Indent "), Alignment::Indent);
        assert_eq!(Alignment::parse_lenient("right"), Alignment::Right);
        assert_eq!(Alignment::parse_lenient("justify"), Alignment::Right);
        assert_eq!(Alignment::parse_lenient(""), Alignment::Right);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("diagonal".parse::<Alignment>().is_err());
        assert_eq!("LEFT".parse::<Alignment>().unwrap(), Alignment::Left);
    }

    #[test]
    fn test_alignment_serde_is_lowercase() {
        let json = serde_json::to_string(&Alignment::Indent).unwrap();
        assert_eq!(json, "\"indent\"");
        let back: Alignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(back, Alignment::Center);
    }
}
