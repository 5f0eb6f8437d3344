//! Template engine.
//!
//! A template is a named, cyclic sequence of alignments. Applying one either
//! restyles the break markers already in the text, or, when there are none,
//! inserts a break between every pair of paragraphs.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::TemplateError;
use crate::lexer;
use crate::marker::Alignment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePattern {
    pub name: String,
    pub styles: Vec<Alignment>,
    #[serde(default)]
    pub description: String,
}

impl TemplatePattern {
    pub fn new(
        name: impl Into<String>,
        styles: Vec<Alignment>,
        description: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let pattern = Self {
            name: name.into(),
            styles,
            description: description.into(),
        };
        pattern.validate()?;
        Ok(pattern)
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.styles.is_empty() {
            return Err(TemplateError::EmptyPattern {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Style for the `index`-th break, cycling through the pattern.
    pub fn style_at(&self, index: usize) -> Alignment {
        self.styles
            .get(index % self.styles.len().max(1))
            .copied()
            .unwrap_or_default()
    }
}

fn builtin(name: &str, styles: &[Alignment], description: &str) -> TemplatePattern {
    TemplatePattern {
        name: name.to_string(),
        styles: styles.to_vec(),
        description: description.to_string(),
    }
}

pub fn builtin_templates() -> Vec<TemplatePattern> {
    use crate::marker::Alignment::*;
    vec![
        builtin("classic", &[Right, Left], "Alternate right and left blocks"),
        builtin("centered", &[Center], "Every block centred"),
        builtin("stepped", &[Right, Indent], "Right blocks with indented answers"),
        builtin("cascade", &[Right, Center, Left], "Blocks flow right to left"),
        builtin("ghazal", &[Center, Right], "Centred refrain after each right block"),
    ]
}

/// Built-in templates plus any user templates from configuration.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    patterns: Vec<TemplatePattern>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self {
            patterns: builtin_templates(),
        }
    }
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add user templates. One with the same name as an existing template
    /// replaces it; empty patterns are skipped.
    pub fn extend(&mut self, patterns: impl IntoIterator<Item = TemplatePattern>) {
        for pattern in patterns {
            if let Err(e) = pattern.validate() {
                log::warn!("Skipping template: {}", e);
                continue;
            }
            match self
                .patterns
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&pattern.name))
            {
                Some(existing) => *existing = pattern,
                None => self.patterns.push(pattern),
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&TemplatePattern, TemplateError> {
        self.patterns
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TemplateError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    /// The template after `name`, wrapping around. Unknown names start at the first.
    pub fn next_after(&self, name: Option<&str>) -> Option<&TemplatePattern> {
        let position = name.and_then(|name| {
            self.patterns
                .iter()
                .position(|p| p.name.eq_ignore_ascii_case(name))
        });
        match position {
            Some(i) => self.patterns.get((i + 1) % self.patterns.len()),
            None => self.patterns.first(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplatePattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateMode {
    /// Existing break markers were restyled in place.
    Restyle { markers: usize },
    /// Breaks were inserted between paragraphs.
    Insert { breaks: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOutcome {
    pub text: String,
    pub mode: TemplateMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextEdit {
    range: Range<usize>,
    new_text: String,
}

/// Apply every edit in one pass, from the end of the text backwards, so no
/// recorded offset is invalidated by an earlier splice.
fn apply_edits(input: &str, mut edits: Vec<TextEdit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    let mut text = input.to_string();
    for edit in edits {
        text.replace_range(edit.range, &edit.new_text);
    }
    text
}

/// Apply `pattern` to `input`. Header markers are never retargeted.
pub fn apply_template(
    input: &str,
    pattern: &TemplatePattern,
) -> Result<TemplateOutcome, TemplateError> {
    pattern.validate()?;

    let breaks = lexer::break_markers(input);
    if breaks.is_empty() {
        return insert_breaks(input, pattern);
    }

    let edits: Vec<TextEdit> = breaks
        .iter()
        .enumerate()
        .map(|(i, marker)| TextEdit {
            range: marker.span.clone(),
            new_text: pattern.style_at(i).break_literal(),
        })
        .collect();

    log::debug!(
        "Restyling {} break markers with template '{}'",
        edits.len(),
        pattern.name
    );

    Ok(TemplateOutcome {
        text: apply_edits(input, edits),
        mode: TemplateMode::Restyle {
            markers: breaks.len(),
        },
    })
}

fn insert_breaks(input: &str, pattern: &TemplatePattern) -> Result<TemplateOutcome, TemplateError> {
    let paragraphs = lexer::paragraphs(input);
    if paragraphs.len() < 2 {
        return Err(TemplateError::TooFewParagraphs {
            found: paragraphs.len(),
        });
    }

    let mut text = String::with_capacity(input.len() + paragraphs.len() * 24);
    for (k, paragraph) in paragraphs.iter().enumerate() {
        if k > 0 {
            text.push_str("\n\n");
            text.push_str(&pattern.style_at(k - 1).break_literal());
            text.push_str("\n\n");
        }
        text.push_str(paragraph);
    }

    let breaks = paragraphs.len() - 1;
    log::debug!("Inserted {} breaks with template '{}'", breaks, pattern.name);

    Ok(TemplateOutcome {
        text,
        mode: TemplateMode::Insert { breaks },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Alignment::*;
    use crate::marker::MarkerKind;

    fn pattern(styles: &[Alignment]) -> TemplatePattern {
        TemplatePattern::new("test", styles.to_vec(), "").unwrap()
    }

    fn break_styles(text: &str) -> Vec<Alignment> {
        lexer::break_markers(text)
            .iter()
            .filter_map(|m| m.style())
            .collect()
    }

    #[test]
    fn test_restyle_mixed_literal_lengths() {
        let input = "a\n\n||BREAK||\n\nb\n\n||BREAK:indent||\n\nc\n\n||BREAK||\n\nd";
        let outcome = apply_template(input, &pattern(&[Right, Left])).unwrap();
        assert_eq!(outcome.mode, TemplateMode::Restyle { markers: 3 });
        assert_eq!(break_styles(&outcome.text), vec![Right, Left, Right]);
        assert_eq!(
            outcome.text,
            "a\n\n||BREAK||\n\nb\n\n||BREAK:left||\n\nc\n\n||BREAK||\n\nd"
        );
    }

    #[test]
    fn test_restyle_shrinking_then_growing() {
        let input = "x||BREAK:center||y||BREAK||z||BREAK:indent||w";
        let outcome = apply_template(input, &pattern(&[Right, Indent, Left])).unwrap();
        assert_eq!(
            outcome.text,
            "x||BREAK||y||BREAK:indent||z||BREAK:left||w"
        );
    }

    #[test]
    fn test_restyle_leaves_headers_alone() {
        let input = "||HEADER||\nTitle\n||BREAK||\nverse";
        let outcome = apply_template(input, &pattern(&[Center])).unwrap();
        assert_eq!(outcome.text, "||HEADER||\nTitle\n||BREAK:center||\nverse");
        let kinds: Vec<_> = lexer::markers(&outcome.text).map(|m| m.kind).collect();
        assert_eq!(kinds[0], MarkerKind::Header);
    }

    #[test]
    fn test_restyle_normalises_explicit_right() {
        let outcome = apply_template("a||BREAK:right||b", &pattern(&[Right])).unwrap();
        assert_eq!(outcome.text, "a||BREAK||b");
    }

    #[test]
    fn test_insert_between_paragraphs() {
        let input = "one\n\ntwo\n\n\nthree";
        let outcome = apply_template(input, &pattern(&[Center, Left])).unwrap();
        assert_eq!(outcome.mode, TemplateMode::Insert { breaks: 2 });
        assert_eq!(
            outcome.text,
            "one\n\n||BREAK:center||\n\ntwo\n\n||BREAK:left||\n\nthree"
        );
    }

    #[test]
    fn test_insert_cycles_pattern() {
        let outcome = apply_template("a\n\nb\n\nc\n\nd", &pattern(&[Indent])).unwrap();
        assert_eq!(break_styles(&outcome.text), vec![Indent, Indent, Indent]);
    }

    #[test]
    fn test_insert_requires_two_paragraphs() {
        let input = "a single stanza\nwith two lines";
        let err = apply_template(input, &pattern(&[Right])).unwrap_err();
        assert_eq!(err, TemplateError::TooFewParagraphs { found: 1 });
    }

    #[test]
    fn test_insert_treats_header_paragraph_as_paragraph() {
        let outcome = apply_template("||HEADER||\n\nTitle", &pattern(&[Left])).unwrap();
        assert_eq!(outcome.text, "||HEADER||\n\n||BREAK:left||\n\nTitle");
        assert_eq!(outcome.mode, TemplateMode::Insert { breaks: 1 });

        let input = "||HEADER||\n\nTitle\n\nverse one";
        let outcome = apply_template(input, &pattern(&[Left, Center])).unwrap();
        assert_eq!(
            outcome.text,
            "||HEADER||\n\n||BREAK:left||\n\nTitle\n\n||BREAK:center||\n\nverse one"
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(TemplatePattern::new("none", vec![], "").is_err());
        let raw = TemplatePattern {
            name: "raw".to_string(),
            styles: vec![],
            description: String::new(),
        };
        assert_eq!(
            apply_template("a\n\nb", &raw).unwrap_err(),
            TemplateError::EmptyPattern {
                name: "raw".to_string()
            }
        );
        assert_eq!(raw.style_at(3), Right);
    }

    #[test]
    fn test_catalog_lookup_and_override() {
        let mut catalog = TemplateCatalog::new();
        assert_eq!(catalog.get("CLASSIC").unwrap().styles, vec![Right, Left]);
        assert!(catalog.get("missing").is_err());

        catalog.extend(vec![
            TemplatePattern {
                name: "classic".to_string(),
                styles: vec![Left],
                description: String::new(),
            },
            TemplatePattern {
                name: "empty".to_string(),
                styles: vec![],
                description: String::new(),
            },
            pattern(&[Center, Indent]),
        ]);
        assert_eq!(catalog.get("classic").unwrap().styles, vec![Left]);
        assert!(catalog.get("empty").is_err());
        assert_eq!(catalog.len(), builtin_templates().len() + 1);
    }

    #[test]
    fn test_catalog_cycles() {
        let catalog = TemplateCatalog::new();
        let first = catalog.next_after(None).unwrap().name.clone();
        assert_eq!(first, "classic");
        let last = catalog.iter().last().unwrap().name.clone();
        assert_eq!(catalog.next_after(Some(&last)).unwrap().name, "classic");
        assert_eq!(catalog.next_after(Some("classic")).unwrap().name, "centered");
    }
}
