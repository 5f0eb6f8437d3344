use ammonia::clean_text;

use crate::layout::{layout_with_anchors, Block, ContentBlock, RenderConfig, Shape};
use crate::marker::Alignment;
use crate::sections::{parse, LayoutSection};

pub fn to_html(src: &str, config: &RenderConfig) -> String {
    sections_to_html(&parse(src), config)
}

pub fn sections_to_html(sections: &[LayoutSection], config: &RenderConfig) -> String {
    sections_to_html_with_anchors(sections, config, |_, _| {})
}

/// Render sections, reporting each verse's element id to `on_anchor`.
pub fn sections_to_html_with_anchors<F>(
    sections: &[LayoutSection],
    config: &RenderConfig,
    mut on_anchor: F,
) -> String
where
    F: FnMut(usize, &str),
{
    let blocks = layout_with_anchors(sections, config, |_, _| {});
    let mut html = String::from("<div class=\"verse-document\" dir=\"rtl\">\n");

    for block in &blocks {
        match block {
            Block::Divider { margin, .. } => {
                html.push_str(&format!("<hr class=\"divider {}\">\n", margin.class_name()));
            }
            Block::Content(content) => {
                if content.framed {
                    html.push_str("<hr class=\"divider divider-frame\">\n");
                }
                let id = content.verse.map(verse_id);
                if let (Some(verse), Some(id)) = (content.verse, id.as_deref()) {
                    on_anchor(verse, id);
                }
                push_content(&mut html, content, id.as_deref());
            }
        }
    }

    html.push_str("</div>\n");
    html
}

pub fn verse_id(verse: usize) -> String {
    format!("verse-{}", verse)
}

fn push_content(html: &mut String, block: &ContentBlock<'_>, id: Option<&str>) {
    let tag = if block.is_header { "header" } else { "section" };
    let mut classes = vec![
        if block.is_header { "verse-header" } else { "verse" },
        align_class(block),
        block.spacing.class_name(),
    ];
    if block.shape == Shape::Couplet {
        classes.push("couplet");
    }
    if block.highlighted {
        classes.push("highlight");
    }

    html.push_str(&format!("<{} class=\"{}\"", tag, classes.join(" ")));
    if let Some(id) = id {
        html.push_str(&format!(" id=\"{}\"", id));
    }
    html.push_str(">\n");

    if let Some(badge) = block.badge {
        html.push_str(&format!("<span class=\"verse-number\">{}</span>\n", badge));
    }

    match block.shape {
        Shape::Couplet => {
            html.push_str("<div class=\"couplet\">\n");
            for line in &block.lines {
                html.push_str(&format!("<p class=\"hemistich\">{}</p>\n", clean_text(line)));
            }
            html.push_str("</div>\n");
        }
        Shape::Lines => {
            for line in &block.lines {
                html.push_str(&format!("<p class=\"line\">{}</p>\n", clean_text(line)));
            }
        }
    }

    html.push_str(&format!("</{}>\n", tag));
}

fn align_class(block: &ContentBlock<'_>) -> &'static str {
    match block.style {
        Alignment::Right => "align-right",
        Alignment::Center => "align-center",
        Alignment::Indent => "align-indent",
        Alignment::Left => "align-left",
    }
}
