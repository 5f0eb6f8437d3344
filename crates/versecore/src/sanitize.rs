use ammonia::Builder;

const SECTION_CLASSES: &[&str] = &[
    "verse",
    "align-right",
    "align-center",
    "align-indent",
    "align-left",
    "spacing-header",
    "spacing-regular",
    "spacing-after-break",
    "spacing-before-break",
    "spacing-enclosed",
    "couplet",
    "highlight",
];

const HEADER_CLASSES: &[&str] = &["verse-header", "align-center", "spacing-header", "couplet"];

const DIVIDER_CLASSES: &[&str] = &[
    "divider",
    "divider-compact",
    "divider-regular",
    "divider-frame",
];

pub fn sanitize_html(html: &str) -> String {
    create_layout_sanitizer().clean(html).to_string()
}

fn create_layout_sanitizer() -> Builder<'static> {
    // ammonia's defaults already drop scripts, handlers and unsafe URLs;
    // only the layout vocabulary is added on top.
    let mut builder = Builder::new();
    builder
        .add_tags(&["section", "header"])
        .add_generic_attributes(&["dir", "id"])
        .add_allowed_classes("div", &["verse-document", "couplet"])
        .add_allowed_classes("section", SECTION_CLASSES)
        .add_allowed_classes("header", HEADER_CLASSES)
        .add_allowed_classes("hr", DIVIDER_CLASSES)
        .add_allowed_classes("p", &["line", "hemistich"])
        .add_allowed_classes("span", &["verse-number"]);
    builder
}
