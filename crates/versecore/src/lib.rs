pub mod error;
pub mod html;
pub mod insert;
pub mod layout;
pub mod lexer;
pub mod marker;
pub mod sanitize;
pub mod sections;
pub mod template;
pub mod text;

pub use error::{TemplateError, UnknownAlignment};
pub use html::to_html;
pub use insert::{insert_break, BreakInsertion};
pub use layout::{layout, Block, ContentBlock, RenderConfig, Shape, Spacing};
pub use marker::{Alignment, Marker, MarkerKind};
pub use sections::{parse, LayoutSection};
pub use template::{apply_template, TemplateCatalog, TemplateMode, TemplatePattern};
pub use text::MarkedText;
