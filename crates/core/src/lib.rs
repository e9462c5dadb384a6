//! Core document model and theme-font rewriting rules for presentation text.

pub mod audit;
pub mod document;
pub mod dom;
pub mod error;
pub mod fonts;
pub mod options;
pub mod rewrite;
pub mod shape;

pub use audit::{AuditSink, MemorySink};
pub use document::{Document, Slide, SlideMaster};
pub use dom::{XmlElement, XmlNode, XmlPart};
pub use error::{Error, Result};
pub use fonts::{decide, theme_font, FontAction, FontDecision, FontScript, FontSlot};
pub use options::RewriteOptions;
pub use rewrite::{FontRewriter, RewriteStats};
pub use shape::Shape;

/// Rewrite every font in `document`, reporting decisions to `sink`.
pub fn process_document<S: AuditSink + ?Sized>(
    document: &mut Document,
    options: &RewriteOptions,
    sink: &mut S,
) -> Result<RewriteStats> {
    FontRewriter::new(options, sink).process_document(document)
}
