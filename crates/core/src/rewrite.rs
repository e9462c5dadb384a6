//! Depth-first font rewriting over slides, shapes and slide masters.
//!
//! Every `a:latin` and `a:ea` child reachable from paragraph defaults, runs,
//! end-of-paragraph markers, table cells, charts and master text styles is run
//! through [`decide`] with the slot its structural context implies. Only the
//! `typeface` attribute of existing font elements is ever written.

use crate::audit::{slide_marker, slide_master_marker, AuditSink};
use crate::document::{Document, Slide, SlideMaster};
use crate::dom::{XmlElement, XmlPart};
use crate::error::{Error, Result};
use crate::fonts::{decide, FontAction, FontScript, FontSlot};
use crate::options::RewriteOptions;
use crate::shape::Shape;
use std::collections::BTreeMap;

/// Local names of character-properties elements that hold font children.
const CHARACTER_PROPERTIES: &[&str] = &["rPr", "defRPr", "endParaRPr"];

/// Counts of reported decisions for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Typefaces overwritten (theme replacement or code-font remap).
    pub replaced: usize,
    /// Code fonts left in place.
    pub preserved: usize,
}

/// Rewrites fonts in a document, reporting every decision to an audit sink.
pub struct FontRewriter<'a, S: AuditSink + ?Sized> {
    options: &'a RewriteOptions,
    sink: &'a mut S,
    stats: RewriteStats,
}

impl<'a, S: AuditSink + ?Sized> FontRewriter<'a, S> {
    /// Create a rewriter with the given options and audit sink.
    pub fn new(options: &'a RewriteOptions, sink: &'a mut S) -> Self {
        Self {
            options,
            sink,
            stats: RewriteStats::default(),
        }
    }

    /// Decisions reported so far.
    pub fn stats(&self) -> RewriteStats {
        self.stats
    }

    /// Rewrite every slide, then every slide master.
    pub fn process_document(&mut self, document: &mut Document) -> Result<RewriteStats> {
        self.process_slides(&mut document.slides, &mut document.charts)?;
        self.process_slide_masters(&mut document.masters);
        Ok(self.stats)
    }

    /// Rewrite the shapes of each slide in order, logging a boundary marker per slide.
    ///
    /// `charts` holds the chart parts the slides link to, keyed by part name.
    pub fn process_slides(
        &mut self,
        slides: &mut [Slide],
        charts: &mut BTreeMap<String, XmlPart>,
    ) -> Result<()> {
        for (idx, slide) in slides.iter_mut().enumerate() {
            self.sink.emit(&slide_marker(idx + 1), None);
            log::debug!("Rewriting fonts in {}", slide.part.name);

            let Slide { part, charts: links } = slide;
            let Some(tree) = part.root.child_mut("cSld").and_then(|c| c.child_mut("spTree")) else {
                log::warn!("{} has no shape tree", part.name);
                continue;
            };
            for shape in tree.elements_mut() {
                self.rewrite_shape(shape, links, charts, 0)?;
            }
        }
        Ok(())
    }

    /// Rewrite the default run properties of every master text style.
    ///
    /// The title style uses the major slot, every other style the minor slot.
    /// Masters without text styles and style levels without default run
    /// properties are skipped.
    pub fn process_slide_masters(&mut self, masters: &mut [SlideMaster]) {
        for (idx, master) in masters.iter_mut().enumerate() {
            self.sink.emit(&slide_master_marker(idx + 1), None);

            let name = master.part.name.clone();
            let Some(styles) = master.text_styles_mut() else {
                log::debug!("{} has no text styles", name);
                continue;
            };

            for style in styles.elements_mut() {
                let slot = if style.local_name() == "titleStyle" {
                    FontSlot::Major
                } else {
                    FontSlot::Minor
                };

                for entry in style.elements_mut() {
                    if CHARACTER_PROPERTIES.contains(&entry.local_name()) {
                        self.rewrite_properties(entry, slot, None);
                        continue;
                    }
                    let tag = entry.local_name().to_string();
                    match entry.child_mut("defRPr") {
                        Some(defaults) => self.rewrite_properties(defaults, slot, Some(&tag)),
                        None => log::trace!("{}: {} has no default run properties", name, tag),
                    }
                }
            }
        }
    }

    /// Rewrite one shape, dispatching on its kind.
    ///
    /// `links` maps chart relationship ids of the slide the shape is on to
    /// part names in `charts`. `depth` counts enclosing groups.
    pub fn rewrite_shape(
        &mut self,
        element: &mut XmlElement,
        links: &BTreeMap<String, String>,
        charts: &mut BTreeMap<String, XmlPart>,
        depth: usize,
    ) -> Result<()> {
        match Shape::classify(element) {
            Shape::Text { body, slot } => self.rewrite_text_frame(body, slot),
            Shape::Table(table) => {
                for row in table.children_named_mut("tr") {
                    for cell in row.children_named_mut("tc") {
                        if let Some(body) = cell.child_mut("txBody") {
                            self.rewrite_text_frame(body, FontSlot::Minor);
                        }
                    }
                }
            }
            Shape::Chart(rel_id) => match links.get(&rel_id).and_then(|name| charts.get_mut(name)) {
                Some(chart) => self.rewrite_chart(&mut chart.root),
                None => log::warn!("Chart relationship {} did not resolve to a chart part", rel_id),
            },
            Shape::Group(group) => {
                if depth >= self.options.max_group_depth {
                    return Err(Error::StructureError(format!(
                        "group shapes nested deeper than {} levels",
                        self.options.max_group_depth
                    )));
                }
                for child in group.elements_mut() {
                    self.rewrite_shape(child, links, charts, depth + 1)?;
                }
            }
            Shape::Other => {}
        }
        Ok(())
    }

    /// Rewrite paragraph defaults, runs and end markers of a text body.
    ///
    /// Run decisions are tagged with the run's trimmed text.
    pub fn rewrite_text_frame(&mut self, body: &mut XmlElement, slot: FontSlot) {
        for paragraph in body.children_named_mut("p") {
            for child in paragraph.elements_mut() {
                match child.local_name() {
                    "pPr" => {
                        if let Some(defaults) = child.child_mut("defRPr") {
                            self.rewrite_properties(defaults, slot, None);
                        }
                    }
                    "r" => {
                        let text = child.child("t").map(XmlElement::text).unwrap_or_default();
                        if let Some(properties) = child.child_mut("rPr") {
                            self.rewrite_properties(properties, slot, Some(text.trim()));
                        }
                    }
                    _ => {}
                }
            }
            if let Some(end) = paragraph.child_mut("endParaRPr") {
                self.rewrite_properties(end, slot, None);
            }
        }
    }

    /// Rewrite the Latin and East-Asian font children of one properties element.
    pub fn rewrite_properties(
        &mut self,
        properties: &mut XmlElement,
        slot: FontSlot,
        excerpt: Option<&str>,
    ) {
        for script in [FontScript::Latin, FontScript::EastAsian] {
            if let Some(font) = properties.child_mut(script.element_name()) {
                self.rewrite_font(font, slot, script, excerpt);
            }
        }
    }

    /// Decide and apply the typeface of one `a:latin` or `a:ea` element.
    pub fn rewrite_font(
        &mut self,
        font: &mut XmlElement,
        slot: FontSlot,
        script: FontScript,
        excerpt: Option<&str>,
    ) {
        // A missing typeface is the empty string: it is replaced, the attribute is
        // added, and the audit line reads `from  to <theme>`.
        let current = font.attribute("typeface").unwrap_or_default();
        let decision = decide(current, slot, script, self.options);

        if decision.changes() {
            font.set_attribute("typeface", decision.new.as_str());
        }
        match decision.action {
            FontAction::Keep => self.stats.preserved += 1,
            FontAction::Remap | FontAction::Replace => self.stats.replaced += 1,
            FontAction::Unchanged => {}
        }
        if let Some(message) = decision.message(slot, script) {
            self.sink.emit(&message, excerpt);
        }
    }

    /// Rewrite every font element under a chart part, Latin first, always minor.
    fn rewrite_chart(&mut self, chart: &mut XmlElement) {
        for script in [FontScript::Latin, FontScript::EastAsian] {
            chart.for_each_descendant_mut(script.element_name(), &mut |font: &mut XmlElement| {
                self.rewrite_font(font, FontSlot::Minor, script, None);
            });
        }
    }
}
