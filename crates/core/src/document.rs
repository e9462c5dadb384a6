//! Presentation-level containers over parsed package parts.

use crate::dom::{XmlElement, XmlPart};
use std::collections::BTreeMap;

/// The parts of a presentation the font walker visits.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,

    /// Chart parts keyed by part name. Slides reference them by name, so a
    /// chart shared between slides is held once.
    pub charts: BTreeMap<String, XmlPart>,

    /// Slide masters in presentation order.
    pub masters: Vec<SlideMaster>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide to the document.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Add a chart part. A part already held under the same name is kept.
    pub fn add_chart(&mut self, chart: XmlPart) {
        self.charts.entry(chart.name.clone()).or_insert(chart);
    }

    /// Add a slide master to the document.
    pub fn add_master(&mut self, master: SlideMaster) {
        self.masters.push(master);
    }

    /// Every parsed part (slides, charts, masters), for writing back.
    pub fn parts(&self) -> Vec<&XmlPart> {
        let mut parts: Vec<&XmlPart> = self.slides.iter().map(|s| &s.part).collect();
        parts.extend(self.charts.values());
        parts.extend(self.masters.iter().map(|m| &m.part));
        parts
    }
}

/// A single slide and the chart parts it references.
#[derive(Debug, Clone)]
pub struct Slide {
    /// The slide part (`p:sld`).
    pub part: XmlPart,

    /// Chart part names keyed by the slide relationship id used in `c:chart/@r:id`.
    pub charts: BTreeMap<String, String>,
}

impl Slide {
    /// Create a slide without charts.
    pub fn new(part: XmlPart) -> Self {
        Self {
            part,
            charts: BTreeMap::new(),
        }
    }

    /// Builder: link a chart part name under its relationship id.
    pub fn with_chart(mut self, rel_id: impl Into<String>, part_name: impl Into<String>) -> Self {
        self.charts.insert(rel_id.into(), part_name.into());
        self
    }
}

/// A slide master part.
#[derive(Debug, Clone)]
pub struct SlideMaster {
    /// The master part (`p:sldMaster`).
    pub part: XmlPart,
}

impl SlideMaster {
    /// Create a slide master.
    pub fn new(part: XmlPart) -> Self {
        Self { part }
    }

    /// The master's text style definitions (`p:txStyles`), if present.
    pub fn text_styles_mut(&mut self) -> Option<&mut XmlElement> {
        self.part.root.child_mut("txStyles")
    }
}
