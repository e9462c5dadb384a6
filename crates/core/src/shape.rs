//! Classification of slide shape elements into the kinds that carry fonts.

use crate::dom::XmlElement;
use crate::fonts::FontSlot;

/// Placeholder types whose text uses the major (heading) theme font.
pub const TITLE_PLACEHOLDER_TYPES: &[&str] = &["title", "ctrTitle"];

/// A shape element, viewed by the way its fonts are reached.
#[derive(Debug)]
pub enum Shape<'a> {
    /// `p:sp` with a text body.
    Text {
        /// The shape's `p:txBody`.
        body: &'a mut XmlElement,
        /// Major for title placeholders, minor otherwise.
        slot: FontSlot,
    },
    /// `p:graphicFrame` holding a table; carries the `a:tbl` element.
    Table(&'a mut XmlElement),
    /// `p:graphicFrame` holding a chart; carries the relationship id of the chart part.
    Chart(String),
    /// `p:grpSp`; carries the group element whose children are shapes.
    Group(&'a mut XmlElement),
    /// Anything without fonts: pictures, connectors, shapes without text bodies.
    Other,
}

impl<'a> Shape<'a> {
    /// Classify one child element of a shape tree or group.
    pub fn classify(element: &'a mut XmlElement) -> Shape<'a> {
        match ShapeTag::of(element) {
            ShapeTag::AutoShape => {
                let slot = placeholder_slot(element);
                match element.child_mut("txBody") {
                    Some(body) => Shape::Text { body, slot },
                    None => Shape::Other,
                }
            }
            ShapeTag::GraphicFrame => {
                if element.find("tbl").is_some() {
                    return element.find_mut("tbl").map_or(Shape::Other, Shape::Table);
                }
                element
                    .find("chart")
                    .and_then(XmlElement::relationship_id)
                    .map_or(Shape::Other, |id| Shape::Chart(id.to_string()))
            }
            ShapeTag::Group => Shape::Group(element),
            ShapeTag::Other => Shape::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeTag {
    AutoShape,
    GraphicFrame,
    Group,
    Other,
}

impl ShapeTag {
    fn of(element: &XmlElement) -> Self {
        match element.local_name() {
            "sp" => ShapeTag::AutoShape,
            "graphicFrame" => ShapeTag::GraphicFrame,
            "grpSp" => ShapeTag::Group,
            _ => ShapeTag::Other,
        }
    }
}

/// Major if the shape is a title placeholder, minor otherwise.
pub fn placeholder_slot(shape: &XmlElement) -> FontSlot {
    let is_title = shape
        .find("ph")
        .and_then(|ph| ph.attribute("type"))
        .is_some_and(|kind| TITLE_PLACEHOLDER_TYPES.contains(&kind));

    if is_title {
        FontSlot::Major
    } else {
        FontSlot::Minor
    }
}
