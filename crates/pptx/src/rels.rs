//! OPC relationship parts (`*.rels`) and part-name resolution.

use fontnorm_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Relationship type suffixes the loader follows.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const SLIDE: &str = "/slide";
    pub const SLIDE_MASTER: &str = "/slideMaster";
    pub const CHART: &str = "/chart";
}

/// A relationship entry from a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1").
    pub id: String,
    /// Relationship type URI.
    pub rel_type: String,
    /// Target as written (relative or package-absolute).
    pub target: String,
    /// Whether the target lives outside the package.
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type URI ends with the given suffix.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Relationships of one source part, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Parse a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Vec::new();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|err| Error::XmlError(format!("Bad relationship attribute: {}", err)))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value == "External",
                            _ => {}
                        }
                    }

                    rels.push(rel);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self { rels })
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    /// Internal relationships whose type ends with `suffix`, in document order.
    pub fn of_type<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.rels
            .iter()
            .filter(move |r| !r.external && r.is_type(suffix))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// Name of the .rels part holding the relationships of `part_name`.
///
/// The package itself (empty part name) maps to `_rels/.rels`.
pub fn rels_part_name(part_name: &str) -> String {
    match part_name.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part_name[..pos], &part_name[pos + 1..]),
        None if part_name.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part_name),
    }
}

/// Resolve a relationship target against the part that declares it.
///
/// A leading `/` makes the target package-absolute; otherwise it is relative
/// to the source part's directory. The result has no leading slash and no
/// `.` or `..` segments.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        match source_part.rfind('/') {
            Some(pos) => format!("{}/{}", &source_part[..pos], target),
            None => target.to_string(),
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}
