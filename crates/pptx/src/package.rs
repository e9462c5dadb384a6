//! Loading a PPTX package into a [`Document`] and writing it back.

use crate::rels::{rel_types, rels_part_name, resolve_target, Relationships};
use crate::xml::{parse_part, write_part};
use fontnorm_core::{Document, Error, Result, Slide, SlideMaster, XmlPart};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// One entry of the ZIP container, kept verbatim until save.
#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// An opened PPTX package: every ZIP entry plus the parsed parts the font
/// walker rewrites.
#[derive(Debug)]
pub struct PptxPackage {
    entries: Vec<PackageEntry>,
    document: Document,
}

impl PptxPackage {
    /// Open a PPTX file.
    pub fn open(path: &Path) -> Result<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_reader(Cursor::new(data))
    }

    /// Read a PPTX package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::InvalidPackage(format!("Failed to open ZIP: {}", e)))?;

        let entries = read_entries(&mut archive)?;
        let document = PartLoader { entries: &entries }.load_document()?;

        log::debug!(
            "Loaded package with {} entries, {} slides, {} slide masters",
            entries.len(),
            document.slides.len(),
            document.masters.len()
        );

        Ok(Self { entries, document })
    }

    /// The parsed presentation parts.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The parsed presentation parts, for rewriting.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialize the package.
    ///
    /// Parsed parts are re-serialized; every other entry is copied unchanged,
    /// in its original order. Stored entries stay stored, everything else is
    /// deflated.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut rewritten: HashMap<&str, Vec<u8>> = HashMap::new();
        for part in self.document.parts() {
            rewritten.insert(part.name.as_str(), write_part(part)?);
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = FileOptions::default().compression_method(method);

            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)
                    .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", entry.name, e)))?;
                continue;
            }

            let data = rewritten
                .get(entry.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&entry.data);
            zip.start_file(entry.name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", entry.name, e)))?;
            zip.write_all(data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Read every entry of the archive into memory.
fn read_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<PackageEntry>> {
    let mut entries = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut file = archive
            .by_index(idx)
            .map_err(|e| Error::InvalidPackage(format!("Failed to read ZIP entry {}: {}", idx, e)))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", file.name(), e)))?;

        entries.push(PackageEntry {
            name: file.name().to_string(),
            data,
            compression: file.compression(),
            is_dir: file.is_dir(),
        });
    }
    Ok(entries)
}

/// Resolves and parses the parts the font walker needs.
struct PartLoader<'a> {
    entries: &'a [PackageEntry],
}

impl PartLoader<'_> {
    fn load_document(&self) -> Result<Document> {
        let package_rels = self
            .relationships("")?
            .ok_or_else(|| Error::InvalidPackage("missing package relationships".to_string()))?;
        let main = package_rels
            .of_type(rel_types::OFFICE_DOCUMENT)
            .next()
            .ok_or_else(|| Error::InvalidPackage("no main document relationship".to_string()))?;
        let main_name = resolve_target("", &main.target);

        let presentation = self
            .part(&main_name)?
            .ok_or_else(|| Error::InvalidPackage(format!("main part '{}' is missing", main_name)))?;
        if presentation.root.local_name() != "presentation" {
            return Err(Error::InvalidPackage(format!(
                "main part '{}' is a <{}>, not a presentation",
                main_name, presentation.root.name
            )));
        }
        let presentation_rels = self.relationships(&presentation.name)?.unwrap_or_default();

        let mut document = Document::new();

        for part_name in self.listed_parts(&presentation, &presentation_rels, "sldIdLst", rel_types::SLIDE)? {
            let slide = self.load_slide(&part_name, &mut document)?;
            document.add_slide(slide);
        }
        for part_name in self.listed_parts(
            &presentation,
            &presentation_rels,
            "sldMasterIdLst",
            rel_types::SLIDE_MASTER,
        )? {
            let part = self.required_part(&part_name)?;
            document.add_master(SlideMaster::new(part));
        }

        Ok(document)
    }

    /// Part names referenced by the id list `list` of the presentation, in list order.
    fn listed_parts(
        &self,
        presentation: &XmlPart,
        rels: &Relationships,
        list: &str,
        rel_type: &str,
    ) -> Result<Vec<String>> {
        let Some(ids) = presentation.root.child(list) else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for item in ids.elements() {
            let Some(rel_id) = item.relationship_id() else {
                continue;
            };
            let rel = rels
                .get(rel_id)
                .filter(|r| r.is_type(rel_type))
                .ok_or_else(|| {
                    Error::InvalidPackage(format!(
                        "{} entry {} has no matching relationship",
                        list, rel_id
                    ))
                })?;
            names.push(resolve_target(&presentation.name, &rel.target));
        }
        Ok(names)
    }

    /// Parse a slide and link its charts. Chart parts are parsed into
    /// `document` once, however many slides reference them.
    fn load_slide(&self, part_name: &str, document: &mut Document) -> Result<Slide> {
        let part = self.required_part(part_name)?;
        let rels = self.relationships(&part.name)?.unwrap_or_default();

        let mut slide = Slide::new(part);
        for rel in rels.of_type(rel_types::CHART) {
            let chart_name = resolve_target(&slide.part.name, &rel.target);
            let Some(entry) = self.entry(&chart_name) else {
                log::warn!("{}: chart part '{}' is missing", slide.part.name, chart_name);
                continue;
            };
            if !document.charts.contains_key(&entry.name) {
                document.add_chart(parse_part(&entry.name, &entry.data)?);
            }
            slide = slide.with_chart(rel.id.clone(), entry.name.clone());
        }
        Ok(slide)
    }

    fn entry(&self, name: &str) -> Option<&PackageEntry> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name.eq_ignore_ascii_case(name))
    }

    /// Parse a part if the package contains it. The part keeps the entry's exact name.
    fn part(&self, name: &str) -> Result<Option<XmlPart>> {
        match self.entry(name) {
            Some(entry) => parse_part(&entry.name, &entry.data).map(Some),
            None => Ok(None),
        }
    }

    fn required_part(&self, name: &str) -> Result<XmlPart> {
        self.part(name)?
            .ok_or_else(|| Error::InvalidPackage(format!("part '{}' is missing", name)))
    }

    fn relationships(&self, source_part: &str) -> Result<Option<Relationships>> {
        let Some(entry) = self.entry(&rels_part_name(source_part)) else {
            return Ok(None);
        };
        let content = std::str::from_utf8(&entry.data)
            .map_err(|e| Error::XmlError(format!("{}: {}", entry.name, e)))?;
        Relationships::parse(content.trim_start_matches('\u{feff}')).map(Some)
    }
}
