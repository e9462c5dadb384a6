//! PPTX (Office Open XML) package backend for theme-font rewriting.
//!
//! Opens .pptx files, which are ZIP archives of XML parts, into the core
//! document model and writes them back after rewriting.

pub mod package;
pub mod rels;
pub mod xml;

pub use package::PptxPackage;
