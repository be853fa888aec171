//! On-disk formats: XML documents, zip archives, CSV tables, and directory setup.

pub mod archive;
pub mod csv;
pub mod document;
pub mod fs;
