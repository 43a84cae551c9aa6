//! Text extraction from uploaded documents.
//!
//! The format is chosen from the filename extension:
//!
//! - `.txt`, `.md`, `.text` or no extension: UTF-8 text
//! - `.pdf`: embedded text layer, with an OCR fallback (`pdftoppm` +
//!   `tesseract`) when the layer yields too little
//! - `.epub`: XHTML chapters in spine order

use crate::core::config::ExtractionConfig;
use crate::core::error::{PassageError, Result};
use percent_encoding::percent_decode_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::process::Command;

/// Upper bound on a single decompressed EPUB entry (zip bomb guard)
const MAX_EPUB_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Turns raw document bytes into plain text
pub trait Extractor: Send + Sync {
    /// Extract the text of `bytes`, using `filename` to pick the format.
    ///
    /// Fails with `Extraction` when no text is recoverable and with
    /// `UnsupportedFormat` for formats the extractor does not handle.
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// Formats understood by [`DocumentExtractor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Epub,
}

impl DocumentFormat {
    /// Detect the format from a filename extension
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            None | Some("txt") | Some("md") | Some("text") => Ok(Self::PlainText),
            Some("pdf") => Ok(Self::Pdf),
            Some("epub") => Ok(Self::Epub),
            Some(other) => Err(PassageError::UnsupportedFormat(format!(
                "{filename}: .{other} files are not supported (txt, md, pdf, epub)"
            ))),
        }
    }
}

/// Extractor for plain text, PDF and EPUB documents
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    config: ExtractionConfig,
}

impl DocumentExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    fn extract_plain(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| PassageError::Extraction(format!("{filename}: not valid UTF-8: {e}")))
    }

    fn extract_pdf(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let (mut text, layer_error) = match pdf_text_layer(bytes) {
            Ok(text) => (text, None),
            Err(e) => (String::new(), Some(e)),
        };

        let yield_chars = text.trim().chars().count();
        if yield_chars < self.config.ocr_min_chars {
            if self.config.ocr_enabled {
                tracing::warn!(
                    "{}: text layer yielded {} chars, falling back to OCR",
                    filename,
                    yield_chars
                );
                match self.ocr_pdf(bytes) {
                    Ok(ocr) if ocr.trim().chars().count() > yield_chars => text = ocr,
                    Ok(_) => tracing::debug!("{}: OCR found no additional text", filename),
                    Err(e) => tracing::warn!("{}: OCR fallback failed: {}", filename, e),
                }
            } else {
                tracing::debug!("{}: OCR disabled, keeping {} chars", filename, yield_chars);
            }
        }

        if text.trim().is_empty() {
            let detail = layer_error.unwrap_or_else(|| "no text layer".to_string());
            return Err(PassageError::Extraction(format!(
                "{filename}: no text recoverable ({detail})"
            )));
        }

        Ok(text)
    }

    /// Rasterise every page and OCR it
    fn ocr_pdf(&self, bytes: &[u8]) -> Result<String> {
        if !has_pdftoppm() || !has_tesseract() {
            return Err(PassageError::Extraction(
                "OCR requires pdftoppm and tesseract (poppler-utils, tesseract-ocr)".to_string(),
            ));
        }

        let work_dir = tempfile::tempdir()?;
        let pdf_path = work_dir.path().join("input.pdf");
        fs::write(&pdf_path, bytes)?;

        let rasterised = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.config.ocr_dpi.to_string())
            .arg(&pdf_path)
            .arg(work_dir.path().join("page"))
            .output()?;
        if !rasterised.status.success() {
            return Err(PassageError::Extraction(format!(
                "pdftoppm error: {}",
                String::from_utf8_lossy(&rasterised.stderr).trim()
            )));
        }

        let mut pages: Vec<_> = fs::read_dir(work_dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        let mut text = String::new();
        for (i, page) in pages.iter().enumerate() {
            let output = Command::new("tesseract")
                .arg(page)
                .arg("stdout")
                .arg("-l")
                .arg(&self.config.ocr_language)
                .output()?;
            if !output.status.success() {
                tracing::warn!("tesseract failed on page {}", i + 1);
                continue;
            }
            let page_text = String::from_utf8_lossy(&output.stdout);
            if !page_text.trim().is_empty() {
                text.push_str(&page_text);
                text.push('\n');
            }
        }

        tracing::info!(
            "OCR extracted {} chars from {} pages",
            text.chars().count(),
            pages.len()
        );
        Ok(text)
    }

    fn extract_epub(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let bad = |detail: String| PassageError::Extraction(format!("{filename}: {detail}"));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| bad(format!("not a valid EPUB archive: {e}")))?;

        let container = read_entry_bounded(&mut archive, "META-INF/container.xml").map_err(bad)?;
        let opf_path = find_rootfile(&container)
            .ok_or_else(|| bad("container.xml names no package document".to_string()))?;

        let opf = read_entry_bounded(&mut archive, &opf_path).map_err(bad)?;
        let package = parse_package(&opf).map_err(bad)?;
        let base = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);

        let mut text = String::new();
        for idref in &package.spine {
            let Some(href) = package.manifest.get(idref) else {
                tracing::debug!("{}: spine item '{}' missing from manifest", filename, idref);
                continue;
            };
            let Some(entry_name) = resolve_href(base, href) else {
                tracing::warn!("{}: skipping chapter with unusable href '{}'", filename, href);
                continue;
            };
            match read_entry_bounded(&mut archive, &entry_name) {
                Ok(chapter) => {
                    text.push_str(&xhtml_text(&chapter));
                    text.push('\n');
                }
                Err(e) => tracing::warn!("{}: skipping chapter: {}", filename, e),
            }
        }

        if text.trim().is_empty() {
            return Err(bad("no text recoverable".to_string()));
        }
        Ok(text)
    }
}

impl Extractor for DocumentExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        match DocumentFormat::from_filename(filename)? {
            DocumentFormat::PlainText => self.extract_plain(filename, bytes),
            DocumentFormat::Pdf => self.extract_pdf(filename, bytes),
            DocumentFormat::Epub => self.extract_epub(filename, bytes),
        }
    }
}

/// Text layer of a PDF
fn pdf_text_layer(bytes: &[u8]) -> std::result::Result<String, String> {
    // pdf-extract panics on some malformed files
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "PDF parser panicked".to_string())?
        .map_err(|e| e.to_string())
}

/// Check if tesseract is available
pub fn has_tesseract() -> bool {
    Command::new("tesseract")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check if pdftoppm is available (it prints its version to stderr)
pub fn has_pdftoppm() -> bool {
    Command::new("pdftoppm").arg("-v").output().is_ok()
}

fn read_entry_bounded(
    archive: &mut zip::ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> std::result::Result<Vec<u8>, String> {
    let entry = archive
        .by_name(name)
        .map_err(|e| format!("missing {name}: {e}"))?;
    let mut out = Vec::new();
    entry
        .take(MAX_EPUB_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| format!("failed to read {name}: {e}"))?;
    if out.len() as u64 >= MAX_EPUB_ENTRY_BYTES {
        return Err(format!(
            "{name} exceeds size limit ({MAX_EPUB_ENTRY_BYTES} bytes)"
        ));
    }
    Ok(out)
}

/// Archive entry name for a manifest `href` relative to the directory
/// holding the package document. The href is a URL: fragments are
/// dropped, `%XX` escapes decoded and `.`/`..` segments collapsed.
/// `None` when it climbs above the archive root or is not UTF-8.
fn resolve_href(base: &str, href: &str) -> Option<String> {
    let path = href.split(['#', '?']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    let mut segments: Vec<&str> = if decoded.starts_with('/') {
        Vec::new()
    } else {
        base.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    (!segments.is_empty()).then(|| segments.join("/"))
}

fn attribute(element: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// `full-path` of the first `<rootfile>` in container.xml
fn find_rootfile(xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"rootfile" => {
                return attribute(&e, b"full-path");
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

struct Package {
    /// id -> href
    manifest: HashMap<String, String>,
    /// idrefs in reading order
    spine: Vec<String>,
}

fn parse_package(xml: &[u8]) -> std::result::Result<Package, String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut manifest = HashMap::new();
    let mut spine = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"item" => {
                    if let (Some(id), Some(href)) = (attribute(&e, b"id"), attribute(&e, b"href")) {
                        manifest.insert(id, href);
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref") {
                        spine.push(idref);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("invalid package document: {e}")),
            _ => {}
        }
        buf.clear();
    }

    if spine.is_empty() {
        return Err("package document has an empty spine".to_string());
    }
    Ok(Package { manifest, spine })
}

/// Visible text of an XHTML document. Script and style content is
/// skipped; malformed markup ends the chapter early.
fn xhtml_text(xml: &[u8]) -> String {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut buf = Vec::new();
    let mut out = String::new();
    let mut hidden_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if matches!(e.local_name().as_ref(), b"script" | b"style") {
                    hidden_depth += 1;
                }
            }
            Ok(Event::End(e)) => {
                if matches!(e.local_name().as_ref(), b"script" | b"style") {
                    hidden_depth = hidden_depth.saturating_sub(1);
                }
            }
            Ok(Event::Text(t)) if hidden_depth == 0 => {
                let text = match t.unescape() {
                    Ok(text) => text.into_owned(),
                    // HTML entities such as &nbsp; are unknown to XML
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&text);
            }
            Ok(Event::CData(t)) if hidden_depth == 0 => {
                out.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Stopping at malformed XHTML: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    out
}
