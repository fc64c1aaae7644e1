use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::format::{file_category, file_extension, FileCategory};
use super::html::{extract_from_html, xml_text_content};
use super::sources::{ArchiveSource, DocxTextSource, ImportLibraries, OcrEngine, PdfTextSource};
use super::ImportError;

static SLIDE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide([0-9]+)\.xml$").unwrap());

/// A user-supplied file: its name (for the extension) and raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { name, bytes })
    }

    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }
}

/// Progress reported while a file is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Reading,
    Ocr,
    Success,
}

impl ImportStatus {
    /// Short user-facing status line.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Reading => "Reading...",
            Self::Ocr => "OCR (Wait)...",
            Self::Success => "Success!",
        }
    }
}

/// Turn a supported file into plain text for the field extractor.
///
/// Unsupported extensions fail before any status is reported. Collaborator
/// failures are logged and propagated unchanged.
pub fn handle_file(
    file: &SourceFile,
    libraries: &ImportLibraries<'_>,
    mut on_status: impl FnMut(ImportStatus),
) -> Result<String, ImportError> {
    let extension = file.extension();
    let category =
        file_category(&extension).ok_or_else(|| ImportError::UnsupportedFormat(extension.clone()))?;

    on_status(ImportStatus::Reading);
    tracing::info!(
        extension = %extension,
        category = category.as_str(),
        size_bytes = file.bytes.len(),
        "Importing file"
    );

    if category.needs_ocr() {
        on_status(ImportStatus::Ocr);
    }

    let result = match category {
        FileCategory::Presentation => extract_from_pptx(&file.bytes, libraries.archive),
        FileCategory::Document if extension == "pdf" => extract_from_pdf(&file.bytes, libraries.pdf),
        FileCategory::Document => extract_from_docx(&file.bytes, libraries.docx),
        FileCategory::Text if extension == "txt" => Ok(decode_text(&file.bytes)),
        FileCategory::Text => Ok(extract_from_html(&decode_text(&file.bytes))),
        FileCategory::Image => extract_from_image(&file.bytes, libraries.ocr),
    };

    match result {
        Ok(text) => {
            on_status(ImportStatus::Success);
            tracing::info!(
                extension = %extension,
                text_chars = text.len(),
                "File imported"
            );
            Ok(text)
        }
        Err(e) => {
            tracing::warn!(extension = %extension, error = %e, "File import failed");
            Err(e)
        }
    }
}

/// Slide text in slide order, one blank line between slides.
pub fn extract_from_pptx(
    bytes: &[u8],
    archive: Option<&dyn ArchiveSource>,
) -> Result<String, ImportError> {
    let archive = archive.ok_or(ImportError::MissingCollaborator("zip archive reader"))?;

    let mut slides: Vec<(u64, String)> = archive
        .entry_names(bytes)?
        .into_iter()
        .filter_map(|name| slide_number(&name).map(|n| (n, name)))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    tracing::debug!(slide_count = slides.len(), "Reading presentation slides");

    let mut text = String::new();
    for (_, name) in &slides {
        let xml = archive.read_entry(bytes, name)?;
        text.push_str(&xml_text_content(&xml)?);
        text.push_str("\n\n");
    }

    Ok(text.trim().to_string())
}

/// Slide index of a `ppt/slides/slideN.xml` entry.
fn slide_number(entry_name: &str) -> Option<u64> {
    SLIDE_ENTRY
        .captures(entry_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Page texts joined by single spaces.
pub fn extract_from_pdf(
    bytes: &[u8],
    pdf: Option<&dyn PdfTextSource>,
) -> Result<String, ImportError> {
    let pdf = pdf.ok_or(ImportError::MissingCollaborator("PDF text source"))?;
    let pages = pdf.page_texts(bytes)?;
    tracing::debug!(page_count = pages.len(), "Read PDF text layer");
    Ok(pages.join(" ").trim().to_string())
}

pub fn extract_from_docx(
    bytes: &[u8],
    docx: Option<&dyn DocxTextSource>,
) -> Result<String, ImportError> {
    let docx = docx.ok_or(ImportError::MissingCollaborator("Word text source"))?;
    docx.raw_text(bytes)
}

pub fn extract_from_image(
    bytes: &[u8],
    ocr: Option<&dyn OcrEngine>,
) -> Result<String, ImportError> {
    let ocr = ocr.ok_or(ImportError::MissingCollaborator("OCR engine"))?;
    ocr.recognize(bytes)
}

/// UTF-8 decode (lossy), dropping a leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{FEFF}').unwrap_or(&text).to_string()
}
