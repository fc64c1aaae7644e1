//! Parsing collaborators injected into the importer.
//!
//! Binary formats (PDF, DOCX, the PPTX zip container, images) are decoded by
//! external libraries. Each sits behind a trait so the importer stays free
//! of those dependencies and tests can substitute mocks.

use super::ImportError;

/// Page-by-page text layer of a PDF.
pub trait PdfTextSource {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ImportError>;
}

/// Raw text of a Word document.
pub trait DocxTextSource {
    fn raw_text(&self, docx_bytes: &[u8]) -> Result<String, ImportError>;
}

/// Zip container access (used for PPTX slides).
pub trait ArchiveSource {
    fn entry_names(&self, archive_bytes: &[u8]) -> Result<Vec<String>, ImportError>;

    fn read_entry(&self, archive_bytes: &[u8], name: &str) -> Result<String, ImportError>;
}

/// Optical character recognition for images.
pub trait OcrEngine {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, ImportError>;
}

/// Collaborators available to [`handle_file`](super::handle_file).
/// A file type whose collaborator is `None` fails with
/// [`ImportError::MissingCollaborator`].
#[derive(Default, Clone, Copy)]
pub struct ImportLibraries<'a> {
    pub pdf: Option<&'a dyn PdfTextSource>,
    pub docx: Option<&'a dyn DocxTextSource>,
    pub archive: Option<&'a dyn ArchiveSource>,
    pub ocr: Option<&'a dyn OcrEngine>,
}
