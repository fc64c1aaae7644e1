use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{CaseExport, DocConfig, ExportError};
use crate::pipeline::safety::{escape_html, sanitize_text};

/// A Word-compatible document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocExport {
    /// BOM followed by the UTF-8 HTML.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub filename: String,
    pub html: String,
    pub mime_type: String,
}

impl DocExport {
    /// Save into `dir`. A file name carrying directory components is
    /// rejected.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let is_plain_name = !self.filename.contains(['/', '\\'])
            && Path::new(&self.filename).file_name() == Some(self.filename.as_ref());
        if !is_plain_name {
            return Err(ExportError::InvalidFileName(self.filename.clone()));
        }
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(size_bytes = self.bytes.len(), "Document written");
        Ok(path)
    }
}

fn field(text: &str) -> String {
    escape_html(&sanitize_text(text))
}

/// HTML that Word opens as a document. Every field is sanitized, then
/// escaped.
pub fn create_doc_html(data: &CaseExport, cfg: &DocConfig) -> String {
    let ns = &cfg.namespaces;
    let mut html = format!(
        "<html xmlns:o='{}' xmlns:w='{}' xmlns='{}'><head><meta charset='utf-8'><title>Case</title></head><body>",
        ns.office, ns.word, ns.html
    );

    html.push_str("<h1 style=\"color:#2c3e50\">Geriatric Case Report</h1>");
    html.push_str(&format!(
        "<p><strong>ID:</strong> {} ({})</p>",
        field(&data.age_sex),
        field(&data.initials)
    ));
    html.push_str(&format!("<h3>HPI</h3><p>{}</p>", field(&data.hpi)));
    html.push_str(&format!("<h3>Meds/Labs</h3><p>{}</p>", field(&data.meds)));
    html.push_str("<hr>");
    html.push_str("<h3>Analysis &amp; Plan</h3>");
    html.push_str(&format!(
        "<div style=\"font-family: Arial; white-space: pre-wrap;\">{}</div>",
        field(&data.ai_response)
    ));

    html.push_str("</body></html>");
    html
}

/// Document bytes plus the name to save them under.
pub fn export_doc(data: &CaseExport, cfg: &DocConfig, filename: Option<&str>) -> DocExport {
    let html = create_doc_html(data, cfg);

    let mut bytes = Vec::with_capacity(html.len() + cfg.bom.len_utf8());
    let mut bom = [0u8; 4];
    bytes.extend_from_slice(cfg.bom.encode_utf8(&mut bom).as_bytes());
    bytes.extend_from_slice(html.as_bytes());

    let filename = filename
        .map(str::to_string)
        .unwrap_or_else(|| default_doc_filename(data));

    tracing::debug!(size_bytes = bytes.len(), "Word document assembled");

    DocExport {
        bytes,
        filename,
        html,
        mime_type: cfg.mime_type.clone(),
    }
}

pub fn default_doc_filename(data: &CaseExport) -> String {
    format!("{}.doc", data.file_stem())
}
