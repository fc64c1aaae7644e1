use serde::{Deserialize, Serialize};

/// Broad file categories we accept
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Presentation,
    Document,
    Text,
    Image,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Document => "document",
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    pub fn needs_ocr(&self) -> bool {
        matches!(self, Self::Image)
    }
}

/// Accepted extensions per category (lowercase, no dot).
pub const SUPPORTED_EXTENSIONS: &[(FileCategory, &[&str])] = &[
    (FileCategory::Presentation, &["pptx"]),
    (FileCategory::Document, &["pdf", "docx", "doc"]),
    (FileCategory::Text, &["html", "htm", "txt"]),
    (FileCategory::Image, &["jpg", "jpeg", "png"]),
];

/// Lowercase extension after the last dot, or empty when there is none.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Category for an extension (case-insensitive), `None` if unsupported.
pub fn file_category(extension: &str) -> Option<FileCategory> {
    let ext = extension.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(category, _)| *category)
}

pub fn is_extension_supported(extension: &str) -> bool {
    file_category(extension).is_some()
}
