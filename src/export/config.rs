//! Export configuration: slide limits, palette and font sizes for
//! presentations, MIME type and Office namespaces for Word documents.

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Presentation
// ═══════════════════════════════════════════════════════════

/// Slide palette, hex RGB without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub highlight: String,
    pub text: String,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideFonts {
    pub title: u32,
    pub subtitle: u32,
    pub heading: u32,
    pub body: u32,
    pub small: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PptConfig {
    /// Characters of AI response per analysis slide. A second slide holds
    /// at most this many more; anything beyond is dropped.
    pub max_text_per_slide: usize,
    pub max_hpi_length: usize,
    pub max_meds_length: usize,
    pub colors: SlideColors,
    pub fonts: SlideFonts,
}

impl Default for PptConfig {
    fn default() -> Self {
        Self {
            max_text_per_slide: 1000,
            max_hpi_length: 400,
            max_meds_length: 400,
            colors: SlideColors {
                primary: "2c3e50".into(),
                secondary: "7f8c8d".into(),
                accent: "27ae60".into(),
                highlight: "c0392b".into(),
                text: "333333".into(),
            },
            fonts: SlideFonts {
                title: 32,
                subtitle: 24,
                heading: 18,
                body: 14,
                small: 12,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Word document
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficeNamespaces {
    pub office: String,
    pub word: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocConfig {
    pub mime_type: String,
    /// Written before the HTML so Word detects UTF-8.
    pub bom: char,
    pub namespaces: OfficeNamespaces,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            mime_type: "application/msword".into(),
            bom: '\u{FEFF}',
            namespaces: OfficeNamespaces {
                office: "urn:schemas-microsoft-com:office:office".into(),
                word: "urn:schemas-microsoft-com:office:word".into(),
                html: "http://www.w3.org/TR/REC-html40".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_defaults() {
        let cfg = PptConfig::default();
        assert_eq!(cfg.max_text_per_slide, 1000);
        assert_eq!(cfg.max_hpi_length, 400);
        assert_eq!(cfg.max_meds_length, 400);
        assert!(cfg.fonts.title > cfg.fonts.body);
        assert_eq!(cfg.colors.highlight, "c0392b");
    }

    #[test]
    fn document_defaults() {
        let cfg = DocConfig::default();
        assert_eq!(cfg.mime_type, "application/msword");
        assert_eq!(cfg.bom, '\u{FEFF}');
        assert_eq!(cfg.namespaces.word, "urn:schemas-microsoft-com:office:word");
    }
}
