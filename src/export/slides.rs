use serde::Serialize;

use super::{CaseExport, ExportError, PptConfig};
use crate::pipeline::safety::{sanitize_text, truncate_text};

/// Width or height of a text box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    Inches(f32),
    Percent(u8),
}

/// One positioned text box. Coordinates are in inches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideElement {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub w: Option<Extent>,
    pub h: Option<Extent>,
    pub font_size: u32,
    pub color: Option<String>,
    pub bold: bool,
}

impl SlideElement {
    fn new(text: impl Into<String>, x: f32, y: f32, font_size: u32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            w: None,
            h: None,
            font_size,
            color: None,
            bold: false,
        }
    }

    fn sized(mut self, w: Extent, h: Extent) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    fn colored(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Title,
    Content,
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideData {
    pub kind: SlideKind,
    pub elements: Vec<SlideElement>,
}

/// Renders slides. Implemented over a concrete PPTX library.
pub trait PresentationBuilder {
    fn add_slide(&mut self) -> Result<(), ExportError>;

    /// Add a text box to the most recently added slide.
    fn add_text(&mut self, element: &SlideElement) -> Result<(), ExportError>;

    fn write_file(&mut self, file_name: &str) -> Result<(), ExportError>;
}

/// Slide definitions for a case: title, clinical context, analysis and,
/// when the AI response is longer than one slide, a continuation slide.
pub fn create_slide_data(data: &CaseExport, cfg: &PptConfig) -> Vec<SlideData> {
    let age_sex = sanitize_text(&data.age_sex);
    let initials = sanitize_text(&data.initials);
    let hpi = sanitize_text(&data.hpi);
    let meds = sanitize_text(&data.meds);
    let ai_response = sanitize_text(&data.ai_response);

    let colors = &cfg.colors;
    let fonts = &cfg.fonts;
    let wide = Extent::Percent(90);

    let mut slides = vec![
        SlideData {
            kind: SlideKind::Title,
            elements: vec![
                SlideElement::new("Geriatric Case", 1.0, 2.0, fonts.title)
                    .colored(&colors.primary)
                    .bold(),
                SlideElement::new(format!("{age_sex} - {initials}"), 1.0, 3.0, fonts.subtitle)
                    .colored(&colors.secondary),
            ],
        },
        SlideData {
            kind: SlideKind::Content,
            elements: vec![
                SlideElement::new("Clinical Context", 0.5, 0.5, fonts.heading)
                    .colored(&colors.accent)
                    .bold(),
                SlideElement::new(
                    format!("HPI: {}", truncate_text(&hpi, cfg.max_hpi_length)),
                    0.5,
                    1.0,
                    fonts.body,
                )
                .sized(wide, Extent::Inches(2.0)),
                SlideElement::new(
                    format!("MEDS: {}", truncate_text(&meds, cfg.max_meds_length)),
                    0.5,
                    3.5,
                    fonts.small,
                )
                .sized(wide, Extent::Inches(2.0)),
            ],
        },
        SlideData {
            kind: SlideKind::Content,
            elements: vec![
                SlideElement::new("Analysis & Plan", 0.5, 0.5, fonts.heading)
                    .colored(&colors.highlight)
                    .bold(),
                SlideElement::new(
                    truncate_text(&ai_response, cfg.max_text_per_slide),
                    0.5,
                    1.0,
                    fonts.small,
                )
                .sized(wide, Extent::Percent(80))
                .colored(&colors.text),
            ],
        },
    ];

    if ai_response.chars().count() > cfg.max_text_per_slide {
        let continuation: String = ai_response
            .chars()
            .skip(cfg.max_text_per_slide)
            .take(cfg.max_text_per_slide)
            .collect();
        slides.push(SlideData {
            kind: SlideKind::Overflow,
            elements: vec![
                SlideElement::new("Plan (Cont.)", 0.5, 0.5, fonts.heading).colored(&colors.highlight),
                SlideElement::new(continuation, 0.5, 1.0, fonts.small)
                    .sized(wide, Extent::Percent(80)),
            ],
        });
    }

    slides
}

/// Feed the case's slides into `builder`. Returns the number of slides.
pub fn generate_presentation(
    data: &CaseExport,
    cfg: &PptConfig,
    builder: Option<&mut dyn PresentationBuilder>,
) -> Result<usize, ExportError> {
    let builder = builder.ok_or(ExportError::MissingCollaborator("presentation builder"))?;
    render_slides(&create_slide_data(data, cfg), builder)
}

/// Build and write the presentation. Returns the file name used.
pub fn export_presentation(
    data: &CaseExport,
    cfg: &PptConfig,
    builder: Option<&mut dyn PresentationBuilder>,
    file_name: Option<&str>,
) -> Result<String, ExportError> {
    let builder = builder.ok_or(ExportError::MissingCollaborator("presentation builder"))?;
    let slide_count = render_slides(&create_slide_data(data, cfg), builder)?;

    let file_name = file_name
        .map(str::to_string)
        .unwrap_or_else(|| default_pptx_filename(data));
    builder.write_file(&file_name)?;

    tracing::info!(slide_count, "Presentation exported");
    Ok(file_name)
}

fn render_slides(
    slides: &[SlideData],
    builder: &mut dyn PresentationBuilder,
) -> Result<usize, ExportError> {
    for slide in slides {
        builder.add_slide()?;
        for element in &slide.elements {
            builder.add_text(element)?;
        }
    }

    tracing::debug!(slide_count = slides.len(), "Presentation assembled");
    Ok(slides.len())
}

pub fn default_pptx_filename(data: &CaseExport) -> String {
    format!("{}.pptx", data.file_stem())
}
