//! Complaint report PDFs.
//!
//! A report is first laid out as a flat list of [`ReportLine`]s and then
//! drawn with `printpdf` using the built-in Helvetica faces. Rendering is
//! synchronous; callers run it on the blocking pool.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::db::models::{Complaint, Message};

pub const NO_MESSAGES: &str = "No messages found.";

const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_PT: f32 = 72.0;
const IMAGE_BOX_PT: f32 = 250.0;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 12.0;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Title(String),
    Heading(String),
    Text(String),
    Image(PathBuf),
    Gap(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub lines: Vec<ReportLine>,
}

impl ReportLayout {
    /// Messages are expected oldest first. `attachment` is the stored file
    /// on disk, when there is one; only images are embedded.
    pub fn build(complaint: &Complaint, messages: &[Message], attachment: Option<&Path>) -> Self {
        let mut lines = vec![
            ReportLine::Title("Complaint Report".to_string()),
            ReportLine::Gap(TEXT_SIZE),
        ];

        let fields = [
            ("Name", complaint.name.clone()),
            ("Address", complaint.address.clone()),
            ("City", complaint.city.clone()),
            ("District", complaint.district.clone()),
            ("State", complaint.state.clone()),
            ("Pincode", complaint.pincode.to_string()),
            ("Comment", complaint.comment.clone()),
            ("Status", complaint.status.clone()),
        ];
        lines.extend(
            fields
                .into_iter()
                .map(|(label, value)| ReportLine::Text(format!("{label}: {value}"))),
        );
        lines.push(ReportLine::Gap(TEXT_SIZE));

        if let Some(file) = &complaint.file {
            lines.push(ReportLine::Text(format!("Attached File: {file}")));
            if let Some(path) = attachment.filter(|_| has_image_extension(file)) {
                lines.push(ReportLine::Gap(TEXT_SIZE / 2.0));
                lines.push(ReportLine::Image(path.to_path_buf()));
                lines.push(ReportLine::Gap(TEXT_SIZE));
            }
        }

        lines.push(ReportLine::Heading("Messages:".to_string()));
        lines.push(ReportLine::Gap(TEXT_SIZE / 2.0));
        if messages.is_empty() {
            lines.push(ReportLine::Text(NO_MESSAGES.to_string()));
        } else {
            lines.extend(messages.iter().enumerate().map(|(i, msg)| {
                ReportLine::Text(format!("{}. {}: {}", i + 1, msg.name, msg.message))
            }));
        }

        Self { lines }
    }

    pub fn render_to_file(&self, output: &Path) -> Result<(), ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            "Complaint Report",
            pt(PAGE_WIDTH_PT),
            pt(PAGE_HEIGHT_PT),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let mut writer = PageWriter {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            cursor: PAGE_HEIGHT_PT - MARGIN_PT,
            pages: 1,
        };

        for line in &self.lines {
            match line {
                ReportLine::Title(text) => writer.centered(text, TITLE_SIZE, &bold),
                ReportLine::Heading(text) => writer.paragraph(text, HEADING_SIZE, &bold),
                ReportLine::Text(text) => writer.paragraph(text, TEXT_SIZE, &regular),
                ReportLine::Image(path) => writer.image(path)?,
                ReportLine::Gap(height) => writer.cursor -= height,
            }
        }

        tracing::debug!(pages = writer.pages, path = %output.display(), "Rendered report");
        doc.save(&mut BufWriter::new(File::create(output)?))
            .map_err(pdf_error)
    }
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Baseline of the next line, in points from the page bottom.
    cursor: f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN_PT {
            let (page, layer) = self.doc.add_page(
                pt(PAGE_WIDTH_PT),
                pt(PAGE_HEIGHT_PT),
                format!("Layer {}", self.pages + 1),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor = PAGE_HEIGHT_PT - MARGIN_PT;
            self.pages += 1;
        }
    }

    fn centered(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let line_height = size * 1.2;
        self.ensure_space(line_height);
        self.cursor -= size;
        let x = ((PAGE_WIDTH_PT - approx_width(text, size)) / 2.0).max(MARGIN_PT);
        self.layer
            .use_text(text, size, pt(x), pt(self.cursor), font);
        self.cursor -= line_height - size;
    }

    fn paragraph(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let line_height = size * 1.2;
        let usable = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
        let max_chars = (usable / (size * 0.5)) as usize;
        for line in wrap(text, max_chars) {
            self.ensure_space(line_height);
            self.cursor -= size;
            self.layer
                .use_text(line, size, pt(MARGIN_PT), pt(self.cursor), font);
            self.cursor -= line_height - size;
        }
    }

    fn image(&mut self, path: &Path) -> Result<(), ReportError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (width, height) = (width as f32, height as f32);
        let rgb = image::DynamicImage::ImageRgb8(rgb);

        // At 72 dpi one pixel is one point.
        let scale = (IMAGE_BOX_PT / width).min(IMAGE_BOX_PT / height);
        let (drawn_w, drawn_h) = (width * scale, height * scale);

        self.ensure_space(drawn_h);
        self.cursor -= drawn_h;
        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(pt((PAGE_WIDTH_PT - drawn_w) / 2.0)),
                translate_y: Some(pt(self.cursor)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
        Ok(())
    }
}

/// True for attachments the report can embed (jpg, jpeg, png).
pub fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false)
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn pt(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_error<E: std::fmt::Debug>(err: E) -> ReportError {
    ReportError::Pdf(format!("{err:?}"))
}

/// Deletes the file at `path` when dropped.
#[derive(Debug)]
pub struct TempReport {
    path: PathBuf,
}

impl TempReport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempReport {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temporary report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temporary report")
            }
        }
    }
}
