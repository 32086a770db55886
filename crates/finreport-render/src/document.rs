//! Paginated PDF assembly.
//!
//! A [`ReportDocument`] is an ordered sequence of blocks laid out
//! top-to-bottom on US letter pages. When the next block does not fit the
//! remaining vertical space the document starts a new page; content is never
//! clipped. Chart images that fail to load are logged and skipped so the
//! rest of the report still renders.

use crate::charts::ChartArtifact;
use crate::layout::{
    paginate, BLOCK_GAP_MM, CONTENT_WIDTH_MM, HEADING_HEIGHT_MM, LINE_HEIGHT_MM, MARGIN_MM,
    PAGE_CAPACITY_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, TABLE_ROW_HEIGHT_MM, WRAP_WIDTH_CHARS,
};
use finreport_common::{wrap_text, ReportError, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

const IMAGE_DPI: f32 = 300.0;
const BODY_PT: f32 = 10.0;
const HEADING_PT: f32 = 14.0;
const TITLE_PT: f32 = 28.0;
const SUBTITLE_PT: f32 = 14.0;

/// A small tabular block rendered as fixed-width columns of text.
#[derive(Debug, Clone)]
pub struct TableBlock {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row cells, each row as wide as `headers`.
    pub rows: Vec<Vec<String>>,
}

/// One content block of the report body.
#[derive(Debug, Clone)]
pub enum Block {
    /// A bold section heading.
    Heading(String),
    /// Body text, wrapped at word boundaries to the page width budget.
    Paragraph(String),
    /// A text table.
    Table(TableBlock),
    /// An embedded chart image with its caption.
    Chart(ChartArtifact),
    /// An explicit page break.
    PageBreak,
}

/// An ordered, paginated report: a title page followed by content pages.
#[derive(Debug, Default)]
pub struct ReportDocument {
    title: String,
    subtitle: String,
    blocks: Vec<Block>,
}

impl ReportDocument {
    /// Creates a document with a title page.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            blocks: Vec::new(),
        }
    }

    /// Appends a block to the body.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Appends a section heading.
    pub fn heading(&mut self, text: impl Into<String>) {
        self.push(Block::Heading(text.into()));
    }

    /// Appends a paragraph.
    pub fn paragraph(&mut self, text: impl Into<String>) {
        self.push(Block::Paragraph(text.into()));
    }

    /// Appends a table.
    pub fn table(&mut self, headers: Vec<String>, rows: Vec<Vec<String>>) {
        self.push(Block::Table(TableBlock { headers, rows }));
    }

    /// Appends a chart image block.
    pub fn chart(&mut self, artifact: ChartArtifact) {
        self.push(Block::Chart(artifact));
    }

    /// Writes the document to a PDF file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let (doc, title_page, title_layer) = PdfDocument::new(
            &self.title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;

        // Title page.
        let layer = doc.get_page(title_page).get_layer(title_layer);
        layer.use_text(
            &self.title,
            TITLE_PT,
            Mm(centered_x(&self.title, TITLE_PT)),
            Mm(PAGE_HEIGHT_MM - 80.0),
            &bold,
        );
        layer.use_text(
            &self.subtitle,
            SUBTITLE_PT,
            Mm(centered_x(&self.subtitle, SUBTITLE_PT)),
            Mm(PAGE_HEIGHT_MM - 100.0),
            &regular,
        );

        // Body pages: paginate each run of blocks between explicit breaks.
        for segment in self.blocks.split(|b| matches!(b, Block::PageBreak)) {
            if segment.is_empty() {
                continue;
            }
            let heights: Vec<f32> = segment.iter().map(block_height).collect();
            for page_blocks in paginate(&heights, PAGE_CAPACITY_MM) {
                let (page, layer_index) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                let layer = doc.get_page(page).get_layer(layer_index);
                let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM;
                for index in page_blocks {
                    cursor = draw_block(&layer, &segment[index], cursor, &regular, &bold);
                }
            }
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::Render(e.to_string()))?;
        Ok(())
    }
}

/// Estimated height of a block in millimeters, used for page assignment.
fn block_height(block: &Block) -> f32 {
    match block {
        Block::Heading(_) => HEADING_HEIGHT_MM,
        Block::Paragraph(text) => {
            wrap_text(text, WRAP_WIDTH_CHARS).len() as f32 * LINE_HEIGHT_MM + BLOCK_GAP_MM
        }
        Block::Table(table) => (table.rows.len() + 1) as f32 * TABLE_ROW_HEIGHT_MM + BLOCK_GAP_MM,
        Block::Chart(artifact) => {
            LINE_HEIGHT_MM + chart_image_height_mm(artifact).unwrap_or(0.0) + BLOCK_GAP_MM
        }
        Block::PageBreak => 0.0,
    }
}

/// Height the chart image will occupy once scaled to the content width.
fn chart_image_height_mm(artifact: &ChartArtifact) -> Option<f32> {
    let (px_w, px_h) = image::image_dimensions(&artifact.path).ok()?;
    let native_w = px_w as f32 / IMAGE_DPI * 25.4;
    let native_h = px_h as f32 / IMAGE_DPI * 25.4;
    Some(native_h * (CONTENT_WIDTH_MM / native_w))
}

/// Draws a block with its top edge at `cursor`, returning the new cursor.
fn draw_block(
    layer: &PdfLayerReference,
    block: &Block,
    mut cursor: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> f32 {
    match block {
        Block::Heading(text) => {
            cursor -= HEADING_HEIGHT_MM - 3.0;
            layer.use_text(text, HEADING_PT, Mm(MARGIN_MM), Mm(cursor), bold);
            cursor - 3.0
        }
        Block::Paragraph(text) => {
            for line in wrap_text(text, WRAP_WIDTH_CHARS) {
                cursor -= LINE_HEIGHT_MM;
                if !line.is_empty() {
                    layer.use_text(&line, BODY_PT, Mm(MARGIN_MM), Mm(cursor), regular);
                }
            }
            cursor - BLOCK_GAP_MM
        }
        Block::Table(table) => {
            let columns = table.headers.len().max(1);
            let col_width = CONTENT_WIDTH_MM / columns as f32;
            cursor -= TABLE_ROW_HEIGHT_MM;
            for (i, header) in table.headers.iter().enumerate() {
                let x = MARGIN_MM + i as f32 * col_width;
                layer.use_text(header, BODY_PT, Mm(x), Mm(cursor), bold);
            }
            for row in &table.rows {
                cursor -= TABLE_ROW_HEIGHT_MM;
                for (i, cell) in row.iter().take(columns).enumerate() {
                    let x = MARGIN_MM + i as f32 * col_width;
                    layer.use_text(cell, BODY_PT, Mm(x), Mm(cursor), regular);
                }
            }
            cursor - BLOCK_GAP_MM
        }
        Block::Chart(artifact) => {
            cursor -= LINE_HEIGHT_MM;
            layer.use_text(&artifact.title, BODY_PT + 2.0, Mm(MARGIN_MM), Mm(cursor), bold);
            match embed_chart(layer, artifact, cursor) {
                Ok(used) => cursor - used - BLOCK_GAP_MM,
                Err(e) => {
                    warn!("skipping chart '{}': {e}", artifact.title);
                    cursor - BLOCK_GAP_MM
                }
            }
        }
        Block::PageBreak => cursor,
    }
}

/// Embeds the chart PNG below its caption; returns the vertical space used.
fn embed_chart(
    layer: &PdfLayerReference,
    artifact: &ChartArtifact,
    cursor: f32,
) -> Result<f32> {
    let (px_w, _) = image::image_dimensions(&artifact.path)
        .map_err(|e| ReportError::Render(format!("{}: {e}", artifact.path.display())))?;
    let native_w = px_w as f32 / IMAGE_DPI * 25.4;
    let scale = CONTENT_WIDTH_MM / native_w;
    let height = chart_image_height_mm(artifact)
        .ok_or_else(|| ReportError::Render(format!("{}: unreadable", artifact.path.display())))?;

    let file = File::open(&artifact.path)?;
    let mut reader = BufReader::new(file);
    let decoder = printpdf::image_crate::codecs::png::PngDecoder::new(&mut reader)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    let image = Image::try_from(decoder).map_err(|e| ReportError::Render(e.to_string()))?;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(cursor - 2.0 - height)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(height + 2.0)
}

/// Approximate x offset that centers builtin-font text on the page.
fn centered_x(text: &str, size_pt: f32) -> f32 {
    let width_mm = text.chars().count() as f32 * size_pt * 0.5 * 0.3528;
    ((PAGE_WIDTH_MM - width_mm) / 2.0).max(MARGIN_MM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn body_text() -> String {
        "This report analyzes cost and usage data over the reporting window, \
         breaking down the analysis by service and region. "
            .repeat(8)
    }

    #[test]
    fn test_save_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        let mut document = ReportDocument::new("Cost Report", "Prepared by finreport");
        document.heading("Report Summary");
        document.paragraph(body_text());
        document.table(
            vec!["Metric".into(), "Value".into()],
            vec![
                vec!["Total cost".into(), "$1,234.56".into()],
                vec!["Rows".into(), "360".into()],
            ],
        );
        document.push(Block::PageBreak);
        document.heading("Appendix");
        document.paragraph("Short closing note.");
        document.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_missing_chart_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        let mut document = ReportDocument::new("Cost Report", "Prepared by finreport");
        document.chart(ChartArtifact {
            title: "Gone Chart".into(),
            path: PathBuf::from("/nonexistent/chart.png"),
        });
        document.paragraph("Body continues after the missing chart.");
        document.save(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_long_body_spans_multiple_pages() {
        let blocks: Vec<Block> = (0..12).map(|_| Block::Paragraph(body_text())).collect();
        let heights: Vec<f32> = blocks.iter().map(block_height).collect();
        let pages = paginate(&heights, PAGE_CAPACITY_MM);
        assert!(pages.len() > 1);
        for page in &pages {
            let total: f32 = page.iter().map(|&i| heights[i]).sum();
            assert!(total <= PAGE_CAPACITY_MM || page.len() == 1);
        }
    }
}
