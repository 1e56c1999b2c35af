use std::path::{Path, PathBuf};

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::report::ReportSection;
use crate::services::report_layout::{
    self, Column, DocumentPlan, HeaderBand, PageGeometry, PlannedRow, CELL_H_PAD, CELL_V_PAD,
    LINE_HEIGHT, TABLE_FONT_SIZE, TITLE_FONT_SIZE, TITLE_HEIGHT,
};

/// The export artifact always lands under this name.
pub const REPORT_FILE_NAME: &str = "report.pdf";

const DOCUMENT_TITLE: &str = "Balanced Scorecard Report";
const PAGE_LAYER: &str = "Layer 1";

/// Distance from a text band's top to the first baseline.
const BASELINE_DROP: f64 = 0.8;

/// Renders an aggregated report as one paginated PDF: four titled tables
/// drawn top-to-bottom along the layout plan's flowing cursor.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    geometry: PageGeometry,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportExporter {
    pub fn new() -> Self {
        Self {
            geometry: PageGeometry::default(),
        }
    }

    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    /// Complete PDF bytes for the given sections; either the whole
    /// document or an error, no partial output.
    pub fn export(&self, sections: &[ReportSection]) -> AppResult<Vec<u8>> {
        let plan = report_layout::plan_document(sections, self.geometry);
        let bytes = self.render(&plan)?;
        debug!(
            target: "app::report",
            pages = plan.page_count,
            sections = plan.sections.len(),
            bytes = bytes.len(),
            "report rendered"
        );
        Ok(bytes)
    }

    /// Writes the artifact as `report.pdf` inside `dir` and returns the
    /// full path.
    pub fn export_to_file(&self, sections: &[ReportSection], dir: &Path) -> AppResult<PathBuf> {
        let bytes = self.export(sections)?;
        let path = dir.join(REPORT_FILE_NAME);
        std::fs::write(&path, bytes)?;
        debug!(target: "app::report", path = %path.display(), "report written");
        Ok(path)
    }

    fn render(&self, plan: &DocumentPlan) -> AppResult<Vec<u8>> {
        let geometry = plan.geometry;
        let (doc, first_page, first_layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(geometry.width as f32),
            Mm(geometry.height as f32),
            PAGE_LAYER,
        );

        let mut pages = vec![(first_page, first_layer)];
        for _ in 1..plan.page_count {
            pages.push(doc.add_page(
                Mm(geometry.width as f32),
                Mm(geometry.height as f32),
                PAGE_LAYER,
            ));
        }

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| AppError::export(format!("failed to load body font: {err}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| AppError::export(format!("failed to load title font: {err}")))?;

        let columns = report_layout::columns(&geometry);

        for section in &plan.sections {
            let (page, layer) = pages[section.title_page];
            let title_layer = doc.get_page(page).get_layer(layer);
            title_layer.set_fill_color(black());
            title_layer.use_text(
                &section.title,
                TITLE_FONT_SIZE as f32,
                Mm(geometry.margin_left as f32),
                Mm((geometry.height - (section.title_y + TITLE_HEIGHT - BASELINE_DROP)) as f32),
                &bold,
            );

            for header in &section.headers {
                let (page, layer) = pages[header.page];
                let band_layer = doc.get_page(page).get_layer(layer);
                draw_header_band(&band_layer, header, &columns, &geometry, &bold);
            }

            for row in &section.rows {
                let (page, layer) = pages[row.page];
                let band_layer = doc.get_page(page).get_layer(layer);
                draw_body_row(&band_layer, row, &columns, &geometry, &font);
            }
        }

        doc.save_to_bytes()
            .map_err(|err| AppError::export(format!("failed to serialize document: {err}")))
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn header_fill() -> Color {
    // #A43214
    Color::Rgb(Rgb::new(164.0 / 255.0, 50.0 / 255.0, 20.0 / 255.0, None))
}

fn header_text() -> Color {
    Color::Rgb(Rgb::new(245.0 / 255.0, 245.0 / 255.0, 17.0 / 255.0, None))
}

fn cell_rect(column: &Column, y: f64, height: f64, geometry: &PageGeometry, mode: PaintMode) -> Rect {
    Rect::new(
        Mm(column.x as f32),
        Mm((geometry.height - (y + height)) as f32),
        Mm((column.x + column.width) as f32),
        Mm((geometry.height - y) as f32),
    )
    .with_mode(mode)
}

fn draw_cell_lines(
    layer: &PdfLayerReference,
    column: &Column,
    lines: &[String],
    y: f64,
    geometry: &PageGeometry,
    font: &IndirectFontRef,
) {
    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let baseline = y + CELL_V_PAD + (index + 1) as f64 * LINE_HEIGHT - BASELINE_DROP;
        layer.use_text(
            line,
            TABLE_FONT_SIZE as f32,
            Mm((column.x + CELL_H_PAD) as f32),
            Mm((geometry.height - baseline) as f32),
            font,
        );
    }
}

fn draw_header_band(
    layer: &PdfLayerReference,
    header: &HeaderBand,
    columns: &[Column],
    geometry: &PageGeometry,
    bold: &IndirectFontRef,
) {
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.3);
    layer.set_fill_color(header_fill());
    for column in columns {
        layer.add_rect(cell_rect(
            column,
            header.y,
            header.height,
            geometry,
            PaintMode::FillStroke,
        ));
    }

    layer.set_fill_color(header_text());
    for (column, lines) in columns.iter().zip(header.cells.iter()) {
        draw_cell_lines(layer, column, lines, header.y, geometry, bold);
    }
}

fn draw_body_row(
    layer: &PdfLayerReference,
    row: &PlannedRow,
    columns: &[Column],
    geometry: &PageGeometry,
    font: &IndirectFontRef,
) {
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.3);
    for column in columns {
        layer.add_rect(cell_rect(
            column,
            row.y,
            row.height,
            geometry,
            PaintMode::Stroke,
        ));
    }

    layer.set_fill_color(black());
    for (column, lines) in columns.iter().zip(row.cells.iter()) {
        draw_cell_lines(layer, column, lines, row.y, geometry, font);
    }
}
