use crate::models::report::{ReportSection, REPORT_HEADERS};

/// Page metrics in millimeters, A4 portrait by default. The y axis grows
/// downward here; the renderer converts to PDF coordinates at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_left: 15.0,
            margin_right: 15.0,
            margin_top: 10.0,
            margin_bottom: 15.0,
        }
    }
}

impl PageGeometry {
    pub fn usable_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn bottom_limit(&self) -> f64 {
        self.height - self.margin_bottom
    }
}

pub const TITLE_FONT_SIZE: f64 = 9.0;
pub const TABLE_FONT_SIZE: f64 = 7.0;

/// Line advance for 7pt table text.
pub const LINE_HEIGHT: f64 = 3.2;
/// Vertical padding inside a cell, applied above and below the text.
pub const CELL_V_PAD: f64 = 0.9;
/// Horizontal inset of text from the cell border.
pub const CELL_H_PAD: f64 = 1.0;
/// Height reserved for a section title line.
pub const TITLE_HEIGHT: f64 = 4.5;
/// Gap between a title and its table, and below a table before the next
/// title. Both follow the flowing cursor, never a fixed page offset.
pub const TITLE_GAP: f64 = 2.0;
pub const SECTION_GAP: f64 = 5.0;

/// Approximate advance of one 7pt Helvetica character in millimeters.
/// Good enough for wrapping; the renderer never draws outside the cell
/// because lines are broken against this same budget.
const CHAR_WIDTH: f64 = 1.25;

/// Relative column weights for the nine report columns; scaled to the
/// usable page width. Office Target and OFI carry the long prose.
const COLUMN_WEIGHTS: [f64; 9] = [7.0, 15.0, 11.0, 11.0, 7.0, 8.0, 8.0, 8.0, 15.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub x: f64,
    pub width: f64,
}

/// Column strip for a given page geometry, in fixed report order.
pub fn columns(geometry: &PageGeometry) -> Vec<Column> {
    let total: f64 = COLUMN_WEIGHTS.iter().sum();
    let usable = geometry.usable_width();
    let mut x = geometry.margin_left;
    REPORT_HEADERS
        .iter()
        .zip(COLUMN_WEIGHTS.iter())
        .map(|(header, weight)| {
            let width = usable * weight / total;
            let column = Column { header, x, width };
            x += width;
            column
        })
        .collect()
}

/// Position of the flowing layout cursor: a page index and a distance from
/// the top edge of that page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f64,
}

/// A table header band; repeated at the top of every page a table spills
/// onto.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBand {
    pub page: usize,
    pub y: f64,
    pub height: f64,
    pub cells: Vec<Vec<String>>,
}

/// One body row, fully placed: page, top position, computed height, and
/// the wrapped lines of each cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRow {
    pub page: usize,
    pub y: f64,
    pub height: f64,
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub title: String,
    pub title_page: usize,
    pub title_y: f64,
    pub headers: Vec<HeaderBand>,
    pub rows: Vec<PlannedRow>,
    /// Just below the last rendered row (or the header band when the
    /// section has no rows), on whatever page that fell.
    pub end: Cursor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub geometry: PageGeometry,
    pub page_count: usize,
    pub sections: Vec<SectionPlan>,
}

/// Lays the sections out top-to-bottom as one flowing document. Each
/// section's title starts at the cursor left by the previous section's
/// true rendered end; tables page-break automatically and repeat their
/// header band after every break.
pub fn plan_document(sections: &[ReportSection], geometry: PageGeometry) -> DocumentPlan {
    let columns = columns(&geometry);
    let header_cells: Vec<Vec<String>> = columns
        .iter()
        .map(|column| wrap_text(column.header, column.width))
        .collect();
    let header_height = band_height(&header_cells);

    let mut cursor = Cursor {
        page: 0,
        y: geometry.margin_top,
    };
    let mut page_count = 1;
    let mut planned_sections = Vec::with_capacity(sections.len());

    for section in sections {
        let plan = plan_section(
            section,
            &columns,
            &header_cells,
            header_height,
            &geometry,
            &mut cursor,
            &mut page_count,
        );
        planned_sections.push(plan);
    }

    DocumentPlan {
        geometry,
        page_count,
        sections: planned_sections,
    }
}

#[allow(clippy::too_many_arguments)]
fn plan_section(
    section: &ReportSection,
    columns: &[Column],
    header_cells: &[Vec<String>],
    header_height: f64,
    geometry: &PageGeometry,
    cursor: &mut Cursor,
    page_count: &mut usize,
) -> SectionPlan {
    let first_row_height = section
        .rows
        .first()
        .map(|row| {
            let cells = wrap_row(row.cells().as_slice(), columns, geometry);
            band_height(&cells)
        })
        .unwrap_or(0.0);

    // keep the title attached to at least the header and the first row
    let lead_height = TITLE_HEIGHT + TITLE_GAP + header_height + first_row_height;
    if cursor.y + lead_height > geometry.bottom_limit() {
        advance_page(cursor, geometry, page_count);
    }

    let title_page = cursor.page;
    let title_y = cursor.y;
    cursor.y += TITLE_HEIGHT + TITLE_GAP;

    let mut headers = vec![HeaderBand {
        page: cursor.page,
        y: cursor.y,
        height: header_height,
        cells: header_cells.to_vec(),
    }];
    cursor.y += header_height;

    let mut rows = Vec::with_capacity(section.rows.len());
    for row in &section.rows {
        let cells = wrap_row(row.cells().as_slice(), columns, geometry);
        let height = band_height(&cells);

        if cursor.y + height > geometry.bottom_limit() {
            advance_page(cursor, geometry, page_count);
            headers.push(HeaderBand {
                page: cursor.page,
                y: cursor.y,
                height: header_height,
                cells: header_cells.to_vec(),
            });
            cursor.y += header_height;
        }

        rows.push(PlannedRow {
            page: cursor.page,
            y: cursor.y,
            height,
            cells,
        });
        cursor.y += height;
    }

    let end = Cursor {
        page: cursor.page,
        y: cursor.y,
    };
    cursor.y += SECTION_GAP;

    SectionPlan {
        title: section.title.clone(),
        title_page,
        title_y,
        headers,
        rows,
        end,
    }
}

fn advance_page(cursor: &mut Cursor, geometry: &PageGeometry, page_count: &mut usize) {
    cursor.page += 1;
    cursor.y = geometry.margin_top;
    if cursor.page + 1 > *page_count {
        *page_count = cursor.page + 1;
    }
}

fn wrap_row(cells: &[&str], columns: &[Column], geometry: &PageGeometry) -> Vec<Vec<String>> {
    let max_lines = max_lines_per_cell(geometry);
    cells
        .iter()
        .zip(columns.iter())
        .map(|(text, column)| {
            let mut lines = wrap_text(text, column.width);
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                if let Some(last) = lines.last_mut() {
                    last.push_str("...");
                }
            }
            lines
        })
        .collect()
}

// A single row never exceeds one page; overlong cell text is cut with an
// ellipsis instead of letting the row run through the bottom margin.
fn max_lines_per_cell(geometry: &PageGeometry) -> usize {
    let available = geometry.bottom_limit() - geometry.margin_top - 2.0 * CELL_V_PAD;
    ((available / LINE_HEIGHT).floor() as usize).max(1)
}

fn band_height(cells: &[Vec<String>]) -> f64 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f64 * LINE_HEIGHT + 2.0 * CELL_V_PAD
}

/// Greedy word wrap against the approximate character budget of a column.
/// Words longer than a full line are hard-broken.
pub fn wrap_text(text: &str, column_width: f64) -> Vec<String> {
    let budget = (((column_width - 2.0 * CELL_H_PAD) / CHAR_WIDTH).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > budget {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(budget)
                .map(|(index, _)| index)
                .unwrap_or(word.len());
            let (head, tail) = word.split_at(split);
            lines.push(head.to_string());
            word = tail;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > budget && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ReportRow;

    fn row(code: &str, prose_len: usize) -> ReportRow {
        ReportRow {
            target_code: code.to_string(),
            office_target: "word ".repeat(prose_len).trim().to_string(),
            kpi: "kpi".to_string(),
            actions: "actions".to_string(),
            budget: "1000".to_string(),
            incharge: "ops".to_string(),
            actual_performance: "80".to_string(),
            target_performance: "100".to_string(),
            ofi: "ofi".to_string(),
        }
    }

    fn section(title: &str, count: usize) -> ReportSection {
        ReportSection {
            title: title.to_string(),
            rows: (0..count).map(|i| row(&format!("T-{i}"), 4)).collect(),
        }
    }

    #[test]
    fn columns_tile_the_usable_width() {
        let geometry = PageGeometry::default();
        let cols = columns(&geometry);
        assert_eq!(cols.len(), 9);
        assert!((cols[0].x - geometry.margin_left).abs() < 1e-9);
        let right_edge = cols.last().map(|c| c.x + c.width).unwrap();
        assert!((right_edge - (geometry.width - geometry.margin_right)).abs() < 1e-6);
    }

    #[test]
    fn wrap_respects_budget_and_hard_breaks_long_words() {
        let lines = wrap_text("short words only here", 20.0);
        for line in &lines {
            assert!(line.chars().count() <= 14);
        }

        let lines = wrap_text(&"x".repeat(40), 20.0);
        assert!(lines.len() >= 3);
        assert!(lines.iter().all(|line| line.chars().count() <= 14));

        assert_eq!(wrap_text("", 20.0), vec![String::new()]);
    }

    #[test]
    fn long_table_breaks_pages_and_repeats_header() {
        let plan = plan_document(&[section("A", 80)], PageGeometry::default());
        let section_plan = &plan.sections[0];

        assert!(plan.page_count > 1);
        assert_eq!(section_plan.headers.len(), plan.page_count);
        for (page, header) in section_plan.headers.iter().enumerate() {
            assert_eq!(header.page, page);
        }
        // every row sits inside the printable band of its page
        let geometry = plan.geometry;
        for row in &section_plan.rows {
            assert!(row.y >= geometry.margin_top);
            assert!(row.y + row.height <= geometry.bottom_limit() + 1e-9);
        }
    }

    #[test]
    fn next_title_follows_true_end_of_previous_table() {
        // 40 tall rows force A across a page break; B still has to land
        // exactly after A's true rendered end
        let tall = ReportSection {
            title: "A".to_string(),
            rows: (0..40).map(|i| row(&format!("T-{i}"), 40)).collect(),
        };
        let plan = plan_document(&[tall, section("B", 2)], PageGeometry::default());
        let a = &plan.sections[0];
        let b = &plan.sections[1];
        assert!(a.rows.last().map(|r| r.page).unwrap_or(0) > 0, "A must break pages");

        let a_last_row = a.rows.last().expect("A has rows");
        assert_eq!(a.end.page, a_last_row.page);
        assert!((a.end.y - (a_last_row.y + a_last_row.height)).abs() < 1e-9);

        // B starts on A's final page (or later), strictly below A's end
        assert!(b.title_page >= a.end.page);
        if b.title_page == a.end.page {
            assert!(b.title_y >= a.end.y + SECTION_GAP - 1e-9);
        }
    }

    #[test]
    fn title_position_depends_on_previous_section_length() {
        let short = plan_document(
            &[section("A", 3), section("B", 1)],
            PageGeometry::default(),
        );
        let long = plan_document(
            &[section("A", 10), section("B", 1)],
            PageGeometry::default(),
        );
        let short_b = &short.sections[1];
        let long_b = &long.sections[1];
        assert!(
            long_b.title_y > short_b.title_y || long_b.title_page > short_b.title_page,
            "title must flow with the cursor, not sit at a fixed offset"
        );
    }

    #[test]
    fn empty_section_still_renders_title_and_header() {
        let plan = plan_document(
            &[section("A", 0), section("B", 1)],
            PageGeometry::default(),
        );
        let a = &plan.sections[0];
        assert_eq!(a.rows.len(), 0);
        assert_eq!(a.headers.len(), 1);
        let header = &a.headers[0];
        assert!((a.end.y - (header.y + header.height)).abs() < 1e-9);

        let b = &plan.sections[1];
        assert!(b.title_y > a.end.y);
    }

    #[test]
    fn planning_is_deterministic() {
        let sections = [section("A", 40), section("B", 2)];
        let first = plan_document(&sections, PageGeometry::default());
        let second = plan_document(&sections, PageGeometry::default());
        assert_eq!(first, second);
    }

    #[test]
    fn trailing_section_stays_attached_wherever_the_cursor_lands() {
        let geometry = PageGeometry::default();
        for filler_rows in [1usize, 20, 45, 48, 50, 51, 52, 55, 78, 102] {
            let plan = plan_document(
                &[section("A", filler_rows), section("B", 1)],
                geometry,
            );
            let a = &plan.sections[0];
            let b = &plan.sections[1];

            // wherever B lands, its title, header and first row stay
            // together on one page and inside the printable band
            let first_row = b.rows.first().expect("B has a row");
            assert_eq!(b.title_page, first_row.page, "filler={filler_rows}");
            assert!(
                first_row.y + first_row.height <= geometry.bottom_limit() + 1e-9,
                "filler={filler_rows}"
            );

            // and B never overlaps A's rendered end
            if b.title_page == a.end.page {
                assert!(b.title_y > a.end.y, "filler={filler_rows}");
            } else {
                assert!(b.title_page > a.end.page, "filler={filler_rows}");
            }
        }
    }
}
