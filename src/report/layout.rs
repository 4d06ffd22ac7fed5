//! Workbook layout engine
//!
//! Renders the detailed table as vertically stacked, independently styled
//! per-feature blocks with live formula columns and percentile color
//! scales, plus a plain score sheet. This is the only module that touches
//! the xlsx writer; everything else hands it plain tables.

use std::path::Path;

use anyhow::Result;
use rust_xlsxwriter::{
    Color, ConditionalFormat2ColorScale, ConditionalFormat3ColorScale, ConditionalFormatType,
    Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet,
};
use serde::Serialize;

use crate::pipeline::binner::range_label;
use crate::report::tables::{BinRow, ReportTables, ScoreRow};

/// Header of the score sheet's metric column.
pub const SCORE_NAME: &str = "ROC AUC";

/// Fixed widths for the 8-column detailed layout, independent of content
const COLUMN_WIDTHS: [f64; 8] = [43.0, 50.0, 10.0, 15.0, 10.0, 14.0, 19.0, 11.0];

/// Header fill
const HEADER_FILL: u32 = 0xE4DFEC;

/// Color-scale endpoints
const SCALE_LOW: u32 = 0xFCFCFF;
const SCALE_RED: u32 = 0xF8696B;
const SCALE_YELLOW: u32 = 0xFFEB84;
const SCALE_GREEN: u32 = 0x63BE7B;

/// Conditional color direction for the block color scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    /// Two-color scale shading high values red ("high is bad")
    #[default]
    Red,
    /// Two-color scale shading high values green ("high is good")
    Green,
    /// Full three-color percentile scale
    TriColor,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Red => write!(f, "red"),
            ColorMode::Green => write!(f, "green"),
            ColorMode::TriColor => write!(f, "color"),
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(ColorMode::Red),
            "green" => Ok(ColorMode::Green),
            "color" => Ok(ColorMode::TriColor),
            _ => Err(format!(
                "Unknown conditional color: '{}'. Use 'red', 'green', or 'color'.",
                s
            )),
        }
    }
}

/// Style settings handed to the engine at construction; there is no
/// ambient style state.
#[derive(Debug, Clone, Default)]
pub struct LayoutStyle {
    pub color: ColorMode,
}

/// Writes one report workbook. Owns the in-memory workbook for the
/// duration of a single `render` call and flushes it exactly once.
pub struct WorkbookLayoutEngine {
    target: String,
    style: LayoutStyle,
}

/// Cell roles of the detailed layout, by name rather than column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Text,
    Count,
    Percent,
    TwoDecimal,
}

impl WorkbookLayoutEngine {
    pub fn new(target: impl Into<String>, style: LayoutStyle) -> Self {
        Self {
            target: target.into(),
            style,
        }
    }

    /// Write both sheets and save the workbook to `path`.
    pub fn render(&self, tables: &ReportTables, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();

        let detail = workbook.add_worksheet();
        detail.set_name("Detailed EDA")?;
        self.write_detailed(detail, tables)?;

        let scores = workbook.add_worksheet();
        scores.set_name("ROC Report")?;
        self.write_scores(scores, &tables.scores)?;

        workbook.save(path)?;
        Ok(())
    }

    fn write_detailed(&self, sheet: &mut Worksheet, tables: &ReportTables) -> Result<()> {
        for (idx, width) in COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(idx as u16, width + 0.78)?;
        }
        sheet.set_screen_gridlines(false);

        let mut cursor = 0u32;
        for block in tables.feature_blocks() {
            let rows = self.write_block(sheet, cursor, block)?;
            // Block height plus the fixed stride to the next header
            cursor += rows + 3;
        }
        Ok(())
    }

    /// Write one feature block at `header_row`; returns its data-row count.
    fn write_block(&self, sheet: &mut Worksheet, header_row: u32, block: &[BinRow]) -> Result<u32> {
        let header_format = header_format();
        for (col, title) in self.headers().iter().enumerate() {
            sheet.write_string_with_format(header_row, col as u16, title, &header_format)?;
        }

        let rows = ordered_rows(block);
        let len = rows.len() as u32;

        let first_data = header_row + 1;
        let last_data = header_row + len;
        // 1-based rows for formula text
        let first_xl = first_data + 1;
        let last_xl = last_data + 1;

        for (offset, row) in rows.iter().enumerate() {
            let sheet_row = first_data + offset as u32;
            let xl_row = sheet_row + 1;
            let last = offset as u32 + 1 == len;

            sheet.write_string_with_format(
                sheet_row,
                1,
                &row.value,
                &data_format(CellKind::Text, last),
            )?;
            sheet.write_number_with_format(
                sheet_row,
                2,
                row.count as f64,
                &data_format(CellKind::Count, last),
            )?;
            // Freq Distribution: this bin's share of the block's rows
            sheet.write_formula_with_format(
                sheet_row,
                3,
                Formula::new(format!(
                    "=C{row}/SUM(C${first}:C${last})",
                    row = xl_row,
                    first = first_xl,
                    last = last_xl
                )),
                &data_format(CellKind::Percent, last),
            )?;
            sheet.write_number_with_format(
                sheet_row,
                4,
                row.positives as f64,
                &data_format(CellKind::Count, last),
            )?;
            sheet.write_number_with_format(
                sheet_row,
                5,
                row.rate,
                &data_format(CellKind::Percent, last),
            )?;
            // % of Total: this bin's share of the block's positives
            sheet.write_formula_with_format(
                sheet_row,
                6,
                Formula::new(format!(
                    "=E{row}/SUM(E${first}:E${last})",
                    row = xl_row,
                    first = first_xl,
                    last = last_xl
                )),
                &data_format(CellKind::Percent, last),
            )?;
            // Lift: % of Total over Freq Distribution
            sheet.write_formula_with_format(
                sheet_row,
                7,
                Formula::new(format!("=G{row}/D{row}", row = xl_row)),
                &data_format(CellKind::TwoDecimal, last),
            )?;
        }

        // The feature name spans the block in a single merged cell
        let feature = block[0].feature.as_str();
        if len > 1 {
            sheet.merge_range(
                first_data,
                0,
                last_data,
                0,
                feature,
                &data_format(CellKind::Text, true),
            )?;
        } else {
            sheet.write_string_with_format(
                first_data,
                0,
                feature,
                &data_format(CellKind::Text, true),
            )?;
        }

        self.apply_color_scales(sheet, first_data, last_data)?;

        Ok(len)
    }

    fn headers(&self) -> [String; 8] {
        [
            "Column".to_string(),
            "Value".to_string(),
            "Frequency".to_string(),
            "Freq Distribution".to_string(),
            self.target.clone(),
            format!("{} Rate", self.target),
            format!("% of Total {}", self.target),
            "Lift".to_string(),
        ]
    }

    /// Percentile color scales over the rate / % of total / lift columns,
    /// one rule per column so percentiles stay column-local.
    fn apply_color_scales(&self, sheet: &mut Worksheet, first_row: u32, last_row: u32) -> Result<()> {
        for col in 5u16..=7 {
            match self.style.color {
                ColorMode::TriColor => {
                    let scale = ConditionalFormat3ColorScale::new()
                        .set_minimum(ConditionalFormatType::Percentile, 0)
                        .set_midpoint(ConditionalFormatType::Percentile, 50)
                        .set_maximum(ConditionalFormatType::Percentile, 100)
                        .set_minimum_color(Color::RGB(SCALE_RED))
                        .set_midpoint_color(Color::RGB(SCALE_YELLOW))
                        .set_maximum_color(Color::RGB(SCALE_GREEN));
                    sheet.add_conditional_format(first_row, col, last_row, col, &scale)?;
                }
                direction => {
                    let high = if direction == ColorMode::Red {
                        SCALE_RED
                    } else {
                        SCALE_GREEN
                    };
                    let scale = ConditionalFormat2ColorScale::new()
                        .set_minimum(ConditionalFormatType::Percentile, 0)
                        .set_maximum(ConditionalFormatType::Percentile, 100)
                        .set_minimum_color(Color::RGB(SCALE_LOW))
                        .set_maximum_color(Color::RGB(high));
                    sheet.add_conditional_format(first_row, col, last_row, col, &scale)?;
                }
            }
        }
        Ok(())
    }

    fn write_scores(&self, sheet: &mut Worksheet, scores: &[ScoreRow]) -> Result<()> {
        let header = Format::new().set_bold();
        sheet.set_column_width(0, 30.0)?;
        sheet.set_column_width(1, 12.0)?;
        sheet.write_string_with_format(0, 0, "Column", &header)?;
        sheet.write_string_with_format(0, 1, SCORE_NAME, &header)?;

        for (idx, row) in scores.iter().enumerate() {
            let sheet_row = idx as u32 + 1;
            sheet.write_string(sheet_row, 0, &row.feature)?;
            // A spreadsheet has no NaN cell; unscoreable features stay blank
            if !row.auc.is_nan() {
                sheet.write_number(sheet_row, 1, row.auc)?;
            }
        }
        Ok(())
    }
}

/// Rows of a block in render order.
///
/// Numeric blocks (every row carries a boundary) sort ascending by
/// boundary with inf last, then get regenerated range labels from the
/// rounded boundaries -- the labels are recomputed here because sorting
/// may have reordered the rows upstream labels were built for.
fn ordered_rows(block: &[BinRow]) -> Vec<BinRow> {
    let numeric = !block.is_empty() && block.iter().all(|row| row.upper.is_some());
    if !numeric {
        return block.to_vec();
    }

    let mut rows = block.to_vec();
    rows.sort_by(|a, b| {
        let ka = a.upper.map(sort_key).unwrap_or(f64::MAX);
        let kb = b.upper.map(sort_key).unwrap_or(f64::MAX);
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let boundaries: Vec<f64> = rows
        .iter()
        .map(|row| round2(row.upper.unwrap_or(f64::INFINITY)))
        .collect();
    for (idx, row) in rows.iter_mut().enumerate() {
        row.value = range_label(idx, &boundaries);
    }

    rows
}

/// Sort key with the inf sentinel mapped to a very large finite number.
fn sort_key(value: f64) -> f64 {
    if value.is_infinite() {
        f64::MAX
    } else {
        value
    }
}

fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

fn header_format() -> Format {
    Format::new()
        .set_font_name("Calibri")
        .set_font_size(11)
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn data_format(kind: CellKind, last: bool) -> Format {
    let mut format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    format = match kind {
        CellKind::Percent => format.set_num_format("0.00%"),
        CellKind::TwoDecimal => format.set_num_format("0.00"),
        CellKind::Text | CellKind::Count => format,
    };
    if last {
        // Bottom border closes the block
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    format
}
