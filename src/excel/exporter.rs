//! Excel exporter implementation - store records → .xlsx

use crate::error::{StoresError, StoresResult};
use crate::status::{color_for_status, DEFAULT_FILL};
use crate::types::{ExportedFile, StoreRecord};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};
use tracing::{debug, info};

use super::{COLUMNS, ENTITY_LABEL, HEADER_FILL};

/// Excel exporter for store records
pub struct StoreExporter {
    records: Vec<StoreRecord>,
}

impl StoreExporter {
    /// Create a new exporter over records already filtered by the caller
    pub fn new(records: Vec<StoreRecord>) -> Self {
        Self { records }
    }

    /// Download name for a given ISO date: `المحلات_2025-01-31.xlsx`
    pub fn file_name(date: &str) -> String {
        format!("{}_{}.xlsx", ENTITY_LABEL, date)
    }

    /// Encode the workbook in memory
    pub fn to_buffer(&self) -> StoresResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| StoresError::Export(format!("Failed to encode Excel file: {}", e)))?;

        info!(
            rows = self.records.len(),
            bytes = buffer.len(),
            "exported stores workbook"
        );
        Ok(buffer)
    }

    /// Encode the workbook and name it with the given date
    pub fn to_file(&self, date: &str) -> StoresResult<ExportedFile> {
        Ok(ExportedFile {
            file_name: Self::file_name(date),
            bytes: self.to_buffer()?,
        })
    }

    fn build_workbook(&self) -> StoresResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(ENTITY_LABEL)
            .map_err(|e| StoresError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(12)
            .set_pattern(FormatPattern::Solid)
            .set_background_color(argb_to_color(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        for (col_idx, (label, width)) in COLUMNS.iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .set_column_width(col, *width)
                .map_err(|e| StoresError::Export(format!("Failed to set column width: {}", e)))?;
            worksheet
                .write_string_with_format(0, col, *label, &header_format)
                .map_err(|e| StoresError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, record) in self.records.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            let color = color_for_status(&record.status);
            debug!(row, status = %record.status, color, "writing store row");

            let row_format = Self::row_format(color);
            for (col_idx, value) in record.fields().iter().enumerate() {
                let col = col_idx as u16;
                // Blank cells still carry the row fill and borders
                let written = if value.is_empty() {
                    worksheet.write_blank(row, col, &row_format)
                } else {
                    worksheet.write_string_with_format(row, col, *value, &row_format)
                };
                written
                    .map_err(|e| StoresError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }

        Ok(workbook)
    }

    /// Solid status fill, thin borders, right-aligned text
    fn row_format(color: &str) -> Format {
        Format::new()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(argb_to_color(color))
            .set_align(FormatAlign::Right)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
    }
}

/// Convert an `AARRGGBB` code to an xlsxwriter colour (alpha is dropped)
fn argb_to_color(argb: &str) -> Color {
    let rgb = argb.get(2..).unwrap_or(argb);
    match u32::from_str_radix(rgb, 16) {
        Ok(value) if rgb.len() == 6 => Color::RGB(value),
        _ => argb_to_color(DEFAULT_FILL),
    }
}
