//! Excel importer implementation - .xlsx → store records

use crate::error::{StoresError, StoresResult};
use crate::excel::fills::{read_first_column_fills, RowFills};
use crate::status::status_for_color;
use crate::types::{today, StoreRecord};
use calamine::{open_workbook_from_rs, Data, DataType, Range, Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, info};

use super::{COLUMN_COUNT, STATUS_COLUMN};

/// Rows read from a workbook, before anything is persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    pub records: Vec<StoreRecord>,
    pub skipped: usize,
}

/// Excel importer for store sheets
pub struct StoreImporter {
    bytes: Vec<u8>,
}

impl StoreImporter {
    /// Create an importer over the raw file contents
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read the first worksheet into record candidates
    pub fn import(&self) -> StoresResult<ImportBatch> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| StoresError::Parse(format!("Failed to open Excel file: {}", e)))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(StoresError::Parse(format!("Failed to read worksheet: {}", e)))
            }
            None => return Err(StoresError::NoWorksheet),
        };

        let fills = read_first_column_fills(&self.bytes)?;
        let batch = self.process_sheet(&range, &fills);

        info!(
            accepted = batch.records.len(),
            skipped = batch.skipped,
            "parsed stores workbook"
        );
        Ok(batch)
    }

    /// Walk every data row (header skipped)
    fn process_sheet(&self, range: &Range<Data>, fills: &RowFills) -> ImportBatch {
        let mut batch = ImportBatch::default();
        let Some((last_row, _)) = range.end() else {
            return batch;
        };

        for row in 1..=last_row {
            let cells: Vec<&Data> = (0..COLUMN_COUNT as u32)
                .map(|col| range.get_value((row, col)).unwrap_or(&Data::Empty))
                .collect();

            // Rows with nothing in them do not exist as far as the sheet goes
            if cells.iter().all(|cell| cell_text(cell).is_empty()) {
                continue;
            }

            let fill = fills.get(&row).map(String::as_str);
            let record = Self::row_to_record(&cells, fill);

            if record.store_name.trim().is_empty() {
                debug!(row = row + 1, "skipping row without store name");
                batch.skipped += 1;
            } else {
                batch.records.push(record);
            }
        }

        batch
    }

    /// Build a record from one row's ten cells and its first-cell fill
    fn row_to_record(cells: &[&Data], fill: Option<&str>) -> StoreRecord {
        let text = |col: usize| cells.get(col).map(|c| cell_text(c)).unwrap_or_default();

        // Fill colour wins over the status column, even when they disagree
        let status = match fill.map(status_for_color) {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => text(STATUS_COLUMN),
        };

        let date = match cells.get(9) {
            Some(cell) => date_text(cell),
            None => String::new(),
        };

        StoreRecord {
            store_name: text(0),
            employee_name: text(1),
            manager_name: text(2),
            store_phone: text(3),
            manager_phone: text(4),
            location: text(5),
            address: text(6),
            status,
            status_note: text(8),
            date: if date.is_empty() { today() } else { date },
        }
    }
}

/// Cell value as text. Whole numbers print without a decimal point, so phone
/// numbers stored as numbers come back as digits.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

/// Date column: Excel dates become ISO dates, anything else is kept as text
fn date_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell_text(cell),
        Data::String(s) => s.trim().to_string(),
        other => cell_text(other),
    }
}
