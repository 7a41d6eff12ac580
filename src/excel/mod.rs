//! Excel import/export for store sheets
//!
//! - Export: store records → .xlsx, one colour-filled row per store
//! - Import: .xlsx → store records, status read from the first cell's fill

mod exporter;
mod fills;
mod importer;

pub use exporter::StoreExporter;
pub use fills::{read_first_column_fills, RowFills};
pub use importer::{ImportBatch, StoreImporter};

/// Worksheet name and file-name prefix
pub const ENTITY_LABEL: &str = "المحلات";

/// Header row fill (light grey)
pub const HEADER_FILL: &str = "FFE0E0E0";

/// Header labels and column widths, in record field order
pub const COLUMNS: [(&str, f64); 10] = [
    ("اسم المحل", 20.0),
    ("الموظف", 20.0),
    ("المدير", 20.0),
    ("رقم المحل", 15.0),
    ("رقم المدير", 15.0),
    ("الموقع", 20.0),
    ("العنوان", 30.0),
    ("الحالة", 25.0),
    ("شرح الحالة", 40.0),
    ("التاريخ", 12.0),
];

pub const COLUMN_COUNT: usize = COLUMNS.len();

/// 0-based index of the status column
pub const STATUS_COLUMN: usize = 7;
