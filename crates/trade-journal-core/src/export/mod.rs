pub mod csv_export;

pub use csv_export::{export_csv, parse_csv, to_csv_string, CsvRow, CSV_COLUMNS};
