pub mod csv;

pub use self::csv::{serialize, write_to_file, CsvExporter, ExportReport, CSV_HEADER};
