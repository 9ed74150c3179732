use navsheet_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid status list: {0}")]
    InvalidStatuses(String),

    #[error("Row {0} is beyond the worksheet limit")]
    RowOverflow(usize),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
