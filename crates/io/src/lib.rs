// File I/O operations

pub mod csv;
pub mod format;
pub mod xlsx;
pub mod xlsx_styles;
pub mod xlsx_validation;
