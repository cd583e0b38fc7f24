pub mod file;
pub mod workbook;
