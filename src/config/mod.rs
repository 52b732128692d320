pub mod document;
pub mod records;
