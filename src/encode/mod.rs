pub mod jpeg;
pub mod sink;
