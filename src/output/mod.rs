//! Report structures and output formatting

pub mod formatter;
pub mod report;
