//! Resume analysis: requirements, experience, keywords, scoring and ranking

pub mod analyzer;
pub mod document;
pub mod experience;
pub mod keywords;
pub mod requirement;
pub mod scoring;
pub mod screener;
