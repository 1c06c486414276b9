//! Resume screener library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use error::{Result, ResumeScreenerError};
pub use config::Config;
