pub mod config;
pub mod records;
pub mod report;
pub mod scoring;
