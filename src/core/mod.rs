pub mod calculator;
pub mod config;
pub mod history;
pub mod log;
pub mod report;
pub mod schedule;
pub mod template;
