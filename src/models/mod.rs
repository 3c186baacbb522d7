pub mod diagnostics;
pub mod distribution_mode;
pub mod duration_unit;
pub mod history_entry;
pub mod lunch_window;
pub mod operation;
pub mod run_config;
pub mod schedule_row;
