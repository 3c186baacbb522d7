pub mod history;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod state;
pub mod templates;
