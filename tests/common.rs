#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn ttt() -> Command {
    cargo_bin_cmd!("timetotable")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timetotable.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write a plan file into the temp dir and return its path
pub fn write_plan(name: &str, json: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_plan.json", name));
    fs::write(&path, json).expect("write plan");
    path.to_string_lossy().to_string()
}

/// Initialize the schema without touching the user's config file
pub fn init_db(db_path: &str) {
    ttt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub const SMALL_PLAN: &str = r#"[
    {"name": "Disassembly", "duration": 40, "unit": "min"},
    {"name": "Inspection", "duration": 20, "pause": 10},
    {"name": "Assembly", "duration": "1", "unit": "h"}
]"#;

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(h, min, 0))
        .expect("valid datetime")
}
