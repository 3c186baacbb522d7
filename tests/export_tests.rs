mod common;
use common::setup_test_db;
use std::env;
use std::fs;
use std::path::PathBuf;
use timetotable::config::Config;
use timetotable::core::report::ReportFields;
use timetotable::core::schedule::{ScheduleLogic, ScheduleRequest};
use timetotable::db::pool::DbPool;
use timetotable::errors::AppError;
use timetotable::export::{ExportFormat, ExportLogic};
use timetotable::models::diagnostics::Diagnostics;
use timetotable::models::operation::OperationDefinition;

/// One stored run and a fresh, empty export directory
fn seeded(name: &str) -> (DbPool, Config, PathBuf) {
    let db = setup_test_db(name);
    let dir = env::temp_dir().join(format!("{}_exports", name));
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).expect("create export dir");

    let cfg = Config {
        database: db.clone(),
        export_dir: Some(dir.to_string_lossy().to_string()),
        ..Config::default()
    };
    let mut pool = DbPool::open(&db).expect("open db");
    let req = ScheduleRequest {
        ops: vec![OperationDefinition::minutes("Disassembly", 45.0)],
        date: Some("2025-03-03".into()),
        time: Some("08:00".into()),
        chain_mode: Some(false),
        fields: ReportFields::default(),
        ..ScheduleRequest::default()
    };
    ScheduleLogic::run(&mut pool, &cfg, &req, &mut Diagnostics::new()).expect("run");
    (pool, cfg, dir)
}

#[test]
fn relative_name_is_written_inside_export_dir() {
    let (mut pool, cfg, dir) = seeded("export_inside");

    ExportLogic::export(&mut pool, &cfg, ExportFormat::Json, "runs.json", true, false)
        .expect("export");

    let written = fs::read_to_string(dir.join("runs.json")).expect("exported file");
    assert!(written.contains("Disassembly"));
}

#[test]
fn parent_traversal_out_of_export_dir_is_refused() {
    let (mut pool, cfg, dir) = seeded("export_escape");
    let escaped = dir.parent().expect("temp dir").join("export_escape_out.json");
    fs::remove_file(&escaped).ok();

    let err = ExportLogic::export(
        &mut pool,
        &cfg,
        ExportFormat::Json,
        "../export_escape_out.json",
        true,
        false,
    );
    assert!(matches!(err, Err(AppError::Export(_))));
    assert!(!escaped.exists());
}

#[test]
fn absolute_path_outside_export_dir_is_refused() {
    let (mut pool, cfg, _dir) = seeded("export_absolute");
    let outside = env::temp_dir().join("export_absolute_out.csv");
    fs::remove_file(&outside).ok();

    let err = ExportLogic::export(
        &mut pool,
        &cfg,
        ExportFormat::Csv,
        &outside.to_string_lossy(),
        true,
        false,
    );
    assert!(matches!(err, Err(AppError::Export(_))));
    assert!(!outside.exists());
}

#[test]
fn nested_subdirectory_inside_export_dir_is_allowed() {
    let (mut pool, cfg, dir) = seeded("export_nested");
    fs::create_dir_all(dir.join("march")).expect("create subdir");

    ExportLogic::export(&mut pool, &cfg, ExportFormat::Csv, "march/runs.csv", true, false)
        .expect("export");
    assert!(dir.join("march/runs.csv").exists());
}
