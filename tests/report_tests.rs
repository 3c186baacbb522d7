mod common;
use common::at;
use timetotable::core::calculator::build_schedule;
use timetotable::core::report::{ReportFields, build_report, make_entry, prepend, table_rows};
use timetotable::models::diagnostics::Diagnostics;
use timetotable::models::operation::{OperationDefinition, parse_plan};
use timetotable::models::run_config::RunConfig;

#[test]
fn report_has_five_lines_in_order() {
    let ops = vec![
        OperationDefinition::minutes("Disassembly", 30.0),
        OperationDefinition::minutes("Assembly", 30.0),
    ];
    let fields = ReportFields {
        pre_work_status: "Unit delivered\nwith seals".into(),
        extra_work: String::new(),
        measurement_a: "12.5 mm".into(),
        measurement_b: "abc".into(),
        deviations: "None found".into(),
    };

    let lines = build_report(&ops, &fields, 255);
    assert_eq!(
        lines,
        vec![
            "Pre-work status: Unit delivered with seals",
            "Completed planned work: Disassembly, Assembly",
            "Completed extra work: -",
            "Measurement results: 12.5 / -",
            "Deviations and recommendations: None found",
        ]
    );
}

#[test]
fn free_text_is_capped() {
    let fields = ReportFields {
        deviations: "x".repeat(400),
        ..ReportFields::default()
    };
    let lines = build_report(&[], &fields, 10);

    assert_eq!(lines[1], "Completed planned work: -");
    assert_eq!(lines[4], format!("Deviations and recommendations: {}", "x".repeat(10)));
}

#[test]
fn table_rows_show_lunch_marker() {
    let ops = vec![OperationDefinition::minutes("Long job", 120.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 11, 0))
        .with_lunch(timetotable::models::lunch_window::LunchWindow::new(12, 0, 60));
    let s = build_schedule(&ops, &cfg);
    let rows = table_rows(&s.rows);

    assert_eq!(rows[0][0], "1");
    assert_eq!(rows[0][1], "10");
    assert_eq!(rows[0][5], "120 min");
    assert_eq!(rows[0][6], "2025-03-03 11:00");
    assert_eq!(rows[0][7], "2025-03-03 14:00");
    assert_eq!(rows[0][8], "🍽");
}

#[test]
fn entries_are_prepended() {
    let ops = vec![OperationDefinition::minutes("A", 10.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0));
    let s = build_schedule(&ops, &cfg);

    let older = make_entry(&s, &cfg, vec![], "1".into());
    let newer = make_entry(&s, &cfg, vec![], "2".into());
    let history = prepend(prepend(Vec::new(), older), newer);

    let order: Vec<&str> = history.iter().map(|e| e.created_at.as_str()).collect();
    assert_eq!(order, vec!["2", "1"]);
}

#[test]
fn plan_values_are_normalized_with_diagnostics() {
    let json = r#"{"operations": [
        {"name": "A", "duration": "15,5", "unit": "hours"},
        {"name": "B", "duration": -4, "unit": "fortnight", "pause": "soon"},
        42,
        {"duration": 10, "workers": [1, "2", 0], "released": [3]}
    ]}"#;
    let mut diags = Diagnostics::new();
    let ops = parse_plan(json, &mut diags).expect("plan parses");

    assert_eq!(ops.len(), 3);
    assert_eq!(ops[0].duration, 15.5);
    assert_eq!(ops[0].unit.as_str(), "hour");
    assert_eq!(ops[1].duration, 0.0);
    assert_eq!(ops[1].unit.as_str(), "minute");
    assert_eq!(ops[1].pause, 0.0);
    assert_eq!(ops[2].name, "Operation 3");
    assert_eq!(
        ops[2].workers.as_ref().map(|w| w.iter().copied().collect::<Vec<_>>()),
        Some(vec![1, 2])
    );
    assert!(ops[2].released.contains(&3));

    // clamp, unknown unit, bad pause, skipped entry, missing name, bad worker
    assert!(diags.len() >= 6);
    assert!(diags.iter().any(|d| d.target == "plan entry 3"));
}

#[test]
fn plan_must_be_a_list() {
    let mut diags = Diagnostics::new();
    assert!(parse_plan(r#"{"ops": []}"#, &mut diags).is_err());
    assert!(parse_plan("not json", &mut diags).is_err());
}
