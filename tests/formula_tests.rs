mod common;
use common::at;
use timetotable::core::calculator::{LunchSchedule, build_schedule};
use timetotable::core::report::{ReportFields, build_report, make_entry};
use timetotable::export::emitter::{BLOCK_GAP, build_worksheet};
use timetotable::export::excel_date::{date_to_serial, datetime_to_serial, serial_to_datetime};
use timetotable::export::formula::eval::{Evaluator, Value};
use timetotable::export::formula::rules::{elapsed_formula, end_formula, icon_formula, start_formula};
use timetotable::export::formula::{CellRef, Expr, col_to_letter};
use timetotable::export::sheet::{CellValue, RowKind, Worksheet, col};
use timetotable::export::verify::verify;
use timetotable::models::distribution_mode::DistributionMode;
use timetotable::models::duration_unit::DurationUnit;
use timetotable::models::history_entry::HistoryEntry;
use timetotable::models::lunch_window::LunchWindow;
use timetotable::models::operation::OperationDefinition;
use timetotable::models::run_config::{RunConfig, StartSource};

fn noon() -> LunchSchedule {
    LunchSchedule::new(&[LunchWindow::new(12, 0, 60)])
}

fn entry(ops: &[OperationDefinition], cfg: &RunConfig) -> HistoryEntry {
    let schedule = build_schedule(ops, cfg);
    let report = build_report(ops, &ReportFields::default(), 255);
    make_entry(&schedule, cfg, report, "2025-03-03T07:00:00+00:00".into())
}

/// Two chained runs with a lunch window crossed in each one.
fn chained_pair() -> Vec<HistoryEntry> {
    let lunch = LunchWindow::new(12, 0, 60);
    let first_ops = vec![
        OperationDefinition::minutes("Disassembly", 240.0),
        OperationDefinition::minutes("Inspection", 180.0).with_pause(15.0, DurationUnit::Minute),
        OperationDefinition::minutes("Cleaning", 60.0),
    ];
    let first_cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(2)
        .with_lunch(lunch)
        .with_chain_mode(true);
    let first = entry(&first_ops, &first_cfg);

    let second_ops = vec![
        OperationDefinition::minutes("Assembly", 60.0).with_pause(5.0, DurationUnit::Minute),
        OperationDefinition::new("Test run", 1.5, DurationUnit::Hour),
    ];
    let second_cfg = RunConfig::new(first.end)
        .with_workers(2)
        .with_lunch(lunch)
        .with_chain_mode(true)
        .with_start_source(StartSource::Chained);
    let second = entry(&second_ops, &second_cfg);

    vec![first, second]
}

fn first_data_row(sheet: &Worksheet, entry: usize) -> u32 {
    sheet
        .data_rows()
        .find(|(_, r)| r.source.is_some_and(|s| s.entry == entry))
        .map(|(n, _)| n)
        .expect("data row")
}

#[test]
fn start_formula_shifts_out_of_the_window() {
    let f = start_formula(Expr::cell(CellRef::col(col::BASE)), &noon());
    assert_eq!(
        f.to_r1c1(),
        "=IF(AND(ROUND(MOD(RC13,1)*1440,6)>=720,ROUND(MOD(RC13,1)*1440,6)<780),RC13-MOD(RC13,1)+TIME(13,0,0),RC13)"
    );
}

#[test]
fn end_formula_adds_the_window_when_spanned() {
    assert_eq!(
        end_formula(&noon()).to_r1c1(),
        "=RC9+RC14+IF(AND(ROUND(MOD(RC9,1)*1440,6)<720,ROUND((MOD(RC9,1)+RC14)*1440,6)>720),TIME(1,0,0),0)"
    );
    assert_eq!(end_formula(&LunchSchedule::none()).to_r1c1(), "=RC9+RC14");
}

#[test]
fn icon_and_elapsed_formulas() {
    assert_eq!(
        icon_formula(&noon()).to_r1c1(),
        "=IF(OR(ROUND((RC9-RC13)*1440,6)>0,AND(ROUND(MOD(RC9,1)*1440,6)<720,ROUND((MOD(RC9,1)+RC14)*1440,6)>720)),\"🍽\",\"\")"
    );
    assert_eq!(elapsed_formula().to_r1c1(), "=IF(RC8=\"h\",RC7/24,RC7/1440)");
}

#[test]
fn second_window_gets_a_rolling_clause() {
    let lunch = LunchSchedule::new(&[LunchWindow::new(12, 0, 60), LunchWindow::new(18, 0, 30)]);
    let f = end_formula(&lunch).to_r1c1();

    assert!(f.contains("OR(AND(ROUND(MOD(RC9,1)*1440,6)<1080"));
    assert!(f.contains("AND(ROUND(MOD(RC9,1)*1440,6)>=1110"));
    assert!(f.contains(">2520)"));
}

/// `[07:30,08:00)` then `[08:00,08:30)` against lunch 08:30+30: the second
/// operation ends on the window start and must not cross it.
fn ends_on_window_start() -> Vec<HistoryEntry> {
    let ops = vec![
        OperationDefinition::minutes("A", 30.0),
        OperationDefinition::minutes("B", 30.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 7, 30)).with_lunch(LunchWindow::new(8, 30, 30));
    vec![entry(&ops, &cfg)]
}

#[test]
fn interval_ending_on_window_start_does_not_cross_in_the_sheet() {
    let entries = ends_on_window_start();
    assert!(!entries[0].rows[1].crossed_lunch);
    assert_eq!(entries[0].rows[1].end, at(2025, 3, 3, 8, 30));

    let sheet = build_worksheet(&entries);
    let row = sheet.data_rows().map(|(n, _)| n).nth(1).expect("second data row");

    let mut eval = Evaluator::new(&sheet);
    assert_eq!(eval.cell(row, col::LUNCH), Value::Text(String::new()));
    let end = eval.cell(row, col::END).as_number().expect("numeric end");
    assert!((end - datetime_to_serial(&at(2025, 3, 3, 8, 30))).abs() < 1.0 / 86_400.0);

    assert!(verify(&sheet, &entries).is_empty());
}

#[test]
fn serial_noise_is_rounded_away_before_comparing() {
    struct Empty;
    impl timetotable::export::formula::eval::CellSource for Empty {
        fn content(&self, _: u32, _: u32) -> timetotable::export::formula::eval::CellContent<'_> {
            timetotable::export::formula::eval::CellContent::Empty
        }
    }
    let mut eval = Evaluator::new(&Empty);

    // 08:30 carried through a date-time serial and MOD
    let noisy = Expr::num(0.354_166_666_669_091_97);
    let raw = Expr::compare(timetotable::core::calculator::Cmp::Gt, noisy.clone(), Expr::time(8, 30));
    assert_eq!(eval.eval(&raw, 1, 1), Value::Bool(true));

    assert_eq!(eval.eval(&Expr::minutes(noisy), 1, 1), Value::Number(510.0));
    assert_eq!(Expr::minutes(Expr::cell(CellRef::col(9))).to_r1c1(), "=ROUND(RC9*1440,6)");
}

#[test]
fn a1_rendering_follows_the_host_cell() {
    assert_eq!(Expr::cell(CellRef::col(13)).to_a1(5, 9), "=$M5");
    assert_eq!(Expr::cell(CellRef::above(1)).to_a1(5, 9), "=I4");
    assert_eq!(Expr::cell(CellRef::fixed(3, 10)).to_a1(7, 1), "=$J$3");
    assert_eq!(Expr::cell(CellRef::offset(-9, 10)).to_a1(20, 13), "=$J11");
    assert_eq!(Expr::cell(CellRef::above(3)).to_a1(2, 1), "=#REF!");
    assert_eq!(col_to_letter(27), "AA");
}

#[test]
fn subtraction_keeps_grouping() {
    let a = Expr::cell(CellRef::col(1));
    let b = Expr::cell(CellRef::col(2));
    let c = Expr::cell(CellRef::col(3));
    assert_eq!((a.clone() - (b.clone() + c.clone())).to_r1c1(), "=RC1-(RC2+RC3)");
    assert_eq!((a.clone() - b.clone() + c.clone()).to_r1c1(), "=RC1-RC2+RC3");
    assert_eq!(((a + b) * c).to_r1c1(), "=(RC1+RC2)*RC3");
}

#[test]
fn serials_use_the_1899_epoch() {
    let d = chrono::NaiveDate::from_ymd_opt(1900, 3, 1).expect("date");
    assert_eq!(date_to_serial(&d), 61.0);

    let t = at(2025, 3, 3, 18, 0);
    let serial = datetime_to_serial(&t);
    assert_eq!(serial.fract(), 0.75);
    assert_eq!(serial_to_datetime(serial), Some(t));
}

#[test]
fn chained_block_links_to_previous_end() {
    let entries = chained_pair();
    let sheet = build_worksheet(&entries);

    let row = first_data_row(&sheet, 1);
    let base = sheet.cell(row, col::BASE).and_then(|c| c.formula.as_ref()).expect("base formula");
    let k = entries[0].report.len() + BLOCK_GAP;
    assert_eq!(base.to_r1c1(), format!("=R[-{k}]C10+RC6"));

    // the referenced cell is the last data row of the first block
    let last_first = sheet
        .data_rows()
        .filter(|(_, r)| r.source.is_some_and(|s| s.entry == 0))
        .map(|(n, _)| n)
        .last()
        .expect("rows of first block");
    assert_eq!(row - k as u32, last_first);
}

#[test]
fn chained_export_reproduces_the_schedule() {
    let entries = chained_pair();
    let sheet = build_worksheet(&entries);

    assert!(verify(&sheet, &entries).is_empty());

    let mut eval = Evaluator::new(&sheet);
    let last = sheet.data_rows().map(|(n, _)| n).last().expect("data rows");
    let end = eval.cell(last, col::END).as_number().expect("numeric end");
    let stored = entries[1].rows.last().expect("rows").end;
    assert!((end - datetime_to_serial(&stored)).abs() < 1e-6);

    let crossed: Vec<bool> = entries.iter().flat_map(|e| e.rows.iter().map(|r| r.crossed_lunch)).collect();
    assert!(crossed.iter().any(|c| *c));
}

#[test]
fn editing_the_first_start_moves_the_whole_chain() {
    let entries = chained_pair();
    let mut sheet = build_worksheet(&entries);

    let first = first_data_row(&sheet, 0);
    let one_hour = 1.0 / 24.0;
    for c in [col::START, col::BASE] {
        let cell = sheet.rows[first as usize - 1].cell_mut(c).expect("cell");
        if let Some(CellValue::Number(v)) = cell.value {
            cell.value = Some(CellValue::Number(v - one_hour));
        }
    }

    let mut eval = Evaluator::new(&sheet);
    let second = first_data_row(&sheet, 1);
    let moved = eval.cell(second, col::BASE).as_number().expect("number");
    let original = datetime_to_serial(&entries[1].rows[0].planned_start);
    assert!(moved < original);
}

#[test]
fn verify_reports_tampered_rows() {
    let entries = chained_pair();
    let sheet = build_worksheet(&entries);

    let mut tampered = entries.clone();
    tampered[1].rows[0].end += chrono::Duration::minutes(7);
    tampered[0].rows[0].crossed_lunch = true;

    let found = verify(&sheet, &tampered);
    assert!(found.iter().any(|m| m.entry == 1 && m.row == 0 && m.column == "End"));
    assert!(found.iter().any(|m| m.entry == 0 && m.row == 0 && m.column == "Lunch"));
}

#[test]
fn unchained_entry_starts_with_literals() {
    let mut entries = chained_pair();
    entries[1].start_source = StartSource::Manual;
    let sheet = build_worksheet(&entries);

    let row = first_data_row(&sheet, 1);
    let start = sheet.cell(row, col::START).expect("start");
    assert!(start.formula.is_none());
    assert!(matches!(start.value, Some(CellValue::Number(_))));
}

#[test]
fn individual_rows_follow_each_worker() {
    let ops = vec![
        OperationDefinition::minutes("A", 30.0).with_workers(&[1]),
        OperationDefinition::minutes("B", 20.0).with_workers(&[2]),
        OperationDefinition::minutes("C", 10.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(2)
        .with_mode(DistributionMode::Individual);
    let entries = vec![entry(&ops, &cfg)];
    let sheet = build_worksheet(&entries);

    let end_of = |op_row: usize| -> f64 {
        let (n, _) = sheet
            .data_rows()
            .find(|(_, r)| r.source.is_some_and(|s| s.row == op_row))
            .expect("row");
        match sheet.cell(n, col::END).and_then(|c| c.value.clone()) {
            Some(CellValue::Number(v)) => v,
            other => panic!("no cached end: {other:?}"),
        }
    };

    let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
    assert!(close(end_of(0), datetime_to_serial(&at(2025, 3, 3, 8, 30))));
    assert!(close(end_of(1), datetime_to_serial(&at(2025, 3, 3, 8, 20))));
    // C for worker 1 waits for A, for worker 2 for B
    assert!(close(end_of(2), datetime_to_serial(&at(2025, 3, 3, 8, 40))));
    assert!(close(end_of(3), datetime_to_serial(&at(2025, 3, 3, 8, 30))));

    let base = sheet
        .data_rows()
        .find(|(_, r)| r.source.is_some_and(|s| s.row == 2))
        .and_then(|(n, _)| sheet.cell(n, col::BASE))
        .and_then(|c| c.formula.as_ref())
        .expect("base");
    assert!(base.to_r1c1().starts_with("=INDEX(R3C10:R6C10,MATCH(\"1_1\",R3C12:R6C12,0))"));

    // reconciled rows are not compared with the stored schedule
    assert!(verify(&sheet, &entries).is_empty());
}

#[test]
fn continuation_rows_reference_the_row_above() {
    let ops = vec![OperationDefinition::minutes("A", 30.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(3);
    let sheet = build_worksheet(&[entry(&ops, &cfg)]);

    let rows: Vec<u32> = sheet.data_rows().map(|(n, _)| n).collect();
    assert_eq!(rows.len(), 3);
    for n in &rows[1..] {
        for c in [col::START, col::PAUSE, col::DURATION, col::BASE] {
            let f = sheet.cell(*n, c).and_then(|c| c.formula.as_ref()).expect("formula");
            assert_eq!(f.to_r1c1(), "=R[-1]C");
        }
    }

    // only the last row of the group carries the border
    let bordered: Vec<bool> = rows
        .iter()
        .map(|n| sheet.cell(*n, col::NO).is_some_and(|c| c.border_bottom))
        .collect();
    assert_eq!(bordered, vec![false, false, true]);
}

#[test]
fn block_layout_and_label_hygiene() {
    let ops = vec![
        OperationDefinition::minutes("=SUM(A1)", 30.0).with_confirmation("0010"),
        OperationDefinition::minutes("Check", 30.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0));
    let sheet = build_worksheet(&[entry(&ops, &cfg)]);

    let kinds: Vec<RowKind> = sheet.rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds[0], RowKind::Title);
    assert_eq!(kinds[1], RowKind::Header);
    assert_eq!(kinds[2], RowKind::Data);
    assert_eq!(kinds.iter().filter(|k| **k == RowKind::Report).count(), 5);
    assert_eq!(kinds.last(), Some(&RowKind::Blank));

    let name = sheet.cell(3, col::OPERATION).and_then(|c| c.value.clone());
    assert_eq!(name, Some(CellValue::Text("'=SUM(A1)".into())));
    let conf = sheet.cell(3, col::CONFIRMATION).and_then(|c| c.value.clone());
    assert_eq!(conf, Some(CellValue::Number(10.0)));
}

#[test]
fn evaluator_semantics() {
    struct Empty;
    impl timetotable::export::formula::eval::CellSource for Empty {
        fn content(&self, _: u32, _: u32) -> timetotable::export::formula::eval::CellContent<'_> {
            timetotable::export::formula::eval::CellContent::Empty
        }
    }
    let mut eval = Evaluator::new(&Empty);

    let m = Expr::time_of_day(Expr::num(-0.25));
    assert_eq!(eval.eval(&m, 1, 1), Value::Number(0.75));

    let t = Expr::time(25, 30);
    assert!(matches!(eval.eval(&t, 1, 1), Value::Number(v) if (v - 1.5 / 24.0).abs() < 1e-12));

    let div = Expr::num(1.0) / Expr::cell(CellRef::col(2));
    assert_eq!(eval.eval(&div, 1, 1), Value::Error("#DIV/0!"));

    let bad = Expr::cell(CellRef::above(5));
    assert_eq!(eval.eval(&bad, 2, 1), Value::Error("#REF!"));
}
