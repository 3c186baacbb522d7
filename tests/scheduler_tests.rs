mod common;
use common::at;
use timetotable::core::calculator::build_schedule;
use timetotable::core::calculator::timeline::{Scheduler, SchedulerState};
use timetotable::models::distribution_mode::DistributionMode;
use timetotable::models::duration_unit::DurationUnit;
use timetotable::models::lunch_window::LunchWindow;
use timetotable::models::operation::OperationDefinition;
use timetotable::models::run_config::RunConfig;

fn op(name: &str, minutes: f64) -> OperationDefinition {
    OperationDefinition::minutes(name, minutes)
}

#[test]
fn rows_never_go_back_in_time() {
    let ops = vec![
        op("A", 30.0),
        op("B", 45.0).with_pause(10.0, DurationUnit::Minute),
        OperationDefinition::new("C", 2.0, DurationUnit::Hour),
        op("D", 45.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_lunch(LunchWindow::new(12, 0, 60));
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows.len(), 4);
    for pair in s.rows.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
    for r in &s.rows {
        assert!(r.start <= r.end);
        assert!(r.planned_start <= r.start);
    }
    assert_eq!(s.rows[1].start, at(2025, 3, 3, 8, 40));
    assert_eq!(s.rows[1].end, at(2025, 3, 3, 9, 25));
    // C runs 09:25-11:25, D starts before lunch and is extended
    assert_eq!(s.rows[3].start, at(2025, 3, 3, 11, 25));
    assert_eq!(s.rows[3].end, at(2025, 3, 3, 13, 10));
    assert!(s.rows[3].crossed_lunch);
    assert!(!s.rows[2].crossed_lunch);
    assert_eq!(s.end, at(2025, 3, 3, 13, 10));
}

#[test]
fn total_mode_splits_duration_over_workers() {
    let ops = vec![op("Cleaning", 40.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(4);
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows.len(), 4);
    for (i, r) in s.rows.iter().enumerate() {
        assert_eq!(r.worker, i + 1);
        assert_eq!(r.start, at(2025, 3, 3, 8, 0));
        assert_eq!(r.end, at(2025, 3, 3, 8, 10));
        assert_eq!(r.duration, 10.0);
    }
}

#[test]
fn per_worker_mode_keeps_full_duration() {
    let ops = vec![op("Cleaning", 20.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(3)
        .with_mode(DistributionMode::PerWorker);
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows.len(), 3);
    for r in &s.rows {
        assert_eq!(r.end, at(2025, 3, 3, 8, 20));
        assert_eq!(r.duration, 20.0);
    }
}

#[test]
fn pauses_are_not_split() {
    let ops = vec![op("A", 20.0), op("B", 20.0).with_pause(10.0, DurationUnit::Minute)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(2);
    let s = build_schedule(&ops, &cfg);

    // A: 10 min each, pause 10, B: 10 min each
    assert_eq!(s.rows[2].planned_start, at(2025, 3, 3, 8, 20));
    assert_eq!(s.rows[2].end, at(2025, 3, 3, 8, 30));
    assert_eq!(s.rows[2].pause_minutes, 10.0);
}

#[test]
fn released_worker_leaves_every_later_operation() {
    let ops = vec![op("A", 30.0), op("B", 30.0).releasing(&[2]), op("C", 30.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(3);
    let s = build_schedule(&ops, &cfg);

    let workers_of = |n: usize| -> Vec<usize> {
        s.rows.iter().filter(|r| r.operation == n).map(|r| r.worker).collect()
    };
    assert_eq!(workers_of(1), vec![1, 2, 3]);
    assert_eq!(workers_of(2), vec![1, 3]);
    assert_eq!(workers_of(3), vec![1, 3]);

    // N counts the workers actually assigned
    let b = s.rows.iter().find(|r| r.operation == 2).expect("row of B");
    assert_eq!(b.start, at(2025, 3, 3, 8, 10));
    assert_eq!(b.end, at(2025, 3, 3, 8, 25));
    assert_eq!(s.end, at(2025, 3, 3, 8, 40));
}

#[test]
fn released_worker_stays_out_even_when_listed_again() {
    let ops = vec![
        op("A", 30.0),
        op("B", 30.0),
        op("C", 30.0).releasing(&[2]),
        op("D", 30.0).with_workers(&[1, 2]),
        op("E", 30.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(3)
        .with_mode(DistributionMode::Individual);
    let s = build_schedule(&ops, &cfg);

    let workers_of = |n: usize| -> Vec<usize> {
        s.rows.iter().filter(|r| r.operation == n).map(|r| r.worker).collect()
    };
    assert_eq!(workers_of(1), vec![1, 2, 3]);
    assert_eq!(workers_of(2), vec![1, 2, 3]);
    assert_eq!(workers_of(3), vec![1, 3]);
    assert_eq!(workers_of(4), vec![1]);
    assert_eq!(workers_of(5), vec![1, 3]);
    assert!(s.rows.iter().filter(|r| r.worker == 2).all(|r| r.operation <= 2));
}

#[test]
fn operation_without_workers_emits_nothing_and_keeps_the_clock() {
    let ops = vec![
        op("A", 30.0),
        op("B", 30.0).with_pause(15.0, DurationUnit::Minute).releasing(&[1]),
        op("C", 30.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0));
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows.len(), 1);
    assert_eq!(s.end, at(2025, 3, 3, 8, 30));
}

#[test]
fn chain_mode_exposes_the_next_start() {
    let ops = vec![op("A", 90.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 11, 0))
        .with_lunch(LunchWindow::new(12, 0, 60))
        .with_chain_mode(true);
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.end, at(2025, 3, 3, 13, 30));
    assert_eq!(s.next_start, Some(s.end));

    let unchained = build_schedule(&ops, &cfg.clone().with_chain_mode(false));
    assert_eq!(unchained.next_start, None);
}

#[test]
fn individual_mode_uses_subsets_without_moving_the_clock() {
    let ops = vec![
        op("A", 30.0).with_workers(&[1]),
        op("B", 20.0).with_workers(&[2]).with_pause(5.0, DurationUnit::Minute),
        op("C", 10.0),
    ];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(2)
        .with_mode(DistributionMode::Individual);
    let s = build_schedule(&ops, &cfg);

    let pairs: Vec<(usize, usize)> = s.rows.iter().map(|r| (r.operation, r.worker)).collect();
    assert_eq!(pairs, vec![(1, 1), (2, 2), (3, 1), (3, 2)]);
    for r in &s.rows {
        assert_eq!(r.start, at(2025, 3, 3, 8, 0));
    }
    assert_eq!(s.rows[1].pause_minutes, 5.0);
    assert_eq!(s.rows[0].duration, 30.0);
}

#[test]
fn worker_subsets_are_ignored_outside_individual_mode() {
    let ops = vec![op("A", 30.0).with_workers(&[1])];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(3);
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows.len(), 3);
}

#[test]
fn scheduler_walks_idle_running_done() {
    let ops = vec![op("A", 10.0), op("B", 10.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0));
    let mut sched = Scheduler::new(&ops, &cfg);

    assert_eq!(sched.state(), SchedulerState::Idle);
    assert_eq!(sched.step(), SchedulerState::Running(0));
    assert_eq!(sched.step(), SchedulerState::Running(1));
    assert_eq!(sched.clock(), at(2025, 3, 3, 8, 10));
    assert_eq!(sched.step(), SchedulerState::Done);
    assert_eq!(sched.step(), SchedulerState::Done);
    assert_eq!(sched.finish().rows.len(), 2);
}

#[test]
fn workers_are_clamped() {
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(25);
    assert_eq!(cfg.workers, 10);
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0)).with_workers(-3);
    assert_eq!(cfg.workers, 1);
}

#[test]
fn worker_labels_come_from_names() {
    let ops = vec![op("A", 10.0)];
    let cfg = RunConfig::new(at(2025, 3, 3, 8, 0))
        .with_workers(2)
        .with_worker_names(vec!["Ivanov".into(), " ".into()]);
    let s = build_schedule(&ops, &cfg);

    assert_eq!(s.rows[0].worker_label, "Ivanov");
    assert_eq!(s.rows[1].worker_label, "Worker 2");
}
