use timetotable::config::Config;
use timetotable::models::distribution_mode::DistributionMode;
use timetotable::models::lunch_window::LunchWindow;

#[test]
fn unknown_mode_keeps_the_rest_of_the_file() {
    let yaml = "database: /data/work.sqlite\nworkers: 4\ndistribution_mode: parallel\nworker_names: [Ann, Bo]\n";
    let cfg: Config = serde_yaml::from_str(yaml).expect("config parses");

    assert_eq!(cfg.database, "/data/work.sqlite");
    assert_eq!(cfg.workers, 4);
    assert_eq!(cfg.distribution_mode, DistributionMode::Total);
    assert_eq!(cfg.worker_names, vec!["Ann", "Bo"]);
}

#[test]
fn out_of_range_numbers_are_clamped() {
    let yaml = "database: /data/work.sqlite\nworkers: -2\ntext_limit: -5\n";
    let cfg: Config = serde_yaml::from_str(yaml).expect("config parses");
    assert_eq!(cfg.workers, 1);
    assert_eq!(cfg.text_limit, 255);
    assert_eq!(cfg.database, "/data/work.sqlite");

    let cfg: Config = serde_yaml::from_str("database: x\nworkers: \"25\"\n").expect("config parses");
    assert_eq!(cfg.workers, 10);
}

#[test]
fn lunch_windows_are_clamped_not_rejected() {
    let yaml = "database: x\nlunch_windows:\n  - {hour: 12, minute: 0, duration: -30}\n  - 7\n  - {hour: 30, minute: 15, duration: 45}\n";
    let cfg: Config = serde_yaml::from_str(yaml).expect("config parses");

    assert_eq!(
        cfg.lunch_windows,
        vec![LunchWindow::new(12, 0, 0), LunchWindow::new(23, 15, 44)]
    );
}

#[test]
fn valid_values_are_kept() {
    let yaml = "database: x\nworkers: 3\ndistribution_mode: per_worker\nchain_mode: true\n";
    let cfg: Config = serde_yaml::from_str(yaml).expect("config parses");
    assert_eq!(cfg.workers, 3);
    assert_eq!(cfg.distribution_mode, DistributionMode::PerWorker);
    assert!(cfg.chain_mode);
    assert_eq!(cfg.lunch_windows, vec![LunchWindow::default()]);
}
