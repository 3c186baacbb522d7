mod common;
use common::at;
use timetotable::core::calculator::LunchSchedule;
use timetotable::models::lunch_window::LunchWindow;

fn lunch(windows: &[(i64, i64, i64)]) -> LunchSchedule {
    let list: Vec<LunchWindow> = windows.iter().map(|&(h, m, d)| LunchWindow::new(h, m, d)).collect();
    LunchSchedule::new(&list)
}

#[test]
fn interval_ending_at_window_start_does_not_cross() {
    let l = lunch(&[(8, 30, 30)]);
    let adj = l.adjust(at(2025, 3, 3, 8, 0), at(2025, 3, 3, 8, 30));

    assert_eq!(adj.start, at(2025, 3, 3, 8, 0));
    assert_eq!(adj.end, at(2025, 3, 3, 8, 30));
    assert!(!adj.crossed);
}

#[test]
fn interval_one_minute_into_window_is_extended() {
    let l = lunch(&[(8, 30, 30)]);
    let adj = l.adjust(at(2025, 3, 3, 8, 0), at(2025, 3, 3, 8, 31));

    assert_eq!(adj.start, at(2025, 3, 3, 8, 0));
    assert_eq!(adj.end, at(2025, 3, 3, 9, 1));
    assert!(adj.crossed);
}

#[test]
fn start_inside_window_moves_to_window_end() {
    let l = lunch(&[(12, 0, 60)]);
    let adj = l.adjust(at(2025, 3, 3, 12, 15), at(2025, 3, 3, 12, 45));

    assert_eq!(adj.start, at(2025, 3, 3, 13, 0));
    assert_eq!(adj.end, at(2025, 3, 3, 13, 30));
    assert!(adj.crossed);
}

#[test]
fn start_at_window_start_is_inside() {
    let l = lunch(&[(12, 0, 60)]);
    let adj = l.adjust(at(2025, 3, 3, 12, 0), at(2025, 3, 3, 12, 10));

    assert_eq!(adj.start, at(2025, 3, 3, 13, 0));
    assert_eq!(adj.end, at(2025, 3, 3, 13, 10));
}

#[test]
fn start_at_window_end_is_untouched() {
    let l = lunch(&[(12, 0, 60)]);
    let adj = l.adjust(at(2025, 3, 3, 13, 0), at(2025, 3, 3, 13, 20));

    assert_eq!(adj.start, at(2025, 3, 3, 13, 0));
    assert_eq!(adj.end, at(2025, 3, 3, 13, 20));
    assert!(!adj.crossed);
}

#[test]
fn both_windows_extend_a_long_interval() {
    let l = lunch(&[(12, 0, 60), (18, 0, 30)]);
    let adj = l.adjust(at(2025, 3, 3, 11, 0), at(2025, 3, 3, 17, 0));

    // +60 makes it end at 18:00 exactly: the second window is not crossed
    assert_eq!(adj.end, at(2025, 3, 3, 18, 0));

    let adj = l.adjust(at(2025, 3, 3, 11, 0), at(2025, 3, 3, 17, 30));
    assert_eq!(adj.end, at(2025, 3, 3, 19, 0));
    assert!(adj.crossed);
}

#[test]
fn second_window_rolls_into_next_day() {
    let l = lunch(&[(12, 0, 30), (18, 0, 30)]);
    let adj = l.adjust(at(2025, 3, 3, 19, 0), at(2025, 3, 4, 19, 0));

    assert_eq!(adj.start, at(2025, 3, 3, 19, 0));
    assert_eq!(adj.end, at(2025, 3, 4, 19, 30));
    assert!(adj.crossed);
}

#[test]
fn first_window_never_rolls() {
    let l = lunch(&[(12, 0, 30)]);
    let adj = l.adjust(at(2025, 3, 3, 13, 0), at(2025, 3, 4, 13, 0));

    assert_eq!(adj.end, at(2025, 3, 4, 13, 0));
    assert!(!adj.crossed);
}

#[test]
fn windows_are_sorted_and_empty_ones_dropped() {
    let l = lunch(&[(18, 0, 30), (9, 0, 0), (12, 0, 60)]);
    let starts: Vec<u32> = l.windows().iter().map(|w| w.window.start_minutes()).collect();

    assert_eq!(starts, vec![12 * 60, 18 * 60]);
    assert!(!l.windows()[0].rolls_over);
    assert!(l.windows()[1].rolls_over);
}

#[test]
fn window_duration_is_clamped_to_the_day() {
    let w = LunchWindow::new(23, 0, 5000);
    assert_eq!(w.end_minutes(), 1439);

    let w = LunchWindow::new(12, 0, -20);
    assert_eq!(w.duration, 0);
}

#[test]
fn lunch_window_parsing() {
    assert_eq!(LunchWindow::parse("12:30+45"), Some(LunchWindow::new(12, 30, 45)));
    assert_eq!(LunchWindow::parse("12:00-13:00"), Some(LunchWindow::new(12, 0, 60)));
    assert_eq!(LunchWindow::parse("13:00-12:00"), None);
    assert_eq!(LunchWindow::parse("noon"), None);
}
