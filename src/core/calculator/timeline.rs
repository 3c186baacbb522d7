use crate::core::calculator::duration::{resolve_duration, resolve_pause};
use crate::core::calculator::lunch::LunchSchedule;
use crate::core::calculator::roster::WorkerRoster;
use crate::models::operation::OperationDefinition;
use crate::models::run_config::RunConfig;
use crate::models::schedule_row::ScheduleRow;
use crate::utils::formatting::format_amount;
use crate::utils::time::minutes_to_day_fraction;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// Next operation to place (0-based).
    Running(usize),
    Done,
}

/// Output of one scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    pub start: NaiveDateTime,
    /// Clock after the last operation.
    pub end: NaiveDateTime,
    /// Seed for the next run when chain mode is on.
    pub next_start: Option<NaiveDateTime>,
}

/// Single-pass scheduler over an ordered operation list.
pub struct Scheduler<'a> {
    ops: &'a [OperationDefinition],
    cfg: &'a RunConfig,
    lunch: LunchSchedule,
    roster: WorkerRoster,
    clock: NaiveDateTime,
    state: SchedulerState,
    rows: Vec<ScheduleRow>,
}

impl<'a> Scheduler<'a> {
    pub fn new(ops: &'a [OperationDefinition], cfg: &'a RunConfig) -> Self {
        Self {
            ops,
            cfg,
            lunch: LunchSchedule::new(&cfg.lunch),
            roster: WorkerRoster::from_operations(ops, cfg.workers),
            clock: cfg.start,
            state: SchedulerState::Idle,
            rows: Vec::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> NaiveDateTime {
        self.clock
    }

    /// Place one operation (or start / finish the pass).
    pub fn step(&mut self) -> SchedulerState {
        self.state = match self.state {
            SchedulerState::Idle if self.ops.is_empty() => SchedulerState::Done,
            SchedulerState::Idle => SchedulerState::Running(0),
            SchedulerState::Running(i) => {
                self.place(i);
                if i + 1 < self.ops.len() {
                    SchedulerState::Running(i + 1)
                } else {
                    SchedulerState::Done
                }
            }
            SchedulerState::Done => SchedulerState::Done,
        };
        self.state
    }

    fn place(&mut self, index: usize) {
        let op = &self.ops[index];
        let mode = self.cfg.mode;

        let workers = self.roster.assigned(op, index, mode);
        if workers.is_empty() {
            // nobody performs it: no rows, the clock stays put
            return;
        }

        // 1. pause
        let pause = resolve_pause(op.pause, op.pause_unit, mode);
        self.clock += pause.elapsed;

        // 2. nominal interval
        let duration = resolve_duration(op.duration, op.unit, workers.len(), mode);
        let planned_start = self.clock;
        let planned_end = planned_start + duration.elapsed;

        // 3. lunch compensation
        let adj = self.lunch.adjust(planned_start, planned_end);

        // 4. one row per worker, same interval
        let ordinal = index + 1;
        let pause_minutes = pause.display_minutes();
        for w in workers {
            self.rows.push(ScheduleRow {
                operation: ordinal,
                confirmation: op.confirmation_label(ordinal),
                name: op.name.clone(),
                worker: w,
                worker_label: self.cfg.worker_label(w),
                planned_start,
                start: adj.start,
                end: adj.end,
                crossed_lunch: adj.crossed,
                pause_minutes,
                pause_text: format_amount(pause.display, pause.unit),
                pause_fraction: minutes_to_day_fraction(pause_minutes),
                duration: duration.display,
                unit: duration.unit,
                posting_date: self.cfg.posting_date,
            });
        }

        // 5. advance
        self.clock = adj.end;
    }

    pub fn finish(self) -> Schedule {
        Schedule {
            rows: self.rows,
            start: self.cfg.start,
            end: self.clock,
            next_start: self.cfg.chain_mode.then_some(self.clock),
        }
    }
}

/// Run the whole pass: `Idle → Running(0..n) → Done`.
pub fn build_schedule(ops: &[OperationDefinition], cfg: &RunConfig) -> Schedule {
    let mut scheduler = Scheduler::new(ops, cfg);
    while scheduler.step() != SchedulerState::Done {}
    scheduler.finish()
}
