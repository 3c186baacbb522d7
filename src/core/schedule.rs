use crate::config::Config;
use crate::core::calculator::{Schedule, build_schedule};
use crate::core::report::{ReportFields, build_report, make_entry};
use crate::db::history::insert_entry;
use crate::db::log::{log_diagnostics, ttlog};
use crate::db::pool::DbPool;
use crate::db::state;
use crate::errors::{AppError, AppResult};
use crate::models::diagnostics::Diagnostics;
use crate::models::distribution_mode::DistributionMode;
use crate::models::history_entry::HistoryEntry;
use crate::models::lunch_window::LunchWindow;
use crate::models::operation::OperationDefinition;
use crate::models::run_config::{MAX_WORKERS, MIN_WORKERS, RunConfig, StartSource, clamp_workers};
use crate::utils::time::{format_instant, parse_start};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

/// One `schedule` invocation after CLI parsing. `None` fields fall back to
/// the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    pub ops: Vec<OperationDefinition>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub workers: Option<i64>,
    pub mode: Option<DistributionMode>,
    /// `Some(vec![])` disables lunch compensation.
    pub lunch: Option<Vec<LunchWindow>>,
    pub chain_mode: Option<bool>,
    pub posting_date: Option<NaiveDate>,
    pub fields: ReportFields,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub schedule: Schedule,
    pub entry: HistoryEntry,
    /// Row id of the stored entry (`None` on dry runs).
    pub history_id: Option<i64>,
}

/// High-level business logic for the `schedule` command.
pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Explicit date/time wins; otherwise the chain seed when chain mode is on.
    pub fn resolve_start(
        seed: Option<NaiveDateTime>,
        date: Option<&str>,
        time: Option<&str>,
        chain_mode: bool,
    ) -> AppResult<(NaiveDateTime, StartSource)> {
        if date.is_some() || time.is_some() {
            return Ok((parse_start(date, time)?, StartSource::Manual));
        }

        match seed {
            Some(at) if chain_mode => Ok((at, StartSource::Chained)),
            _ => Err(AppError::MissingStart("date")),
        }
    }

    /// Merge request and configuration into the scheduler input.
    pub fn run_config(
        cfg: &Config,
        req: &ScheduleRequest,
        start: NaiveDateTime,
        source: StartSource,
        diags: &mut Diagnostics,
    ) -> RunConfig {
        let workers_raw = req.workers.unwrap_or(cfg.workers as i64);
        let workers = clamp_workers(workers_raw);
        if workers as i64 != workers_raw {
            diags.push(
                "workers",
                format!("{workers_raw} out of range {MIN_WORKERS}..={MAX_WORKERS}, using {workers}"),
            );
        }

        let lunch = req
            .lunch
            .clone()
            .unwrap_or_else(|| cfg.lunch_windows.clone());

        let mut run = RunConfig::new(start)
            .with_workers(workers as i64)
            .with_mode(req.mode.unwrap_or(cfg.distribution_mode))
            .with_chain_mode(req.chain_mode.unwrap_or(cfg.chain_mode))
            .with_start_source(source)
            .with_worker_names(cfg.worker_names.clone());

        for w in lunch {
            run = run.with_lunch(w);
        }

        if let Some(d) = req.posting_date {
            run = run.with_posting_date(d);
        }

        run
    }

    /// Compute, report and (unless dry-run) persist one run.
    ///
    /// Nothing is written when the start cannot be resolved. On success the
    /// history entry, the chain seed and the log lines go in one transaction.
    pub fn run(
        pool: &mut DbPool,
        cfg: &Config,
        req: &ScheduleRequest,
        diags: &mut Diagnostics,
    ) -> AppResult<ScheduleOutcome> {
        if req.ops.is_empty() {
            return Err(AppError::EmptyPlan);
        }

        let chain_mode = req.chain_mode.unwrap_or(cfg.chain_mode);
        let seed = state::load_next_start(&pool.conn)?;
        let (start, source) =
            Self::resolve_start(seed, req.date.as_deref(), req.time.as_deref(), chain_mode)?;

        let run = Self::run_config(cfg, req, start, source, diags);
        let schedule = build_schedule(&req.ops, &run);
        Self::note_skipped(&req.ops, &schedule, diags);

        let report = build_report(&req.ops, &req.fields, cfg.text_limit);
        let entry = make_entry(&schedule, &run, report, Local::now().to_rfc3339());

        if req.dry_run {
            log_diagnostics(&pool.conn, "schedule", diags)?;
            return Ok(ScheduleOutcome {
                schedule,
                entry,
                history_id: None,
            });
        }

        let next_start = schedule.next_start;
        let summary = format!(
            "{} rows, {} → {}",
            schedule.rows.len(),
            format_instant(&schedule.start),
            format_instant(&schedule.end)
        );

        let findings: &Diagnostics = diags;
        let id = pool.with_transaction(|conn| {
            let id = insert_entry(conn, &entry)?;
            if let Some(at) = next_start {
                state::save_next_start(conn, &at)?;
            }
            log_diagnostics(conn, "schedule", findings)?;
            ttlog(conn, "schedule", &format!("history #{id}"), &summary)?;
            Ok(id)
        })?;

        let mut entry = entry;
        entry.id = Some(id);

        Ok(ScheduleOutcome {
            schedule,
            entry,
            history_id: Some(id),
        })
    }

    /// Record operations that ended up with nobody assigned.
    fn note_skipped(ops: &[OperationDefinition], schedule: &Schedule, diags: &mut Diagnostics) {
        let placed: BTreeSet<usize> = schedule.rows.iter().map(|r| r.operation).collect();
        for (i, op) in ops.iter().enumerate() {
            if !placed.contains(&(i + 1)) {
                diags.push(
                    format!("operation #{}", i + 1),
                    format!("'{}' has no assigned worker, skipped", op.name),
                );
            }
        }
    }
}
