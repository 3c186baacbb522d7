use crate::cli::parser::ScheduleArgs;
use crate::config::Config;
use crate::core::report::{ReportFields, render_table};
use crate::core::schedule::{ScheduleLogic, ScheduleOutcome, ScheduleRequest};
use crate::core::template::{TemplateLogic, read_plan_file};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::diagnostics::Diagnostics;
use crate::models::distribution_mode::DistributionMode;
use crate::models::lunch_window::LunchWindow;
use crate::models::run_config::MAX_LUNCH_WINDOWS;
use crate::ui::messages::{detail, header, info, success, warning};
use crate::utils::date::parse_date;
use crate::utils::path::expand_tilde;
use crate::utils::time::format_instant;

/// Handle the `schedule` command
pub fn handle(args: &ScheduleArgs, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open(&cfg.database)?;
    let mut diags = Diagnostics::new();

    let ops = match (&args.template, &args.plan) {
        (Some(name), _) => TemplateLogic::load(&mut pool, name)?,
        (None, Some(file)) => read_plan_file(&expand_tilde(file), &mut diags)?,
        (None, None) => return Err(AppError::InvalidPlan("pass --template or --plan".into())),
    };

    let req = build_request(args, ops, &mut diags)?;
    let outcome = ScheduleLogic::run(&mut pool, cfg, &req, &mut diags)?;

    for d in diags.iter() {
        warning(format!("{}: {}", d.target, d.message));
    }
    print_outcome(&outcome);
    Ok(())
}

/// CLI arguments → scheduler request. Unknown modes fall back to `total`.
pub fn build_request(
    args: &ScheduleArgs,
    ops: Vec<crate::models::operation::OperationDefinition>,
    diags: &mut Diagnostics,
) -> AppResult<ScheduleRequest> {
    let (date, time) = match &args.start {
        Some(s) => split_start(s)?,
        None => (args.date.clone(), args.time.clone()),
    };

    let mode = args.mode.as_deref().map(|m| {
        DistributionMode::from_str_opt(m).unwrap_or_else(|| {
            diags.push("mode", format!("unknown mode '{m}', using total"));
            DistributionMode::Total
        })
    });

    let lunch = if args.no_lunch {
        Some(Vec::new())
    } else if args.lunch.is_empty() {
        None
    } else {
        let mut windows = args
            .lunch
            .iter()
            .map(|s| LunchWindow::parse(s).ok_or_else(|| AppError::InvalidTime(s.clone())))
            .collect::<AppResult<Vec<_>>>()?;
        if windows.len() > MAX_LUNCH_WINDOWS {
            diags.push(
                "lunch",
                format!("{} windows given, only the first {MAX_LUNCH_WINDOWS} are used", windows.len()),
            );
            windows.truncate(MAX_LUNCH_WINDOWS);
        }
        Some(windows)
    };

    let chain_mode = match (args.chain, args.no_chain) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let posting_date = args
        .posting_date
        .as_deref()
        .map(|s| parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())))
        .transpose()?;

    Ok(ScheduleRequest {
        ops,
        date,
        time,
        workers: args.workers,
        mode,
        lunch,
        chain_mode,
        posting_date,
        fields: ReportFields {
            pre_work_status: args.pre_status.clone(),
            extra_work: args.extra_work.clone(),
            measurement_a: args.measure_a.clone(),
            measurement_b: args.measure_b.clone(),
            deviations: args.deviations.clone(),
        },
        dry_run: args.dry_run,
    })
}

/// "YYYY-MM-DD HH:MM" (or with `T`) → date and time parts.
fn split_start(s: &str) -> AppResult<(Option<String>, Option<String>)> {
    let s = s.trim();
    let (d, t) = s
        .split_once(' ')
        .or_else(|| s.split_once('T'))
        .ok_or(AppError::MissingStart("time"))?;
    Ok((Some(d.to_string()), Some(t.to_string())))
}

fn print_outcome(outcome: &ScheduleOutcome) {
    let s = &outcome.schedule;
    header(format!(
        "Schedule {} → {} ({}, {} worker(s))",
        format_instant(&s.start),
        format_instant(&s.end),
        outcome.entry.mode.as_str(),
        outcome.entry.workers
    ));

    if s.rows.is_empty() {
        warning("No operation has an assigned worker: nothing scheduled.");
    } else {
        print!("{}", render_table(&s.rows));
    }
    println!();
    for line in &outcome.entry.report {
        println!("{line}");
    }
    println!();

    match outcome.history_id {
        Some(id) => success(format!("Run stored in history (#{id}).")),
        None => info("Dry run: nothing stored."),
    }
    if let Some(next) = s.next_start {
        detail(format!("Next chained start: {}", format_instant(&next)));
    }
}
