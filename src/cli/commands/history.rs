use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history::HistoryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `history` command; without flags it lists.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { list, show, clear } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;

        if *clear {
            return HistoryLogic::clear(&mut pool);
        }
        if let Some(n) = show {
            return HistoryLogic::show(&mut pool, *n);
        }
        if *list || show.is_none() {
            HistoryLogic::list(&mut pool)?;
        }
    }
    Ok(())
}
