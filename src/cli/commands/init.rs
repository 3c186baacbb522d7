use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database at the configured or `--db` path
///  - all pending DB migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    Config::init_all(cli.db.clone(), cli.test)?;

    // in test mode nothing is written, so the file cannot be re-read
    let db_path = if cli.test {
        cfg.database.clone()
    } else {
        Config::load().database
    };

    println!("⚙️  Initializing timetotable…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    // tables and migrations
    let pool = DbPool::open(&db_path)?;

    success(format!("Database initialized at {}", &db_path));

    // internal log, failure only warns
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    Ok(())
}
