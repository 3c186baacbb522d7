use crate::cli::parser::TemplateAction;
use crate::config::Config;
use crate::core::template::TemplateLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::path::expand_tilde;

/// Handle the `template` subcommands
pub fn handle(action: &TemplateAction, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open(&cfg.database)?;

    match action {
        TemplateAction::Save { name, file } => TemplateLogic::save(&mut pool, name, &expand_tilde(file)),
        TemplateAction::List => TemplateLogic::list(&mut pool),
        TemplateAction::Show { name } => TemplateLogic::show(&mut pool, name),
        TemplateAction::Del { name } => TemplateLogic::delete(&mut pool, name),
        TemplateAction::Export { name, file } => {
            TemplateLogic::export(&mut pool, name, &expand_tilde(file))
        }
    }
}
