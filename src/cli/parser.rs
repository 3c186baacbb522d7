use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for timetotable
/// Plans work operations on a timeline and exports it as a live spreadsheet
#[derive(Parser)]
#[command(
    name = "timetotable",
    version = env!("CARGO_PKG_VERSION"),
    about = "Schedule work operations around lunch breaks and export them as live-formula spreadsheets",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing keys to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage stored operation templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Compute a schedule for a plan or template and store it in the history
    Schedule(ScheduleArgs),

    /// Inspect or clear the run history
    History {
        #[arg(long = "list", help = "List stored runs, most recent first")]
        list: bool,

        #[arg(long = "show", value_name = "N", help = "Show run N (1 = most recent)")]
        show: Option<usize>,

        #[arg(long = "clear", help = "Delete every stored run and the chain seed")]
        clear: bool,
    },

    /// Export the history
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "xml")]
        format: ExportFormat,

        /// Output file (relative names go inside `export_dir` when configured)
        #[arg(long)]
        file: String,

        /// Overwrite the output file without asking
        #[arg(long)]
        force: bool,

        /// Evaluate the sheet formulas and compare them with the stored rows
        #[arg(long)]
        verify: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Store a plan file under a name (replaces an existing one)
    Save {
        name: String,
        #[arg(long)]
        file: String,
    },
    /// List stored templates
    List,
    /// Print the operations of a template
    Show { name: String },
    /// Delete a template
    Del { name: String },
    /// Write a template back as a plan file
    Export {
        name: String,
        #[arg(long)]
        file: String,
    },
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Stored template to schedule
    #[arg(long, conflicts_with = "plan", required_unless_present = "plan")]
    pub template: Option<String>,

    /// Plan file (JSON) to schedule
    #[arg(long)]
    pub plan: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "start")]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[arg(long, conflicts_with = "start")]
    pub time: Option<String>,

    /// Start instant ("YYYY-MM-DD HH:MM")
    #[arg(long)]
    pub start: Option<String>,

    /// Number of workers (1-10)
    #[arg(long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Distribution mode: total, per_worker or individual
    #[arg(long)]
    pub mode: Option<String>,

    /// Lunch window HH:MM+MIN or HH:MM-HH:MM (repeat for a second window)
    #[arg(long = "lunch", value_name = "WINDOW", conflicts_with = "no_lunch")]
    pub lunch: Vec<String>,

    /// Disable lunch compensation
    #[arg(long)]
    pub no_lunch: bool,

    /// Continue from the previous chained run and update the seed
    #[arg(long, conflicts_with = "no_chain")]
    pub chain: bool,

    #[arg(long)]
    pub no_chain: bool,

    /// Posting date of the rows (YYYY-MM-DD, default: start date)
    #[arg(long)]
    pub posting_date: Option<String>,

    #[arg(long, default_value = "")]
    pub pre_status: String,

    #[arg(long, default_value = "")]
    pub extra_work: String,

    #[arg(long, default_value = "")]
    pub measure_a: String,

    #[arg(long, default_value = "")]
    pub measure_b: String,

    #[arg(long, default_value = "")]
    pub deviations: String,

    /// Compute and print only; nothing is stored
    #[arg(long)]
    pub dry_run: bool,
}
