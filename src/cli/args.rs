use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::tracking::{Granularity, SessionId};

#[derive(Parser)]
#[command(name = "timetrack")]
#[command(about = "Track time spent on work categories and summarize it")]
#[command(long_about = "timetrack - personal time tracking from the command line

Start a timer for a category, pause and resume it as you get interrupted,
stop it when you're done, and get daily or weekly summaries of where the
time went. Sessions can also be added, edited, or removed after the fact.

QUICK START:
  timetrack start Sales \"CRM work\" -d \"Pipeline cleanup\"
  timetrack pause / timetrack resume
  timetrack stop
  timetrack report week

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Data lives in ~/.timetrack/ (set TIMETRACK_HOME to use another directory).

For more information on a specific command, run:
  timetrack <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` in config.yaml.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log debug information to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

/// Layout of the `report` command.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Totals per day or week, by category and subcategory.
    #[default]
    Summary,
    /// One row per session with a grand total.
    Detailed,
    /// Sessions grouped by date, one line each.
    Cospend,
}

/// Time window for `list` and `report`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    /// Sessions started today.
    Today,
    /// Sessions started this ISO week (Monday to Sunday).
    Week,
    /// Sessions started in the last 30 days.
    Month,
    /// Every session.
    All,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a timer
    ///
    /// Starts a new session for a category and optional subcategory.
    /// Only one timer can be active at a time; use --switch to stop the
    /// current one first.
    ///
    /// # Examples
    ///
    ///   timetrack start Sales
    ///   timetrack start "Product dev" "Software development" -d "Paywall"
    ///   timetrack start -c Marketing -s Design
    ///   timetrack start Sales --offset 15       Started 15 minutes ago
    ///   timetrack start Marketing --switch      Stop the running timer first
    #[command(alias = "s")]
    Start(StartArgs),

    /// Pause the running timer
    ///
    /// Paused time is not counted towards the session's duration.
    Pause,

    /// Resume the paused timer
    Resume,

    /// Stop the active timer
    ///
    /// Works whether the timer is running or paused.
    #[command(alias = "end")]
    Stop,

    /// Show the active timer
    #[command(alias = "st")]
    Status,

    /// Add a completed session
    ///
    /// Records time that was not tracked live. Give either an end time or
    /// a duration.
    ///
    /// # Examples
    ///
    ///   timetrack add Sales --start 09:00 --end 10:30
    ///   timetrack add Other MetaLand --start "yesterday 14:00" --duration 1.5h
    ///   timetrack add Marketing --start 2024-03-04T13:00 --duration 45
    Add(AddArgs),

    /// Edit a session
    ///
    /// Changes any combination of fields. Setting --duration moves the end
    /// time so the active (non-paused) time matches.
    ///
    /// # Examples
    ///
    ///   timetrack edit 12 --duration 2h
    ///   timetrack edit 12 --category Marketing --subcategory Design
    ///   timetrack edit 12 --start 08:45 --description "Standup"
    Edit(EditArgs),

    /// Delete a session by ID
    #[command(alias = "rm")]
    Delete {
        /// Session ID
        id: SessionId,
    },

    /// Remove sessions in bulk
    ///
    /// # Examples
    ///
    ///   timetrack remove --all
    ///   timetrack remove --day 0        Today's sessions
    ///   timetrack remove --day -1       Yesterday's sessions
    ///   timetrack remove --week -1      Last week's sessions
    Remove(RemoveArgs),

    /// List sessions
    ///
    /// # Examples
    ///
    ///   timetrack list                  Every session
    ///   timetrack list today
    ///   timetrack list week --category Sales
    ///   timetrack list --week 10        ISO week 10 of this year
    #[command(alias = "ls")]
    List(ListArgs),

    /// Summarize tracked time
    ///
    /// # Examples
    ///
    ///   timetrack report                Today, by day
    ///   timetrack report week           This week, one bucket per day
    ///   timetrack report month --by week
    ///   timetrack report all --format detailed
    ///   timetrack report --week 10 --format cospend
    #[command(alias = "r")]
    Report(ReportArgs),

    /// List and manage categories
    ///
    /// Without a subcommand, lists all categories.
    ///
    /// # Examples
    ///
    ///   timetrack categories
    ///   timetrack categories list Sales
    ///   timetrack categories add Research Reading Writing
    ///   timetrack categories remove Sales "CRM work"
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Generate shell completions
    ///
    /// Example: timetrack completions bash > ~/.bash_completion.d/timetrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for starting a timer.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Category (e.g. "Sales")
    pub category: Option<String>,

    /// Subcategory (e.g. "CRM work")
    pub subcategory: Option<String>,

    /// Category, as a flag
    #[arg(long = "category", short = 'c', value_name = "CATEGORY", conflicts_with = "category")]
    pub category_flag: Option<String>,

    /// Subcategory, as a flag
    #[arg(
        long = "subcategory",
        short = 's',
        value_name = "SUBCATEGORY",
        conflicts_with = "subcategory"
    )]
    pub subcategory_flag: Option<String>,

    /// What you're working on
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Start this long ago (e.g. 15, 15m, 1h)
    #[arg(long)]
    pub offset: Option<String>,

    /// Stop the active timer before starting
    #[arg(long)]
    pub switch: bool,
}

impl StartArgs {
    /// Category from the flag or the positional argument.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category_flag.as_deref().or(self.category.as_deref())
    }

    /// Subcategory from the flag or the positional argument.
    #[must_use]
    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory_flag
            .as_deref()
            .or(self.subcategory.as_deref())
    }
}

/// Arguments for adding a completed session.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Category
    pub category: String,

    /// Subcategory
    pub subcategory: Option<String>,

    /// When the session started (HH:MM, "<date> HH:MM", YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub start: String,

    /// When the session ended
    #[arg(long, required_unless_present = "duration", conflicts_with = "duration")]
    pub end: Option<String>,

    /// How long it lasted (e.g. 90, 45m, 1h30m, 1.5h)
    #[arg(long)]
    pub duration: Option<String>,

    /// What you worked on
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

/// Arguments for editing a session.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Session ID
    pub id: SessionId,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New subcategory
    #[arg(long, short = 's', conflicts_with = "clear_subcategory")]
    pub subcategory: Option<String>,

    /// Remove the subcategory
    #[arg(long)]
    pub clear_subcategory: bool,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New start time
    #[arg(long)]
    pub start: Option<String>,

    /// New end time
    #[arg(long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// New active duration (e.g. 90, 45m, 1.5h)
    #[arg(long)]
    pub duration: Option<String>,
}

/// Arguments for bulk removal. Exactly one selector is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RemoveArgs {
    /// Remove every session
    #[arg(long)]
    pub all: bool,

    /// Remove sessions from a day, as an offset (0 = today, -1 = yesterday)
    #[arg(long, allow_hyphen_values = true)]
    pub day: Option<i64>,

    /// Remove sessions from a week, as an offset (0 = this week, -1 = last week)
    #[arg(long, allow_hyphen_values = true)]
    pub week: Option<i64>,
}

/// Arguments for listing sessions.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Time window
    #[arg(value_enum, default_value = "all")]
    pub period: Period,

    /// ISO week number of the current year (overrides the period)
    #[arg(long, short = 'w')]
    pub week: Option<u32>,

    /// Only sessions in this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

/// Arguments for reports.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Time window
    #[arg(value_enum, default_value = "today")]
    pub period: Period,

    /// ISO week number of the current year (overrides the period)
    #[arg(long, short = 'w')]
    pub week: Option<u32>,

    /// Bucket size for the summary layout
    #[arg(long, value_enum)]
    pub by: Option<Granularity>,

    /// Report layout (defaults to `report.default_format` in config.yaml)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<ReportFormat>,

    /// Only sessions in this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

/// Arguments for category management.
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: Option<CategoryCommands>,
}

/// Category subcommands.
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories, or the subcategories of one
    #[command(alias = "ls")]
    List {
        /// Category to show subcategories for
        category: Option<String>,
    },

    /// Add a category, or subcategories to an existing one
    Add {
        /// Category name
        category: String,

        /// Subcategory names
        subcategories: Vec<String>,
    },

    /// Remove a category, or one of its subcategories
    #[command(alias = "rm")]
    Remove {
        /// Category name
        category: String,

        /// Subcategory to remove (removes the whole category if omitted)
        subcategory: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_start_positional() {
        let cli = Cli::try_parse_from(["timetrack", "start", "Sales", "CRM work"]).unwrap();
        let Commands::Start(args) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.category(), Some("Sales"));
        assert_eq!(args.subcategory(), Some("CRM work"));
        assert!(!args.switch);
    }

    #[test]
    fn test_cli_start_flags() {
        let cli = Cli::try_parse_from([
            "timetrack", "start", "-c", "Marketing", "-s", "Design", "-d", "logo", "--offset", "15",
            "--switch",
        ])
        .unwrap();
        let Commands::Start(args) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.category(), Some("Marketing"));
        assert_eq!(args.subcategory(), Some("Design"));
        assert_eq!(args.description, "logo");
        assert_eq!(args.offset.as_deref(), Some("15"));
        assert!(args.switch);
    }

    #[test]
    fn test_cli_start_alias() {
        let cli = Cli::try_parse_from(["timetrack", "s", "Sales"]).unwrap();
        assert!(matches!(cli.command, Commands::Start(_)));
    }

    #[test]
    fn test_cli_stop_alias() {
        let cli = Cli::try_parse_from(["timetrack", "end"]).unwrap();
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_cli_global_output() {
        let cli = Cli::try_parse_from(["timetrack", "status", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));

        let cli = Cli::try_parse_from(["timetrack", "status"]).unwrap();
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_cli_add_requires_end_or_duration() {
        assert!(Cli::try_parse_from(["timetrack", "add", "Sales", "--start", "09:00"]).is_err());
        assert!(Cli::try_parse_from([
            "timetrack", "add", "Sales", "--start", "09:00", "--end", "10:00", "--duration", "1h",
        ])
        .is_err());
        assert!(
            Cli::try_parse_from(["timetrack", "add", "Sales", "--start", "09:00", "--duration", "1h"])
                .is_ok()
        );
    }

    #[test]
    fn test_cli_edit_subcategory_conflict() {
        assert!(Cli::try_parse_from([
            "timetrack", "edit", "3", "--subcategory", "Design", "--clear-subcategory",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_remove_needs_one_selector() {
        assert!(Cli::try_parse_from(["timetrack", "remove"]).is_err());
        assert!(Cli::try_parse_from(["timetrack", "remove", "--all", "--day", "0"]).is_err());

        let cli = Cli::try_parse_from(["timetrack", "remove", "--day", "-1"]).unwrap();
        let Commands::Remove(args) = cli.command else {
            panic!("expected remove");
        };
        assert_eq!(args.day, Some(-1));
    }

    #[test]
    fn test_cli_report_defaults() {
        let cli = Cli::try_parse_from(["timetrack", "report"]).unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.period, Period::Today);
        assert!(args.format.is_none());
        assert!(args.by.is_none());
    }

    #[test]
    fn test_cli_report_options() {
        let cli = Cli::try_parse_from([
            "timetrack", "report", "month", "--by", "week", "--format", "cospend",
        ])
        .unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.period, Period::Month);
        assert_eq!(args.by, Some(Granularity::Week));
        assert_eq!(args.format, Some(ReportFormat::Cospend));
    }

    #[test]
    fn test_cli_categories_default_is_list() {
        let cli = Cli::try_parse_from(["timetrack", "categories"]).unwrap();
        let Commands::Categories(args) = cli.command else {
            panic!("expected categories");
        };
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_categories_add() {
        let cli =
            Cli::try_parse_from(["timetrack", "categories", "add", "Research", "Reading", "Writing"])
                .unwrap();
        let Commands::Categories(CategoriesArgs {
            command: Some(CategoryCommands::Add { category, subcategories }),
        }) = cli.command
        else {
            panic!("expected categories add");
        };
        assert_eq!(category, "Research");
        assert_eq!(subcategories, ["Reading", "Writing"]);
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["timetrack", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Bash
            }
        ));
    }
}
