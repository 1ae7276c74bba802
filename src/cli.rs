use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Daily study planner")]
pub struct Cli {
    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to a day
    #[command(aliases = ["a", "new"])]
    Add {
        /// Task text, e.g. "10 pages biology"
        text: String,

        /// Category (default: general)
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        /// Scheduled time, e.g. "17:30"
        #[arg(short = 't', long = "time")]
        time: Option<String>,

        /// Duration, e.g. "1.5 h"; estimated from the text when omitted
        #[arg(long = "hours")]
        hours: Option<String>,

        /// Day: "today", "yesterday", "tomorrow", "YYYY-MM-DD" or "DDMMYYYY"
        #[arg(short = 'd', long = "day")]
        day: Option<String>,
    },

    /// List a day's tasks
    #[command(aliases = ["l", "ls"])]
    List {
        /// Day to list (default: today)
        #[arg(short = 'd', long = "day")]
        day: Option<String>,

        /// Include completed tasks
        #[arg(short = 'a', long = "all")]
        all: bool,
    },

    /// View a task by id
    #[command(alias = "v")]
    View { id: String },

    /// Edit a task (interactive if no fields are provided)
    #[command(alias = "e")]
    Edit {
        id: String,

        /// New text
        #[arg(long = "text")]
        text: Option<String>,

        /// New category
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        /// New scheduled time
        #[arg(short = 't', long = "time")]
        time: Option<String>,

        /// New duration, e.g. "2 hrs"
        #[arg(long = "hours")]
        hours: Option<String>,

        /// Clear scheduled time
        #[arg(long = "clear-time")]
        clear_time: bool,

        /// Clear duration
        #[arg(long = "clear-hours")]
        clear_hours: bool,
    },

    /// Mark a task as done
    #[command(alias = "d")]
    Done { id: String },

    /// Mark a task as not done
    #[command(alias = "u")]
    Undone { id: String },

    /// Toggle a task's done status
    #[command(alias = "t")]
    Toggle { id: String },

    /// Delete a task
    #[command(aliases = ["x", "rm", "del"])]
    Delete { id: String },

    /// Preview or apply the generated plan for a day
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Show or edit the weekly template
    #[command(aliases = ["w", "weekly"])]
    Week {
        /// Weekday to show or edit (all days when omitted)
        weekday: Option<String>,

        /// Comma-separated subjects
        #[arg(long = "subjects", requires = "weekday")]
        subjects: Option<String>,

        /// Concrete tasks separated by newline, '/', ';' or ','
        #[arg(long = "primary", requires = "weekday")]
        primary: Option<String>,

        /// Free-text suggestion shown with the day
        #[arg(long = "suggest", requires = "weekday")]
        suggest: Option<String>,

        /// Clear the day's template
        #[arg(long = "clear", requires = "weekday")]
        clear: bool,
    },

    /// Show totals, breaks and averages for a day
    #[command(aliases = ["sum", "s"])]
    Summary {
        #[arg(short = 'd', long = "day")]
        day: Option<String>,
    },

    /// Show recorded hours per day
    #[command(alias = "hist")]
    History {
        /// Number of days to show
        #[arg(long = "days", default_value_t = 14)]
        days: u64,
    },

    /// Show completion streak and weakest categories
    #[command(alias = "st")]
    Stats,

    /// Save, list, restore or delete named snapshots
    #[command(aliases = ["snap", "saved"])]
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },

    /// Export the document (json) or one day (markdown, text, csv)
    #[command(aliases = ["ex", "out"])]
    Export {
        /// Export format
        #[arg(value_enum, default_value = "json")]
        format: ExportFormat,

        /// Day for per-day formats
        #[arg(short = 'd', long = "day")]
        day: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short = 'o', long = "out")]
        out: Option<String>,
    },

    /// Replace the whole document with an exported JSON file
    #[command(aliases = ["imp", "in"])]
    Import {
        /// Input file path
        file: String,
    },

    /// Show or update planner settings
    #[command(aliases = ["cfg", "settings"])]
    Config {
        /// Study target in hours per day
        #[arg(long = "target")]
        target: Option<f64>,

        /// Break length in hours
        #[arg(long = "break-length")]
        break_length: Option<f64>,

        /// Wake-up time
        #[arg(long = "wake")]
        wake: Option<String>,

        /// Bed time
        #[arg(long = "sleep")]
        sleep: Option<String>,

        /// School start time
        #[arg(long = "school-start")]
        school_start: Option<String>,

        /// School end time
        #[arg(long = "school-end")]
        school_end: Option<String>,

        /// Whether school hours apply
        #[arg(long = "school-enabled")]
        school_enabled: Option<bool>,

        /// Current mission or goal
        #[arg(long = "mission")]
        mission: Option<String>,
    },

    /// Generate shell completions
    #[command(aliases = ["comp", "completion"])]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show the plan the weekly template produces
    Show {
        #[arg(short = 'd', long = "day")]
        day: Option<String>,
    },

    /// Add the generated plan to the day's tasks
    Apply {
        #[arg(short = 'd', long = "day")]
        day: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Save the current state under a name (prompts if omitted)
    Save { name: Option<String> },

    /// List saved snapshots
    #[command(alias = "ls")]
    List,

    /// Restore a snapshot by id or name
    Restore { id: String },

    /// Delete a snapshot by id or name
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
    #[value(alias = "raw")]
    Text,
    Csv,
}
