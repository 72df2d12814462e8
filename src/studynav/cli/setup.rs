use clap::{Args, Parser, Subcommand};
use studynav::config::Backend;

#[derive(Parser, Debug)]
#[command(name = "studynav", bin_name = "studynav", version)]
#[command(about = "Study notes and tasks kept in plain JSON or Markdown files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage backend for this run (json or markdown)
    #[arg(long, global = true, help_heading = "Options")]
    pub backend: Option<Backend>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with notes
    #[command(subcommand)]
    Note(NoteCommands),

    /// Work with tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Search note titles and bodies, and task titles
    Search {
        /// Text to look for (case-insensitive)
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// Show where data is stored
    Where,

    /// Copy all records from the other backend into the given one
    Migrate {
        /// Backend to copy into
        #[arg(long)]
        to: Backend,
    },

    /// Show or change configuration
    Config {
        /// Key to show or set (backend, vault_dir)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a note
    Add {
        /// Title words
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Body text
        #[arg(short, long, default_value = "")]
        body: String,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List notes, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Only notes with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a note in full
    Show { id: String },

    /// Append a paragraph to a note's body
    Append {
        id: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Add tags to a note
    Tag {
        id: String,

        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct TaskAddArgs {
    /// Title words
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Longer description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Priority, 1 (highest) to 5
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub prio: u8,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Id of a related note
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add(TaskAddArgs),

    /// List tasks: open before done, soonest due first, then by priority
    #[command(alias = "ls")]
    List {
        /// Only tasks with this status (todo, doing, done)
        #[arg(short, long)]
        status: Option<String>,

        /// Only tasks due on or before this date (YYYY-MM-DD)
        #[arg(long)]
        due_before: Option<String>,

        /// Only tasks linked to this note
        #[arg(long)]
        note: Option<String>,
    },

    /// Show a task in full
    Show { id: String },

    /// Mark a task done
    Done { id: String },

    /// Mark a task as in progress
    Start { id: String },

    /// Mark a task as not started
    Reopen { id: String },

    /// Link a task to a note
    Link { id: String, note_id: String },

    /// Remove a task's note link
    Unlink { id: String },

    /// Delete a task
    #[command(alias = "rm")]
    Delete { id: String },
}
