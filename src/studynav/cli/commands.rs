//! # CLI Layer
//!
//! This module is **one possible UI client** for studynav. It is the only
//! place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves paths, config and backend, then opens the API
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::print::{
    print_config, print_full_notes, print_full_tasks, print_locations, print_messages,
    print_notes, print_tasks,
};
use super::setup::{Cli, Commands, NoteCommands, TaskAddArgs, TaskCommands};
use clap::Parser;
use studynav::api::{ConfigAction, StudyNavApi, TaskDraft};
use studynav::commands::helpers::parse_due;
use studynav::commands::{CmdResult, StudyNavPaths};
use studynav::config::{Backend, StudyNavConfig, BACKEND_ENV, HOME_ENV};
use studynav::error::Result;
use studynav::logging::init_logging;
use studynav::model::{Note, Task};
use studynav::store::FileStore;
use std::path::PathBuf;
use tracing::{debug, warn};

struct AppContext {
    api: StudyNavApi<FileStore<Note>, FileStore<Task>>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Note(cmd) => match cmd {
            NoteCommands::Add { title, body, tags } => {
                handle_note_add(&mut ctx, title.join(" "), body, tags)
            }
            NoteCommands::List { tag } => handle_note_list(&mut ctx, tag),
            NoteCommands::Show { id } => handle_note_show(&mut ctx, id),
            NoteCommands::Append { id, text } => handle_note_append(&mut ctx, id, text.join(" ")),
            NoteCommands::Tag { id, tags } => handle_note_tag(&mut ctx, id, tags),
            NoteCommands::Delete { id } => print_result(ctx.api.delete_note(&id)?),
        },
        Commands::Task(cmd) => match cmd {
            TaskCommands::Add(args) => handle_task_add(&mut ctx, args),
            TaskCommands::List {
                status,
                due_before,
                note,
            } => handle_task_list(&mut ctx, status, due_before, note),
            TaskCommands::Show { id } => handle_task_show(&mut ctx, id),
            TaskCommands::Done { id } => print_result(ctx.api.complete_task(&id)?),
            TaskCommands::Start { id } => print_result(ctx.api.start_task(&id)?),
            TaskCommands::Reopen { id } => print_result(ctx.api.reopen_task(&id)?),
            TaskCommands::Link { id, note_id } => {
                print_result(ctx.api.link_task(&id, &note_id)?)
            }
            TaskCommands::Unlink { id } => print_result(ctx.api.unlink_task(&id)?),
            TaskCommands::Delete { id } => print_result(ctx.api.delete_task(&id)?),
        },
        Commands::Search { term } => handle_search(&mut ctx, term.join(" ")),
        Commands::Where => handle_where(&mut ctx),
        Commands::Migrate { to } => print_result(ctx.api.migrate(to)?),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = std::env::var_os(HOME_ENV).map(PathBuf::from);
    let data_dir = StudyNavPaths::data_dir(home)?;

    let config = StudyNavConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        StudyNavConfig::default()
    });
    let env_backend = std::env::var(BACKEND_ENV).ok();
    let backend: Backend = config.effective_backend(cli.backend, env_backend.as_deref())?;

    let paths = StudyNavPaths::resolve(data_dir, &config);
    debug!(backend = %backend, data_dir = %paths.data_dir.display(), "opening stores");

    let api = StudyNavApi::open(paths, backend)?;
    Ok(AppContext { api })
}

fn print_result(result: CmdResult) -> Result<()> {
    print_messages(&result.messages);
    Ok(())
}

fn handle_note_add(
    ctx: &mut AppContext,
    title: String,
    body: String,
    tags: Vec<String>,
) -> Result<()> {
    let result = ctx.api.add_note(&title, &body, &tags)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_note_list(ctx: &mut AppContext, tag: Option<String>) -> Result<()> {
    let result = ctx.api.list_notes(tag)?;
    print_notes(&result.notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_note_show(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.show_note(&id)?;
    print_full_notes(&result.notes);
    Ok(())
}

fn handle_note_append(ctx: &mut AppContext, id: String, text: String) -> Result<()> {
    let result = ctx.api.append_note(&id, &text)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_note_tag(ctx: &mut AppContext, id: String, tags: Vec<String>) -> Result<()> {
    let result = ctx.api.tag_note(&id, &tags)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_task_add(ctx: &mut AppContext, args: TaskAddArgs) -> Result<()> {
    let draft = TaskDraft {
        title: args.title.join(" "),
        description: args.description,
        priority: args.prio,
        due_date: args.due.as_deref().map(parse_due).transpose()?,
        linked_note_id: args.note,
    };
    let result = ctx.api.add_task(draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_task_list(
    ctx: &mut AppContext,
    status: Option<String>,
    due_before: Option<String>,
    note: Option<String>,
) -> Result<()> {
    let result = ctx
        .api
        .list_tasks(status.as_deref(), due_before.as_deref(), note)?;
    print_tasks(&result.tasks);
    print_messages(&result.messages);
    Ok(())
}

fn handle_task_show(ctx: &mut AppContext, id: String) -> Result<()> {
    let result = ctx.api.show_task(&id)?;
    print_full_tasks(&result.tasks);
    Ok(())
}

fn handle_search(ctx: &mut AppContext, term: String) -> Result<()> {
    let result = ctx.api.search(&term)?;
    println!("Notes:");
    print_notes(&result.notes);
    println!();
    println!("Tasks:");
    print_tasks(&result.tasks);
    print_messages(&result.messages);
    Ok(())
}

fn handle_where(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.paths_info()?;
    println!("backend  {}", ctx.api.backend());
    print_locations(&result.locations);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
