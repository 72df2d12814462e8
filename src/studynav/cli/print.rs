use chrono::{DateTime, NaiveDate, Utc};
use colored::{ColoredString, Colorize};
use studynav::commands::{CmdMessage, Location, MessageLevel};
use studynav::config::StudyNavConfig;
use studynav::model::{Note, Task, TaskStatus};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 6;
const DUE_WIDTH: usize = 11;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let id_width = id_column_width(notes.iter().map(|n| n.id.as_str()));
    for note in notes {
        let tags = if note.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", note.tags.join(", "))
        };
        let fixed = id_width + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&format!("{}{}", note.title, tags), available);
        let padding = available.saturating_sub(title.width());

        println!(
            "{} {}{}{}",
            format!("{:<id_width$}", note.id, id_width = id_width).yellow(),
            title,
            " ".repeat(padding),
            format_time_ago(note.updated_at).dimmed()
        );
    }
}

pub(super) fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let id_width = id_column_width(tasks.iter().map(|t| t.id.as_str()));
    for task in tasks {
        let due = task.due_date.map(format_date).unwrap_or_default();
        let fixed = id_width + 1 + STATUS_WIDTH + 1 + 3 + DUE_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&task.title, available);

        println!(
            "{} {} {} {:<due_width$}{}",
            format!("{:<id_width$}", task.id, id_width = id_width).yellow(),
            status_label(task.status),
            format!("P{}", task.priority).cyan(),
            due,
            title,
            due_width = DUE_WIDTH
        );
    }
}

pub(super) fn print_full_notes(notes: &[Note]) {
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", note.id.yellow(), note.title.bold());
        if !note.tags.is_empty() {
            println!("{} {}", "tags:".dimmed(), note.tags.join(", "));
        }
        println!(
            "{} {}  {} {}",
            "created:".dimmed(),
            format_timestamp(note.created_at),
            "updated:".dimmed(),
            format_timestamp(note.updated_at)
        );
        println!("--------------------------------");
        println!("{}", note.body);
    }
}

pub(super) fn print_full_tasks(tasks: &[Task]) {
    for (i, task) in tasks.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", task.id.yellow(), task.title.bold());
        println!(
            "{} {}  {} {}",
            "status:".dimmed(),
            status_label(task.status),
            "priority:".dimmed(),
            task.priority
        );
        if let Some(due) = task.due_date {
            println!("{} {}", "due:".dimmed(), format_date(due));
        }
        if let Some(note_id) = &task.linked_note_id {
            println!("{} {}", "note:".dimmed(), note_id);
        }
        println!(
            "{} {}  {} {}",
            "created:".dimmed(),
            format_timestamp(task.created_at),
            "updated:".dimmed(),
            format_timestamp(task.updated_at)
        );
        if !task.description.is_empty() {
            println!("--------------------------------");
            println!("{}", task.description);
        }
    }
}

pub(super) fn print_locations(locations: &[Location]) {
    let width = locations.iter().map(|l| l.label.width()).max().unwrap_or(0);
    for location in locations {
        println!(
            "{:<width$}  {}",
            location.label,
            location.path.display(),
            width = width
        );
    }
}

pub(super) fn print_config(config: &StudyNavConfig) {
    for key in StudyNavConfig::keys() {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
}

fn status_label(status: TaskStatus) -> ColoredString {
    let label = format!("{:<width$}", status.as_str(), width = STATUS_WIDTH);
    match status {
        TaskStatus::Todo => label.normal(),
        TaskStatus::Doing => label.blue(),
        TaskStatus::Done => label.green(),
    }
}

fn id_column_width<'a>(ids: impl Iterator<Item = &'a str>) -> usize {
    ids.map(|id| id.width()).max().unwrap_or(0)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
