//! Markdown record files with a frontmatter header.
//!
//! ```text
//! ---
//! id: 3
//! title: "Write report"
//! description: "Draft \"results\" section"
//! completed: false
//! created_at: "2025-10-17T09:15:00Z"
//! ---
//!
//! # Write report
//!
//! Draft "results" section
//! ```
//!
//! Header values are written double-quoted with backslash escapes, so a value
//! can never span lines and can never forge a `---` line. Bare values are read
//! verbatim, which keeps hand-edited and older files readable.
//!
//! Reading never fails. A file without a header yields default fields, an
//! unknown key is ignored, a malformed value falls back to the field default,
//! and a header whose closing `---` is missing ends at the first line that is
//! not a `key: value` pair so the body is not swallowed. A `---` only closes
//! the header when nothing but header lines precede it; a rule further down
//! the body does not count.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::warn;

use crate::model::{
    clamp_priority, parse_date, parse_timestamp, Note, Record, Task, TaskStatus, DEFAULT_PRIORITY,
};

pub const DELIMITER: &str = "---";
const NULL: &str = "null";

/// Ordered `key: value` pairs of a header block. Values are kept raw
/// (quotes and escapes intact) and decoded by the typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Raw value of `key`. A repeated key resolves to its last occurrence.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.raw(key).map(decode_scalar)
    }

    /// `null` or an empty bare value mean absent; any quoted value is present.
    pub fn optional_string(&self, key: &str) -> Option<String> {
        let raw = self.raw(key)?;
        if raw.is_empty() || raw == NULL || raw == "~" {
            return None;
        }
        Some(decode_scalar(raw))
    }

    /// Anything other than a case-insensitive `true` reads as false.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.string(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.string(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.optional_string(key).and_then(|v| parse_date(&v))
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.optional_string(key).and_then(|v| parse_timestamp(&v))
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.raw(key).map(decode_list)
    }

    fn push_raw(&mut self, key: &str, raw: String) {
        self.entries.push((key.to_string(), raw));
    }

    pub fn push_str(&mut self, key: &str, value: &str) {
        self.push_raw(key, quote(value));
    }

    pub fn push_optional_str(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(v) => self.push_str(key, v),
            None => self.push_raw(key, NULL.to_string()),
        }
    }

    pub fn push_bool(&mut self, key: &str, value: bool) {
        self.push_raw(key, value.to_string());
    }

    pub fn push_int(&mut self, key: &str, value: i64) {
        self.push_raw(key, value.to_string());
    }

    pub fn push_date(&mut self, key: &str, value: Option<NaiveDate>) {
        let raw = match value {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => NULL.to_string(),
        };
        self.push_raw(key, raw);
    }

    pub fn push_timestamp(&mut self, key: &str, value: DateTime<Utc>) {
        self.push_str(key, &value.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }

    pub fn push_list(&mut self, key: &str, values: &[String]) {
        let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
        self.push_raw(key, format!("[{}]", items.join(", ")));
    }

    /// The header block including both delimiter lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(DELIMITER);
        out.push('\n');
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

/// A parsed record file: header, optional heading line and body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub heading: Option<String>,
    pub body: String,
}

/// How a record kind maps onto a [`Document`].
pub trait MarkdownRecord: Record {
    fn write_frontmatter(&self, frontmatter: &mut Frontmatter);

    /// Text placed under the heading.
    fn body_text(&self) -> &str;

    fn from_document(doc: &Document) -> Self;
}

pub fn encode<R: MarkdownRecord>(record: &R) -> String {
    let mut frontmatter = Frontmatter::new();
    record.write_frontmatter(&mut frontmatter);

    let heading = record.title().replace(['\r', '\n'], " ");
    let mut out = frontmatter.render();
    out.push('\n');
    out.push_str("# ");
    out.push_str(&heading);
    out.push('\n');

    let body = record.body_text();
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    out
}

pub fn decode<R: MarkdownRecord>(content: &str) -> R {
    R::from_document(&parse_document(content))
}

pub fn parse_document(content: &str) -> Document {
    let mut doc = Document::default();
    let mut rest = content;

    if let Some((first, after_open)) = next_line(content) {
        if first.trim() == DELIMITER {
            rest = if has_closing_delimiter(after_open) {
                read_closed_header(after_open, &mut doc.frontmatter)
            } else {
                warn!("frontmatter has no closing delimiter; header ends at first non key-value line");
                read_open_header(after_open, &mut doc.frontmatter)
            };
        }
    }

    let mut rest = strip_blank_line(rest);
    if let Some((line, after)) = next_line(rest) {
        if line == "#" || line.starts_with("# ") {
            doc.heading = Some(line[1..].trim().to_string());
            rest = strip_blank_line(after);
        }
    }
    doc.body = rest.strip_suffix('\n').unwrap_or(rest).to_string();
    doc
}

/// Split off the first line. The returned line has its `\n` / `\r\n` removed.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    let (line, rest) = match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    };
    Some((line.strip_suffix('\r').unwrap_or(line), rest))
}

fn strip_blank_line(text: &str) -> &str {
    text.strip_prefix('\n')
        .or_else(|| text.strip_prefix("\r\n"))
        .unwrap_or(text)
}

/// A `---` closes the header only when every line before it looks like header
/// content: a `key: value` pair, a `#` comment or an indented continuation. A
/// blank line or prose in between means the `---` belongs to the body.
fn has_closing_delimiter(text: &str) -> bool {
    for line in text.lines() {
        if line.trim() == DELIMITER {
            return true;
        }
        let header_shaped = split_pair(line).is_some()
            || line.trim_start().starts_with('#')
            || (line.starts_with([' ', '\t']) && !line.trim().is_empty());
        if !header_shaped {
            return false;
        }
    }
    false
}

fn read_closed_header<'a>(mut text: &'a str, frontmatter: &mut Frontmatter) -> &'a str {
    while let Some((line, after)) = next_line(text) {
        text = after;
        if line.trim() == DELIMITER {
            break;
        }
        if let Some((key, value)) = split_pair(line) {
            frontmatter.push_raw(key, value.to_string());
        }
    }
    text
}

fn read_open_header<'a>(mut text: &'a str, frontmatter: &mut Frontmatter) -> &'a str {
    while let Some((line, after)) = next_line(text) {
        match split_pair(line) {
            Some((key, value)) => {
                frontmatter.push_raw(key, value.to_string());
                text = after;
            }
            None => break,
        }
    }
    text
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| (key, value.trim()))
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn decode_scalar(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape(&raw[1..raw.len() - 1]);
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].replace("''", "'");
    }
    raw.to_string()
}

/// `["a", "b"]`, or a bare comma-separated `a, b`.
fn decode_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let inner = match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        Some(inner) => inner,
        None => raw,
    };

    let mut items = Vec::new();
    let mut chars = inner.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
            continue;
        }
        if c == '"' {
            chars.next();
            let mut value = String::new();
            let mut escaped = false;
            for (_, c) in chars.by_ref() {
                if escaped {
                    value.push('\\');
                    value.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    break;
                } else {
                    value.push(c);
                }
            }
            items.push(unescape(&value));
        } else {
            let mut end = inner.len();
            while let Some(&(idx, c)) = chars.peek() {
                if c == ',' {
                    end = idx;
                    break;
                }
                chars.next();
            }
            let item = decode_scalar(&inner[start..end]);
            if !item.is_empty() {
                items.push(item);
            }
        }
    }
    items
}

impl MarkdownRecord for Note {
    fn write_frontmatter(&self, fm: &mut Frontmatter) {
        fm.push_str("id", &self.id);
        fm.push_str("title", &self.title);
        fm.push_list("tags", &self.tags);
        fm.push_timestamp("created_at", self.created_at);
        fm.push_timestamp("updated_at", self.updated_at);
    }

    fn body_text(&self) -> &str {
        &self.body
    }

    fn from_document(doc: &Document) -> Self {
        let fm = &doc.frontmatter;
        let created_at = fm.timestamp("created_at").unwrap_or_default();
        Note {
            id: fm.string("id").unwrap_or_default(),
            title: fm
                .string("title")
                .or_else(|| doc.heading.clone())
                .unwrap_or_default(),
            body: doc.body.clone(),
            tags: fm.list("tags").unwrap_or_default(),
            created_at,
            updated_at: fm.timestamp("updated_at").unwrap_or(created_at),
        }
    }
}

impl MarkdownRecord for Task {
    fn write_frontmatter(&self, fm: &mut Frontmatter) {
        fm.push_str("id", &self.id);
        fm.push_str("title", &self.title);
        fm.push_str("description", &self.description);
        fm.push_bool("completed", self.is_done());
        fm.push_timestamp("created_at", self.created_at);
        fm.push_str("status", self.status.as_str());
        fm.push_int("priority", self.priority as i64);
        fm.push_date("due_date", self.due_date);
        fm.push_optional_str("note_id", self.linked_note_id.as_deref());
        fm.push_timestamp("updated_at", self.updated_at);
    }

    fn body_text(&self) -> &str {
        &self.description
    }

    fn from_document(doc: &Document) -> Self {
        let fm = &doc.frontmatter;

        let status = fm
            .string("status")
            .and_then(|s| s.parse::<TaskStatus>().ok())
            .unwrap_or(if fm.boolean("completed").unwrap_or(false) {
                TaskStatus::Done
            } else {
                TaskStatus::Todo
            });

        let created_at = fm.timestamp("created_at").unwrap_or_default();
        Task {
            id: fm.string("id").unwrap_or_default(),
            title: fm
                .string("title")
                .or_else(|| doc.heading.clone())
                .unwrap_or_default(),
            description: fm
                .string("description")
                .unwrap_or_else(|| doc.body.clone()),
            status,
            priority: fm
                .integer("priority")
                .map(clamp_priority)
                .unwrap_or(DEFAULT_PRIORITY),
            due_date: fm.date("due_date"),
            linked_note_id: fm
                .optional_string("note_id")
                .or_else(|| fm.optional_string("linked_note_id")),
            created_at,
            updated_at: fm.timestamp("updated_at").unwrap_or(created_at),
        }
    }
}
