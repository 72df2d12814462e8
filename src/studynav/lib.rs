//! # StudyNav Architecture
//!
//! StudyNav keeps study notes and tasks in plain files you can read, grep and
//! edit by hand. It is a library with a CLI client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses raw filter input (status names, dates)            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) + Query Layer (query.rs)     │
//! │  - Validation, mutations, filters, sort orders, search      │
//! │  - Turns missing records into NotFound                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/) + Codec (codec/) + Ids (ids.rs)     │
//! │  - RecordStore trait                                        │
//! │  - JsonStore, MarkdownStore (production), MemoryStore       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Backends, One Contract
//!
//! The JSON backend keeps each record kind in one collection file and hands
//! out timestamp tokens (`t_20251017_091500_3fa2c1`). The Markdown backend
//! keeps one Obsidian-style file per record and hands out small integers
//! (`3-write-report.md`). Both implement [`store::RecordStore`]; everything
//! above the storage layer is written once against that trait.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never prints and never exits. Diagnostics are
//! `tracing` events; the binary decides whether and where they are shown.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`query`]: Filters, sort orders and search
//! - [`store`]: Storage contract and backends
//! - [`codec`]: JSON and Markdown encodings
//! - [`ids`]: Identifier generation
//! - [`model`]: `Note`, `Task` and friends
//! - [`config`]: Configuration management
//! - [`logging`]: Subscriber setup for the binary
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;
