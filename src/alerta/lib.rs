//! # Alerta Architecture
//!
//! Alerta is a **UI-agnostic library** for a fire-department dispatch center:
//! the occurrence feed, the occurrence list and details, the operational
//! dashboard, occurrence registration, the audit log and the user profile.
//! The command-line client in `main.rs` is one consumer of it.
//!
//! ## The Three-Layer Architecture
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
//! │  - Supplies catalog, display offset, page size and "now"    │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per view                                    │
//! │  - fetch → normalize → filter → partition/page → CmdResult  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Source Layer (source/)                                     │
//! │  - Abstract RecordSource trait                              │
//! │  - HttpSource, FileSource (production), MemorySource (test) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Derivation Pipeline
//!
//! Every view is the same pipeline with different parameters:
//!
//! 1. [`normalize`]: raw JSON shapes become closed [`model`] records; records
//!    that cannot be trusted are rejected and reported, never coerced
//! 2. [`filter`]: the view's filter bar compiles into a predicate set
//! 3. [`pipeline`]: filter, then stable partition into the view's buckets
//! 4. [`pager`]: fixed-size pages over the ordered result
//! 5. [`export`]: the same rows as semicolon-delimited text
//!
//! Each view only picks its filter dimensions, visible buckets and columns.
//! Stages are pure and recomputed per request.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, pipeline), code:
//! - Takes regular Rust function arguments, including the current time
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! The only I/O is one fetch per view through a [`source::RecordSource`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all views
//! - [`commands`]: One module per view
//! - [`source`]: Record source abstraction and implementations
//! - [`model`]: Canonical records (`Occurrence`, `LogEntry`, `Profile`)
//! - [`catalog`]: Occurrence types and their subtypes
//! - [`normalize`], [`filter`], [`pipeline`], [`pager`], [`export`]: the pipeline stages
//! - [`selector`]: Type → subtype dependent selection for registration
//! - [`metrics`]: Audit and dashboard summary counts
//! - [`config`]: Configuration management
//! - [`session`]: The explicit authenticated session
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod pager;
pub mod pipeline;
pub mod selector;
pub mod session;
pub mod source;
