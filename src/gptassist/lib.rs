//! # GPT Assist Architecture
//!
//! GPT Assist packs a project's directory tree, file contents and reference
//! URLs into prompts for a chat model, and remembers what it already sent so
//! later prompts carry only what changed. The library is UI-agnostic; the
//! `gpta` binary is one interactive client on top of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Flags, config discovery, tracing setup                   │
//! │  - The interaction loop and shell passthrough               │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Resolution (catalog.rs)                                    │
//! │  - Input line → key/value map → catalog command             │
//! │  - Optional resolution log                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the session state, collects content on demand       │
//! │  - Returns structured Result<CmdResult>                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Watch-list edits, prompts, listings, save/load           │
//! │  - Pure functions over ProjectState and a Collection        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core + Storage (collect, prompt, fingerprint, store/)      │
//! │  - Directory walking, prompt text, SHA-256 digests          │
//! │  - StateBackend: FileBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Seen-set
//!
//! Every piece that goes into a prompt (the tree text, each fenced file, each
//! URL) is fingerprinted. `update` records the current fingerprints; the
//! update prompt then leaves out anything whose fingerprint is recorded. The
//! set only grows during a session and survives save/load.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. The outside world is reached only through the
//! [`store::StateBackend`], [`clipboard::ClipboardSink`] and
//! [`shell::ShellRunner`] seams, each with an in-memory or host
//! implementation.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Command catalog, input resolution and the resolution log
//! - [`collect`]: Directory walking, ignore patterns, tree rendering
//! - [`prompt`]: First and update prompt text
//! - [`fingerprint`]: Content digests
//! - [`model`]: `Context` and `ProjectState`
//! - [`store`]: Persistence abstraction and implementations
//! - [`config`]: Startup configuration
//! - [`clipboard`]: Cross-platform clipboard support
//! - [`shell`]: Host command passthrough
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod clipboard;
pub mod collect;
pub mod commands;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod prompt;
pub mod shell;
pub mod store;
