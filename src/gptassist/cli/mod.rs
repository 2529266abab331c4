//! # CLI Layer
//!
//! This module is **one possible UI client** for gptassist; it is not the
//! application itself.
//!
//! It is the only place in the codebase that:
//! - Knows about terminal I/O (stdin, stdout, stderr)
//! - Parses process arguments
//! - Formats `CmdResult`s for humans
//!
//! ## Structure
//!
//! - [`setup`]: clap definitions, version string, tracing subscriber
//! - [`commands`]: `run()`, config discovery and session construction
//! - [`session`]: the interaction loop and per-command dispatch
//! - [`render`]: colored output of messages, status and listings

mod commands;
mod render;
mod session;
mod setup;

pub use commands::run;
