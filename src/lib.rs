// src/lib.rs — Library root for the Knowledge Copilot client

pub mod cli;
pub mod client;
pub mod dashboard;
pub mod files;
pub mod format;
pub mod infra;
pub mod session;
pub mod tui;
