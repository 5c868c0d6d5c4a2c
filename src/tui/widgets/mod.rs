// src/tui/widgets/mod.rs — Panels of the dashboard.

pub mod chat;
pub mod documents;
pub mod input;
