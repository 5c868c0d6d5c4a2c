// src/tui/mod.rs — Full-screen dashboard.
//
// Chat pane, documents sidebar and input box over the same `Dashboard`
// controller the REPL uses. Launch via `kcopilot dashboard`.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::run_dashboard;
