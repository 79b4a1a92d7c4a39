//! Tandem CLI Library
//!
//! Terminal client commands run after startup resolution: pairing
//! (`auth`), configuration display (`config`) and the sync daemon
//! (`daemon`). Interactive prompts live in `tui` (state + input) and `ui`
//! (ratatui drawing).

pub mod auth_cmd;
pub mod config_cmd;
pub mod daemon_cmd;
pub mod tui;
pub mod ui;
