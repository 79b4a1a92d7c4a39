//! TUI rendering components.

mod auth_prompt;

pub use auth_prompt::{PROMPT_TITLE, draw_auth_selector};
