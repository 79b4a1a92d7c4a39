//! Authentication method selector.
//!
//! Pure state machine: events come in through [`AuthSelector::handle`], and at
//! most one terminal [`SelectorOutcome`] ever comes out. Key mapping lives in
//! `auth_input`, drawing in `ui::auth_prompt`.

use std::fmt;

/// How the terminal gets paired with the user's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Scan/enter a code in the mobile app.
    Mobile,
    /// Open a pairing URL in a web browser.
    Web,
}

impl AuthMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile App",
            Self::Web => "Web Browser",
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Input to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    Up,
    Down,
    Confirm,
    /// Escape or interrupt.
    Cancel,
    /// A typed character; `'1'` and `'2'` select and confirm.
    Shortcut(char),
}

/// Terminal result of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorOutcome {
    Selected(AuthMethod),
    Cancelled,
}

pub const HINT_WITH_WEB: &str = "Use arrows or 1-2 to select, Enter to confirm";
pub const HINT_MOBILE_ONLY: &str = "Press Enter to confirm";

/// State for one "How would you like to authenticate?" prompt.
#[derive(Debug, Clone)]
pub struct AuthSelector {
    options: Vec<AuthMethod>,
    selected: usize,
    outcome: Option<SelectorOutcome>,
}

impl AuthSelector {
    /// Mobile is always offered first; web only when `supports_web`.
    pub fn new(supports_web: bool) -> Self {
        Self {
            options: Self::options_for(supports_web),
            selected: 0,
            outcome: None,
        }
    }

    fn options_for(supports_web: bool) -> Vec<AuthMethod> {
        if supports_web {
            vec![AuthMethod::Mobile, AuthMethod::Web]
        } else {
            vec![AuthMethod::Mobile]
        }
    }

    pub fn options(&self) -> &[AuthMethod] {
        &self.options
    }

    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_method(&self) -> AuthMethod {
        self.options[self.selected]
    }

    pub fn supports_web(&self) -> bool {
        self.options.contains(&AuthMethod::Web)
    }

    pub const fn outcome(&self) -> Option<SelectorOutcome> {
        self.outcome
    }

    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Context line shown under the options.
    pub fn hint(&self) -> &'static str {
        if self.supports_web() {
            HINT_WITH_WEB
        } else {
            HINT_MOBILE_ONLY
        }
    }

    /// Change the web capability, clamping the selection if options shrink.
    pub fn set_web_supported(&mut self, supports_web: bool) {
        self.options = Self::options_for(supports_web);
        self.selected = self.selected.min(self.options.len() - 1);
    }

    /// Apply one event.
    ///
    /// Returns the outcome on the event that finishes the prompt and `None`
    /// otherwise. Once finished, further events are ignored.
    pub fn handle(&mut self, event: SelectorEvent) -> Option<SelectorOutcome> {
        if self.is_finished() {
            return None;
        }
        match event {
            SelectorEvent::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            SelectorEvent::Down => {
                self.selected = (self.selected + 1).min(self.options.len() - 1);
                None
            }
            SelectorEvent::Confirm => self.finish(SelectorOutcome::Selected(self.selected_method())),
            SelectorEvent::Cancel => self.finish(SelectorOutcome::Cancelled),
            SelectorEvent::Shortcut(c) => self.shortcut(c),
        }
    }

    fn shortcut(&mut self, c: char) -> Option<SelectorOutcome> {
        let method = match c {
            '1' => AuthMethod::Mobile,
            '2' => AuthMethod::Web,
            _ => return None,
        };
        let index = self.options.iter().position(|&m| m == method)?;
        self.selected = index;
        self.finish(SelectorOutcome::Selected(method))
    }

    fn finish(&mut self, outcome: SelectorOutcome) -> Option<SelectorOutcome> {
        self.outcome = Some(outcome);
        Some(outcome)
    }
}
