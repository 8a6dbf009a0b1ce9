//! Terminal capabilities for the current invocation
//!
//! `resolve -f plain` and `-f json` are meant to be piped, so decoration
//! follows stdout while prompting follows stdin. A CI marker turns both off.

use console::Term;
use std::io::IsTerminal;

/// Environment variables set by CI runners
const CI_MARKERS: &[&str] = &["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE"];

/// What the terminal can do for this run
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    decorated: bool,
    can_prompt: bool,
    assume_yes: bool,
}

impl UiContext {
    /// Inspect stdout, stdin and the environment
    pub fn detect() -> Self {
        let ci = CI_MARKERS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            decorated: !ci && Term::stdout().is_term(),
            can_prompt: !ci && std::io::stdin().is_terminal(),
            assume_yes: false,
        }
    }

    /// No decoration, no prompts
    pub fn plain() -> Self {
        Self {
            decorated: false,
            can_prompt: false,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes (`--yes`)
    pub fn assuming_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Symbols, colors and progress bars on stdout
    pub fn decorated(&self) -> bool {
        self.decorated
    }

    /// Whether a confirmation can be read from stdin
    pub fn can_prompt(&self) -> bool {
        self.can_prompt
    }

    pub fn assume_yes(&self) -> bool {
        self.assume_yes
    }
}
