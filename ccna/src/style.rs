//! ANSI colors for terminal output. Disabled when stdout is not a terminal
//! or `NO_COLOR` is set.

use std::io::IsTerminal;
use std::sync::LazyLock;

pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const BLUE: &str = "\x1b[34m";
pub(crate) const PURPLE: &str = "\x1b[35m";
pub(crate) const PURPLE_BOLD: &str = "\x1b[1;35m";
pub(crate) const CYAN: &str = "\x1b[36m";
pub(crate) const GRAY: &str = "\x1b[90m";
pub(crate) const RESET: &str = "\x1b[0m";

static ENABLED: LazyLock<bool> = LazyLock::new(|| {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
});

fn paint_with(enabled: bool, color: &str, text: &str) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub(crate) fn paint(color: &str, text: &str) -> String {
    paint_with(*ENABLED, color, text)
}

pub(crate) fn red(text: &str) -> String {
    paint(RED, text)
}
pub(crate) fn green(text: &str) -> String {
    paint(GREEN, text)
}
pub(crate) fn yellow(text: &str) -> String {
    paint(YELLOW, text)
}
pub(crate) fn blue(text: &str) -> String {
    paint(BLUE, text)
}
pub(crate) fn cyan(text: &str) -> String {
    paint(CYAN, text)
}
pub(crate) fn gray(text: &str) -> String {
    paint(GRAY, text)
}

/// A horizontal rule used to frame sections.
pub(crate) fn rule(width: usize) -> String {
    "=".repeat(width)
}
