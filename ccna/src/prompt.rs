//! Interactive questions.
//!
//! The configuration flow only talks to the [`Prompter`] trait, so the
//! selection logic can be driven by a script in tests. [`TerminalPrompter`]
//! is the crossterm implementation used by the binary.

use crate::style::{self, GRAY, PURPLE, PURPLE_BOLD, RESET};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("cancelled by user")]
    Cancelled,
    #[error("nothing to choose from")]
    NoChoices,
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

pub trait Prompter {
    /// Free text. An empty answer yields `default` when there is one.
    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Text that is not echoed.
    fn password(&mut self, message: &str) -> Result<String, PromptError>;

    /// Returns the index of the picked entry in `choices`.
    fn select(
        &mut self,
        message: &str,
        choices: &[Choice],
        default: usize,
    ) -> Result<usize, PromptError>;

    /// Shown when an answer was rejected, before the question is repeated.
    fn warn(&mut self, message: &str);
}

/// Asks until a non-blank answer is given. The answer is trimmed.
pub fn required_input(
    prompter: &mut dyn Prompter,
    message: &str,
    default: Option<&str>,
    empty_message: &str,
) -> Result<String, PromptError> {
    loop {
        let answer = prompter.input(message, default)?;
        if let Some(answer) = non_blank(answer) {
            return Ok(answer);
        }
        prompter.warn(empty_message);
    }
}

/// Hidden-input variant of [`required_input`].
pub fn required_password(
    prompter: &mut dyn Prompter,
    message: &str,
    empty_message: &str,
) -> Result<String, PromptError> {
    loop {
        let answer = prompter.password(message)?;
        if let Some(answer) = non_blank(answer) {
            return Ok(answer);
        }
        prompter.warn(empty_message);
    }
}

fn non_blank(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Restores the terminal however the prompt ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show);
        let _ = disable_raw_mode();
    }
}

fn is_cancel(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Esc)
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

/// AltGr arrives as CONTROL|ALT on Windows and still produces a character.
fn can_type(modifiers: KeyModifiers) -> bool {
    let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    modifiers == altgr
        || !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

fn page_size_for(rows: u16) -> usize {
    usize::from(rows).saturating_sub(4).clamp(3, 15)
}

/// First and one-past-last index of the visible slice, keeping `selected`
/// near the middle when the list is longer than a page.
fn page_window(len: usize, selected: usize, page: usize) -> (usize, usize) {
    if len <= page {
        return (0, len);
    }
    let start = selected.saturating_sub(page / 2).min(len - page);
    (start, start + page)
}

fn truncate_to_width(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut out: String = label.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn question(message: &str, hint: Option<&str>) -> String {
        let mut out = format!("{} {message}", style::paint(PURPLE_BOLD, "?"));
        if let Some(hint) = hint {
            out.push(' ');
            out.push_str(&style::gray(&format!("({hint})")));
        }
        out
    }

    fn read_line(
        &mut self,
        message: &str,
        default: Option<&str>,
        masked: bool,
    ) -> Result<String, PromptError> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", Self::question(message, default))?;
        stdout.flush()?;

        let mut answer = String::new();
        {
            let _raw = RawModeGuard::enable()?;
            loop {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if is_cancel(key.code, key.modifiers) {
                    write!(stdout, "\r\n")?;
                    return Err(PromptError::Cancelled);
                }
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Backspace => {
                        if answer.pop().is_some() {
                            write!(stdout, "\x08 \x08")?;
                        }
                    }
                    KeyCode::Char(c) if can_type(key.modifiers) => {
                        answer.push(c);
                        if masked {
                            write!(stdout, "*")?;
                        } else {
                            write!(stdout, "{c}")?;
                        }
                    }
                    _ => {}
                }
                stdout.flush()?;
            }
            write!(stdout, "\r\n")?;
            stdout.flush()?;
        }

        match default {
            Some(default) if answer.trim().is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn render_choices(
        stdout: &mut io::Stdout,
        choices: &[Choice],
        selected: usize,
        page: usize,
        width: usize,
    ) -> io::Result<u16> {
        let (start, end) = page_window(choices.len(), selected, page);
        let mut lines = 0u16;
        for (idx, choice) in choices.iter().enumerate().take(end).skip(start) {
            let label = truncate_to_width(&choice.label, width.saturating_sub(4));
            if idx == selected {
                write!(stdout, " {PURPLE}▸{RESET} {PURPLE_BOLD}{label}{RESET}\r\n")?;
            } else {
                write!(stdout, "   {label}\r\n")?;
            }
            lines += 1;
        }
        if choices.len() > page {
            write!(
                stdout,
                "{GRAY}   ({}/{}, use ↑/↓ and Enter){RESET}\r\n",
                selected + 1,
                choices.len()
            )?;
            lines += 1;
        }
        stdout.flush()?;
        Ok(lines)
    }

    fn erase_lines(stdout: &mut io::Stdout, lines: u16) -> io::Result<()> {
        queue!(stdout, cursor::MoveToColumn(0))?;
        if lines > 0 {
            queue!(stdout, cursor::MoveUp(lines))?;
        }
        queue!(stdout, Clear(ClearType::FromCursorDown))?;
        Ok(())
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.read_line(message, default, false)
    }

    fn password(&mut self, message: &str) -> Result<String, PromptError> {
        self.read_line(message, None, true)
    }

    fn select(
        &mut self,
        message: &str,
        choices: &[Choice],
        default: usize,
    ) -> Result<usize, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices);
        }
        let last = choices.len() - 1;
        let mut selected = default.min(last);
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        let page = page_size_for(rows);
        let width = usize::from(cols);

        let mut stdout = io::stdout();
        write!(stdout, "{}\r\n", Self::question(message, None))?;

        let _raw = RawModeGuard::enable()?;
        queue!(stdout, cursor::Hide)?;
        let mut drawn = Self::render_choices(&mut stdout, choices, selected, page, width)?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_cancel(key.code, key.modifiers) {
                Self::erase_lines(&mut stdout, drawn)?;
                stdout.flush()?;
                return Err(PromptError::Cancelled);
            }
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = selected.checked_sub(1).unwrap_or(last);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    selected = if selected == last { 0 } else { selected + 1 };
                }
                KeyCode::PageUp => selected = selected.saturating_sub(page),
                KeyCode::PageDown => selected = (selected + page).min(last),
                KeyCode::Home => selected = 0,
                KeyCode::End => selected = last,
                KeyCode::Enter => break,
                _ => continue,
            }
            Self::erase_lines(&mut stdout, drawn)?;
            drawn = Self::render_choices(&mut stdout, choices, selected, page, width)?;
        }

        Self::erase_lines(&mut stdout, drawn)?;
        write!(
            stdout,
            "  {}\r\n",
            style::cyan(&truncate_to_width(&choices[selected].label, width.saturating_sub(4)))
        )?;
        stdout.flush()?;
        Ok(selected)
    }

    fn warn(&mut self, message: &str) {
        println!("{}", style::red(message));
    }
}
