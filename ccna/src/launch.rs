//! Starting the coding assistant with the configured environment.

use crate::env::{self, EnvironmentMap, Platform};
use crate::style;
use config::Config;
use std::ffi::OsString;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

const POSIX_CANDIDATES: &[&str] = &["claude"];
const WINDOWS_CANDIDATES: &[&str] = &[
    "claude",
    "claude.cmd",
    "claude.exe",
    ".\\claude.cmd",
    ".\\claude.exe",
];

/// Executable names tried in order on `platform`.
pub fn launch_candidates(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Windows => WINDOWS_CANDIDATES,
        Platform::Mac | Platform::Linux => POSIX_CANDIDATES,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("no executable to try")]
    NoCandidates,
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
pub enum LaunchOutcome {
    /// The tool ran; its status is reported but not propagated.
    Exited { program: String, status: ExitStatus },
    WaitFailed { program: String, error: io::Error },
    /// Nothing could be spawned; manual instructions were printed.
    NotStarted(LaunchError),
}

/// Tries `candidates` in order and commits to the first one that `spawn`
/// accepts. Only errors returned by `spawn` itself move on to the next
/// candidate; whatever happens after a successful spawn is the caller's
/// business.
pub fn resolve_and_launch<T>(
    candidates: &[&str],
    mut spawn: impl FnMut(&str) -> io::Result<T>,
) -> Result<(String, T), LaunchError> {
    let mut last_error = None;
    for candidate in candidates {
        println!("{}", style::gray(&format!("Trying to start: {candidate}")));
        match spawn(candidate) {
            Ok(spawned) => return Ok((candidate.to_string(), spawned)),
            Err(source) => {
                log::debug!("spawning {candidate} failed: {source}");
                last_error = Some(LaunchError::Spawn {
                    program: candidate.to_string(),
                    source,
                });
            }
        }
    }
    Err(last_error.unwrap_or(LaunchError::NoCandidates))
}

/// Runs the coding assistant for the current platform and waits for it.
pub fn launch(config: &Config, extra_args: &[OsString]) -> LaunchOutcome {
    let platform = Platform::current();
    launch_with(
        launch_candidates(platform),
        &env::render(config, platform),
        extra_args,
    )
}

pub fn launch_with(
    candidates: &[&str],
    environment: &EnvironmentMap,
    extra_args: &[OsString],
) -> LaunchOutcome {
    let spawned = resolve_and_launch(candidates, |program| {
        Command::new(program)
            .args(extra_args)
            .envs(
                environment
                    .vars
                    .iter()
                    .map(|(name, value)| (*name, value.as_str())),
            )
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
    });

    let (program, mut child) = match spawned {
        Ok(spawned) => spawned,
        Err(err) => {
            print_manual_instructions(&err, environment);
            return LaunchOutcome::NotStarted(err);
        }
    };
    log::debug!("started {program} with pid {}", child.id());

    // The terminal belongs to the child now; let it handle ^C itself.
    let _interrupts = InterruptShield::new();
    match child.wait() {
        Ok(status) => {
            if !status.success() {
                eprintln!(
                    "{}",
                    style::red(&format!("Claude Code exited with {status}"))
                );
            }
            LaunchOutcome::Exited { program, status }
        }
        Err(error) => {
            eprintln!(
                "{}",
                style::red(&format!("Failed to wait for {program}: {error}"))
            );
            LaunchOutcome::WaitFailed { program, error }
        }
    }
}

fn print_manual_instructions(err: &LaunchError, environment: &EnvironmentMap) {
    eprintln!(
        "{}",
        style::red(&format!("Failed to start Claude Code: {err}"))
    );
    println!(
        "{}",
        style::yellow("Make sure Claude Code is installed and on your PATH.")
    );
    println!(
        "{}",
        style::yellow("\nSet these variables manually, then run claude:")
    );
    for line in environment.manual_fallback() {
        println!("{}", style::gray(&line));
    }
}

/// Keeps SIGINT and SIGQUIT from terminating the launcher while the child
/// runs in the foreground.
struct InterruptShield {
    #[cfg(unix)]
    ids: Vec<signal_hook::SigId>,
}

impl InterruptShield {
    #[cfg(unix)]
    fn new() -> Self {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let flag = Arc::new(AtomicBool::new(false));
        let ids = [signal_hook::consts::SIGINT, signal_hook::consts::SIGQUIT]
            .into_iter()
            .filter_map(|signal| match signal_hook::flag::register(signal, flag.clone()) {
                Ok(id) => Some(id),
                Err(err) => {
                    log::warn!("unable to register handler for signal {signal}: {err}");
                    None
                }
            })
            .collect();
        Self { ids }
    }

    #[cfg(not(unix))]
    fn new() -> Self {
        Self {}
    }
}

impl Drop for InterruptShield {
    fn drop(&mut self) {
        #[cfg(unix)]
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}
