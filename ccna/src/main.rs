use anyhow::Context;
use clap::Parser;
use config::ConfigStore;
use std::ffi::OsString;

mod catalog;
mod endpoint;
mod env;
mod launch;
mod prompt;
mod selector;
mod setup;
mod style;

use catalog::ModelCatalogClient;
use env::{EnvironmentMap, Platform};
use launch::LaunchOutcome;
use prompt::TerminalPrompter;

/// Configure and launch Claude Code against any compatible endpoint.
///
/// Built-in `--help` and `--version` are disabled so that those flags reach
/// claude unchanged.
#[derive(Debug, Parser)]
#[command(name = "ccna", disable_help_flag = true, disable_version_flag = true)]
struct Opt {
    /// `help`, `clear`, or arguments passed through to claude
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Clear,
    Launch { passthrough: Vec<OsString> },
}

/// `help` anywhere on the line wins, then `clear`. Everything else is
/// forwarded to claude untouched.
fn parse_command(args: Vec<OsString>) -> Command {
    if args.iter().any(|arg| arg == "help") {
        Command::Help
    } else if args.iter().any(|arg| arg == "clear") {
        Command::Clear
    } else {
        Command::Launch { passthrough: args }
    }
}

/// Resolves the full argv (program name first). clap validates the line, but
/// the passthrough is taken from the raw arguments so that a literal `--`
/// survives.
fn command_from_argv(argv: Vec<OsString>) -> Result<Command, clap::Error> {
    let opts = Opt::try_parse_from(&argv)?;
    Ok(match parse_command(opts.args) {
        Command::Launch { .. } => Command::Launch {
            passthrough: argv.into_iter().skip(1).collect(),
        },
        other => other,
    })
}

fn help_text(config_path: &str) -> Vec<String> {
    let mut lines = vec![
        style::blue("ccna - configure and launch Claude Code"),
        style::rule(40),
        String::new(),
        style::cyan("Usage:"),
        "  ccna               start with the saved configuration, or set one up first".to_string(),
        "  ccna clear         delete the saved configuration".to_string(),
        "  ccna help          show this help".to_string(),
        "  ccna [claude-args] start Claude Code and pass the arguments through".to_string(),
        String::new(),
        style::cyan("Examples:"),
        "  ccna               start normally".to_string(),
        "  ccna clear         clear the configuration and set it up again".to_string(),
        "  ccna --version     start Claude Code and print its version".to_string(),
        "  ccna my-project    start Claude Code on a project directory".to_string(),
        String::new(),
        style::cyan("Configuration file:"),
    ];
    lines.push(format!("  {config_path}"));
    lines
}

fn show_help() -> anyhow::Result<()> {
    let path = config::user_config_path()?;
    for line in help_text(&path.display().to_string()) {
        println!("{line}");
    }
    Ok(())
}

fn clear_config() -> anyhow::Result<()> {
    let store = ConfigStore::for_current_user()?;
    if store.clear()? {
        println!("{}", style::green("Configuration cleared"));
    } else {
        println!("{}", style::gray("No configuration to clear"));
    }
    println!("{}", style::yellow("Run ccna again to set it up"));
    Ok(())
}

fn print_environment(environment: &EnvironmentMap) {
    println!("\n{}", style::rule(60));
    println!("{}", style::green("Environment variables:"));
    println!("{}", style::rule(60));
    for line in environment.assignments() {
        println!("{}", style::cyan(&line));
    }
    println!("{}", style::rule(60));

    println!("{}", style::yellow("\nUsage:"));
    for hint in environment.usage_hints() {
        println!("{}", style::gray(&hint));
    }
}

fn start(passthrough: &[OsString]) -> anyhow::Result<()> {
    let store = ConfigStore::for_current_user()?;
    let source = ModelCatalogClient::new()?;
    let mut prompter = TerminalPrompter::new();
    let config = setup::prepare_config(&store, &source, &mut prompter)
        .context("configuration failed")?;

    print_environment(&env::render(&config, Platform::current()));

    println!("{}", style::yellow("\nStarting Claude Code..."));
    match launch::launch(&config, passthrough) {
        LaunchOutcome::Exited { program, status } => {
            log::debug!("{program} finished with {status}")
        }
        LaunchOutcome::WaitFailed { program, error } => {
            log::debug!("waiting for {program} failed: {error}")
        }
        LaunchOutcome::NotStarted(err) => log::debug!("claude was not started: {err}"),
    }
    Ok(())
}

fn terminate_with_error(err: anyhow::Error) -> ! {
    log::error!("{:#}; terminating", err);
    std::process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("CCNA_LOG", "warn"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run() {
        terminate_with_error(e);
    }
}

fn run() -> anyhow::Result<()> {
    let command = command_from_argv(std::env::args_os().collect()).unwrap_or_else(|e| e.exit());
    match command {
        Command::Help => show_help(),
        Command::Clear => clear_config(),
        Command::Launch { passthrough } => start(&passthrough),
    }
}
