//! ttydialog - ask one question on the terminal
//!
//! Paints a bordered panel, reads a single line and prints the answer on
//! stdout, so shell scripts can prompt an operator for a menu choice or PIN.
//! The panel itself is drawn on stderr, so `choice=$(ttydialog ...)` captures
//! only the answer while the operator still sees the dialog.
//!
//! # Quick Start
//!
//! ```text
//! ttydialog -t Menu -l "Status: OK" -p "Choice:"       # plain answer
//! ttydialog -t "PIN Entry" -p "Enter PIN:" -e '*'     # masked PIN
//! ttydialog -m "Changing run state failed." --hold 3  # message only
//! ```
//!
//! # Exit status
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 0 | Answer printed on stdout |
//! | 1 | Bad arguments or terminal failure |
//! | 2 | No key arrived before the timeout |

use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ttydialog::config::{self, refresh_to_tenths};
use ttydialog::{Backend, Config, CrosstermBackend, EchoMode, Panel, PromptPlacement, Response, Session};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

const EXIT_CONFIG: i32 = 1;
const EXIT_TIMEOUT: i32 = 2;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    title: String,
    lines: Vec<String>,
    prompt: Option<String>,
    echo: EchoMode,
    /// Overrides `prompt_at_bottom` from config.toml
    placement: Option<PromptPlacement>,
    timeout_secs: Option<f64>,
    /// Show this text instead of asking anything
    message: Option<String>,
    hold_secs: Option<f64>,
}

/// What a run ended with
#[derive(Debug, PartialEq)]
enum Outcome {
    Answered(String),
    TimedOut,
    Shown,
}

fn print_version() {
    eprintln!("ttydialog {}", VERSION);
}

fn print_help() {
    eprintln!("ttydialog {} - single-line prompt dialogs on a raw terminal", VERSION);
    eprintln!();
    eprintln!("Usage: ttydialog [OPTIONS] -p <PROMPT>");
    eprintln!("       ttydialog [OPTIONS] -m <TEXT>");
    eprintln!();
    eprintln!("Panel options:");
    eprintln!("  -t, --title <TEXT>    Title shown centered in bold");
    eprintln!("  -l, --line <TEXT>     Informational line (repeatable)");
    eprintln!("  -p, --prompt <TEXT>   Prompt in front of the input field");
    eprintln!("  -b, --bottom          Prompt on the last row inside the border");
    eprintln!("  -i, --inline          Prompt right after the last line");
    eprintln!();
    eprintln!("Input options:");
    eprintln!("  -e, --echo <MODE>     'On' shows typing, '*' masks it (default: On)");
    eprintln!("  -T, --timeout <SECS>  Give up after SECS without a key (5-25)");
    eprintln!();
    eprintln!("Message options:");
    eprintln!("  -m, --message <TEXT>  Show TEXT instead of asking");
    eprintln!("  --hold <SECS>         How long the message stays up (default: 2)");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Editing keys:");
    eprintln!("  Left/Right            Move one column");
    eprintln!("  Home/End              Start/end of the answer");
    eprintln!("  Backspace/Delete      Remove before/at the cursor");
    eprintln!("  Enter                 Accept");
    eprintln!();
    eprintln!("Exit status: 0 answered, 1 error, 2 timed out");
    eprintln!();
    eprintln!("Configuration: ~/.ttydialog/config.toml");
}

fn next_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn parse_secs(value: &str, flag: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(format!("Invalid number of seconds for {}: {}", flag, value)),
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-t" | "--title" => {
                options.title = next_value(args, &mut i, flag)?;
            }
            "-l" | "--line" => {
                options.lines.push(next_value(args, &mut i, flag)?);
            }
            "-p" | "--prompt" => {
                options.prompt = Some(next_value(args, &mut i, flag)?);
            }
            "-e" | "--echo" => {
                let value = next_value(args, &mut i, flag)?;
                options.echo = value.parse().map_err(|e| format!("{}", e))?;
            }
            "-b" | "--bottom" => {
                options.placement = Some(PromptPlacement::Bottom);
            }
            "-i" | "--inline" => {
                options.placement = Some(PromptPlacement::BelowLines);
            }
            "-T" | "--timeout" => {
                let value = next_value(args, &mut i, flag)?;
                options.timeout_secs = Some(parse_secs(&value, flag)?);
            }
            "-m" | "--message" => {
                options.message = Some(next_value(args, &mut i, flag)?);
            }
            "--hold" => {
                let value = next_value(args, &mut i, flag)?;
                options.hold_secs = Some(parse_secs(&value, flag)?);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    if options.prompt.is_none() && options.message.is_none() {
        return Err("Missing --prompt (or --message)".to_string());
    }

    Ok(options)
}

/// Read timeout in tenths; the command line wins over config.toml.
fn timeout_tenths(options: &Options, config: &Config) -> Option<u8> {
    options
        .timeout_secs
        .map(refresh_to_tenths)
        .or_else(|| config.timeout_tenths())
}

fn message_hold(options: &Options, config: &Config) -> Duration {
    options
        .hold_secs
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_else(|| config.message_hold())
}

fn build_panel(options: &Options, config: &Config) -> Panel {
    let placement = options
        .placement
        .unwrap_or_else(|| PromptPlacement::from_bottom(config.prompt_at_bottom));
    Panel::new(options.title.as_str())
        .lines(options.lines.iter().cloned())
        .prompt(options.prompt.clone().unwrap_or_default())
        .placement(placement)
}

fn echo_mode(options: &Options, config: &Config) -> EchoMode {
    match options.echo {
        EchoMode::Masked(_) => EchoMode::Masked(config.mask_char).normalized(),
        plain => plain,
    }
}

/// Run one dialog (or message) and release the terminal before returning.
fn run<B: Backend>(
    mut session: Session<B>,
    options: &Options,
    config: &Config,
) -> ttydialog::Result<Outcome> {
    if let Some(message) = &options.message {
        let shown = session.write_message(message);
        if shown.is_ok() {
            thread::sleep(message_hold(options, config));
        }
        session.close()?;
        shown?;
        return Ok(Outcome::Shown);
    }

    let panel = build_panel(options, config);
    let response = session.execute(&panel, echo_mode(options, config));
    session.close()?;

    Ok(match response? {
        Response::Text(text) => Outcome::Answered(text),
        Response::Timeout => Outcome::TimedOut,
    })
}

/// Write the result for the caller and pick the exit status. Nothing but the
/// answer ever goes to `out`.
fn report<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<i32> {
    match outcome {
        Outcome::Answered(text) => {
            writeln!(out, "{}", text)?;
            out.flush()?;
            Ok(0)
        }
        Outcome::TimedOut => Ok(EXIT_TIMEOUT),
        Outcome::Shown => Ok(0),
    }
}

fn init_logging() {
    let log_path = config::config_dir()
        .map(|dir| dir.join("ttydialog.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("ttydialog.log"));

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let config = Config::load();
    info!("ttydialog {} starting", VERSION);

    let session = Session::open(CrosstermBackend::stderr()?, timeout_tenths(&options, &config))?;
    let outcome = run(session, &options, &config).map_err(|e| {
        error!(error = %e, "dialog failed");
        e
    })?;

    let code = report(&outcome, &mut io::stdout().lock())?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttydialog::{MemoryBackend, NamedKey};

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ttydialog")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_full_dialog() {
        let options = parse_args(&args(&[
            "-t", "Menu", "-l", "Status: OK", "--line", "", "-p", "Choice:", "-i", "-T", "10",
        ]))
        .unwrap();

        assert_eq!(options.title, "Menu");
        assert_eq!(options.lines, vec!["Status: OK".to_string(), String::new()]);
        assert_eq!(options.prompt.as_deref(), Some("Choice:"));
        assert_eq!(options.placement, Some(PromptPlacement::BelowLines));
        assert_eq!(options.timeout_secs, Some(10.0));
        assert_eq!(options.echo, EchoMode::Plain);
    }

    #[test]
    fn test_parse_echo_modes() {
        let masked = parse_args(&args(&["-p", "PIN:", "-e", "*"])).unwrap();
        assert_eq!(masked.echo, EchoMode::masked());

        let err = parse_args(&args(&["-p", "PIN:", "--echo", "off"])).unwrap_err();
        assert!(err.contains("off"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["-p"])).is_err());
        assert!(parse_args(&args(&["-p", "x", "-T", "soon"])).is_err());
        assert!(parse_args(&args(&["-p", "x", "-T", "-1"])).is_err());
        assert!(parse_args(&args(&["-p", "x", "--colour"])).is_err());
        assert!(parse_args(&args(&["-m", "hello"])).is_ok());
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            refresh_secs: Some(20.0),
            mask_char: '#',
            prompt_at_bottom: true,
            ..Config::default()
        };
        let mut options = parse_args(&args(&["-p", "PIN:", "-e", "*", "-i"])).unwrap();

        assert_eq!(timeout_tenths(&options, &config), Some(200));
        assert_eq!(echo_mode(&options, &config), EchoMode::Masked('#'));
        assert_eq!(build_panel(&options, &config).placement, PromptPlacement::BelowLines);

        options.timeout_secs = Some(100.0);
        options.placement = None;
        assert_eq!(timeout_tenths(&options, &config), Some(250));
        assert_eq!(build_panel(&options, &config).placement, PromptPlacement::Bottom);
    }

    #[test]
    fn test_unusable_mask_from_config() {
        let config = Config {
            mask_char: '＊',
            ..Config::default()
        };
        let options = parse_args(&args(&["-p", "PIN:", "-e", "*"])).unwrap();
        assert_eq!(echo_mode(&options, &config), EchoMode::masked());
    }

    #[test]
    fn test_run_answer() {
        let mut backend = MemoryBackend::new(40, 12);
        backend.type_str("2").push_key(NamedKey::Enter);
        let releases = backend.release_counter();
        let session = Session::open(backend, None).unwrap();
        let options = parse_args(&args(&["-t", "Menu", "-p", "Choice:"])).unwrap();

        let outcome = run(session, &options, &Config::default()).unwrap();
        assert_eq!(outcome, Outcome::Answered("2".to_string()));
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_stdout_carries_only_the_answer() {
        let mut backend = MemoryBackend::new(40, 12);
        backend.type_str("9999").push_key(NamedKey::Enter);
        let session = Session::open(backend, None).unwrap();
        let options = parse_args(&args(&["-t", "PIN Entry", "-p", "Enter PIN:", "-e", "*"])).unwrap();

        let outcome = run(session, &options, &Config::default()).unwrap();
        let mut out = Vec::new();
        assert_eq!(report(&outcome, &mut out).unwrap(), 0);
        assert_eq!(out, b"9999\n");
    }

    #[test]
    fn test_report_timeout_and_message() {
        let mut out = Vec::new();
        assert_eq!(report(&Outcome::TimedOut, &mut out).unwrap(), EXIT_TIMEOUT);
        assert_eq!(report(&Outcome::Shown, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_timeout() {
        let backend = MemoryBackend::new(40, 12);
        let session = Session::open(backend, Some(50)).unwrap();
        let options = parse_args(&args(&["-p", "Choice:"])).unwrap();

        let outcome = run(session, &options, &Config::default()).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
    }

    #[test]
    fn test_run_message() {
        let backend = MemoryBackend::new(40, 12);
        let releases = backend.release_counter();
        let session = Session::open(backend, None).unwrap();
        let options = parse_args(&args(&["-m", "Done.", "--hold", "0"])).unwrap();

        let outcome = run(session, &options, &Config::default()).unwrap();
        assert_eq!(outcome, Outcome::Shown);
        assert_eq!(releases.get(), 1);
    }
}
