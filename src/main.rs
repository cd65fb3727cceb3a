//! The `nook` command-line host.
//!
//! ```bash
//! nook                          # interactive session
//! nook script.nook              # run a file
//! nook -e '(+ 1 2 3)'           # run a snippet
//! nook --tokens -e '(ls) # hi'  # show the token stream
//! nook --ast script.nook        # show the normalized tree
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use nook::config::Config;
use nook::interpreter::Value;
use nook::lexer;
use nook::session::{self, Error, Session};

#[derive(Parser)]
#[command(name = "nook", version, about = "NookScript: s-expressions for your shell")]
struct Cli {
    /// Script to run. Starts an interactive session when omitted
    script: Option<PathBuf>,

    /// Evaluate a snippet instead of a script
    #[arg(short, long, conflicts_with = "script")]
    eval: Option<String>,

    /// Print the token stream, including whitespace and comments
    #[arg(long)]
    tokens: bool,

    /// Print the normalized syntax tree instead of running it
    #[arg(long)]
    ast: bool,

    /// Working directory for the session
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors in the log
    #[arg(short, long)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, value_enum)]
    log: Option<LogLevel>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>) {
    use tracing_subscriber::EnvFilter;

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log);

    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let config = Config::discover(cli.config.as_deref(), &cwd)?;
    let working_dir = cli
        .directory
        .clone()
        .or_else(|| config.working_dir.clone())
        .unwrap_or(cwd);
    let working_dir = working_dir
        .canonicalize()
        .with_context(|| format!("invalid working directory '{}'", working_dir.display()))?;
    debug!(dir = %working_dir.display(), "starting session");

    let source = match (&cli.eval, &cli.script) {
        (Some(source), _) => Some(source.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?,
        ),
        (None, None) => None,
    };

    match source {
        Some(source) => {
            if !run_once(&cli, &config, working_dir, &source) {
                process::exit(1);
            }
            Ok(())
        }
        None => repl(&config, working_dir),
    }
}

/// Run a whole script. Returns whether it succeeded.
fn run_once(cli: &Cli, config: &Config, working_dir: PathBuf, source: &str) -> bool {
    let mut session = Session::new(working_dir);

    if cli.tokens {
        for token in lexer::lex_verbose(source) {
            println!("{:>5}  {:<12} {:?}", token.position, token.kind.to_string(), token.value);
        }
        return true;
    }

    if cli.ast {
        return match session.parse(source) {
            Ok(program) => {
                program.iter().for_each(|expr| println!("{expr}"));
                true
            }
            Err(diagnostics) => {
                eprintln!("{}", diagnostics.render(source));
                false
            }
        };
    }

    match session.run(source) {
        Ok(value) => {
            print_value(&session, config, &value);
            true
        }
        Err(error) => {
            eprintln!("{}", report(&error, source));
            false
        }
    }
}

fn repl(config: &Config, working_dir: PathBuf) -> Result<()> {
    let mut session = Session::new(working_dir);
    let mut editor = DefaultEditor::new().context("could not initialize the line editor")?;
    if let Some(history) = &config.history_file {
        if editor.load_history(history).is_err() {
            debug!(path = %history.display(), "no history loaded");
        }
    }

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            format!("{}{}", session.working_dir().display(), config.prompt)
        } else {
            "... ".to_string()
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        };

        if buffer.is_empty() {
            match line.trim() {
                "" => continue,
                ":quit" | ":exit" => break,
                ":pwd" => {
                    println!("{}", session.working_dir().display());
                    continue;
                }
                _ => {}
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if session::is_just_comment(&buffer) {
            buffer.clear();
            continue;
        }
        if !session::is_complete_expression(&buffer) {
            continue;
        }

        let source = std::mem::take(&mut buffer);
        if let Err(error) = editor.add_history_entry(source.trim_end()) {
            warn!(%error, "failed to record history entry");
        }
        match session.run(&source) {
            Ok(value) => print_value(&session, config, &value),
            Err(error) => eprintln!("{}", report(&error, &source)),
        }
    }

    if let Some(history) = &config.history_file {
        save_history(&mut editor, history);
    }
    Ok(())
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Err(error) = editor.save_history(path) {
        warn!(path = %path.display(), %error, "failed to save history");
    }
}

fn print_value(session: &Session, config: &Config, value: &Value) {
    match (config.show_types, session.last_type()) {
        (true, Some(ty)) => println!("{value} : {ty}"),
        _ if value.is_none() => {}
        _ => println!("{value}"),
    }
}

fn report(error: &Error, source: &str) -> String {
    match error {
        Error::Diagnostics(diagnostics) => diagnostics.render(source),
        Error::Eval(error) => format!("runtime error: {error}"),
    }
}
