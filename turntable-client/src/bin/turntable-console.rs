//! Interactive progression console.
//!
//! Opens a profile session and reads console commands from stdin, one per
//! line, until `quit` or end of input. The profile is saved on exit.
//!
//! ```text
//! turntable-console [config.toml] [profile-name]
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use turntable_client::engine::{Console, EventLog, Rgba};
use turntable_client::{ClientConfig, CommandRegistry, ProfileSession};

/// Prints console lines to stdout.
struct StdoutConsole;

impl Console for StdoutConsole {
    fn print_line(&mut self, text: &str, color: Rgba) {
        println!(
            "\x1b[38;2;{};{};{}m{text}\x1b[0m",
            color.r, color.g, color.b
        );
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ClientConfig::from_file(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => ClientConfig::default(),
    };
    let profile_name = args.next();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.core.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut events = EventLog::new();
    let mut session = ProfileSession::open(&config.core, profile_name.as_deref(), &mut events)
        .context("opening profile")?;
    tracing::info!(profile = session.name(), "Console ready (type `help`)");

    let registry = CommandRegistry::with_builtins();
    let mut console = StdoutConsole;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        let mut ctx = session.command_context(&mut console, &mut events);
        registry.execute(trimmed, &mut ctx);
        io::stdout().flush().context("flushing stdout")?;
    }

    for event in &events.events {
        tracing::debug!(event = event.name(), "Fired during session");
    }
    session.close().context("saving profile")?;
    Ok(())
}
