/*!
 * OS Emulator - Main Entry Point
 *
 * Interactive shell on stdin plus a background task that ticks the
 * dispatcher once per period.
 */

use miette::IntoDiagnostic;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use os_emulator::shell::spawn_ticker;
use os_emulator::{init_tracing, SharedDispatcher, Shell};

const DEFAULT_TICK_MS: u64 = 100;

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    let tick_ms = std::env::var("EMULATOR_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    info!(tick_ms, "OS emulator starting");

    let dispatcher: SharedDispatcher = Arc::new(Mutex::new(None));
    let ticker = spawn_ticker(dispatcher.clone(), Duration::from_millis(tick_ms));

    let mut shell = Shell::new(dispatcher);
    if let Ok(path) = std::env::var("EMULATOR_CONFIG") {
        shell = shell.with_config_path(path);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("OS Emulator. Type 'initialize' to begin, 'exit' to quit.");

    loop {
        print!("{}", shell.prompt());
        std::io::stdout().flush().into_diagnostic()?;

        let line = tokio::select! {
            line = lines.next_line() => line.into_diagnostic()?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let response = shell.execute(&line);
        if !response.output.is_empty() {
            println!("{}", response.output.trim_end());
        }
        if response.exit {
            break;
        }
    }

    ticker.abort();
    info!("OS emulator shutting down");
    Ok(())
}
