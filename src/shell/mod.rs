/*!
 * Command Shell
 * Line-oriented front end over a shared dispatcher
 */

mod driver;
pub mod report;

pub use driver::spawn_ticker;

use crate::config::{SchedulerConfig, DEFAULT_CONFIG_PATH};
use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::monitoring::span_command;
use crate::scheduler::Dispatcher;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Dispatcher shared between the shell and the tick driver; `None` until `initialize`
pub type SharedDispatcher = Arc<Mutex<Option<Dispatcher>>>;

/// Result of one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub output: String,
    pub exit: bool,
}

impl Response {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: false,
        }
    }

    fn exit(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: true,
        }
    }
}

/// Interactive shell state: root prompt or attached to one process screen
pub struct Shell {
    dispatcher: SharedDispatcher,
    config_path: PathBuf,
    attached: Option<(Pid, String)>,
}

impl Shell {
    pub fn new(dispatcher: SharedDispatcher) -> Self {
        Self {
            dispatcher,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            attached: None,
        }
    }

    /// Config file used by a bare `initialize`
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn prompt(&self) -> String {
        match &self.attached {
            Some((_, name)) => format!("{}:> ", name),
            None => "root:> ".to_string(),
        }
    }

    /// Process one input line
    pub fn execute(&mut self, line: &str) -> Response {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            return Response::text("");
        };
        let _span = span_command(command).entered();

        if self.attached.is_some() {
            return self.execute_screen(command);
        }

        match (command, &tokens[1..]) {
            ("exit", _) => Response::exit("Thanks!"),
            ("initialize", args) => self.initialize(args.first().copied()),
            (cmd, args) => match self.execute_initialized(cmd, args) {
                Ok(response) => response,
                Err(e) => Response::text(format!("Error: {}", e)),
            },
        }
    }

    fn initialize(&mut self, path: Option<&str>) -> Response {
        let path = path.map(PathBuf::from).unwrap_or_else(|| self.config_path.clone());
        let config = match SchedulerConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Initialization failed");
                return Response::text(format!("Error: {}", e));
            }
        };
        match Dispatcher::new(config) {
            Ok(dispatcher) => {
                *self.dispatcher.lock() = Some(dispatcher);
                Response::text(format!("Initialized from {}.", path.display()))
            }
            Err(e) => Response::text(format!("Error: {}", e)),
        }
    }

    fn execute_initialized(&mut self, command: &str, args: &[&str]) -> Result<Response, SchedulerError> {
        let mut guard = self.dispatcher.lock();
        let dispatcher = guard.as_mut().ok_or(SchedulerError::NotInitialized)?;

        let response = match (command, args) {
            ("scheduler-start" | "scheduler-test", []) => {
                dispatcher.start();
                Response::text(format!(
                    "Scheduler started. Generating a process every {} ticks.",
                    dispatcher.config().batch_process_freq
                ))
            }
            ("scheduler-stop", []) => {
                dispatcher.stop();
                Response::text("Scheduler stopped.")
            }
            ("screen", ["-ls"]) => Response::text(report::render(dispatcher)),
            ("screen", ["-s", name]) => {
                let pid = dispatcher.spawn(name)?;
                self.attached = Some((pid, name.to_string()));
                Response::text(format!("Created process {}.", name))
            }
            ("screen", ["-r", name]) => {
                let process = dispatcher
                    .find_active(name)
                    .ok_or_else(|| SchedulerError::ProcessNotFound(name.to_string()))?;
                let output = report::render_process(process);
                self.attached = Some((process.pid(), name.to_string()));
                Response::text(output)
            }
            ("screen", _) => Response::text("Usage: screen -ls | screen -s <name> | screen -r <name>"),
            ("report-util", rest) => {
                let path = rest.first().copied().unwrap_or(report::REPORT_FILE);
                match report::write_report(dispatcher, path) {
                    Ok(()) => Response::text(format!("Report generated at {}.", path)),
                    Err(e) => Response::text(format!("Error: could not write {}: {}", path, e)),
                }
            }
            (cmd, _) => Response::text(format!("Unknown command: {}", cmd)),
        };
        Ok(response)
    }

    fn execute_screen(&mut self, command: &str) -> Response {
        let Some((pid, _)) = self.attached.clone() else {
            return Response::text("");
        };
        match command {
            "exit" => {
                self.attached = None;
                Response::text("")
            }
            "process-smi" => {
                let screen = self
                    .dispatcher
                    .lock()
                    .as_ref()
                    .and_then(|d| d.process(pid))
                    .map(report::render_process);
                match screen {
                    Some(text) => Response::text(text),
                    None => {
                        self.attached = None;
                        Response::text("Process no longer exists.")
                    }
                }
            }
            _ => Response::text("Unknown command in screen."),
        }
    }
}
