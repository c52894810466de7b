/*!
 * Reports
 * Text and JSON renderings of the dispatcher's read-only views
 */

use crate::core::clock::format_timestamp;
use crate::core::types::{CoreId, Pid};
use crate::process::{Process, ProcessState};
use crate::scheduler::{CoreUtilization, Dispatcher, SchedulerStats, SchedulingPolicy};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Default `report-util` destination
pub const REPORT_FILE: &str = "csopesy-log.txt";

const RULE: &str = "----------------------------------------";

/// Utilization header plus running and finished process listings
pub fn render(dispatcher: &Dispatcher) -> String {
    let util = dispatcher.utilization();
    let mut out = String::new();

    let _ = writeln!(out, "CPU utilization: {:.2}%", util.percent());
    let _ = writeln!(out, "Cores used: {}", util.used);
    let _ = writeln!(out, "Cores available: {}", util.available());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "Running processes:");
    let mut any = false;
    for process in dispatcher.processes().iter().filter(|p| !p.is_finished()) {
        any = true;
        let location = match process.assigned_core() {
            Some(core) => format!("Core: {}", core),
            None => process.state().to_string(),
        };
        let _ = writeln!(
            out,
            "{:<10} ({})   {:<10}   {} / {}",
            process.name(),
            format_timestamp(process.created_at()),
            location,
            process.program_counter(),
            process.total_lines()
        );
    }
    if !any {
        let _ = writeln!(out, "(none)");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Finished processes:");
    let mut any = false;
    for process in dispatcher.processes().iter().filter(|p| p.is_finished()) {
        any = true;
        let at = process.finished_at().unwrap_or_else(|| process.created_at());
        let _ = writeln!(
            out,
            "{:<10} ({})   Finished     {} / {}",
            process.name(),
            format_timestamp(at),
            process.program_counter(),
            process.total_lines()
        );
    }
    if !any {
        let _ = writeln!(out, "(none)");
    }
    let _ = writeln!(out, "{}", RULE);
    out
}

/// `process-smi` screen for one process
pub fn render_process(process: &Process) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Process name: {}", process.name());
    let _ = writeln!(out, "ID: {}", process.pid());
    let _ = writeln!(out, "Logs:");
    if process.logs().is_empty() {
        let _ = writeln!(out, "(No logs yet)");
    }
    for entry in process.logs() {
        let _ = writeln!(out, "{}", entry);
    }
    let _ = writeln!(out);
    if process.is_finished() {
        let _ = writeln!(out, "Finished!");
    } else {
        let _ = writeln!(out, "Current instruction line: {}", process.program_counter());
        let _ = writeln!(out, "Lines of code: {}", process.total_lines());
    }
    out
}

/// Write the text report to `path`
pub fn write_report(dispatcher: &Dispatcher, path: impl AsRef<Path>) -> std::io::Result<()> {
    std::fs::write(path, render(dispatcher))
}

#[derive(Serialize)]
struct ReportView<'a> {
    policy: SchedulingPolicy,
    utilization: CoreUtilization,
    total_ticks: u64,
    stats: SchedulerStats,
    processes: Vec<ProcessView<'a>>,
}

#[derive(Serialize)]
struct ProcessView<'a> {
    pid: Pid,
    name: &'a str,
    state: ProcessState,
    program_counter: usize,
    total_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    core: Option<CoreId>,
    logs: &'a [String],
}

/// Same view as [`render`], as JSON
pub fn render_json(dispatcher: &Dispatcher) -> serde_json::Result<String> {
    let view = ReportView {
        policy: dispatcher.policy(),
        utilization: dispatcher.utilization(),
        total_ticks: dispatcher.total_ticks(),
        stats: dispatcher.stats(),
        processes: dispatcher
            .processes()
            .iter()
            .map(|p| ProcessView {
                pid: p.pid(),
                name: p.name(),
                state: p.state(),
                program_counter: p.program_counter(),
                total_lines: p.total_lines(),
                core: p.assigned_core(),
                logs: p.logs(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&view)
}
