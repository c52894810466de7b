/*!
 * Shell Tests
 * Command handling, screen sessions and report persistence
 */

use os_emulator::{SharedDispatcher, Shell};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG: &str = "\
num-cpu 2
scheduler \"rr\"
quantum-cycles 2
batch-process-freq 1
min-ins 3
max-ins 5
delay-per-exec 0
";

fn setup() -> (TempDir, PathBuf, SharedDispatcher, Shell) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.txt");
    std::fs::write(&config, CONFIG).unwrap();
    let shared: SharedDispatcher = Arc::new(Mutex::new(None));
    let shell = Shell::new(shared.clone()).with_config_path(&config);
    (dir, config, shared, shell)
}

fn tick(shared: &SharedDispatcher, n: usize) {
    let mut guard = shared.lock();
    let dispatcher = guard.as_mut().unwrap();
    for _ in 0..n {
        dispatcher.tick();
    }
}

#[test]
fn test_commands_require_initialize() {
    let (_dir, _config, _shared, mut shell) = setup();
    let response = shell.execute("screen -ls");
    assert_eq!(response.output, "Error: Scheduler is not initialized");
    assert!(!response.exit);
}

#[test]
fn test_initialize_and_list() {
    let (_dir, _config, shared, mut shell) = setup();
    let response = shell.execute("initialize");
    assert!(response.output.starts_with("Initialized from"), "{}", response.output);
    assert!(shared.lock().is_some());

    let listing = shell.execute("screen -ls").output;
    assert!(listing.contains("CPU utilization: 0.00%"), "{}", listing);
    assert!(listing.contains("Cores available: 2"));
}

#[test]
fn test_initialize_bad_config_leaves_uninitialized() {
    let (dir, _config, shared, mut shell) = setup();
    let bad = dir.path().join("bad.txt");
    std::fs::write(&bad, CONFIG.replace("num-cpu 2", "num-cpu 500")).unwrap();

    let response = shell.execute(&format!("initialize {}", bad.display()));
    assert!(response.output.starts_with("Error:"), "{}", response.output);
    assert!(shared.lock().is_none());
}

#[test]
fn test_scheduler_start_admits_on_tick() {
    let (_dir, _config, shared, mut shell) = setup();
    shell.execute("initialize");
    let response = shell.execute("scheduler-start");
    assert_eq!(response.output, "Scheduler started. Generating a process every 1 ticks.");

    tick(&shared, 3);
    shell.execute("scheduler-stop");
    tick(&shared, 3);

    let guard = shared.lock();
    let dispatcher = guard.as_ref().unwrap();
    assert_eq!(dispatcher.processes().len(), 3);
    assert!(!dispatcher.is_running());
}

#[test]
fn test_screen_session() {
    let (_dir, _config, shared, mut shell) = setup();
    shell.execute("initialize");

    let response = shell.execute("screen -s worker");
    assert_eq!(response.output, "Created process worker.");
    assert_eq!(shell.prompt(), "worker:> ");

    tick(&shared, 2);
    let smi = shell.execute("process-smi").output;
    assert!(smi.contains("Process name: worker"), "{}", smi);
    assert!(smi.contains("Core:0"), "{}", smi);

    assert_eq!(shell.execute("bogus").output, "Unknown command in screen.");
    shell.execute("exit");
    assert_eq!(shell.prompt(), "root:> ");

    let again = shell.execute("screen -s worker").output;
    assert_eq!(again, "Error: Process worker already exists");
}

#[test]
fn test_screen_resume() {
    let (_dir, _config, _shared, mut shell) = setup();
    shell.execute("initialize");
    assert_eq!(
        shell.execute("screen -r ghost").output,
        "Error: Process ghost not found"
    );

    shell.execute("screen -s job");
    shell.execute("exit");
    let resumed = shell.execute("screen -r job").output;
    assert!(resumed.contains("Process name: job"));
    assert!(resumed.contains("(No logs yet)"));
    assert_eq!(shell.prompt(), "job:> ");
}

#[test]
fn test_report_util_writes_file() {
    let (dir, _config, shared, mut shell) = setup();
    shell.execute("initialize");
    shell.execute("screen -s a");
    shell.execute("exit");
    tick(&shared, 1);

    let path = dir.path().join("report.txt");
    let response = shell.execute(&format!("report-util {}", path.display()));
    assert!(response.output.starts_with("Report generated at"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("CPU utilization: 50.00%"), "{}", text);
    assert!(text.contains("Running processes:"));
}

#[test]
fn test_unknown_and_exit() {
    let (_dir, _config, _shared, mut shell) = setup();
    shell.execute("initialize");
    assert_eq!(shell.execute("frobnicate").output, "Unknown command: frobnicate");
    assert!(shell.execute("exit").exit);
    assert_eq!(shell.execute("   ").output, "");
}
