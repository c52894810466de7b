/*!
 * Instruction Interpreter
 * Executes one top-level instruction per call against a process's state
 */

use super::instruction::{parse_decimal, saturate_u16, Instruction, Operand};
use super::{Process, ProcessState};
use crate::core::clock;
use crate::core::types::CoreId;
use ahash::AHashMap;
use tracing::debug;

impl Process {
    /// Execute the instruction at the program counter and advance by one
    ///
    /// `core` selects the log format: scheduled execution stamps every entry
    /// with time and core id, manual execution (`None`) logs bare messages.
    /// No-op once the process is finished.
    pub fn execute_next(&mut self, core: Option<CoreId>) {
        if self.is_finished() {
            return;
        }
        let Some(instruction) = self.program.get(self.pc) else {
            self.finish();
            return;
        };

        let mut ctx = ExecContext {
            name: &self.name,
            variables: &mut self.variables,
            logs: &mut self.logs,
            core,
            stamp: None,
            sleep: None,
        };
        match instruction.check_limits() {
            Ok(()) => ctx.run(instruction),
            Err(e) => {
                debug!(pid = self.pid, pc = self.pc, error = %e, "Instruction aborted");
                ctx.log(format!("ERROR: {}", e));
            }
        }
        let sleep = ctx.sleep;

        self.pc += 1;
        if self.pc >= self.program.len() {
            self.finish();
        } else if let Some(ticks) = sleep {
            self.sleep_ticks = ticks;
            self.state = ProcessState::Sleeping;
        }
    }

    fn finish(&mut self) {
        self.state = ProcessState::Finished;
        self.sleep_ticks = 0;
        self.finished_at = Some(clock::now());
    }
}

/// Borrowed view of the mutable parts of a process during one execution step
struct ExecContext<'a> {
    name: &'a str,
    variables: &'a mut AHashMap<String, u16>,
    logs: &'a mut Vec<String>,
    core: Option<CoreId>,
    stamp: Option<String>,
    sleep: Option<u8>,
}

impl ExecContext<'_> {
    /// Limits are checked by the caller before the top-level statement runs
    fn run(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Print(arg) => {
                let message = self.print_message(arg.as_deref());
                self.log(message);
            }
            Instruction::Declare { var, value } => {
                self.variables.insert(var.clone(), *value);
            }
            Instruction::Add { dest, lhs, rhs } => {
                let sum = self.value_of(lhs).saturating_add(self.value_of(rhs));
                self.store(dest, sum);
            }
            Instruction::Subtract { dest, lhs, rhs } => {
                let diff = self.value_of(lhs).saturating_sub(self.value_of(rhs));
                self.store(dest, diff);
            }
            Instruction::Sleep(ticks) => {
                self.sleep = Some(*ticks);
            }
            Instruction::For { body, repeats } => {
                for i in 1..=*repeats {
                    self.log(format!("[FOR LOOP] Iteration {}/{}", i, repeats));
                    self.run(body);
                }
            }
            Instruction::Malformed { text, reason } => {
                self.log(format!("ERROR: {} in `{}`", reason, text));
            }
        }
    }

    fn print_message(&self, arg: Option<&str>) -> String {
        let Some(arg) = arg else {
            return format!("Hello world from {}!", self.name);
        };
        if let Some(text) = unquote(arg) {
            return text.to_string();
        }
        if let Some(value) = self.variables.get(arg) {
            return value.to_string();
        }
        if parse_decimal(arg).is_some() {
            return arg.to_string();
        }
        format!("Unknown symbol: {}", arg)
    }

    /// Literal value, or the variable's value with auto-declare-as-0
    fn value_of(&mut self, operand: &Operand) -> i64 {
        match operand {
            Operand::Literal(value) => *value,
            Operand::Variable(name) => match self.variables.get(name) {
                Some(value) => *value as i64,
                None => {
                    self.variables.insert(name.clone(), 0);
                    0
                }
            },
        }
    }

    fn store(&mut self, dest: &str, value: i64) {
        self.variables.insert(dest.to_string(), saturate_u16(value));
    }

    fn log(&mut self, message: String) {
        let entry = match self.core {
            Some(core) => {
                let stamp = self
                    .stamp
                    .get_or_insert_with(|| clock::format_timestamp(clock::now()));
                format!("({}) Core:{} \"{}\"", stamp, core, message)
            }
            None => message,
        };
        self.logs.push(entry);
    }
}

fn unquote(arg: &str) -> Option<&str> {
    let first = arg.chars().next()?;
    if arg.len() >= 2 && (first == '"' || first == '\'') && arg.ends_with(first) {
        Some(&arg[1..arg.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Program;
    use pretty_assertions::assert_eq;

    fn run_all(text: &str) -> Process {
        let mut process = Process::new(0, "proc", Program::parse(text));
        while !process.is_finished() {
            process.execute_next(None);
        }
        process
    }

    #[test]
    fn test_print_variants() {
        let process = run_all("PRINT; PRINT 'quoted'; DECLARE v 7; PRINT v; PRINT 12; PRINT nope");
        assert_eq!(
            process.logs(),
            &[
                "Hello world from proc!",
                "quoted",
                "7",
                "12",
                "Unknown symbol: nope",
            ]
        );
    }

    #[test]
    fn test_print_does_not_auto_declare() {
        let process = run_all("PRINT ghost");
        assert_eq!(process.variable("ghost"), None);
    }

    #[test]
    fn test_arithmetic_auto_declares_operands() {
        let process = run_all("ADD a b 3");
        assert_eq!(process.variable("a"), Some(3));
        assert_eq!(process.variable("b"), Some(0));
    }

    #[test]
    fn test_subtract_saturates_at_zero() {
        let process = run_all("DECLARE x 5; SUBTRACT y x 10");
        assert_eq!(process.variable("y"), Some(0));
    }

    #[test]
    fn test_scheduled_log_format() {
        let mut process = Process::new(0, "proc", Program::parse("PRINT \"hello\""));
        process.execute_next(Some(3));
        let entry = &process.logs()[0];
        assert!(entry.starts_with('('), "{}", entry);
        assert!(entry.ends_with(") Core:3 \"hello\""), "{}", entry);
        assert!(entry.contains("M)"), "{}", entry);
    }

    #[test]
    fn test_sleep_sets_state() {
        let mut process = Process::new(0, "proc", Program::parse("SLEEP 4; PRINT"));
        process.execute_next(Some(0));
        assert_eq!(process.state(), ProcessState::Sleeping);
        assert_eq!(process.sleep_ticks_remaining(), 4);
        assert_eq!(process.program_counter(), 1);
    }

    #[test]
    fn test_sleep_as_last_instruction_finishes() {
        let mut process = Process::new(0, "proc", Program::parse("SLEEP 4"));
        process.execute_next(Some(0));
        assert_eq!(process.state(), ProcessState::Finished);
        assert_eq!(process.sleep_ticks_remaining(), 0);
    }

    #[test]
    fn test_for_nesting_guard_at_runtime() {
        let mut body = Instruction::Print(None);
        for _ in 0..4 {
            body = Instruction::For {
                body: Box::new(body),
                repeats: 1,
            };
        }
        let mut process = Process::new(0, "deep", Program::new(vec![body, Instruction::Print(None)]));
        process.execute_next(None);

        assert_eq!(process.program_counter(), 1);
        assert_eq!(process.state(), ProcessState::Ready);
        assert_eq!(process.logs().len(), 1);
        assert!(process.logs()[0].starts_with("ERROR: FOR nesting"), "{}", process.logs()[0]);
    }

    #[test]
    fn test_oversized_for_aborted_before_running() {
        let body = Instruction::For {
            body: Box::new(Instruction::Sleep(2)),
            repeats: u32::MAX,
        };
        let mut process = Process::new(0, "long", Program::new(vec![body, Instruction::Print(None)]));
        process.execute_next(Some(0));

        assert_eq!(process.program_counter(), 1);
        assert_eq!(process.state(), ProcessState::Ready);
        assert_eq!(process.logs().len(), 1);
        assert!(process.logs()[0].contains("ERROR: FOR expands to"), "{}", process.logs()[0]);
    }

    #[test]
    fn test_literals_combine_before_saturating() {
        let process = run_all("SUBTRACT a 70000 10; ADD b 10 -5; SUBTRACT c -3 -8");
        assert_eq!(process.variable("a"), Some(65535));
        assert_eq!(process.variable("b"), Some(5));
        assert_eq!(process.variable("c"), Some(5));
    }

    #[test]
    fn test_malformed_is_logged_noop() {
        let mut process = Process::new(0, "proc", Program::parse("ADD x 1; PRINT"));
        process.execute_next(None);
        assert_eq!(process.program_counter(), 1);
        assert_eq!(process.variable("x"), None);
        assert!(process.logs()[0].starts_with("ERROR: ADD expects 3 operand(s)"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"hi\""), Some("hi"));
        assert_eq!(unquote("'hi'"), Some("hi"));
        assert_eq!(unquote("\"hi'"), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("hi"), None);
    }
}
