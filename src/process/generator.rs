/*!
 * Program Generator
 * Random well-formed programs for batch-admitted processes
 */

use super::instruction::{Instruction, Opcode, Operand, Program};
use crate::core::types::MAX_FOR_DEPTH;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VARIABLES: [&str; 3] = ["x", "y", "z"];

/// Seedable source of random programs
#[derive(Debug, Clone)]
pub struct ProgramGenerator {
    rng: StdRng,
}

impl ProgramGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Instruction count uniform in `min..=max`
    pub fn instruction_count(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    pub fn program(&mut self, len: u32) -> Program {
        (0..len).map(|_| self.instruction(0)).collect()
    }

    /// Program with a random length in `min..=max`
    pub fn program_between(&mut self, min: u32, max: u32) -> Program {
        let len = self.instruction_count(min, max);
        self.program(len)
    }

    fn instruction(&mut self, enclosing: usize) -> Instruction {
        let opcode = Opcode::ALL[self.rng.gen_range(0..Opcode::ALL.len())];
        match opcode {
            Opcode::Print => Instruction::Print(None),
            Opcode::Declare => Instruction::Declare {
                var: self.variable(),
                value: self.rng.gen_range(0..100),
            },
            Opcode::Add => Instruction::Add {
                dest: self.variable(),
                lhs: self.operand(),
                rhs: self.operand(),
            },
            Opcode::Subtract => Instruction::Subtract {
                dest: self.variable(),
                lhs: self.operand(),
                rhs: self.operand(),
            },
            Opcode::Sleep if enclosing == 0 => Instruction::Sleep(self.rng.gen_range(1..=3)),
            Opcode::Sleep => Instruction::Print(None),
            Opcode::For if enclosing < MAX_FOR_DEPTH => Instruction::For {
                body: Box::new(self.instruction(enclosing + 1)),
                repeats: self.rng.gen_range(1..=3),
            },
            Opcode::For => Instruction::Print(None),
        }
    }

    fn variable(&mut self) -> String {
        VARIABLES[self.rng.gen_range(0..VARIABLES.len())].to_string()
    }

    fn operand(&mut self) -> Operand {
        if self.rng.gen_bool(0.5) {
            Operand::Variable(self.variable())
        } else {
            Operand::Literal(self.rng.gen_range(0..100))
        }
    }
}

impl Default for ProgramGenerator {
    fn default() -> Self {
        Self::new()
    }
}
