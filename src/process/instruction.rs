/*!
 * Instruction Set
 * Six opcodes with typed operands, plus decoding from program text
 */

use crate::core::errors::{InstructionError, InstructionResult};
use crate::core::types::{MAX_FOR_DEPTH, MAX_FOR_STEPS};
use std::fmt;
use std::str::FromStr;

/// Opcode names as they appear in program text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Print,
    Declare,
    Add,
    Subtract,
    Sleep,
    For,
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Self::Print,
        Self::Declare,
        Self::Add,
        Self::Subtract,
        Self::Sleep,
        Self::For,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Print => "PRINT",
            Self::Declare => "DECLARE",
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Sleep => "SLEEP",
            Self::For => "FOR",
        }
    }
}

impl FromStr for Opcode {
    type Err = InstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRINT" => Ok(Self::Print),
            "DECLARE" => Ok(Self::Declare),
            "ADD" => Ok(Self::Add),
            "SUBTRACT" => Ok(Self::Subtract),
            "SLEEP" => Ok(Self::Sleep),
            "FOR" => Ok(Self::For),
            _ => Err(InstructionError::UnknownOpcode(s.to_string())),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic source operand
///
/// Literals keep their full value; only the stored result is saturated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(i64),
    Variable(String),
}

impl Operand {
    /// Decimal numerals become literals, anything else names a variable
    pub fn parse(token: &str) -> Self {
        match parse_decimal(token) {
            Some(value) => Self::Literal(value),
            None => Self::Variable(token.to_string()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{}", value),
            Self::Variable(name) => f.write_str(name),
        }
    }
}

/// One program statement
///
/// `Malformed` holds statement text that failed to decode; it executes as a
/// logged no-op so a bad program never stalls the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Raw operand; quoting and symbol lookup are resolved at execution time
    Print(Option<String>),
    Declare {
        var: String,
        value: u16,
    },
    Add {
        dest: String,
        lhs: Operand,
        rhs: Operand,
    },
    Subtract {
        dest: String,
        lhs: Operand,
        rhs: Operand,
    },
    Sleep(u8),
    For {
        body: Box<Instruction>,
        repeats: u32,
    },
    Malformed {
        text: String,
        reason: InstructionError,
    },
}

impl Instruction {
    /// Decode one statement from its opcode name and operand tokens
    pub fn parse(opcode: &str, operands: &[&str]) -> InstructionResult<Self> {
        let instruction = Self::parse_nested(opcode, operands, 0)?;
        instruction.check_limits()?;
        Ok(instruction)
    }

    /// `enclosing` is the number of FOR levels around this statement
    fn parse_nested(opcode: &str, operands: &[&str], enclosing: usize) -> InstructionResult<Self> {
        let opcode: Opcode = opcode.parse()?;
        let arity = |expected: &'static str| InstructionError::Arity {
            opcode: opcode.as_str(),
            expected,
            found: operands.len(),
        };

        match opcode {
            Opcode::Print => match operands {
                [] => Ok(Self::Print(None)),
                [arg] => Ok(Self::Print(Some(arg.to_string()))),
                _ => Err(arity("0 or 1")),
            },
            Opcode::Declare => match operands {
                [var, literal] => Ok(Self::Declare {
                    var: var.to_string(),
                    value: saturate_u16(numeral(literal)?),
                }),
                _ => Err(arity("2")),
            },
            Opcode::Add | Opcode::Subtract => match operands {
                [dest, lhs, rhs] => {
                    let dest = dest.to_string();
                    let (lhs, rhs) = (Operand::parse(lhs), Operand::parse(rhs));
                    Ok(if opcode == Opcode::Add {
                        Self::Add { dest, lhs, rhs }
                    } else {
                        Self::Subtract { dest, lhs, rhs }
                    })
                }
                _ => Err(arity("3")),
            },
            Opcode::Sleep => match operands {
                [ticks] => Ok(Self::Sleep(numeral(ticks)?.clamp(0, u8::MAX as i64) as u8)),
                _ => Err(arity("1")),
            },
            Opcode::For => match operands {
                [inner, count, rest @ ..] => {
                    if enclosing + 1 > MAX_FOR_DEPTH {
                        return Err(InstructionError::NestingTooDeep);
                    }
                    let repeats = numeral(count)?.clamp(0, u32::MAX as i64) as u32;
                    let body = Self::parse_nested(inner, rest, enclosing + 1)?;
                    Ok(Self::For {
                        body: Box::new(body),
                        repeats,
                    })
                }
                _ => Err(arity("at least 2")),
            },
        }
    }

    /// Opcode of a well-formed statement
    pub fn opcode(&self) -> Option<Opcode> {
        Some(match self {
            Self::Print(_) => Opcode::Print,
            Self::Declare { .. } => Opcode::Declare,
            Self::Add { .. } => Opcode::Add,
            Self::Subtract { .. } => Opcode::Subtract,
            Self::Sleep(_) => Opcode::Sleep,
            Self::For { .. } => Opcode::For,
            Self::Malformed { .. } => return None,
        })
    }

    /// FOR levels in this statement, 0 for anything else
    pub fn for_depth(&self) -> usize {
        match self {
            Self::For { body, .. } => 1 + body.for_depth(),
            _ => 0,
        }
    }

    /// Steps one execution performs: every loop iteration plus every body run
    ///
    /// `FOR PRINT 3` is 6 steps, anything other than FOR is 1.
    pub fn execution_steps(&self) -> u64 {
        match self {
            Self::For { body, repeats } => {
                (*repeats as u64).saturating_mul(1u64.saturating_add(body.execution_steps()))
            }
            _ => 1,
        }
    }

    /// Reject FOR statements too deep or too long to run within one tick
    pub fn check_limits(&self) -> InstructionResult<()> {
        if self.for_depth() > MAX_FOR_DEPTH {
            return Err(InstructionError::NestingTooDeep);
        }
        let steps = self.execution_steps();
        if steps > MAX_FOR_STEPS {
            return Err(InstructionError::TooManySteps {
                steps,
                limit: MAX_FOR_STEPS,
            });
        }
        Ok(())
    }

    fn write_operands(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print(None) => Ok(()),
            Self::Print(Some(arg)) => write!(f, " {}", arg),
            Self::Declare { var, value } => write!(f, " {} {}", var, value),
            Self::Add { dest, lhs, rhs } | Self::Subtract { dest, lhs, rhs } => {
                write!(f, " {} {} {}", dest, lhs, rhs)
            }
            Self::Sleep(ticks) => write!(f, " {}", ticks),
            Self::For { body, repeats } => {
                match body.opcode() {
                    Some(op) => write!(f, " {} {}", op, repeats)?,
                    None => write!(f, " ? {}", repeats)?,
                }
                body.write_operands(f)
            }
            Self::Malformed { .. } => Ok(()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { text, .. } => f.write_str(text),
            _ => {
                if let Some(op) = self.opcode() {
                    f.write_str(op.as_str())?;
                }
                self.write_operands(f)
            }
        }
    }
}

/// Immutable instruction sequence owned by one process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Decode program text
    ///
    /// Statements are separated by `;` or newlines. Quoted operands keep their
    /// quotes and may contain whitespace. Statements that fail to decode are kept
    /// as [`Instruction::Malformed`].
    pub fn parse(text: &str) -> Self {
        let instructions = split_statements(text)
            .into_iter()
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| {
                let operands: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
                Instruction::parse(&tokens[0], &operands).unwrap_or_else(|reason| {
                    Instruction::Malformed {
                        text: tokens.join(" "),
                        reason,
                    }
                })
            })
            .collect();
        Self { instructions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Signed decimal with optional sign; overlong digit strings saturate
pub(crate) fn parse_decimal(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[inline]
pub(crate) fn saturate_u16(value: i64) -> u16 {
    value.clamp(0, u16::MAX as i64) as u16
}

fn numeral(token: &str) -> InstructionResult<i64> {
    parse_decimal(token).ok_or_else(|| InstructionError::BadNumeral(token.to_string()))
}

/// Tokenize program text into statements, honouring single and double quotes
fn split_statements(text: &str) -> Vec<Vec<String>> {
    let mut statements = Vec::new();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ';' | '\n' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    statements.push(std::mem::take(&mut tokens));
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    statements.push(tokens);
    statements
}
