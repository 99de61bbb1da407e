//! Command stream
//!
//! The simulation replays an ordered list of [`Command`]s. A script is a
//! whitespace-delimited token stream:
//!
//! ```text
//! C O N
//! <N command records, each starting with an opcode 1..=8>
//! ```
//!
//! `C` and `O` are capacity hints for customers and operators; `N` is the
//! exact number of records read.

pub mod parser;

pub use parser::{parse_script, ParseError};

use crate::models::operator::Tariff;
use serde::{Deserialize, Serialize};

/// One replayable action
///
/// Customer and operator references are raw zero-based indices in creation
/// order; the orchestrator resolves them against the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Opcode 1
    CreateCustomer {
        name: String,
        age: i64,
        operator: usize,
        limit: f64,
    },

    /// Opcode 2
    CreateOperator(Tariff),

    /// Opcode 3
    Talk {
        caller: usize,
        callee: usize,
        minutes: i64,
    },

    /// Opcode 4
    Message {
        sender: usize,
        recipient: usize,
        quantity: i64,
    },

    /// Opcode 5
    Connect { customer: usize, amount: f64 },

    /// Opcode 6
    Pay { customer: usize, amount: f64 },

    /// Opcode 7
    ReassignOperator { customer: usize, operator: usize },

    /// Opcode 8
    ChangeLimit { customer: usize, new_limit: f64 },
}

impl Command {
    /// Wire opcode of this command
    pub fn opcode(&self) -> u8 {
        match self {
            Command::CreateCustomer { .. } => 1,
            Command::CreateOperator(_) => 2,
            Command::Talk { .. } => 3,
            Command::Message { .. } => 4,
            Command::Connect { .. } => 5,
            Command::Pay { .. } => 6,
            Command::ReassignOperator { .. } => 7,
            Command::ChangeLimit { .. } => 8,
        }
    }
}

/// Declared counts from the script header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptHeader {
    pub customers: usize,
    pub operators: usize,
    pub commands: usize,
}

/// A parsed script: header plus the command records in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub header: ScriptHeader,
    pub commands: Vec<Command>,
}
