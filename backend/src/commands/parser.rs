//! Script parser
//!
//! Turns the whitespace-delimited input into a [`Script`]. Any malformed or
//! missing token is a structural error and aborts parsing; there is no
//! recovery.

use super::{Command, Script, ScriptHeader};
use crate::models::operator::Tariff;
use std::str::SplitWhitespace;
use thiserror::Error;
use tracing::warn;

/// Upper bound on command slots reserved up front from the header count
const MAX_PREALLOCATED_COMMANDS: usize = 1 << 16;

/// Structural errors in the input stream
///
/// `record` is the 1-based command record number; `0` is the header.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of input at record {record}: missing {field}")]
    MissingToken { record: usize, field: &'static str },

    #[error("Invalid integer for {field} at record {record}: {token:?}")]
    InvalidInteger {
        record: usize,
        field: &'static str,
        token: String,
    },

    #[error("Invalid number for {field} at record {record}: {token:?}")]
    InvalidFloat {
        record: usize,
        field: &'static str,
        token: String,
    },

    #[error("Invalid index for {field} at record {record}: {token:?}")]
    InvalidIndex {
        record: usize,
        field: &'static str,
        token: String,
    },

    #[error("Invalid operation {opcode} at record {record}")]
    UnknownOpcode { record: usize, opcode: i64 },
}

/// Cursor over the token stream, aware of the record being read
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    record: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace(),
            record: 0,
        }
    }

    fn next_str(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.inner.next().ok_or(ParseError::MissingToken {
            record: self.record,
            field,
        })
    }

    fn next_i64(&mut self, field: &'static str) -> Result<i64, ParseError> {
        let token = self.next_str(field)?;
        token.parse().map_err(|_| ParseError::InvalidInteger {
            record: self.record,
            field,
            token: token.to_string(),
        })
    }

    fn next_f64(&mut self, field: &'static str) -> Result<f64, ParseError> {
        let token = self.next_str(field)?;
        token.parse().map_err(|_| ParseError::InvalidFloat {
            record: self.record,
            field,
            token: token.to_string(),
        })
    }

    /// Counts and entity indices: non-negative integers
    fn next_index(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let token = self.next_str(field)?;
        token.parse().map_err(|_| ParseError::InvalidIndex {
            record: self.record,
            field,
            token: token.to_string(),
        })
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parse a complete script.
///
/// # Example
///
/// ```rust
/// use telecom_billing_core::commands::{parse_script, Command};
///
/// let script = parse_script("1 1 2\n2 1.0 0.5 0.1 10\n1 ada 30 0 100.0").unwrap();
/// assert_eq!(script.header.commands, 2);
/// assert!(matches!(script.commands[1], Command::CreateCustomer { age: 30, .. }));
/// ```
pub fn parse_script(input: &str) -> Result<Script, ParseError> {
    let mut tokens = Tokens::new(input);

    let header = ScriptHeader {
        customers: tokens.next_index("customer count")?,
        operators: tokens.next_index("operator count")?,
        commands: tokens.next_index("command count")?,
    };

    let mut commands = Vec::with_capacity(header.commands.min(MAX_PREALLOCATED_COMMANDS));
    for record in 1..=header.commands {
        tokens.record = record;
        commands.push(parse_command(&mut tokens)?);
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        warn!(trailing, "Ignoring tokens after the last declared command");
    }

    Ok(Script { header, commands })
}

fn parse_command(tokens: &mut Tokens<'_>) -> Result<Command, ParseError> {
    let opcode = tokens.next_i64("opcode")?;
    let command = match opcode {
        1 => Command::CreateCustomer {
            name: tokens.next_str("name")?.to_string(),
            age: tokens.next_i64("age")?,
            operator: tokens.next_index("operator")?,
            limit: tokens.next_f64("limit")?,
        },
        2 => Command::CreateOperator(Tariff {
            talking_charge: tokens.next_f64("talking charge")?,
            message_cost: tokens.next_f64("message cost")?,
            network_charge: tokens.next_f64("network charge")?,
            discount_rate: tokens.next_i64("discount rate")?,
        }),
        3 => Command::Talk {
            caller: tokens.next_index("caller")?,
            callee: tokens.next_index("callee")?,
            minutes: tokens.next_i64("minutes")?,
        },
        4 => Command::Message {
            sender: tokens.next_index("sender")?,
            recipient: tokens.next_index("recipient")?,
            quantity: tokens.next_i64("quantity")?,
        },
        5 => Command::Connect {
            customer: tokens.next_index("customer")?,
            amount: tokens.next_f64("amount")?,
        },
        6 => Command::Pay {
            customer: tokens.next_index("customer")?,
            amount: tokens.next_f64("amount")?,
        },
        7 => Command::ReassignOperator {
            customer: tokens.next_index("customer")?,
            operator: tokens.next_index("operator")?,
        },
        8 => Command::ChangeLimit {
            customer: tokens.next_index("customer")?,
            new_limit: tokens.next_f64("limit")?,
        },
        _ => {
            return Err(ParseError::UnknownOpcode {
                record: tokens.record,
                opcode,
            })
        }
    };
    Ok(command)
}
